use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::EngineError;

/// A user's verdict on one recommended career. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Label as produced by the course classifier (free text, not a `Career`).
    pub career_id: String,
    pub rating: u8,
    pub satisfied: bool,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl FeedbackEvent {
    pub fn new(
        user_id: Uuid,
        career_id: &str,
        rating: u8,
        satisfied: bool,
        comment: Option<String>,
    ) -> Result<Self, EngineError> {
        let career_id = career_id.trim();
        if career_id.is_empty() {
            return Err(EngineError::InvalidInput("career_id is required".to_string()));
        }
        if !(1..=5).contains(&rating) {
            return Err(EngineError::InvalidInput(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            career_id: career_id.to_string(),
            rating,
            satisfied,
            comment: comment.unwrap_or_default(),
            created_at: Utc::now(),
        })
    }

    /// Strong positive signal: reinforced during retraining.
    pub fn is_positive(&self) -> bool {
        self.rating >= 4 && self.satisfied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let user = Uuid::new_v4();
        assert!(FeedbackEvent::new(user, "B.Tech", 0, true, None).is_err());
        assert!(FeedbackEvent::new(user, "B.Tech", 6, true, None).is_err());
        assert!(FeedbackEvent::new(user, "B.Tech", 5, true, None).is_ok());
    }

    #[test]
    fn test_empty_career_rejected() {
        assert!(FeedbackEvent::new(Uuid::new_v4(), "   ", 3, false, None).is_err());
    }

    #[test]
    fn test_positive_requires_rating_and_satisfaction() {
        let user = Uuid::new_v4();
        assert!(FeedbackEvent::new(user, "x", 4, true, None).unwrap().is_positive());
        assert!(!FeedbackEvent::new(user, "x", 5, false, None).unwrap().is_positive());
        assert!(!FeedbackEvent::new(user, "x", 3, true, None).unwrap().is_positive());
    }
}
