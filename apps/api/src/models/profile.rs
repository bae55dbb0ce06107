use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::assessment::DimensionScores;

/// A career suggestion carried into the profile, with the match percentage
/// assigned by whichever source produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerMatch {
    pub name: String,
    #[serde(rename = "match")]
    pub match_percent: u32,
}

/// An externally produced, already-ordered list of career suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationList {
    pub source: String,
    pub careers: Vec<CareerMatch>,
}

/// Match percentage assigned to careers from the personality test.
pub const PERSONALITY_CAREER_MATCH: u32 = 90;
pub const PERSONALITY_SOURCE: &str = "personality_test";

impl RecommendationList {
    /// Careers from the personality (MCQ) test. These carry a fixed match.
    pub fn from_personality_careers<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            source: PERSONALITY_SOURCE.to_string(),
            careers: names
                .iter()
                .map(|n| CareerMatch {
                    name: n.as_ref().to_string(),
                    match_percent: PERSONALITY_CAREER_MATCH,
                })
                .collect(),
        }
    }
}

/// The single live, fully derived profile of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub dimensions: DimensionScores,
    pub clarity_score: f64,
    pub summary: String,
    pub top_careers: Vec<CareerMatch>,
    pub updated_at: DateTime<Utc>,
}
