use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use crate::models::assessment::DimensionScores;
use crate::models::feedback::FeedbackEvent;
use crate::reference::riasec::feature_flags_for;

/// A training example built from positive feedback: the feature flags implied
/// by the user's interests, labeled with the course they were happy with.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRow {
    pub features: BTreeSet<String>,
    pub label: String,
}

/// Converts feedback into training rows.
///
/// Only positive events (rating ≥ 4 and satisfied) contribute; a rating of 5
/// contributes the row twice. Negative feedback produces no rows. Events whose
/// user has no interest data, or whose interests imply no flags, are skipped.
pub fn synthetic_rows(
    events: &[FeedbackEvent],
    profiles: &HashMap<Uuid, DimensionScores>,
) -> Vec<SyntheticRow> {
    let mut rows = Vec::new();

    for event in events.iter().filter(|e| e.is_positive()) {
        let Some(features) = profiles.get(&event.user_id).and_then(feature_row) else {
            continue;
        };
        let row = SyntheticRow {
            features,
            label: event.career_id.clone(),
        };
        if event.rating == 5 {
            rows.push(row.clone());
        }
        rows.push(row);
    }

    rows
}

/// Feature flags for a user's latest interests. `None` when nothing is set.
pub fn feature_row(dims: &DimensionScores) -> Option<BTreeSet<String>> {
    let flags: BTreeSet<String> = dims
        .riasec()
        .map(|riasec| feature_flags_for(riasec).into_iter().map(str::to_string).collect())
        .unwrap_or_default();
    (!flags.is_empty()).then_some(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::{Dimension, ScoreMap};

    fn interests(pairs: &[(&str, f64)]) -> DimensionScores {
        let scores: ScoreMap = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let mut dims = DimensionScores::new();
        dims.insert(Dimension::Riasec, scores);
        dims
    }

    #[test]
    fn test_rating_five_is_duplicated() {
        let user = Uuid::new_v4();
        let profiles = HashMap::from([(user, interests(&[("I", 10.0)]))]);
        let events = vec![
            FeedbackEvent::new(user, "B.Sc Physics", 5, true, None).unwrap(),
            FeedbackEvent::new(user, "BCA", 4, true, None).unwrap(),
        ];
        let rows = synthetic_rows(&events, &profiles);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label, "B.Sc Physics");
        assert_eq!(rows[1].label, "B.Sc Physics");
        assert!(rows[2].features.contains("Coding"));
    }

    #[test]
    fn test_negative_and_neutral_feedback_add_nothing() {
        let user = Uuid::new_v4();
        let profiles = HashMap::from([(user, interests(&[("A", 11.0)]))]);
        let events = vec![
            FeedbackEvent::new(user, "BFA", 1, false, None).unwrap(),
            FeedbackEvent::new(user, "BFA", 3, true, None).unwrap(),
            FeedbackEvent::new(user, "BFA", 5, false, None).unwrap(),
        ];
        assert!(synthetic_rows(&events, &profiles).is_empty());
    }

    #[test]
    fn test_users_without_flags_skipped() {
        let (low, missing) = (Uuid::new_v4(), Uuid::new_v4());
        let profiles = HashMap::from([(low, interests(&[("I", 8.0)]))]);
        let events = vec![
            FeedbackEvent::new(low, "BCA", 5, true, None).unwrap(),
            FeedbackEvent::new(missing, "BCA", 5, true, None).unwrap(),
        ];
        assert!(synthetic_rows(&events, &profiles).is_empty());
    }
}
