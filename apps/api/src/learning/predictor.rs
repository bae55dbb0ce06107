use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::learning::artifacts::ModelArtifactSet;
use crate::learning::feedback::feature_row;
use crate::models::assessment::DimensionScores;
use crate::models::profile::{CareerMatch, RecommendationList};
use crate::reference::riasec::{dominant_code, RiasecCode};

const PREDICTION_LIMIT: usize = 5;
pub const COURSE_MODEL_SOURCE: &str = "course_model";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoursePrediction {
    pub course: String,
    pub probability: f64,
}

/// Ranks courses for a user with the live classifier.
///
/// The feature row comes from the user's interest flags. Courses whose name
/// contains a keyword of the dominant interest code are preferred; when none
/// match, the overall top five are returned.
pub fn predict_courses(
    artifacts: &ModelArtifactSet,
    dims: &DimensionScores,
) -> Result<Vec<CoursePrediction>, EngineError> {
    artifacts.validate()?;

    let flags = feature_row(dims).unwrap_or_default();
    let row: Vec<u8> = artifacts
        .feature_columns
        .iter()
        .map(|c| u8::from(flags.contains(c)))
        .collect();
    let selected = artifacts.selector.transform(&row).ok_or_else(|| {
        EngineError::ArtifactCorruption("feature row does not fit the selector".to_string())
    })?;

    let mut ranked = artifacts
        .classifier
        .predict_proba(&selected)
        .into_iter()
        .enumerate()
        .map(|(class, probability)| {
            let course = artifacts.label_encoder.decode(class).ok_or_else(|| {
                EngineError::ArtifactCorruption(format!("class {class} has no label"))
            })?;
            Ok(CoursePrediction {
                course: course.to_string(),
                probability,
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    // Stable: equal probabilities stay in label order.
    ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));

    let keywords = dims
        .riasec()
        .and_then(dominant_code)
        .map(RiasecCode::course_keywords)
        .unwrap_or_default();
    let matching: Vec<CoursePrediction> = ranked
        .iter()
        .filter(|p| matches_any(&p.course, keywords))
        .take(PREDICTION_LIMIT)
        .cloned()
        .collect();

    if matching.is_empty() {
        ranked.truncate(PREDICTION_LIMIT);
        Ok(ranked)
    } else {
        Ok(matching)
    }
}

fn matches_any(course: &str, keywords: &[&str]) -> bool {
    let course = course.to_lowercase();
    keywords.iter().any(|k| course.contains(&k.to_lowercase()))
}

/// Predictions as a recommendation source for the profile's top careers.
pub fn to_recommendation_list(predictions: &[CoursePrediction]) -> RecommendationList {
    RecommendationList {
        source: COURSE_MODEL_SOURCE.to_string(),
        careers: predictions
            .iter()
            .map(|p| CareerMatch {
                name: p.course.clone(),
                match_percent: (p.probability * 100.0).round().clamp(0.0, 100.0) as u32,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::artifacts::tests::sample_set;
    use crate::models::assessment::{Dimension, ScoreMap};

    fn interests(pairs: &[(&str, f64)]) -> DimensionScores {
        let scores: ScoreMap = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let mut dims = DimensionScores::new();
        dims.insert(Dimension::Riasec, scores);
        dims
    }

    #[test]
    fn test_predictions_sorted_and_limited() {
        let preds = predict_courses(&sample_set(1), &interests(&[("I", 10.0)])).unwrap();
        assert!(!preds.is_empty() && preds.len() <= 5);
        assert!(preds.windows(2).all(|w| w[0].probability >= w[1].probability));
    }

    #[test]
    fn test_without_keyword_match_returns_overall_top() {
        // Realistic keywords match none of BCA/BFA/B.Arch
        let preds = predict_courses(&sample_set(1), &interests(&[("R", 11.0)])).unwrap();
        assert_eq!(preds.len(), 3);
    }

    #[test]
    fn test_inconsistent_artifacts_abort() {
        let mut set = sample_set(1);
        set.feature_columns.pop();
        assert!(matches!(
            predict_courses(&set, &DimensionScores::new()),
            Err(EngineError::ArtifactCorruption(_))
        ));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        assert!(matches_any("B.Sc- Applied Scientist Track", &["scientist"]));
        assert!(!matches_any("BBA", &["Engineer"]));
    }

    #[test]
    fn test_recommendation_list_percentages() {
        let list = to_recommendation_list(&[CoursePrediction {
            course: "BCA".into(),
            probability: 0.456,
        }]);
        assert_eq!(list.source, COURSE_MODEL_SOURCE);
        assert_eq!(list.careers[0].match_percent, 46);
    }
}
