use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::EngineError;
use crate::models::assessment::RiskTolerance;
use crate::reference::riasec::RiasecCode;
use crate::reference::skills::AptitudeCategory;

/// What an employer asks of candidates for one opening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub id: Uuid,
    pub title: String,
    /// Minimum aptitude score (0–100) per aptitude category key.
    #[serde(default)]
    pub required_aptitude: BTreeMap<String, f64>,
    /// Preferred weight (0–1) per RIASEC code.
    #[serde(default)]
    pub preferred_riasec: BTreeMap<RiasecCode, f64>,
    #[serde(default)]
    pub acceptable_risk: Option<RiskTolerance>,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

impl JobRequirement {
    /// Validates thresholds before the job can be ranked against: aptitude
    /// keys must be known categories with thresholds in 0–100, RIASEC weights
    /// must lie in 0–1.
    pub fn new(
        title: &str,
        required_aptitude: BTreeMap<String, f64>,
        preferred_riasec: BTreeMap<RiasecCode, f64>,
        acceptable_risk: Option<RiskTolerance>,
        required_skills: Vec<String>,
    ) -> Result<Self, EngineError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EngineError::InvalidInput("job title is required".to_string()));
        }
        for (key, &threshold) in &required_aptitude {
            if !AptitudeCategory::ALL.iter().any(|c| c.key() == key) {
                return Err(EngineError::InvalidInput(format!("unknown aptitude category '{key}'")));
            }
            if !(0.0..=100.0).contains(&threshold) {
                return Err(EngineError::InvalidInput(format!(
                    "aptitude threshold for '{key}' must be within 0–100"
                )));
            }
        }
        if let Some((code, _)) = preferred_riasec.iter().find(|(_, w)| !(0.0..=1.0).contains(*w)) {
            return Err(EngineError::InvalidInput(format!(
                "preferred weight for '{code}' must be within 0–1"
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            required_aptitude,
            preferred_riasec,
            acceptable_risk,
            required_skills,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_job() {
        let job = JobRequirement::new(
            " Backend Developer ",
            BTreeMap::from([("logical".to_string(), 70.0)]),
            BTreeMap::from([(RiasecCode::I, 0.6)]),
            Some(RiskTolerance::Moderate),
            vec!["Programming".to_string()],
        )
        .unwrap();
        assert_eq!(job.title, "Backend Developer");
    }

    #[test]
    fn test_unknown_aptitude_rejected() {
        let err = JobRequirement::new(
            "Analyst",
            BTreeMap::from([("musical".to_string(), 50.0)]),
            BTreeMap::new(),
            None,
            vec![],
        );
        assert!(matches!(err, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_riasec_weight_out_of_range_rejected() {
        let err = JobRequirement::new("Analyst", BTreeMap::new(), BTreeMap::from([(RiasecCode::C, 1.5)]), None, vec![]);
        assert!(err.is_err());
    }
}
