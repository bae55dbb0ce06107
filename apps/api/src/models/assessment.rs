use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::EngineError;

/// Score map of one assessment: trait/category key → numeric score.
/// Ordered so every iteration and tie-break over keys is deterministic.
pub type ScoreMap = BTreeMap<String, f64>;

/// Risk score keys: a 0–100 percentage or a 1–5 rating.
pub const RISK_TOLERANCE_KEY: &str = "risk_tolerance";
pub const RISK_LEVEL_KEY: &str = "risk_level";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Riasec,
    Aptitude,
    Personality,
    Values,
    Risk,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Riasec,
        Dimension::Aptitude,
        Dimension::Personality,
        Dimension::Values,
        Dimension::Risk,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Riasec => "riasec",
            Dimension::Aptitude => "aptitude",
            Dimension::Personality => "personality",
            Dimension::Values => "values",
            Dimension::Risk => "risk",
        }
    }

    /// Native (min, max) range of a score under `key` for this dimension.
    pub fn native_range(self, key: &str) -> (f64, f64) {
        match self {
            Dimension::Riasec => (0.0, 12.0),
            Dimension::Aptitude | Dimension::Personality => (0.0, 100.0),
            Dimension::Values => (1.0, 5.0),
            Dimension::Risk if key == RISK_LEVEL_KEY => (1.0, 5.0),
            Dimension::Risk => (0.0, 100.0),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown assessment dimension '{s}'"))
    }
}

/// One completed assessment. Append-only; aggregation uses the most recent
/// record per (user, dimension).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dimension: Dimension,
    pub scores: ScoreMap,
    pub recorded_at: DateTime<Utc>,
}

impl AssessmentRecord {
    /// Builds a record stamped now, rejecting scores outside the dimension's
    /// native range.
    pub fn new(user_id: Uuid, dimension: Dimension, scores: ScoreMap) -> Result<Self, EngineError> {
        validate_scores(dimension, &scores)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            dimension,
            scores,
            recorded_at: Utc::now(),
        })
    }
}

pub fn validate_scores(dimension: Dimension, scores: &ScoreMap) -> Result<(), EngineError> {
    if scores.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{dimension} assessment has no scores"
        )));
    }
    for (key, &value) in scores {
        if key.trim().is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "{dimension} assessment contains an empty score key"
            )));
        }
        if dimension == Dimension::Risk && key != RISK_TOLERANCE_KEY && key != RISK_LEVEL_KEY {
            return Err(EngineError::InvalidInput(format!(
                "unknown risk score key '{key}'"
            )));
        }
        let (min, max) = dimension.native_range(key);
        if !value.is_finite() || value < min || value > max {
            return Err(EngineError::InvalidInput(format!(
                "{dimension} score '{key}'={value} outside [{min}, {max}]"
            )));
        }
    }
    Ok(())
}

/// Latest score map per dimension for a single user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionScores(BTreeMap<Dimension, ScoreMap>);

impl DimensionScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only `user_id`'s records and, per dimension, the most recent one.
    /// Scores are clamped into their native range so downstream weighted sums
    /// never see out-of-range input, even from rows written before validation.
    pub fn from_latest(user_id: Uuid, records: &[AssessmentRecord]) -> Self {
        let mut latest: BTreeMap<Dimension, &AssessmentRecord> = BTreeMap::new();
        for record in records.iter().filter(|r| r.user_id == user_id) {
            let is_newer = latest
                .get(&record.dimension)
                .map_or(true, |existing| record.recorded_at >= existing.recorded_at);
            if is_newer {
                latest.insert(record.dimension, record);
            }
        }

        let mut dims = DimensionScores::new();
        for (dimension, record) in latest {
            let clamped = record
                .scores
                .iter()
                .filter(|(_, v)| v.is_finite())
                .map(|(k, v)| {
                    let (min, max) = dimension.native_range(k);
                    (k.clone(), v.clamp(min, max))
                })
                .collect();
            dims.insert(dimension, clamped);
        }
        dims
    }

    pub fn insert(&mut self, dimension: Dimension, scores: ScoreMap) {
        self.0.insert(dimension, scores);
    }

    /// Score map for a dimension; empty maps count as absent.
    pub fn get(&self, dimension: Dimension) -> Option<&ScoreMap> {
        self.0.get(&dimension).filter(|m| !m.is_empty())
    }

    pub fn get_mut_or_default(&mut self, dimension: Dimension) -> &mut ScoreMap {
        self.0.entry(dimension).or_default()
    }

    pub fn contains(&self, dimension: Dimension) -> bool {
        self.get(dimension).is_some()
    }

    /// Number of distinct dimensions with data.
    pub fn count(&self) -> usize {
        self.0.values().filter(|m| !m.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn riasec(&self) -> Option<&ScoreMap> {
        self.get(Dimension::Riasec)
    }

    pub fn aptitude(&self) -> Option<&ScoreMap> {
        self.get(Dimension::Aptitude)
    }

    pub fn personality(&self) -> Option<&ScoreMap> {
        self.get(Dimension::Personality)
    }

    pub fn values(&self) -> Option<&ScoreMap> {
        self.get(Dimension::Values)
    }

    pub fn risk(&self) -> Option<&ScoreMap> {
        self.get(Dimension::Risk)
    }
}

/// Arithmetic mean of a score map. `None` for an empty map.
pub fn mean(scores: &ScoreMap) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    Some(scores.values().sum::<f64>() / scores.len() as f64)
}

/// Highest-scoring entry; ties resolve to the smallest key.
pub fn top_entry(scores: &ScoreMap) -> Option<(&str, f64)> {
    scores.iter().fold(None, |best, (k, &v)| match best {
        Some((_, b)) if v <= b => best,
        _ => Some((k.as_str(), v)),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskTolerance::Conservative => "conservative",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::Aggressive => "aggressive",
        }
    }

    /// Derives the category from a risk score map. A `risk_level` rating wins
    /// over the `risk_tolerance` percentage; with neither the user is moderate.
    pub fn from_scores(scores: &ScoreMap) -> Self {
        if let Some(&rating) = scores.get(RISK_LEVEL_KEY) {
            return match rating {
                r if r <= 2.0 => RiskTolerance::Conservative,
                r if r < 4.0 => RiskTolerance::Moderate,
                _ => RiskTolerance::Aggressive,
            };
        }
        match scores.get(RISK_TOLERANCE_KEY) {
            Some(&pct) if pct < 40.0 => RiskTolerance::Conservative,
            Some(&pct) if pct < 70.0 => RiskTolerance::Moderate,
            Some(_) => RiskTolerance::Aggressive,
            None => RiskTolerance::Moderate,
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
