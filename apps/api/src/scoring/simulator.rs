//! What-If Simulator: applies bounded deltas to a user's dimension scores and
//! diffs the resulting career recommendations against the current ones.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::models::assessment::{Dimension, DimensionScores};
use crate::reference::careers::Career;
use crate::reference::riasec::{dominant_code, RiasecCode, RIASEC_MAX};
use crate::reference::skills::AptitudeCategory;
use crate::scoring::confidence::CareerScorer;
use crate::scoring::round_to;

const APTITUDE_MAX: f64 = 100.0;
/// Base for an aptitude category the user has no score for.
const DEFAULT_APTITUDE: f64 = 50.0;
/// Interest deltas at or above this magnitude are called out as strong.
const STRONG_INTEREST_DELTA: f64 = 4.0;
const RECOMMENDATION_LIMIT: usize = 5;
const NARRATIVE_CAREER_LIMIT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationPreference {
    Local,
    National,
    Abroad,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub salary_priority: Option<SalaryPriority>,
    #[serde(default)]
    pub location: Option<LocationPreference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjustments {
    /// Additive delta per RIASEC code.
    #[serde(default)]
    pub interests: BTreeMap<RiasecCode, f64>,
    /// Additive delta per aptitude category.
    #[serde(default)]
    pub skills: BTreeMap<AptitudeCategory, f64>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

impl Adjustments {
    /// Rejects non-finite deltas and deltas larger than the dimension's scale.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (code, delta) in &self.interests {
            check_delta(code.key(), *delta, RIASEC_MAX)?;
        }
        for (category, delta) in &self.skills {
            check_delta(category.key(), *delta, APTITUDE_MAX)?;
        }
        Ok(())
    }
}

fn check_delta(key: &str, delta: f64, limit: f64) -> Result<(), EngineError> {
    if !delta.is_finite() || delta.abs() > limit {
        return Err(EngineError::InvalidInput(format!(
            "adjustment for '{key}' must be a finite number within ±{limit}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerConfidence {
    pub career: Career,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceChange {
    pub career: Career,
    pub from: f64,
    pub to: f64,
    pub change: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationDiff {
    pub new_careers: Vec<Career>,
    pub dropped_careers: Vec<Career>,
    pub confidence_changes: Vec<ConfidenceChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub simulated_profile: DimensionScores,
    pub original: Vec<CareerConfidence>,
    pub simulated: Vec<CareerConfidence>,
    pub changes: RecommendationDiff,
    pub insights: Vec<String>,
}

pub fn simulate(
    base: &DimensionScores,
    adjustments: &Adjustments,
    scorer: &dyn CareerScorer,
) -> Result<SimulationResult, EngineError> {
    adjustments.validate()?;

    let simulated_profile = apply_adjustments(base, adjustments);
    let original = recommend(base, scorer);
    let simulated = recommend(&simulated_profile, scorer);
    let changes = diff(&original, &simulated);
    let insights = generate_insights(adjustments, &changes);

    Ok(SimulationResult {
        simulated_profile,
        original,
        simulated,
        changes,
        insights,
    })
}

/// Interest deltas only touch an existing RIASEC map; skill deltas create the
/// aptitude map when missing. Zero deltas are skipped so they never add
/// entries. Results are clamped into the native range.
pub fn apply_adjustments(base: &DimensionScores, adjustments: &Adjustments) -> DimensionScores {
    let mut simulated = base.clone();

    let interests: Vec<_> = adjustments.interests.iter().filter(|(_, d)| **d != 0.0).collect();
    if simulated.riasec().is_some() && !interests.is_empty() {
        let riasec = simulated.get_mut_or_default(Dimension::Riasec);
        for (code, delta) in interests {
            let entry = riasec.entry(code.key().to_string()).or_insert(0.0);
            *entry = (*entry + delta).clamp(0.0, RIASEC_MAX);
        }
    }

    let skills: Vec<_> = adjustments.skills.iter().filter(|(_, d)| **d != 0.0).collect();
    if !skills.is_empty() {
        let aptitude = simulated.get_mut_or_default(Dimension::Aptitude);
        for (category, delta) in skills {
            let entry = aptitude
                .entry(category.key().to_string())
                .or_insert(DEFAULT_APTITUDE);
            *entry = (*entry + delta).clamp(0.0, APTITUDE_MAX);
        }
    }

    simulated
}

/// Shortlist for the dominant RIASEC code, scored and sorted by confidence.
/// Empty without RIASEC data.
pub fn recommend(dims: &DimensionScores, scorer: &dyn CareerScorer) -> Vec<CareerConfidence> {
    let Some(code) = dims.riasec().and_then(dominant_code) else {
        return vec![];
    };

    let mut careers: Vec<CareerConfidence> = Career::shortlist(code)
        .into_iter()
        .map(|career| CareerConfidence {
            career,
            confidence: scorer.score(dims, career).score,
        })
        .collect();
    careers.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    careers.truncate(RECOMMENDATION_LIMIT);
    careers
}

pub fn diff(original: &[CareerConfidence], simulated: &[CareerConfidence]) -> RecommendationDiff {
    let before: BTreeSet<Career> = original.iter().map(|c| c.career).collect();
    let after: BTreeSet<Career> = simulated.iter().map(|c| c.career).collect();

    let new_careers = simulated
        .iter()
        .map(|c| c.career)
        .filter(|c| !before.contains(c))
        .collect();
    let dropped_careers = original
        .iter()
        .map(|c| c.career)
        .filter(|c| !after.contains(c))
        .collect();

    let confidence_changes = original
        .iter()
        .filter_map(|orig| {
            simulated
                .iter()
                .find(|sim| sim.career == orig.career)
                .map(|sim| ConfidenceChange {
                    career: orig.career,
                    from: orig.confidence,
                    to: sim.confidence,
                    change: round_to(sim.confidence - orig.confidence, 2),
                })
        })
        .collect();

    RecommendationDiff {
        new_careers,
        dropped_careers,
        confidence_changes,
    }
}

fn generate_insights(adjustments: &Adjustments, changes: &RecommendationDiff) -> Vec<String> {
    let mut insights = Vec::new();

    for (code, &delta) in &adjustments.interests {
        let strength = if delta.abs() >= STRONG_INTEREST_DELTA { "strongly " } else { "" };
        if delta > 0.0 {
            insights.push(format!(
                "Increasing {} interest {strength}boosted related career matches",
                code.name()
            ));
        } else if delta < 0.0 {
            insights.push(format!(
                "Decreasing {} interest {strength}reduced related career fits",
                code.name()
            ));
        }
    }

    for (category, &delta) in &adjustments.skills {
        if delta > 0.0 {
            insights.push(format!(
                "Improving {} aptitude increased confidence in careers that rely on it",
                category.key()
            ));
        } else if delta < 0.0 {
            insights.push(format!(
                "Lower {} aptitude reduced confidence in careers that rely on it",
                category.key()
            ));
        }
    }

    if let Some(prefs) = &adjustments.preferences {
        if prefs.salary_priority == Some(SalaryPriority::High) {
            insights.push("High salary priority shifted recommendations toward finance/tech".to_string());
        }
        if prefs.location == Some(LocationPreference::Abroad) {
            insights.push("International preference highlighted globally-relevant careers".to_string());
        }
    }

    if !changes.new_careers.is_empty() {
        insights.push(format!(
            "New career options emerged: {}",
            join_careers(&changes.new_careers)
        ));
    }
    if !changes.dropped_careers.is_empty() {
        insights.push(format!(
            "No longer among your top matches: {}",
            join_careers(&changes.dropped_careers)
        ));
    }

    insights
}

fn join_careers(careers: &[Career]) -> String {
    careers
        .iter()
        .take(NARRATIVE_CAREER_LIMIT)
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}
