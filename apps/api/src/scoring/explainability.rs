//! Explainability: decomposes a recommendation into per-dimension
//! contributions and a narrative.
//!
//! Uses its own weights (30/25/20/15/10), which intentionally differ from the
//! confidence scorer's (25/25/20/15/15): the explanation leans harder on
//! interest fit. Keep the two configurations separate.

use serde::{Deserialize, Serialize};

use crate::models::assessment::{mean, top_entry, Dimension, DimensionScores, RiskTolerance, ScoreMap};
use crate::reference::careers::{Career, RiasecWeights};
use crate::reference::riasec::{RiasecCode, RIASEC_MAX};
use crate::scoring::round_to;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationWeights {
    pub riasec: f64,
    pub aptitude: f64,
    pub personality: f64,
    pub values: f64,
    pub risk: f64,
}

impl Default for ExplanationWeights {
    fn default() -> Self {
        Self {
            riasec: 0.30,
            aptitude: 0.25,
            personality: 0.20,
            values: 0.15,
            risk: 0.10,
        }
    }
}

/// Uniform vector for careers without a registered RIASEC profile.
const UNIFORM_CAREER_VECTOR: RiasecWeights = &[
    (RiasecCode::R, 0.17),
    (RiasecCode::I, 0.17),
    (RiasecCode::A, 0.17),
    (RiasecCode::S, 0.17),
    (RiasecCode::E, 0.16),
    (RiasecCode::C, 0.16),
];

/// Career weights at or above this mark a trait as dominant for the career.
const DOMINANT_TRAIT_WEIGHT: f64 = 0.3;
const STRONG_SCORE: f64 = 70.0;
const TOP_FEATURES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub dimension: Dimension,
    pub label: String,
    pub contribution: f64,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationReport {
    pub career: Career,
    pub top_features: Vec<FeatureContribution>,
    pub narrative: String,
    /// Sum of every computed contribution, not only those in `top_features`.
    pub overall_match_score: f64,
    /// Set when the report is empty because the user has no assessment data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ExplanationReport {
    fn missing(career: Career) -> Self {
        Self {
            career,
            top_features: vec![],
            narrative: "Complete assessments to see why careers are recommended.".to_string(),
            overall_match_score: 0.0,
            notice: Some("No assessments found for user".to_string()),
        }
    }
}

pub fn explain_recommendation(
    dims: &DimensionScores,
    career: Career,
    weights: &ExplanationWeights,
) -> ExplanationReport {
    if dims.is_empty() {
        return ExplanationReport::missing(career);
    }

    let mut contributions = compute_contributions(dims, career, weights);
    let overall: f64 = contributions.iter().map(|c| c.contribution).sum();

    // Stable sort: equal contributions keep dimension order.
    contributions.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    contributions.truncate(TOP_FEATURES);
    for c in &mut contributions {
        c.contribution = round_to(c.contribution, 2);
    }

    let narrative = build_narrative(&contributions, career);

    ExplanationReport {
        career,
        top_features: contributions,
        narrative,
        overall_match_score: round_to(overall, 2),
        notice: None,
    }
}

fn compute_contributions(
    dims: &DimensionScores,
    career: Career,
    weights: &ExplanationWeights,
) -> Vec<FeatureContribution> {
    let mut out = Vec::with_capacity(5);

    if let Some(riasec) = dims.riasec() {
        out.push(riasec_contribution(riasec, career, weights.riasec));
    }

    if let Some(aptitude) = dims.aptitude() {
        let strong = keys_at_least(aptitude, STRONG_SCORE, false);
        out.push(FeatureContribution {
            dimension: Dimension::Aptitude,
            label: "Aptitude Alignment".to_string(),
            contribution: mean(aptitude).unwrap_or(0.0) * weights.aptitude,
            details: if strong.is_empty() {
                "Developing aptitude skills".to_string()
            } else {
                format!("Strong aptitude in {}", strong.join(", "))
            },
        });
    }

    if let Some(personality) = dims.personality() {
        let high = keys_at_least(personality, STRONG_SCORE, true);
        out.push(FeatureContribution {
            dimension: Dimension::Personality,
            label: "Personality Fit".to_string(),
            contribution: mean(personality).unwrap_or(0.0) * weights.personality,
            details: if high.is_empty() {
                "Balanced personality profile".to_string()
            } else {
                format!("High in {}", high.join(", "))
            },
        });
    }

    if let Some((top_value, top_score)) = dims.values().and_then(top_entry) {
        out.push(FeatureContribution {
            dimension: Dimension::Values,
            label: "Work Values Alignment".to_string(),
            contribution: (top_score / 5.0 * 100.0) * weights.values,
            details: format!(
                "You highly value {}, which aligns with this career",
                top_value.replace('_', " ")
            ),
        });
    }

    if let Some(risk) = dims.risk() {
        let tolerance = RiskTolerance::from_scores(risk);
        out.push(FeatureContribution {
            dimension: Dimension::Risk,
            label: "Risk Tolerance Match".to_string(),
            contribution: risk_base_score(tolerance) * weights.risk,
            details: format!("Your {tolerance} risk tolerance fits this career path"),
        });
    }

    out
}

fn riasec_contribution(riasec: &ScoreMap, career: Career, weight: f64) -> FeatureContribution {
    let vector = career.riasec_profile().unwrap_or(UNIFORM_CAREER_VECTOR);

    let matched: f64 = vector
        .iter()
        .map(|(code, w)| riasec.get(code.key()).copied().unwrap_or(0.0) / RIASEC_MAX * w)
        .sum();

    let dominant: Vec<&str> = vector
        .iter()
        .filter(|(_, w)| *w >= DOMINANT_TRAIT_WEIGHT)
        .map(|(code, _)| code.trait_label())
        .collect();

    let details = if dominant.is_empty() {
        "Your interests show a broad match across this career's activities".to_string()
    } else {
        format!(
            "Your interests align with {} traits required for this career",
            dominant.join(", ")
        )
    };

    FeatureContribution {
        dimension: Dimension::Riasec,
        label: "Interest Match (RIASEC)".to_string(),
        contribution: matched * 100.0 * weight,
        details,
    }
}

pub fn risk_base_score(tolerance: RiskTolerance) -> f64 {
    match tolerance {
        RiskTolerance::Conservative => 60.0,
        RiskTolerance::Moderate => 75.0,
        RiskTolerance::Aggressive => 85.0,
    }
}

fn keys_at_least(scores: &ScoreMap, threshold: f64, capitalize: bool) -> Vec<String> {
    scores
        .iter()
        .filter(|(_, v)| **v >= threshold)
        .map(|(k, _)| if capitalize { capitalize_first(k) } else { k.clone() })
        .collect()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

fn build_narrative(top: &[FeatureContribution], career: Career) -> String {
    let Some(first) = top.first() else {
        return format!("{career} was recommended based on your profile.");
    };

    let mut narrative = format!(
        "{career} was recommended primarily because of your {} ({:.1}% of the match).",
        first.label, first.contribution
    );
    if let Some(second) = top.get(1) {
        narrative.push_str(&format!(
            " Your {} ({:.1}%) also aligns well with this career path.",
            second.label, second.contribution
        ));
    }
    narrative
}
