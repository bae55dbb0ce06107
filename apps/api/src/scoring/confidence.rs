//! Fit/Confidence Scoring: combines a user's dimension scores and a career
//! into a bounded 0–100 confidence score with a per-factor breakdown.
//!
//! Default: `WeightedCareerScorer` (pure, deterministic weighted sum).
//! `AppState` holds an `Arc<dyn CareerScorer>` so the simulator and handlers
//! never depend on the concrete formula.

use serde::{Deserialize, Serialize};

use crate::models::assessment::{mean, DimensionScores, ScoreMap};
use crate::reference::careers::{Career, RiasecWeights};
use crate::reference::riasec::{RiasecCode, RIASEC_MAX};
use crate::scoring::round_to;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitFactor {
    InterestMatch,
    AptitudeMatch,
    PersonalityFit,
    ValuesAlignment,
    MarketDemand,
}

/// One weighted term of the confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: FitFactor,
    pub raw_score: f64, // 0 – 100
    pub weight: f64,
    pub contribution: f64, // raw_score × weight
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// High ≥ 75, Medium ≥ 50, else Low.
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            ConfidenceLevel::High
        } else if score >= 50.0 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    fn explanation(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "Strong alignment across all dimensions",
            ConfidenceLevel::Medium => "Good fit with some areas for development",
            ConfidenceLevel::Low => "Consider exploring other options or building foundational skills",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitScore {
    pub career: Career,
    pub score: f64, // 0 – 100, two decimals
    pub level: ConfidenceLevel,
    pub breakdown: Vec<FactorContribution>,
    pub explanation: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores how well a set of assessment results fits one career.
pub trait CareerScorer: Send + Sync {
    fn score(&self, dims: &DimensionScores, career: Career) -> FitScore;
}

// ────────────────────────────────────────────────────────────────────────────
// WeightedCareerScorer: default implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitWeights {
    pub interest_match: f64,
    pub aptitude_match: f64,
    pub personality_fit: f64,
    pub values_alignment: f64,
    pub market_demand: f64,
}

impl Default for FitWeights {
    fn default() -> Self {
        Self {
            interest_match: 0.25,
            aptitude_match: 0.25,
            personality_fit: 0.20,
            values_alignment: 0.15,
            market_demand: 0.15,
        }
    }
}

/// Vector used for careers the registry has no RIASEC profile for.
const DEFAULT_CAREER_VECTOR: RiasecWeights = &[
    (RiasecCode::R, 0.2),
    (RiasecCode::I, 0.2),
    (RiasecCode::A, 0.2),
    (RiasecCode::S, 0.2),
    (RiasecCode::E, 0.1),
    (RiasecCode::C, 0.1),
];

const HIGH_DEMAND_SCORE: f64 = 85.0;
const STANDARD_DEMAND_SCORE: f64 = 60.0;
/// Values are rated 1–5; ×20 lifts the mean onto the 0–100 scale.
const VALUES_SCALE: f64 = 20.0;

/// Algorithm:
/// 1. interest_match = Σ(riasec[code]/12 × career_weight[code]) × 100, capped at 100
/// 2. aptitude_match, personality_fit = mean of the dimension's scores
/// 3. values_alignment = mean of value ratings × 20
/// 4. market_demand = 85 for high-demand careers, else 60
/// 5. score = Σ(raw × weight) over the factors present, clamped to [0, 100]
///
/// A dimension with no data omits its factor; nothing is substituted.
#[derive(Debug, Clone, Default)]
pub struct WeightedCareerScorer {
    pub weights: FitWeights,
}

impl CareerScorer for WeightedCareerScorer {
    fn score(&self, dims: &DimensionScores, career: Career) -> FitScore {
        let w = &self.weights;
        let mut breakdown = Vec::with_capacity(5);

        let mut push = |factor, raw_score: f64, weight: f64| {
            breakdown.push(FactorContribution {
                factor,
                raw_score: round_to(raw_score, 2),
                weight,
                contribution: raw_score * weight,
            });
        };

        if let Some(riasec) = dims.riasec() {
            push(FitFactor::InterestMatch, interest_match(riasec, career), w.interest_match);
        }
        if let Some(aptitude) = dims.aptitude().and_then(mean) {
            push(FitFactor::AptitudeMatch, aptitude, w.aptitude_match);
        }
        if let Some(personality) = dims.personality().and_then(mean) {
            push(FitFactor::PersonalityFit, personality, w.personality_fit);
        }
        if let Some(values) = dims.values().and_then(mean) {
            push(FitFactor::ValuesAlignment, values * VALUES_SCALE, w.values_alignment);
        }
        push(FitFactor::MarketDemand, market_demand(career), w.market_demand);

        let total: f64 = breakdown.iter().map(|f| f.contribution).sum();
        let score = round_to(total.clamp(0.0, 100.0), 2);
        let level = ConfidenceLevel::from_score(score);

        for factor in &mut breakdown {
            factor.contribution = round_to(factor.contribution, 2);
        }

        FitScore {
            career,
            score,
            level,
            breakdown,
            explanation: level.explanation().to_string(),
        }
    }
}

/// Dot product of the normalized RIASEC vector against the career's weights, ×100, ≤100.
pub fn interest_match(riasec: &ScoreMap, career: Career) -> f64 {
    let weights = career.riasec_profile().unwrap_or(DEFAULT_CAREER_VECTOR);
    let matched: f64 = weights
        .iter()
        .map(|(code, weight)| riasec.get(code.key()).copied().unwrap_or(0.0) / RIASEC_MAX * weight)
        .sum();
    (matched * 100.0).min(100.0)
}

pub fn market_demand(career: Career) -> f64 {
    if career.is_high_demand() {
        HIGH_DEMAND_SCORE
    } else {
        STANDARD_DEMAND_SCORE
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
