use serde::{Deserialize, Serialize};

use crate::models::assessment::{mean, DimensionScores};
use crate::reference::careers::Career;
use crate::scoring::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    SkillGap,
    RealityGap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub kind: RiskKind,
    pub severity: f64, // 0.0 – 1.0
    pub description: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// High ≥ 60, Medium ≥ 30, else Low.
    pub fn from_score(score: f64) -> Self {
        if score >= 60.0 {
            RiskLevel::High
        } else if score >= 30.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub career: Career,
    pub overall_risk: f64, // 0 – 100
    pub level: RiskLevel,
    pub factors: Vec<RiskFactor>,
}

/// Tunables of the risk rules.
///
/// The reality-gap rule has no real signal behind it yet: its severity is a
/// fixed placeholder, and with the defaults (0.3 against a > 0.5 trigger) it
/// never fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Mean aptitude a candidate is expected to reach.
    pub skill_gap_target: f64,
    /// The skill gap is flagged only when `target − mean aptitude` exceeds this.
    pub skill_gap_threshold: f64,
    pub reality_gap_severity: f64,
    /// The reality gap is flagged only when its severity exceeds this.
    pub reality_gap_threshold: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            skill_gap_target: 80.0,
            skill_gap_threshold: 30.0,
            reality_gap_severity: 0.3,
            reality_gap_threshold: 0.5,
        }
    }
}

/// Derives flagged risk factors and the overall risk for one career.
///
/// overall_risk = mean severity of flagged factors × 100 (0 when none are flagged).
pub fn assess_risk(dims: &DimensionScores, career: Career, config: &RiskConfig) -> RiskReport {
    let mut factors = Vec::new();

    if let Some(avg_aptitude) = dims.aptitude().and_then(mean) {
        let gap = (config.skill_gap_target - avg_aptitude).max(0.0);
        if gap > config.skill_gap_threshold {
            factors.push(RiskFactor {
                kind: RiskKind::SkillGap,
                severity: (gap / 100.0).clamp(0.0, 1.0),
                description: format!(
                    "Significant skill development needed for {career} (average aptitude {avg_aptitude:.0})"
                ),
                mitigation: "Take online courses, practice projects".to_string(),
            });
        }
    }

    if dims.riasec().is_some() && dims.values().is_some() {
        let severity = config.reality_gap_severity.clamp(0.0, 1.0);
        if severity > config.reality_gap_threshold {
            factors.push(RiskFactor {
                kind: RiskKind::RealityGap,
                severity,
                description: "Career expectations may not match reality".to_string(),
                mitigation: "Research day-to-day tasks, talk to professionals".to_string(),
            });
        }
    }

    let total: f64 = factors.iter().map(|f| f.severity).sum();
    let overall = (total / factors.len().max(1) as f64 * 100.0).clamp(0.0, 100.0);
    let overall_risk = round_to(overall, 2);

    RiskReport {
        career,
        overall_risk,
        level: RiskLevel::from_score(overall_risk),
        factors,
    }
}
