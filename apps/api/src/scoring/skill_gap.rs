//! Skill Gap Analyzer: estimates proficiency per required skill from the
//! assessment signals and partitions the requirements into strong, medium and
//! weak skills with a learning priority order.

use serde::{Deserialize, Serialize};

use crate::models::assessment::DimensionScores;
use crate::reference::careers::Career;
use crate::reference::skills::{requirements_for, Skill, SkillCategory, SkillRequirement};
use crate::scoring::round_to;

/// Substituted when the aptitude map lacks the skill's category.
const DEFAULT_APTITUDE_SCORE: f64 = 50.0;
/// Substituted when the RIASEC map lacks the skill's code.
const DEFAULT_RIASEC_SCORE: f64 = 6.0;
/// Level assumed for skills no assessment dimension says anything about.
const DEFAULT_SKILL_LEVEL: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillStatus {
    Strong,
    Medium,
    Weak,
}

impl SkillStatus {
    pub fn from_gap(gap: i32) -> Self {
        match gap {
            g if g <= 0 => SkillStatus::Strong,
            1 => SkillStatus::Medium,
            _ => SkillStatus::Weak,
        }
    }

    fn readiness_weight(self) -> f64 {
        match self {
            SkillStatus::Strong => 100.0,
            SkillStatus::Medium => 60.0,
            SkillStatus::Weak => 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillAssessment {
    pub skill: Skill,
    pub category: SkillCategory,
    pub required_level: u8,
    pub user_level: u8,
    pub gap: i32,
    /// gap × required level; 0 for strong skills.
    pub priority: i32,
    pub status: SkillStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGapReport {
    pub career: Career,
    pub strong: Vec<SkillAssessment>,
    pub medium: Vec<SkillAssessment>,
    pub weak: Vec<SkillAssessment>,
    pub learning_priority_order: Vec<SkillAssessment>,
    pub overall_readiness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl SkillGapReport {
    fn empty(career: Career, notice: &str) -> Self {
        Self {
            career,
            strong: vec![],
            medium: vec![],
            weak: vec![],
            learning_priority_order: vec![],
            overall_readiness: 0.0,
            notice: Some(notice.to_string()),
        }
    }
}

pub fn analyze_skill_gap(dims: &DimensionScores, career: Career) -> SkillGapReport {
    analyze_requirements(dims, career, requirements_for(career))
}

pub fn analyze_requirements(
    dims: &DimensionScores,
    career: Career,
    requirements: &[SkillRequirement],
) -> SkillGapReport {
    if requirements.is_empty() {
        return SkillGapReport::empty(career, "No skill requirements found for this career");
    }
    if dims.is_empty() {
        return SkillGapReport::empty(career, "No assessments found for user");
    }

    let analyzed: Vec<SkillAssessment> = requirements
        .iter()
        .map(|req| assess_skill(dims, req))
        .collect();

    let overall_readiness = readiness(&analyzed);

    let (mut strong, mut medium, mut weak) = (Vec::new(), Vec::new(), Vec::new());
    for skill in analyzed {
        match skill.status {
            SkillStatus::Strong => strong.push(skill),
            SkillStatus::Medium => medium.push(skill),
            SkillStatus::Weak => weak.push(skill),
        }
    }

    // Weak before medium, then a stable sort so equal priorities keep that order.
    let mut learning_priority_order: Vec<SkillAssessment> =
        weak.iter().chain(medium.iter()).cloned().collect();
    learning_priority_order.sort_by(|a, b| b.priority.cmp(&a.priority));

    SkillGapReport {
        career,
        strong,
        medium,
        weak,
        learning_priority_order,
        overall_readiness,
        notice: None,
    }
}

fn assess_skill(dims: &DimensionScores, req: &SkillRequirement) -> SkillAssessment {
    let user_level = estimate_level(dims, req.skill);
    let required = i32::from(req.required_level);
    let gap = required - user_level;
    let status = SkillStatus::from_gap(gap);

    SkillAssessment {
        skill: req.skill,
        category: req.category,
        required_level: req.required_level,
        user_level: user_level as u8,
        gap,
        priority: if gap > 0 { gap * required } else { 0 },
        status,
    }
}

/// Proficiency 1–5 from the aptitude category first, then the RIASEC code,
/// else the default level.
pub fn estimate_level(dims: &DimensionScores, skill: Skill) -> i32 {
    if let (Some(aptitude), Some(category)) = (dims.aptitude(), skill.aptitude_category()) {
        let score = aptitude
            .get(category.key())
            .copied()
            .unwrap_or(DEFAULT_APTITUDE_SCORE);
        return to_level(score / 20.0);
    }
    if let (Some(riasec), Some(code)) = (dims.riasec(), skill.riasec_code()) {
        let score = riasec.get(code.key()).copied().unwrap_or(DEFAULT_RIASEC_SCORE);
        return to_level(score / 2.4);
    }
    DEFAULT_SKILL_LEVEL
}

fn to_level(scaled: f64) -> i32 {
    (scaled.floor() as i32 + 1).clamp(1, 5)
}

/// (100·strong + 60·medium + 20·weak) / total, one decimal.
fn readiness(skills: &[SkillAssessment]) -> f64 {
    if skills.is_empty() {
        return 0.0;
    }
    let total: f64 = skills.iter().map(|s| s.status.readiness_weight()).sum();
    round_to((total / skills.len() as f64).clamp(0.0, 100.0), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::{Dimension, ScoreMap};
    use crate::reference::skills::SkillCategory::{Soft, Technical};

    fn scores(pairs: &[(&str, f64)]) -> ScoreMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn req(skill: Skill, category: SkillCategory, required_level: u8) -> SkillRequirement {
        SkillRequirement {
            skill,
            category,
            required_level,
        }
    }

    #[test]
    fn test_level_from_aptitude() {
        let mut dims = DimensionScores::new();
        dims.insert(Dimension::Aptitude, scores(&[("numerical", 85.0)]));
        assert_eq!(estimate_level(&dims, Skill::Mathematics), 5);
        // category missing → 50 → level 3
        assert_eq!(estimate_level(&dims, Skill::Communication), 3);
    }

    #[test]
    fn test_level_clamped_at_top() {
        let mut dims = DimensionScores::new();
        dims.insert(Dimension::Aptitude, scores(&[("logical", 100.0)]));
        assert_eq!(estimate_level(&dims, Skill::Logic), 5);
    }

    #[test]
    fn test_level_from_riasec_when_no_aptitude() {
        let mut dims = DimensionScores::new();
        dims.insert(Dimension::Riasec, scores(&[("S", 12.0), ("A", 2.0)]));
        assert_eq!(estimate_level(&dims, Skill::Empathy), 5);
        assert_eq!(estimate_level(&dims, Skill::Creativity), 1);
        // Design is an aptitude skill too, but with no aptitude data RIASEC answers
        assert_eq!(estimate_level(&dims, Skill::Design), 1);
        // code missing → 6 → level 3
        assert_eq!(estimate_level(&dims, Skill::Leadership), 3);
    }

    #[test]
    fn test_unmapped_skill_defaults_to_three() {
        let mut dims = DimensionScores::new();
        dims.insert(Dimension::Aptitude, scores(&[("logical", 90.0)]));
        assert_eq!(estimate_level(&dims, Skill::Programming), 3);
    }

    #[test]
    fn test_partition_and_priority_order() {
        let mut dims = DimensionScores::new();
        dims.insert(Dimension::Aptitude, scores(&[("logical", 90.0), ("verbal", 30.0)]));
        let report = analyze_skill_gap(&dims, Career::SoftwareEngineer);

        let total = report.strong.len() + report.medium.len() + report.weak.len();
        assert_eq!(total, requirements_for(Career::SoftwareEngineer).len());

        // Programming, Data Structures: level 3 vs 5 → weak, priority 10
        // Algorithms, Problem Solving, Critical Thinking: level 5 → strong
        // Communication: level 2 vs 3 → medium, priority 3; Mathematics: 3 vs 3 → strong
        assert_eq!(report.strong.len(), 4);
        assert_eq!(report.medium.len(), 1);
        assert_eq!(report.weak.len(), 2);
        let order: Vec<Skill> = report.learning_priority_order.iter().map(|s| s.skill).collect();
        assert_eq!(order, vec![Skill::Programming, Skill::DataStructures, Skill::Communication]);
        // (4×100 + 60 + 2×20) / 7 = 71.43
        assert_eq!(report.overall_readiness, 71.4);
    }

    #[test]
    fn test_readiness_non_decreasing_as_gap_closes() {
        let reqs = [req(Skill::Mathematics, Technical, 5), req(Skill::Writing, Soft, 4)];
        let mut previous = -1.0;
        for numerical in [0.0, 20.0, 40.0, 60.0, 80.0, 100.0] {
            let mut dims = DimensionScores::new();
            dims.insert(Dimension::Aptitude, scores(&[("numerical", numerical), ("verbal", 50.0)]));
            let readiness = analyze_requirements(&dims, Career::DataAnalyst, &reqs).overall_readiness;
            assert!(readiness >= previous, "{readiness} < {previous} at {numerical}");
            previous = readiness;
        }
    }

    #[test]
    fn test_no_requirements_is_labeled() {
        let mut dims = DimensionScores::new();
        dims.insert(Dimension::Aptitude, scores(&[("logical", 90.0)]));
        let report = analyze_skill_gap(&dims, Career::Nurse);
        assert!(report.notice.as_deref().unwrap().contains("No skill requirements"));
        assert_eq!(report.overall_readiness, 0.0);
    }

    #[test]
    fn test_no_assessments_is_labeled() {
        let report = analyze_skill_gap(&DimensionScores::new(), Career::Teacher);
        assert!(report.notice.as_deref().unwrap().contains("No assessments"));
        assert!(report.learning_priority_order.is_empty());
    }
}
