//! Job Fit Scorer: ranks candidates against one employer job requirement.
//!
//! Components (each omitted when the job or the candidate lacks the input):
//!   aptitude 30% · RIASEC 25% · skill-completion proxy 25% · risk tolerance 20%

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::assessment::{DimensionScores, RiskTolerance, ScoreMap};
use crate::models::job::JobRequirement;
use crate::reference::riasec::{RiasecCode, RIASEC_MAX};
use crate::scoring::round_to;

const APTITUDE_WEIGHT: f64 = 0.30;
const RIASEC_WEIGHT: f64 = 0.25;
const SKILLS_WEIGHT: f64 = 0.25;
const RISK_WEIGHT: f64 = 0.20;

/// One candidate's latest assessment data.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub user_id: Uuid,
    pub dims: DimensionScores,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFit {
    pub user_id: Uuid,
    pub fit_score: f64,
    pub matching_reasons: Vec<String>,
    pub gaps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedCandidate {
    pub user_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFitRanking {
    pub job_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub candidates: Vec<CandidateFit>,
    pub excluded: Vec<ExcludedCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl JobFitRanking {
    pub fn job_not_found(job_id: Uuid) -> Self {
        Self {
            job_id,
            job_title: None,
            candidates: vec![],
            excluded: vec![],
            notice: Some("Job not found".to_string()),
        }
    }
}

/// Scores every candidate and sorts descending by fit score. Candidates with
/// no assessment data are listed in `excluded` instead of scoring zero.
pub fn rank_candidates(job: &JobRequirement, candidates: &[Candidate]) -> JobFitRanking {
    let mut ranked = Vec::new();
    let mut excluded = Vec::new();

    for candidate in candidates {
        if candidate.dims.is_empty() {
            excluded.push(ExcludedCandidate {
                user_id: candidate.user_id,
                reason: "No assessment data available".to_string(),
            });
            continue;
        }
        ranked.push(score_candidate(job, candidate));
    }

    // Stable: equal scores keep input order.
    ranked.sort_by(|a, b| b.fit_score.total_cmp(&a.fit_score));

    JobFitRanking {
        job_id: job.id,
        job_title: Some(job.title.clone()),
        candidates: ranked,
        excluded,
        notice: None,
    }
}

fn score_candidate(job: &JobRequirement, candidate: &Candidate) -> CandidateFit {
    let dims = &candidate.dims;
    let mut total = 0.0;
    let mut reasons = Vec::new();
    let mut gaps = Vec::new();

    if let (false, Some(aptitude)) = (job.required_aptitude.is_empty(), dims.aptitude()) {
        total += aptitude_match(aptitude, job, &mut reasons, &mut gaps) * APTITUDE_WEIGHT;
    }

    if let (false, Some(riasec)) = (job.preferred_riasec.is_empty(), dims.riasec()) {
        total += riasec_match(riasec, job, &mut reasons) * RIASEC_WEIGHT;
    }

    if !job.required_skills.is_empty() {
        total += skill_completion(dims.count(), &mut reasons, &mut gaps) * SKILLS_WEIGHT;
    }

    if let (Some(acceptable), Some(risk)) = (job.acceptable_risk, dims.risk()) {
        let candidate_risk = RiskTolerance::from_scores(risk);
        total += risk_match(candidate_risk, acceptable, &mut reasons, &mut gaps) * RISK_WEIGHT;
    }

    if gaps.is_empty() {
        gaps.push("No significant gaps identified".to_string());
    }

    CandidateFit {
        user_id: candidate.user_id,
        fit_score: round_to(total, 2),
        matching_reasons: reasons,
        gaps,
    }
}

/// Mean over required categories: 100 at or above the requirement, 70 at
/// 70% of it, else 40. A missing category counts as 0.
fn aptitude_match(
    aptitude: &ScoreMap,
    job: &JobRequirement,
    reasons: &mut Vec<String>,
    gaps: &mut Vec<String>,
) -> f64 {
    let mut total = 0.0;
    for (category, &required) in &job.required_aptitude {
        let level = aptitude.get(category).copied().unwrap_or(0.0);
        total += if level >= required {
            reasons.push(format!("Strong {category} aptitude ({level}/{required})"));
            100.0
        } else if level >= required * 0.7 {
            70.0
        } else {
            gaps.push(format!("{category} aptitude below requirement ({level}/{required})"));
            40.0
        };
    }
    total / job.required_aptitude.len() as f64
}

/// Weighted sum over preferred codes of 100/70/40 depending on how close the
/// normalized candidate score gets to the preferred weight, capped at 100.
fn riasec_match(riasec: &ScoreMap, job: &JobRequirement, reasons: &mut Vec<String>) -> f64 {
    let total: f64 = job
        .preferred_riasec
        .iter()
        .map(|(code, &weight)| {
            let normalized = normalized_code(riasec, *code);
            if normalized >= weight * 0.8 {
                reasons.push(format!("{} personality trait aligns well", code.name()));
                weight * 100.0
            } else if normalized >= weight * 0.5 {
                weight * 70.0
            } else {
                weight * 40.0
            }
        })
        .sum();
    total.min(100.0)
}

fn normalized_code(riasec: &ScoreMap, code: RiasecCode) -> f64 {
    riasec.get(code.key()).copied().unwrap_or(0.0) / RIASEC_MAX
}

/// Proxy for skill coverage until per-skill evidence exists: the number of
/// completed assessment dimensions.
fn skill_completion(completed: usize, reasons: &mut Vec<String>, gaps: &mut Vec<String>) -> f64 {
    match completed {
        n if n >= 3 => {
            reasons.push(format!("Completed {n} assessments"));
            75.0
        }
        2 => 60.0,
        _ => {
            gaps.push("Limited assessment data for skill evaluation".to_string());
            40.0
        }
    }
}

fn risk_match(
    candidate: RiskTolerance,
    acceptable: RiskTolerance,
    reasons: &mut Vec<String>,
    gaps: &mut Vec<String>,
) -> f64 {
    if candidate == acceptable {
        reasons.push(format!("Risk tolerance ({candidate}) matches job requirement"));
        100.0
    } else if candidate == RiskTolerance::Moderate || acceptable == RiskTolerance::Moderate {
        75.0
    } else {
        gaps.push(format!(
            "Risk tolerance mismatch (candidate: {candidate}, required: {acceptable})"
        ));
        50.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::Dimension;
    use std::collections::BTreeMap;

    fn scores(pairs: &[(&str, f64)]) -> ScoreMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn job() -> JobRequirement {
        JobRequirement {
            id: Uuid::new_v4(),
            title: "Backend Developer".to_string(),
            required_aptitude: BTreeMap::from([
                ("logical".to_string(), 70.0),
                ("numerical".to_string(), 60.0),
            ]),
            preferred_riasec: BTreeMap::from([(RiasecCode::I, 0.6), (RiasecCode::C, 0.4)]),
            acceptable_risk: Some(RiskTolerance::Moderate),
            required_skills: vec!["Programming".to_string()],
        }
    }

    fn candidate(dims: &[(Dimension, ScoreMap)]) -> Candidate {
        let mut d = DimensionScores::new();
        for (dim, s) in dims {
            d.insert(*dim, s.clone());
        }
        Candidate {
            user_id: Uuid::new_v4(),
            dims: d,
        }
    }

    #[test]
    fn test_strong_candidate_score() {
        let c = candidate(&[
            (Dimension::Aptitude, scores(&[("logical", 80.0), ("numerical", 65.0)])),
            (Dimension::Riasec, scores(&[("I", 10.0), ("C", 6.0)])),
            (Dimension::Risk, scores(&[("risk_level", 3.0)])),
        ]);
        let ranking = rank_candidates(&job(), &[c]);
        let fit = &ranking.candidates[0];
        // aptitude 100×0.3=30; riasec I .833≥.48 → 60, C .5≥.32 → 40 → 100×0.25=25
        // skills 3 dims → 75×0.25=18.75; risk exact → 100×0.2=20
        assert!((fit.fit_score - 93.75).abs() < 1e-9);
        assert_eq!(fit.gaps, vec!["No significant gaps identified".to_string()]);
        assert!(fit.matching_reasons.iter().any(|r| r.contains("Investigative")));
    }

    #[test]
    fn test_partial_aptitude_credit() {
        let c = candidate(&[(Dimension::Aptitude, scores(&[("logical", 50.0)]))]);
        let ranking = rank_candidates(&job(), &[c]);
        // logical 50 ≥ 49 → 70; numerical missing → 40 → mean 55 × 0.3 = 16.5
        // skills 1 dim → 40 × 0.25 = 10
        assert!((ranking.candidates[0].fit_score - 26.5).abs() < 1e-9);
        assert_eq!(ranking.candidates[0].gaps.len(), 2);
    }

    #[test]
    fn test_risk_mismatch_scores_fifty() {
        let mut j = job();
        j.acceptable_risk = Some(RiskTolerance::Aggressive);
        j.required_aptitude.clear();
        j.preferred_riasec.clear();
        j.required_skills.clear();
        let c = candidate(&[(Dimension::Risk, scores(&[("risk_tolerance", 10.0)]))]);
        let ranking = rank_candidates(&j, &[c]);
        assert!((ranking.candidates[0].fit_score - 10.0).abs() < 1e-9);
        assert!(ranking.candidates[0].gaps[0].contains("mismatch"));
    }

    #[test]
    fn test_candidates_without_data_are_excluded() {
        let empty = candidate(&[]);
        let scored = candidate(&[(Dimension::Aptitude, scores(&[("logical", 90.0)]))]);
        let ranking = rank_candidates(&job(), &[empty.clone(), scored]);
        assert_eq!(ranking.candidates.len(), 1);
        assert_eq!(ranking.excluded.len(), 1);
        assert_eq!(ranking.excluded[0].user_id, empty.user_id);
    }

    #[test]
    fn test_ranking_descending_and_stable() {
        let weak = candidate(&[(Dimension::Aptitude, scores(&[("logical", 10.0)]))]);
        let tie_a = candidate(&[(Dimension::Aptitude, scores(&[("logical", 90.0), ("numerical", 90.0)]))]);
        let tie_b = candidate(&[(Dimension::Aptitude, scores(&[("logical", 95.0), ("numerical", 95.0)]))]);
        let ranking = rank_candidates(&job(), &[weak.clone(), tie_a.clone(), tie_b.clone()]);
        let ids: Vec<Uuid> = ranking.candidates.iter().map(|c| c.user_id).collect();
        assert_eq!(ids, vec![tie_a.user_id, tie_b.user_id, weak.user_id]);
    }

    #[test]
    fn test_job_not_found_is_labeled() {
        let id = Uuid::new_v4();
        let ranking = JobFitRanking::job_not_found(id);
        assert_eq!(ranking.job_id, id);
        assert_eq!(ranking.notice.as_deref(), Some("Job not found"));
    }
}
