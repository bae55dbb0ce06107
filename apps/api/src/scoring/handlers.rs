use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::assessment::RiskTolerance;
use crate::models::job::JobRequirement;
use crate::profile::latest_dimensions;
use crate::reference::careers::Career;
use crate::reference::riasec::RiasecCode;
use crate::scoring::confidence::FitScore;
use crate::scoring::explainability::{explain_recommendation, ExplanationReport, ExplanationWeights};
use crate::scoring::job_fit::{rank_candidates, Candidate, JobFitRanking};
use crate::scoring::risk::{assess_risk, RiskReport};
use crate::scoring::simulator::{simulate, Adjustments, SimulationResult};
use crate::scoring::skill_gap::{analyze_skill_gap, SkillGapReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CareerQuery {
    pub user_id: Uuid,
    pub career: String,
}

#[derive(Serialize)]
pub struct CareerAnalysisResponse {
    pub confidence: FitScore,
    pub risk: RiskReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct JobFitRequest {
    /// Defaults to every user with at least one assessment.
    #[serde(default)]
    pub candidate_ids: Option<Vec<Uuid>>,
}

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    #[serde(default)]
    pub required_aptitude: BTreeMap<String, f64>,
    #[serde(default)]
    pub preferred_riasec: BTreeMap<RiasecCode, f64>,
    #[serde(default)]
    pub acceptable_risk: Option<RiskTolerance>,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

#[derive(Deserialize)]
pub struct SimulationRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub adjustments: Adjustments,
}

fn parse_career(name: &str) -> Result<Career, AppError> {
    name.parse::<Career>().map_err(AppError::Validation)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/careers/analysis
/// Confidence score and risk report for one user and career.
pub async fn handle_career_analysis(
    State(state): State<AppState>,
    Query(params): Query<CareerQuery>,
) -> Result<Json<CareerAnalysisResponse>, AppError> {
    let career = parse_career(&params.career)?;
    let dims = latest_dimensions(state.store.as_ref(), params.user_id).await?;

    let notice = dims
        .is_empty()
        .then(|| "No assessments found for user; only market demand was scored".to_string());

    Ok(Json(CareerAnalysisResponse {
        confidence: state.scorer.score(&dims, career),
        risk: assess_risk(&dims, career, &state.risk_config),
        notice,
    }))
}

/// GET /api/v1/careers/explanation
pub async fn handle_career_explanation(
    State(state): State<AppState>,
    Query(params): Query<CareerQuery>,
) -> Result<Json<ExplanationReport>, AppError> {
    let career = parse_career(&params.career)?;
    let dims = latest_dimensions(state.store.as_ref(), params.user_id).await?;
    Ok(Json(explain_recommendation(&dims, career, &ExplanationWeights::default())))
}

/// GET /api/v1/skills/gap
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    Query(params): Query<CareerQuery>,
) -> Result<Json<SkillGapReport>, AppError> {
    let career = parse_career(&params.career)?;
    let dims = latest_dimensions(state.store.as_ref(), params.user_id).await?;
    Ok(Json(analyze_skill_gap(&dims, career)))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRequirement>), AppError> {
    let job = JobRequirement::new(
        &req.title,
        req.required_aptitude,
        req.preferred_riasec,
        req.acceptable_risk,
        req.required_skills,
    )?;
    state.store.insert_job(job.clone()).await?;
    info!("Created job {} ({})", job.id, job.title);
    Ok((StatusCode::CREATED, Json(job)))
}

/// POST /api/v1/jobs/:job_id/fit
/// Ranks candidates against the job. An unknown job yields a labeled empty ranking.
pub async fn handle_job_fit(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    body: Option<Json<JobFitRequest>>,
) -> Result<Json<JobFitRanking>, AppError> {
    let Some(job) = state.store.get_job(job_id).await? else {
        return Ok(Json(JobFitRanking::job_not_found(job_id)));
    };

    let req = body.map(|Json(r)| r).unwrap_or_default();
    let candidate_ids = match req.candidate_ids {
        Some(ids) => ids,
        None => state.store.assessed_users().await?,
    };

    let mut candidates = Vec::with_capacity(candidate_ids.len());
    for user_id in candidate_ids {
        let dims = latest_dimensions(state.store.as_ref(), user_id).await?;
        candidates.push(Candidate { user_id, dims });
    }

    let ranking = rank_candidates(&job, &candidates);
    info!(
        "Ranked {} candidates for job {job_id} ({} excluded)",
        ranking.candidates.len(),
        ranking.excluded.len()
    );
    Ok(Json(ranking))
}

/// POST /api/v1/simulator
pub async fn handle_simulate(
    State(state): State<AppState>,
    Json(req): Json<SimulationRequest>,
) -> Result<Json<SimulationResult>, AppError> {
    let dims = latest_dimensions(state.store.as_ref(), req.user_id).await?;
    let result = simulate(&dims, &req.adjustments, state.scorer.as_ref())?;
    Ok(Json(result))
}
