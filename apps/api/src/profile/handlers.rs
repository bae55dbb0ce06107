use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{AppError, EngineError};
use crate::models::assessment::{AssessmentRecord, Dimension, ScoreMap};
use crate::models::profile::Profile;
use crate::profile::refresh_profile;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct SubmitAssessmentRequest {
    pub user_id: Uuid,
    pub dimension: Dimension,
    pub scores: ScoreMap,
}

/// POST /api/v1/assessments
/// Appends one assessment and returns the recomputed profile.
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    Json(req): Json<SubmitAssessmentRequest>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let record = AssessmentRecord::new(req.user_id, req.dimension, req.scores)?;
    state.store.append_assessment(record).await?;

    let profile = refresh_profile(state.store.as_ref(), req.user_id)
        .await?
        .ok_or_else(|| EngineError::MissingData(format!("no assessments for user {}", req.user_id)))?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Profile>, AppError> {
    let profile = state
        .store
        .get_profile(params.user_id)
        .await?
        .ok_or_else(|| EngineError::MissingData(format!("no profile for user {}", params.user_id)))?;
    Ok(Json(profile))
}
