use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, EngineError};
use crate::learning::predictor::{predict_courses, to_recommendation_list, CoursePrediction};
use crate::learning::retrainer::{RetrainStatus, TriggerResponse, TriggerStatus};
use crate::models::feedback::FeedbackEvent;
use crate::models::profile::{Profile, RecommendationList};
use crate::profile::{latest_dimensions, refresh_profile};
use crate::reference::careers::Career;
use crate::reference::riasec::dominant_code;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub user_id: Uuid,
    pub career_id: String,
    pub rating: u8,
    pub satisfied: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Serialize)]
pub struct FeedbackListResponse {
    pub feedback: Vec<FeedbackEvent>,
}

#[derive(Deserialize)]
pub struct PredictionRequest {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct PredictionResponse {
    pub model_version: u64,
    pub predictions: Vec<CoursePrediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

#[derive(Serialize)]
pub struct RetrainTriggerResponse {
    #[serde(flatten)]
    pub trigger: TriggerResponse,
    pub retrain: RetrainStatus,
}

/// POST /api/v1/feedback
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackEvent>), AppError> {
    let event = FeedbackEvent::new(req.user_id, &req.career_id, req.rating, req.satisfied, req.comment)?;
    state.store.append_feedback(event.clone()).await?;
    info!("Recorded feedback {} from user {} (rating {})", event.id, event.user_id, event.rating);
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/v1/feedback
/// Newest first.
pub async fn handle_list_feedback(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<FeedbackListResponse>, AppError> {
    let feedback = state.store.feedback_for(params.user_id).await?;
    Ok(Json(FeedbackListResponse { feedback }))
}

/// POST /api/v1/admin/retrain
/// Returns immediately: 202 when a run was started, 200 when one is already in flight.
pub async fn handle_trigger_retrain(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RetrainTriggerResponse>), AppError> {
    let trigger = state.retrainer.trigger()?;
    let code = match trigger.status {
        TriggerStatus::Started => StatusCode::ACCEPTED,
        TriggerStatus::AlreadyRunning => StatusCode::OK,
    };
    let retrain = state.retrainer.status().await;
    Ok((code, Json(RetrainTriggerResponse { trigger, retrain })))
}

/// GET /api/v1/admin/retrain/status
pub async fn handle_retrain_status(State(state): State<AppState>) -> Json<RetrainStatus> {
    Json(state.retrainer.status().await)
}

/// POST /api/v1/predictions/courses
/// Predicts courses with the live model, stores them together with the
/// personality-test careers as recommendation sources and refreshes the profile.
pub async fn handle_predict_courses(
    State(state): State<AppState>,
    Json(req): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, AppError> {
    let dims = latest_dimensions(state.store.as_ref(), req.user_id).await?;
    if dims.riasec().is_none() {
        return Err(EngineError::MissingData(format!(
            "user {} has no interest assessment to predict from",
            req.user_id
        ))
        .into());
    }

    let artifacts = state.artifacts.current()?;
    let predictions = predict_courses(&artifacts, &dims)?;

    if let Some(code) = dims.riasec().and_then(dominant_code) {
        let names: Vec<&str> = Career::shortlist(code).iter().map(|c| c.name()).collect();
        state
            .store
            .save_recommendations(req.user_id, RecommendationList::from_personality_careers(&names))
            .await?;
    }
    state
        .store
        .save_recommendations(req.user_id, to_recommendation_list(&predictions))
        .await?;

    let profile = refresh_profile(state.store.as_ref(), req.user_id).await?;
    info!(
        "Predicted {} courses for user {} with model v{}",
        predictions.len(),
        req.user_id,
        artifacts.version
    );

    Ok(Json(PredictionResponse {
        model_version: artifacts.version,
        predictions,
        profile,
    }))
}
