pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::learning::handlers as learning;
use crate::profile::handlers as profile;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Assessments & profile
        .route("/api/v1/assessments", post(profile::handle_submit_assessment))
        .route("/api/v1/profile", get(profile::handle_get_profile))
        // Career scoring
        .route(
            "/api/v1/careers/analysis",
            get(scoring::handle_career_analysis),
        )
        .route(
            "/api/v1/careers/explanation",
            get(scoring::handle_career_explanation),
        )
        .route("/api/v1/skills/gap", get(scoring::handle_skill_gap))
        .route("/api/v1/simulator", post(scoring::handle_simulate))
        // Employer side
        .route("/api/v1/jobs", post(scoring::handle_create_job))
        .route("/api/v1/jobs/:job_id/fit", post(scoring::handle_job_fit))
        // Feedback & model
        .route(
            "/api/v1/feedback",
            get(learning::handle_list_feedback).post(learning::handle_submit_feedback),
        )
        .route(
            "/api/v1/predictions/courses",
            post(learning::handle_predict_courses),
        )
        .route("/api/v1/admin/retrain", post(learning::handle_trigger_retrain))
        .route(
            "/api/v1/admin/retrain/status",
            get(learning::handle_retrain_status),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::learning::artifacts::ArtifactStore;
    use crate::learning::classifier::NaiveBayesTrainer;
    use crate::learning::retrainer::{RetrainContext, Retrainer};
    use crate::scoring::confidence::WeightedCareerScorer;
    use crate::scoring::risk::RiskConfig;
    use crate::store::memory::MemoryStore;
    use crate::store::EngineStore;

    fn test_app() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn EngineStore> = Arc::new(MemoryStore::new());
        let artifacts = Arc::new(ArtifactStore::open(dir.path().join("models")).unwrap());
        let retrainer = Retrainer::spawn(RetrainContext {
            store: Arc::clone(&store),
            artifacts: Arc::clone(&artifacts),
            trainer: Arc::new(NaiveBayesTrainer::default()),
            baseline_path: dir.path().join("stud.csv"),
        });
        let state = AppState {
            store,
            scorer: Arc::new(WeightedCareerScorer::default()),
            risk_config: RiskConfig::default(),
            artifacts,
            retrainer,
        };
        (build_router(state), dir)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        // Extractor rejections are plain text
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    async fn submit(app: &Router, user: Uuid, dimension: &str, scores: Value) -> (StatusCode, Value) {
        send(
            app,
            "POST",
            "/api/v1/assessments",
            Some(json!({ "user_id": user, "dimension": dimension, "scores": scores })),
        )
        .await
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "careerlens-api");
        assert_eq!(body["retrain_state"], "idle");
    }

    #[tokio::test]
    async fn test_assessment_builds_profile() {
        let (app, _dir) = test_app();
        let user = Uuid::new_v4();

        let (status, profile) = submit(
            &app,
            user,
            "riasec",
            json!({"R": 3, "I": 9, "A": 2, "S": 4, "E": 5, "C": 6}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(profile["user_id"], json!(user));

        let (status, fetched) = send(&app, "GET", &format!("/api/v1/profile?user_id={user}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["clarity_score"], profile["clarity_score"]);
    }

    #[tokio::test]
    async fn test_out_of_range_assessment_rejected() {
        let (app, _dir) = test_app();
        let (status, body) = submit(&app, Uuid::new_v4(), "riasec", json!({"R": 40})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let (app, _dir) = test_app();
        let uri = format!("/api/v1/profile?user_id={}", Uuid::new_v4());
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_career_analysis() {
        let (app, _dir) = test_app();
        let user = Uuid::new_v4();
        submit(&app, user, "riasec", json!({"R": 3, "I": 9, "A": 2, "S": 4, "E": 5, "C": 6})).await;
        submit(&app, user, "aptitude", json!({"logical": 80, "numerical": 60})).await;

        let uri = format!("/api/v1/careers/analysis?user_id={user}&career=software-engineer");
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let breakdown = body["confidence"]["breakdown"].as_array().unwrap();
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[0]["raw_score"], 52.5);
        assert!(body["risk"]["overall_risk"].as_f64().unwrap() <= 100.0);
        assert!(body.get("notice").is_none());
    }

    #[tokio::test]
    async fn test_unknown_career_rejected() {
        let (app, _dir) = test_app();
        let uri = format!("/api/v1/skills/gap?user_id={}&career=astronaut", Uuid::new_v4());
        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_explanation_without_data_is_labeled() {
        let (app, _dir) = test_app();
        let uri = format!("/api/v1/careers/explanation?user_id={}&career=teacher", Uuid::new_v4());
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overall_match_score"], 0.0);
        assert!(body["notice"].is_string());
    }

    #[tokio::test]
    async fn test_job_fit_flow() {
        let (app, _dir) = test_app();
        let (strong, empty) = (Uuid::new_v4(), Uuid::new_v4());
        submit(&app, strong, "aptitude", json!({"logical": 90})).await;
        submit(&app, strong, "riasec", json!({"I": 12})).await;

        let (status, job) = send(
            &app,
            "POST",
            "/api/v1/jobs",
            Some(json!({
                "title": "Data Engineer",
                "required_aptitude": {"logical": 70},
                "preferred_riasec": {"I": 0.8}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let job_id = job["id"].as_str().unwrap().to_string();

        let (status, ranking) = send(
            &app,
            "POST",
            &format!("/api/v1/jobs/{job_id}/fit"),
            Some(json!({"candidate_ids": [empty, strong]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ranking["candidates"].as_array().unwrap().len(), 1);
        assert_eq!(ranking["candidates"][0]["user_id"], json!(strong));
        assert_eq!(ranking["excluded"][0]["user_id"], json!(empty));
    }

    #[tokio::test]
    async fn test_job_fit_unknown_job_is_labeled() {
        let (app, _dir) = test_app();
        let uri = format!("/api/v1/jobs/{}/fit", Uuid::new_v4());
        let (status, body) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["notice"], "Job not found");
        assert!(body["candidates"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_simulation_changes_nothing() {
        let (app, _dir) = test_app();
        let user = Uuid::new_v4();
        submit(&app, user, "riasec", json!({"R": 3, "I": 9, "A": 2, "S": 4, "E": 5, "C": 6})).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/simulator",
            Some(json!({"user_id": user, "adjustments": {"interests": {"I": 0}}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["changes"]["new_careers"].as_array().unwrap().is_empty());
        assert!(body["changes"]["dropped_careers"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_simulation_rejects_unknown_interest_code() {
        let (app, _dir) = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/simulator",
            Some(json!({"user_id": Uuid::new_v4(), "adjustments": {"interests": {"Z": 2}}})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.is_string());
    }

    #[tokio::test]
    async fn test_feedback_round() {
        let (app, _dir) = test_app();
        let user = Uuid::new_v4();

        let bad = json!({"user_id": user, "career_id": "BCA", "rating": 9, "satisfied": true});
        let (status, _) = send(&app, "POST", "/api/v1/feedback", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        for career in ["BCA", "BFA"] {
            let ok = json!({"user_id": user, "career_id": career, "rating": 4, "satisfied": true});
            let (status, _) = send(&app, "POST", "/api/v1/feedback", Some(ok)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, body) = send(&app, "GET", &format!("/api/v1/feedback?user_id={user}"), None).await;
        let feedback = body["feedback"].as_array().unwrap();
        assert_eq!(feedback.len(), 2);
        assert_eq!(feedback[0]["career_id"], "BFA");
    }

    #[tokio::test]
    async fn test_prediction_without_model_is_model_error() {
        let (app, _dir) = test_app();
        let user = Uuid::new_v4();
        submit(&app, user, "riasec", json!({"I": 11})).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/predictions/courses",
            Some(json!({"user_id": user})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "MODEL_ERROR");
    }

    #[tokio::test]
    async fn test_retrain_trigger_accepted() {
        let (app, _dir) = test_app();
        let (status, body) = send(&app, "POST", "/api/v1/admin/retrain", None).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["status"], "started");

        let (status, _) = send(&app, "GET", "/api/v1/admin/retrain/status", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
