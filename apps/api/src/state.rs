use std::sync::Arc;

use crate::learning::artifacts::ArtifactStore;
use crate::learning::retrainer::Retrainer;
use crate::scoring::confidence::CareerScorer;
use crate::scoring::risk::RiskConfig;
use crate::store::EngineStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `PgStore` when DATABASE_URL is set, otherwise `MemoryStore`.
    pub store: Arc<dyn EngineStore>,
    /// Pluggable fit scorer. Default: WeightedCareerScorer.
    pub scorer: Arc<dyn CareerScorer>,
    pub risk_config: RiskConfig,
    /// Live course-model artifacts; swapped by the retrainer.
    pub artifacts: Arc<ArtifactStore>,
    pub retrainer: Retrainer,
}
