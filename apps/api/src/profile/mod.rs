// Profile aggregation: latest assessment per dimension → one live Profile per user.

pub mod aggregator;
pub mod handlers;

use anyhow::Result;
use tracing::info;
use uuid::Uuid;

use crate::models::assessment::DimensionScores;
use crate::models::profile::Profile;
use crate::store::EngineStore;

/// Latest score map per dimension for one user. Empty when nothing is recorded.
pub async fn latest_dimensions(store: &dyn EngineStore, user_id: Uuid) -> Result<DimensionScores> {
    let records = store.assessments_for(user_id).await?;
    Ok(DimensionScores::from_latest(user_id, &records))
}

/// Rebuilds the user's profile from scratch and replaces the stored one.
/// Returns `None` (and stores nothing) when the user has no assessments.
pub async fn refresh_profile(store: &dyn EngineStore, user_id: Uuid) -> Result<Option<Profile>> {
    let records = store.assessments_for(user_id).await?;
    let lists = store.recommendations_for(user_id).await?;

    let Some(profile) = aggregator::build_profile(user_id, &records, &lists) else {
        return Ok(None);
    };
    store.upsert_profile(profile.clone()).await?;
    info!("Profile refreshed for user {user_id} (clarity {:.1})", profile.clarity_score);
    Ok(Some(profile))
}
