// Persistence boundary: assessments, profiles, recommendation lists, feedback and jobs.

pub mod memory;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::assessment::AssessmentRecord;
use crate::models::feedback::FeedbackEvent;
use crate::models::job::JobRequirement;
use crate::models::profile::{Profile, RecommendationList};

/// Storage used by the engine. Default in development: `MemoryStore`.
/// Production: `PgStore` when `DATABASE_URL` is set.
#[async_trait]
pub trait EngineStore: Send + Sync {
    /// Appends a record. Records are never updated or deleted.
    async fn append_assessment(&self, record: AssessmentRecord) -> Result<()>;

    /// All records of one user, any order.
    async fn assessments_for(&self, user_id: Uuid) -> Result<Vec<AssessmentRecord>>;

    /// Users with at least one assessment record.
    async fn assessed_users(&self) -> Result<Vec<Uuid>>;

    /// Replaces the user's live profile.
    async fn upsert_profile(&self, profile: Profile) -> Result<()>;

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>>;

    /// Stores a recommendation list, replacing any earlier list from the same source.
    async fn save_recommendations(&self, user_id: Uuid, list: RecommendationList) -> Result<()>;

    /// The user's recommendation lists, oldest source first.
    async fn recommendations_for(&self, user_id: Uuid) -> Result<Vec<RecommendationList>>;

    async fn append_feedback(&self, event: FeedbackEvent) -> Result<()>;

    /// One user's feedback, newest first.
    async fn feedback_for(&self, user_id: Uuid) -> Result<Vec<FeedbackEvent>>;

    /// Every feedback event, oldest first.
    async fn all_feedback(&self) -> Result<Vec<FeedbackEvent>>;

    async fn insert_job(&self, job: JobRequirement) -> Result<()>;

    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobRequirement>>;
}
