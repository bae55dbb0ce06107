use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::models::assessment::{AssessmentRecord, DimensionScores, ScoreMap};
use crate::models::feedback::FeedbackEvent;
use crate::models::job::JobRequirement;
use crate::models::profile::{CareerMatch, Profile, RecommendationList};
use crate::store::EngineStore;

/// PostgreSQL-backed store. Score maps and nested lists live in JSONB columns.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Row types
// ────────────────────────────────────────────────────────────────────────────

#[derive(FromRow)]
struct AssessmentRow {
    id: Uuid,
    user_id: Uuid,
    dimension: String,
    scores: Json<ScoreMap>,
    recorded_at: DateTime<Utc>,
}

impl TryFrom<AssessmentRow> for AssessmentRecord {
    type Error = anyhow::Error;

    fn try_from(row: AssessmentRow) -> Result<Self> {
        Ok(AssessmentRecord {
            id: row.id,
            user_id: row.user_id,
            dimension: row.dimension.parse().map_err(|e: String| anyhow!(e))?,
            scores: row.scores.0,
            recorded_at: row.recorded_at,
        })
    }
}

#[derive(FromRow)]
struct ProfileRow {
    user_id: Uuid,
    dimensions: Json<DimensionScores>,
    clarity_score: f64,
    summary: String,
    top_careers: Json<Vec<CareerMatch>>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct FeedbackRow {
    id: Uuid,
    user_id: Uuid,
    career_id: String,
    rating: i16,
    satisfied: bool,
    comment: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<FeedbackRow> for FeedbackEvent {
    type Error = anyhow::Error;

    fn try_from(row: FeedbackRow) -> Result<Self> {
        Ok(FeedbackEvent {
            id: row.id,
            user_id: row.user_id,
            career_id: row.career_id,
            rating: u8::try_from(row.rating)?,
            satisfied: row.satisfied,
            comment: row.comment,
            created_at: row.created_at,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// EngineStore
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl EngineStore for PgStore {
    async fn append_assessment(&self, record: AssessmentRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO assessments (id, user_id, dimension, scores, recorded_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(record.dimension.as_str())
        .bind(Json(&record.scores))
        .bind(record.recorded_at)
        .execute(&self.pool)
        .await?;

        debug!("Stored {} assessment {} for user {}", record.dimension, record.id, record.user_id);
        Ok(())
    }

    async fn assessments_for(&self, user_id: Uuid) -> Result<Vec<AssessmentRecord>> {
        sqlx::query_as::<_, AssessmentRow>(
            "SELECT id, user_id, dimension, scores, recorded_at FROM assessments WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(AssessmentRecord::try_from)
        .collect()
    }

    async fn assessed_users(&self) -> Result<Vec<Uuid>> {
        Ok(
            sqlx::query_scalar("SELECT DISTINCT user_id FROM assessments ORDER BY user_id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, dimensions, clarity_score, summary, top_careers, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE SET
                dimensions = EXCLUDED.dimensions,
                clarity_score = EXCLUDED.clarity_score,
                summary = EXCLUDED.summary,
                top_careers = EXCLUDED.top_careers,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(profile.user_id)
        .bind(Json(&profile.dimensions))
        .bind(profile.clarity_score)
        .bind(&profile.summary)
        .bind(Json(&profile.top_careers))
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, dimensions, clarity_score, summary, top_careers, updated_at
            FROM profiles WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Profile {
            user_id: r.user_id,
            dimensions: r.dimensions.0,
            clarity_score: r.clarity_score,
            summary: r.summary,
            top_careers: r.top_careers.0,
            updated_at: r.updated_at,
        }))
    }

    async fn save_recommendations(&self, user_id: Uuid, list: RecommendationList) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO recommendation_lists (user_id, source, careers)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, source) DO UPDATE SET careers = EXCLUDED.careers
            "#,
        )
        .bind(user_id)
        .bind(&list.source)
        .bind(Json(&list.careers))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn recommendations_for(&self, user_id: Uuid) -> Result<Vec<RecommendationList>> {
        let rows: Vec<(String, Json<Vec<CareerMatch>>)> = sqlx::query_as(
            "SELECT source, careers FROM recommendation_lists WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(source, careers)| RecommendationList {
                source,
                careers: careers.0,
            })
            .collect())
    }

    async fn append_feedback(&self, event: FeedbackEvent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO feedback_events (id, user_id, career_id, rating, satisfied, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(&event.career_id)
        .bind(i16::from(event.rating))
        .bind(event.satisfied)
        .bind(&event.comment)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn feedback_for(&self, user_id: Uuid) -> Result<Vec<FeedbackEvent>> {
        sqlx::query_as::<_, FeedbackRow>(
            "SELECT * FROM feedback_events WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(FeedbackEvent::try_from)
        .collect()
    }

    async fn all_feedback(&self) -> Result<Vec<FeedbackEvent>> {
        sqlx::query_as::<_, FeedbackRow>("SELECT * FROM feedback_events ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(FeedbackEvent::try_from)
            .collect()
    }

    async fn insert_job(&self, job: JobRequirement) -> Result<()> {
        sqlx::query("INSERT INTO jobs (id, title, requirement) VALUES ($1, $2, $3)")
            .bind(job.id)
            .bind(&job.title)
            .bind(Json(&job))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobRequirement>> {
        let row: Option<(Json<JobRequirement>,)> =
            sqlx::query_as("SELECT requirement FROM jobs WHERE id = $1")
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(job,)| job.0))
    }
}
