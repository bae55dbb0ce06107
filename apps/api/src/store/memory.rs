use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::assessment::AssessmentRecord;
use crate::models::feedback::FeedbackEvent;
use crate::models::job::JobRequirement;
use crate::models::profile::{Profile, RecommendationList};
use crate::store::EngineStore;

/// Process-local store. Everything is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    assessments: RwLock<Vec<AssessmentRecord>>,
    profiles: RwLock<HashMap<Uuid, Profile>>,
    recommendations: RwLock<HashMap<Uuid, Vec<RecommendationList>>>,
    feedback: RwLock<Vec<FeedbackEvent>>,
    jobs: RwLock<HashMap<Uuid, JobRequirement>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EngineStore for MemoryStore {
    async fn append_assessment(&self, record: AssessmentRecord) -> Result<()> {
        self.assessments.write().await.push(record);
        Ok(())
    }

    async fn assessments_for(&self, user_id: Uuid) -> Result<Vec<AssessmentRecord>> {
        Ok(self
            .assessments
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn assessed_users(&self) -> Result<Vec<Uuid>> {
        let users: BTreeSet<Uuid> = self.assessments.read().await.iter().map(|r| r.user_id).collect();
        Ok(users.into_iter().collect())
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<()> {
        self.profiles.write().await.insert(profile.user_id, profile);
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn save_recommendations(&self, user_id: Uuid, list: RecommendationList) -> Result<()> {
        let mut all = self.recommendations.write().await;
        let lists = all.entry(user_id).or_default();
        match lists.iter_mut().find(|l| l.source == list.source) {
            Some(existing) => *existing = list,
            None => lists.push(list),
        }
        Ok(())
    }

    async fn recommendations_for(&self, user_id: Uuid) -> Result<Vec<RecommendationList>> {
        Ok(self
            .recommendations
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append_feedback(&self, event: FeedbackEvent) -> Result<()> {
        self.feedback.write().await.push(event);
        Ok(())
    }

    async fn feedback_for(&self, user_id: Uuid) -> Result<Vec<FeedbackEvent>> {
        let mut events: Vec<FeedbackEvent> = self
            .feedback
            .read()
            .await
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        // Stable: equal timestamps stay newest-appended first.
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn all_feedback(&self) -> Result<Vec<FeedbackEvent>> {
        Ok(self.feedback.read().await.clone())
    }

    async fn insert_job(&self, job: JobRequirement) -> Result<()> {
        self.jobs.write().await.insert(job.id, job);
        Ok(())
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<JobRequirement>> {
        Ok(self.jobs.read().await.get(&job_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::{Dimension, ScoreMap};
    use crate::models::profile::CareerMatch;

    fn record(user_id: Uuid) -> AssessmentRecord {
        let scores: ScoreMap = [("logical".to_string(), 70.0)].into_iter().collect();
        AssessmentRecord::new(user_id, Dimension::Aptitude, scores).unwrap()
    }

    #[tokio::test]
    async fn test_assessments_scoped_to_user() {
        let store = MemoryStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.append_assessment(record(a)).await.unwrap();
        store.append_assessment(record(a)).await.unwrap();
        store.append_assessment(record(b)).await.unwrap();

        assert_eq!(store.assessments_for(a).await.unwrap().len(), 2);
        assert_eq!(store.assessed_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_recommendations_replace_same_source() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let list = |pct| RecommendationList {
            source: "course_model".to_string(),
            careers: vec![CareerMatch { name: "BCA".into(), match_percent: pct }],
        };
        store.save_recommendations(user, list(40)).await.unwrap();
        store.save_recommendations(user, list(55)).await.unwrap();

        let lists = store.recommendations_for(user).await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].careers[0].match_percent, 55);
    }

    #[tokio::test]
    async fn test_feedback_newest_first() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let mut older = FeedbackEvent::new(user, "BBA", 3, true, None).unwrap();
        older.created_at -= chrono::Duration::hours(1);
        let newer = FeedbackEvent::new(user, "BCA", 5, true, None).unwrap();
        store.append_feedback(older).await.unwrap();
        store.append_feedback(newer).await.unwrap();

        let events = store.feedback_for(user).await.unwrap();
        assert_eq!(events[0].career_id, "BCA");
        assert_eq!(store.all_feedback().await.unwrap()[0].career_id, "BBA");
    }
}
