//! Feedback retraining loop.
//!
//! State machine `Idle → Running → Idle`, guarded by an atomic check-and-set
//! so at most one training run is ever in flight. A trigger while running is
//! answered with `already_running` and nothing is queued. Runs execute on one
//! long-lived worker task; the CPU-bound part runs on the blocking pool.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, RwLock};
use tracing::{error, info, warn};

use crate::errors::EngineError;
use crate::learning::artifacts::{ArtifactStore, ModelArtifactSet};
use crate::learning::classifier::ModelTrainer;
use crate::learning::dataset::TrainingSet;
use crate::learning::feedback::{synthetic_rows, SyntheticRow};
use crate::learning::LearningError;
use crate::models::assessment::DimensionScores;
use crate::store::EngineStore;

const IDLE: u8 = 0;
const RUNNING: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrainState {
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerStatus {
    Started,
    AlreadyRunning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerResponse {
    pub status: TriggerStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RetrainOutcome {
    Succeeded {
        version: u64,
        accuracy: Option<f64>,
        baseline_rows: usize,
        synthetic_rows: usize,
    },
    Skipped {
        reason: String,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainRun {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: RetrainOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainStatus {
    pub state: RetrainState,
    pub last_run: Option<RetrainRun>,
    pub artifact_version: Option<u64>,
}

/// Collaborators one training run needs.
#[derive(Clone)]
pub struct RetrainContext {
    pub store: Arc<dyn EngineStore>,
    pub artifacts: Arc<ArtifactStore>,
    pub trainer: Arc<dyn ModelTrainer>,
    pub baseline_path: PathBuf,
}

struct RetrainJob {
    requested_at: DateTime<Utc>,
}

/// Handle to the retraining worker. Cheap to clone.
#[derive(Clone)]
pub struct Retrainer {
    state: Arc<AtomicU8>,
    jobs: mpsc::Sender<RetrainJob>,
    last_run: Arc<RwLock<Option<RetrainRun>>>,
    artifacts: Arc<ArtifactStore>,
}

/// Returns the state to `Idle` when dropped, whichever way the run ends.
struct IdleGuard(Arc<AtomicU8>);

impl Drop for IdleGuard {
    fn drop(&mut self) {
        self.0.store(IDLE, Ordering::Release);
    }
}

impl Retrainer {
    /// Spawns the worker task. Must be called inside a Tokio runtime.
    pub fn spawn(ctx: RetrainContext) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let state = Arc::new(AtomicU8::new(IDLE));
        let last_run = Arc::new(RwLock::new(None));

        tokio::spawn(worker_loop(ctx.clone(), rx, Arc::clone(&state), Arc::clone(&last_run)));

        Self {
            state,
            jobs: tx,
            last_run,
            artifacts: ctx.artifacts,
        }
    }

    /// Starts a run unless one is in flight. Returns immediately either way.
    pub fn trigger(&self) -> Result<TriggerResponse, EngineError> {
        let now = Utc::now();

        if self
            .state
            .compare_exchange(IDLE, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(TriggerResponse {
                status: TriggerStatus::AlreadyRunning,
                message: "Model retraining is already in progress".to_string(),
                timestamp: now,
            });
        }

        if let Err(e) = self.jobs.try_send(RetrainJob { requested_at: now }) {
            self.state.store(IDLE, Ordering::Release);
            error!("Retraining worker rejected job: {e}");
            return Err(EngineError::WorkerUnavailable);
        }

        info!("Model retraining started");
        Ok(TriggerResponse {
            status: TriggerStatus::Started,
            message: "Model retraining started in background".to_string(),
            timestamp: now,
        })
    }

    pub fn state(&self) -> RetrainState {
        match self.state.load(Ordering::Acquire) {
            RUNNING => RetrainState::Running,
            _ => RetrainState::Idle,
        }
    }

    pub async fn status(&self) -> RetrainStatus {
        RetrainStatus {
            state: self.state(),
            last_run: self.last_run.read().await.clone(),
            artifact_version: self.artifacts.version(),
        }
    }
}

async fn worker_loop(
    ctx: RetrainContext,
    mut jobs: mpsc::Receiver<RetrainJob>,
    state: Arc<AtomicU8>,
    last_run: Arc<RwLock<Option<RetrainRun>>>,
) {
    info!("Retraining worker ready");
    while let Some(job) = jobs.recv().await {
        let _guard = IdleGuard(Arc::clone(&state));

        let outcome = run_once(&ctx).await;
        match &outcome {
            RetrainOutcome::Succeeded { version, .. } => info!("Retraining finished: model v{version} live"),
            RetrainOutcome::Skipped { reason } => info!("Retraining skipped: {reason}"),
            RetrainOutcome::Failed { error } => error!("Retraining failed: {error}"),
        }

        *last_run.write().await = Some(RetrainRun {
            started_at: job.requested_at,
            finished_at: Utc::now(),
            outcome,
        });
    }
    warn!("Retraining worker stopped: job channel closed");
}

/// One full pipeline run. Every error is folded into the outcome.
async fn run_once(ctx: &RetrainContext) -> RetrainOutcome {
    let synthetic = match collect_synthetic_rows(ctx.store.as_ref()).await {
        Ok(rows) => rows,
        Err(e) => return RetrainOutcome::Failed { error: format!("{e:#}") },
    };
    info!("Generated {} feedback-based samples", synthetic.len());

    if synthetic.is_empty() {
        return RetrainOutcome::Skipped {
            reason: "no positive feedback with usable interest data".to_string(),
        };
    }

    let ctx = ctx.clone();
    let synthetic_count = synthetic.len();
    let joined = tokio::task::spawn_blocking(move || train_and_publish(&ctx, &synthetic)).await;

    match joined {
        Ok(Ok((set, baseline_rows))) => RetrainOutcome::Succeeded {
            version: set.version,
            accuracy: set.accuracy,
            baseline_rows,
            synthetic_rows: synthetic_count,
        },
        Ok(Err(e)) => RetrainOutcome::Failed { error: e.to_string() },
        Err(join_err) => RetrainOutcome::Failed {
            error: format!("training task aborted: {join_err}"),
        },
    }
}

async fn collect_synthetic_rows(store: &dyn EngineStore) -> anyhow::Result<Vec<SyntheticRow>> {
    let events = store.all_feedback().await?;

    let mut profiles: HashMap<_, DimensionScores> = HashMap::new();
    for event in events.iter().filter(|e| e.is_positive()) {
        if profiles.contains_key(&event.user_id) {
            continue;
        }
        let records = store.assessments_for(event.user_id).await?;
        profiles.insert(event.user_id, DimensionScores::from_latest(event.user_id, &records));
    }

    Ok(synthetic_rows(&events, &profiles))
}

fn train_and_publish(
    ctx: &RetrainContext,
    synthetic: &[SyntheticRow],
) -> Result<(Arc<ModelArtifactSet>, usize), LearningError> {
    let mut data = TrainingSet::load_csv(&ctx.baseline_path)?;
    let baseline_rows = data.len();
    for row in synthetic {
        data.push_synthetic(row);
    }
    info!("Combined dataset size: {} ({} baseline)", data.len(), baseline_rows);

    let model = ctx.trainer.train(&data)?;
    let set = ModelArtifactSet::from_trained(ctx.artifacts.next_version(), model);
    let published = ctx.artifacts.replace(set)?;
    Ok((published, baseline_rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use uuid::Uuid;

    use crate::learning::classifier::{NaiveBayesTrainer, TrainedModel};
    use crate::models::assessment::{AssessmentRecord, Dimension, ScoreMap};
    use crate::models::feedback::FeedbackEvent;
    use crate::store::memory::MemoryStore;

    const BASELINE: &str = "\
Coding,Drawing,Science,Course
1,0,1,BCA
0,1,0,BFA
1,0,0,BCA
0,1,1,BFA
1,1,1,B.Sc Physics
";

    /// Blocks inside `train` until the test releases it.
    struct GatedTrainer {
        release: Mutex<std::sync::mpsc::Receiver<()>>,
    }

    impl ModelTrainer for GatedTrainer {
        fn train(&self, data: &TrainingSet) -> Result<TrainedModel, LearningError> {
            let rx = self.release.lock().map_err(|e| LearningError::Training(e.to_string()))?;
            rx.recv().map_err(|e| LearningError::Training(e.to_string()))?;
            NaiveBayesTrainer::default().train(data)
        }
    }

    struct FailingTrainer;

    impl ModelTrainer for FailingTrainer {
        fn train(&self, _: &TrainingSet) -> Result<TrainedModel, LearningError> {
            Err(LearningError::Training("boom".to_string()))
        }
    }

    struct PanickingTrainer;

    impl ModelTrainer for PanickingTrainer {
        fn train(&self, _: &TrainingSet) -> Result<TrainedModel, LearningError> {
            panic!("trainer panicked")
        }
    }

    async fn context(trainer: Arc<dyn ModelTrainer>, dir: &tempfile::TempDir) -> RetrainContext {
        let baseline_path = dir.path().join("stud.csv");
        std::fs::write(&baseline_path, BASELINE).unwrap();

        let store = Arc::new(MemoryStore::new());
        let user = Uuid::new_v4();
        let scores: ScoreMap = [("I".to_string(), 11.0)].into_iter().collect();
        store
            .append_assessment(AssessmentRecord::new(user, Dimension::Riasec, scores).unwrap())
            .await
            .unwrap();
        store
            .append_feedback(FeedbackEvent::new(user, "B.Sc Physics", 5, true, None).unwrap())
            .await
            .unwrap();

        RetrainContext {
            store,
            artifacts: Arc::new(ArtifactStore::open(dir.path().join("models")).unwrap()),
            trainer,
            baseline_path,
        }
    }

    async fn wait_for_idle(retrainer: &Retrainer) -> RetrainStatus {
        for _ in 0..200 {
            let status = retrainer.status().await;
            if status.state == RetrainState::Idle && status.last_run.is_some() {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("retrainer never returned to idle");
    }

    #[tokio::test]
    async fn test_second_trigger_while_running_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (release, gate) = std::sync::mpsc::channel();
        let trainer = Arc::new(GatedTrainer {
            release: Mutex::new(gate),
        });
        let retrainer = Retrainer::spawn(context(trainer, &dir).await);

        let first = retrainer.trigger().unwrap();
        assert_eq!(first.status, TriggerStatus::Started);
        assert_eq!(retrainer.state(), RetrainState::Running);

        let second = retrainer.trigger().unwrap();
        assert_eq!(second.status, TriggerStatus::AlreadyRunning);
        assert_eq!(retrainer.status().await.artifact_version, None);

        release.send(()).unwrap();
        let status = wait_for_idle(&retrainer).await;
        assert_eq!(status.artifact_version, Some(1));
        match status.last_run.unwrap().outcome {
            RetrainOutcome::Succeeded { synthetic_rows, baseline_rows, .. } => {
                assert_eq!(synthetic_rows, 2);
                assert_eq!(baseline_rows, 5);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_training_returns_to_idle_and_keeps_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let retrainer = Retrainer::spawn(context(Arc::new(FailingTrainer), &dir).await);

        assert_eq!(retrainer.trigger().unwrap().status, TriggerStatus::Started);
        let status = wait_for_idle(&retrainer).await;
        assert_eq!(status.artifact_version, None);
        assert!(matches!(status.last_run.unwrap().outcome, RetrainOutcome::Failed { .. }));

        // Idle again: a new trigger starts a fresh run
        assert_eq!(retrainer.trigger().unwrap().status, TriggerStatus::Started);
    }

    #[tokio::test]
    async fn test_panicking_trainer_returns_to_idle() {
        let dir = tempfile::tempdir().unwrap();
        let retrainer = Retrainer::spawn(context(Arc::new(PanickingTrainer), &dir).await);

        retrainer.trigger().unwrap();
        let status = wait_for_idle(&retrainer).await;
        match status.last_run.unwrap().outcome {
            RetrainOutcome::Failed { error } => assert!(error.contains("aborted")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_positive_feedback_skips_run() {
        let dir = tempfile::tempdir().unwrap();
        let baseline_path = dir.path().join("stud.csv");
        std::fs::write(&baseline_path, BASELINE).unwrap();
        let ctx = RetrainContext {
            store: Arc::new(MemoryStore::new()),
            artifacts: Arc::new(ArtifactStore::open(dir.path().join("models")).unwrap()),
            trainer: Arc::new(NaiveBayesTrainer::default()),
            baseline_path,
        };
        let retrainer = Retrainer::spawn(ctx);

        retrainer.trigger().unwrap();
        let status = wait_for_idle(&retrainer).await;
        assert!(matches!(status.last_run.unwrap().outcome, RetrainOutcome::Skipped { .. }));
        assert_eq!(status.artifact_version, None);
    }

    #[tokio::test]
    async fn test_missing_baseline_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(Arc::new(NaiveBayesTrainer::default()), &dir).await;
        ctx.baseline_path = dir.path().join("missing.csv");
        let retrainer = Retrainer::spawn(ctx);

        retrainer.trigger().unwrap();
        let status = wait_for_idle(&retrainer).await;
        assert!(matches!(status.last_run.unwrap().outcome, RetrainOutcome::Failed { .. }));
        assert_eq!(retrainer.state(), RetrainState::Idle);
    }
}
