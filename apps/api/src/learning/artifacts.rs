use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{error, info, warn};

use crate::errors::EngineError;
use crate::learning::classifier::{FeatureSelector, LabelEncoder, NaiveBayes, TrainedModel};
use crate::learning::LearningError;

/// File name of the persisted bundle inside the model directory.
pub const BUNDLE_FILE: &str = "model_artifacts.json";

/// The four artifacts prediction needs, always persisted and swapped together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifactSet {
    pub version: u64,
    pub trained_at: DateTime<Utc>,
    pub accuracy: Option<f64>,
    pub classifier: NaiveBayes,
    pub selector: FeatureSelector,
    pub label_encoder: LabelEncoder,
    pub feature_columns: Vec<String>,
}

impl ModelArtifactSet {
    pub fn from_trained(version: u64, model: TrainedModel) -> Self {
        Self {
            version,
            trained_at: Utc::now(),
            accuracy: model.accuracy,
            classifier: model.classifier,
            selector: model.selector,
            label_encoder: model.label_encoder,
            feature_columns: model.feature_columns,
        }
    }

    /// Checks the artifacts agree with each other: column list ↔ selector
    /// input, selector output ↔ classifier input, classifier classes ↔ encoder.
    pub fn validate(&self) -> Result<(), EngineError> {
        let corrupt = |msg: String| Err(EngineError::ArtifactCorruption(msg));

        if self.feature_columns.len() != self.selector.input_width {
            return corrupt(format!(
                "feature column count {} does not match selector input width {}",
                self.feature_columns.len(),
                self.selector.input_width
            ));
        }
        if let Some(&i) = self.selector.selected.iter().find(|&&i| i >= self.selector.input_width) {
            return corrupt(format!("selector references column {i} outside its input"));
        }
        if self.selector.selected.len() != self.classifier.n_features() {
            return corrupt(format!(
                "selector output width {} does not match classifier width {}",
                self.selector.selected.len(),
                self.classifier.n_features()
            ));
        }
        if self.classifier.n_classes() != self.label_encoder.len() {
            return corrupt(format!(
                "classifier has {} classes but label encoder has {}",
                self.classifier.n_classes(),
                self.label_encoder.len()
            ));
        }
        if self.classifier.feature_prob.iter().any(|row| row.len() != self.classifier.n_features()) {
            return corrupt("classifier probability table is ragged".to_string());
        }
        Ok(())
    }
}

/// Owns the model directory and the live artifact set.
///
/// Readers get an `Arc` snapshot: a concurrent `replace` never exposes a
/// partially written set, on disk or in memory.
pub struct ArtifactStore {
    dir: PathBuf,
    current: RwLock<Option<Arc<ModelArtifactSet>>>,
    load_error: RwLock<Option<String>>,
}

impl ArtifactStore {
    /// Opens `dir`, creating it if needed, and loads the bundle when present.
    /// A corrupt bundle is remembered rather than returned so the service can
    /// still start; predictions then fail with `ArtifactCorruption`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LearningError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(BUNDLE_FILE);
        let (current, load_error) = if path.exists() {
            match load_bundle(&path) {
                Ok(set) => {
                    info!("Loaded model artifacts v{} from {}", set.version, path.display());
                    (Some(Arc::new(set)), None)
                }
                Err(e) => {
                    error!("Model artifacts at {} are unusable: {e}", path.display());
                    (None, Some(e.to_string()))
                }
            }
        } else {
            warn!("No model artifacts at {}; predictions disabled until retraining", path.display());
            (None, None)
        };

        Ok(Self {
            dir,
            current: RwLock::new(current),
            load_error: RwLock::new(load_error),
        })
    }

    /// The live artifact set, or `ArtifactCorruption` when none is usable.
    pub fn current(&self) -> Result<Arc<ModelArtifactSet>, EngineError> {
        if let Some(set) = self.current.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            return Ok(Arc::clone(set));
        }
        let reason = self
            .load_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(|| "no model artifacts have been trained yet".to_string());
        Err(EngineError::ArtifactCorruption(reason))
    }

    pub fn version(&self) -> Option<u64> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.version)
    }

    pub fn next_version(&self) -> u64 {
        self.version().map_or(1, |v| v + 1)
    }

    /// Validates `set`, writes it to a temp file in the model directory,
    /// renames it over the bundle and only then swaps the in-memory copy.
    /// On any error the previous set stays live on disk and in memory.
    pub fn replace(&self, set: ModelArtifactSet) -> Result<Arc<ModelArtifactSet>, LearningError> {
        set.validate()
            .map_err(|e| LearningError::Inconsistent(e.to_string()))?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(&mut tmp, &set)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.dir.join(BUNDLE_FILE))
            .map_err(|e| LearningError::Io(e.error))?;

        let set = Arc::new(set);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&set));
        *self.load_error.write().unwrap_or_else(PoisonError::into_inner) = None;

        info!("Model artifacts v{} persisted to {}", set.version, self.dir.display());
        Ok(set)
    }
}

fn load_bundle(path: &Path) -> Result<ModelArtifactSet, LearningError> {
    let bytes = std::fs::read(path)?;
    let set: ModelArtifactSet = serde_json::from_slice(&bytes)?;
    set.validate()
        .map_err(|e| LearningError::Inconsistent(e.to_string()))?;
    Ok(set)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::learning::classifier::{ModelTrainer, NaiveBayesTrainer};
    use crate::learning::dataset::TrainingSet;

    /// A small, valid artifact set for tests across the learning module.
    pub(crate) fn sample_set(version: u64) -> ModelArtifactSet {
        let data = TrainingSet::from_reader(
            "Coding,Drawing,Course\n1,0,BCA\n0,1,BFA\n1,0,BCA\n0,1,BFA\n1,1,B.Arch\n".as_bytes(),
        )
        .unwrap();
        let model = NaiveBayesTrainer::default().train(&data).unwrap();
        ModelArtifactSet::from_trained(version, model)
    }

    #[test]
    fn test_open_empty_dir_has_no_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).unwrap();
        assert!(matches!(store.current(), Err(EngineError::ArtifactCorruption(_))));
        assert_eq!(store.next_version(), 1);
    }

    #[test]
    fn test_replace_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).unwrap();
        store.replace(sample_set(1)).unwrap();
        assert_eq!(store.version(), Some(1));
        assert!(dir.path().join(BUNDLE_FILE).exists());

        let reopened = ArtifactStore::open(dir.path()).unwrap();
        let live = store.current().unwrap();
        let loaded = reopened.current().unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.label_encoder, live.label_encoder);
        assert_eq!(loaded.selector, live.selector);
        assert_eq!(loaded.feature_columns, live.feature_columns);
    }

    #[test]
    fn test_inconsistent_set_rejected_and_previous_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).unwrap();
        store.replace(sample_set(1)).unwrap();

        let mut broken = sample_set(2);
        broken.feature_columns.push("Extra".to_string());
        assert!(store.replace(broken).is_err());
        assert_eq!(store.version(), Some(1));
        assert_eq!(ArtifactStore::open(dir.path()).unwrap().version(), Some(1));
    }

    #[test]
    fn test_corrupt_bundle_fails_prediction_lookup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BUNDLE_FILE), b"{not json").unwrap();
        let store = ArtifactStore::open(dir.path()).unwrap();
        match store.current() {
            Err(EngineError::ArtifactCorruption(msg)) => assert!(msg.contains("Serialization")),
            other => panic!("expected corruption, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_catches_label_mismatch() {
        let mut set = sample_set(1);
        set.label_encoder.classes.pop();
        assert!(set.validate().is_err());
    }
}
