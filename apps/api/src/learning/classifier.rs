//! Course classifier: label encoding, Bernoulli naive Bayes and top-k feature
//! selection, plus the `ModelTrainer` seam the retrainer drives.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::learning::dataset::{train_test_split, TrainingSet};
use crate::learning::LearningError;

// ────────────────────────────────────────────────────────────────────────────
// Label encoding
// ────────────────────────────────────────────────────────────────────────────

/// Maps labels to dense class indices in sorted label order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit(labels: &[String]) -> Self {
        let mut classes: Vec<String> = labels.to_vec();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Bernoulli naive Bayes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayes {
    /// log P(class), Laplace-smoothed so classes absent from training keep a
    /// finite prior.
    pub class_log_prior: Vec<f64>,
    /// P(feature = 1 | class), one row per class.
    pub feature_prob: Vec<Vec<f64>>,
}

impl NaiveBayes {
    pub fn fit(
        rows: &[Vec<u8>],
        targets: &[usize],
        n_classes: usize,
        alpha: f64,
    ) -> Result<Self, LearningError> {
        let n_features = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || n_classes == 0 {
            return Err(LearningError::Training("no training rows".to_string()));
        }
        if rows.len() != targets.len() {
            return Err(LearningError::Training("row/label count mismatch".to_string()));
        }

        let mut class_count = vec![0.0; n_classes];
        let mut feature_count = vec![vec![0.0; n_features]; n_classes];
        for (row, &class) in rows.iter().zip(targets) {
            if row.len() != n_features || class >= n_classes {
                return Err(LearningError::Training("ragged training matrix".to_string()));
            }
            class_count[class] += 1.0;
            for (count, &value) in feature_count[class].iter_mut().zip(row) {
                *count += f64::from(value);
            }
        }

        let total = rows.len() as f64;
        let class_log_prior = class_count
            .iter()
            .map(|&c| ((c + alpha) / (total + alpha * n_classes as f64)).ln())
            .collect();
        let feature_prob = feature_count
            .iter()
            .zip(&class_count)
            .map(|(counts, &c)| counts.iter().map(|&f| (f + alpha) / (c + 2.0 * alpha)).collect())
            .collect();

        Ok(Self {
            class_log_prior,
            feature_prob,
        })
    }

    pub fn n_classes(&self) -> usize {
        self.class_log_prior.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_prob.first().map(Vec::len).unwrap_or(0)
    }

    /// Posterior probability per class. `row` must have `n_features` entries.
    pub fn predict_proba(&self, row: &[u8]) -> Vec<f64> {
        let joint: Vec<f64> = self
            .class_log_prior
            .iter()
            .zip(&self.feature_prob)
            .map(|(prior, probs)| {
                prior
                    + probs
                        .iter()
                        .zip(row)
                        .map(|(&p, &x)| if x != 0 { p.ln() } else { (1.0 - p).ln() })
                        .sum::<f64>()
            })
            .collect();

        let max = joint.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = joint.iter().map(|j| (j - max).exp()).collect();
        let norm: f64 = exp.iter().sum();
        exp.into_iter().map(|e| e / norm).collect()
    }

    pub fn predict(&self, row: &[u8]) -> usize {
        let proba = self.predict_proba(row);
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        best
    }

    /// How strongly each feature separates the classes: prior-weighted mean
    /// absolute deviation of P(feature | class) from its overall mean.
    pub fn feature_importances(&self) -> Vec<f64> {
        let priors: Vec<f64> = self.class_log_prior.iter().map(|l| l.exp()).collect();
        (0..self.n_features())
            .map(|j| {
                let mean: f64 = priors.iter().zip(&self.feature_prob).map(|(w, p)| w * p[j]).sum();
                priors
                    .iter()
                    .zip(&self.feature_prob)
                    .map(|(w, p)| w * (p[j] - mean).abs())
                    .sum()
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Feature selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSelector {
    pub input_width: usize,
    /// Selected input column indices, ascending.
    pub selected: Vec<usize>,
}

impl FeatureSelector {
    /// Keeps the `k` most important columns. Ties go to the lower column index.
    pub fn top_k(importances: &[f64], k: usize) -> Self {
        let mut ranked: Vec<usize> = (0..importances.len()).collect();
        ranked.sort_by(|&a, &b| importances[b].total_cmp(&importances[a]).then(a.cmp(&b)));
        ranked.truncate(k);
        ranked.sort_unstable();
        Self {
            input_width: importances.len(),
            selected: ranked,
        }
    }

    pub fn transform(&self, row: &[u8]) -> Option<Vec<u8>> {
        if row.len() != self.input_width {
            return None;
        }
        self.selected.iter().map(|&i| row.get(i).copied()).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Training
// ────────────────────────────────────────────────────────────────────────────

/// Everything one successful training run produces.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub classifier: NaiveBayes,
    pub selector: FeatureSelector,
    pub label_encoder: LabelEncoder,
    pub feature_columns: Vec<String>,
    /// Hold-out accuracy; `None` when the split left no test rows.
    pub accuracy: Option<f64>,
}

/// Fits a model on a complete training set. Runs on a blocking thread.
pub trait ModelTrainer: Send + Sync {
    fn train(&self, data: &TrainingSet) -> Result<TrainedModel, LearningError>;
}

#[derive(Debug, Clone)]
pub struct NaiveBayesTrainer {
    pub max_features: usize,
    pub test_fraction: f64,
    pub seed: u64,
    pub alpha: f64,
}

impl Default for NaiveBayesTrainer {
    fn default() -> Self {
        Self {
            max_features: 30,
            test_fraction: 0.2,
            seed: 42,
            alpha: 1.0,
        }
    }
}

impl ModelTrainer for NaiveBayesTrainer {
    /// 1. encode labels  2. split  3. fit on all columns  4. select top-k
    /// 5. refit on the selected columns  6. score on the hold-out rows
    fn train(&self, data: &TrainingSet) -> Result<TrainedModel, LearningError> {
        if data.is_empty() {
            return Err(LearningError::Training("training set is empty".to_string()));
        }

        let label_encoder = LabelEncoder::fit(&data.labels);
        let targets = data
            .labels
            .iter()
            .map(|l| label_encoder.encode(l))
            .collect::<Option<Vec<usize>>>()
            .ok_or_else(|| LearningError::Training("label encoding failed".to_string()))?;

        let (train_idx, test_idx) = train_test_split(data.len(), self.test_fraction, self.seed);
        let pick_rows = |idx: &[usize]| idx.iter().map(|&i| data.rows[i].clone()).collect::<Vec<_>>();
        let pick_targets = |idx: &[usize]| idx.iter().map(|&i| targets[i]).collect::<Vec<_>>();

        let train_rows = pick_rows(&train_idx);
        let train_targets = pick_targets(&train_idx);

        let full = NaiveBayes::fit(&train_rows, &train_targets, label_encoder.len(), self.alpha)?;
        let selector = FeatureSelector::top_k(&full.feature_importances(), self.max_features);

        let select = |rows: Vec<Vec<u8>>| -> Result<Vec<Vec<u8>>, LearningError> {
            rows.iter()
                .map(|r| selector.transform(r))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| LearningError::Training("feature width mismatch".to_string()))
        };

        let classifier = NaiveBayes::fit(
            &select(train_rows)?,
            &train_targets,
            label_encoder.len(),
            self.alpha,
        )?;

        let accuracy = if test_idx.is_empty() {
            None
        } else {
            let test_rows = select(pick_rows(&test_idx))?;
            let correct = test_rows
                .iter()
                .zip(pick_targets(&test_idx))
                .filter(|(row, target)| classifier.predict(row) == *target)
                .count();
            Some(correct as f64 / test_idx.len() as f64)
        };

        info!(
            "Trained classifier on {} rows ({} classes, {} of {} features){}",
            train_idx.len(),
            label_encoder.len(),
            selector.selected.len(),
            data.columns.len(),
            accuracy
                .map(|a| format!(", hold-out accuracy {:.2}%", a * 100.0))
                .unwrap_or_default()
        );

        Ok(TrainedModel {
            classifier,
            selector,
            label_encoder,
            feature_columns: data.columns.clone(),
            accuracy,
        })
    }
}
