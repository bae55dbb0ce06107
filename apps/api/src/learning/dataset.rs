use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::learning::feedback::SyntheticRow;
use crate::learning::LearningError;

/// Label column of the baseline dataset. Every other column is a binary feature.
pub const LABEL_COLUMN: &str = "Course";

/// Binary feature matrix with one string label per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<u8>>,
    pub labels: Vec<String>,
}

impl TrainingSet {
    pub fn load_csv(path: &Path) -> Result<Self, LearningError> {
        let file = std::fs::File::open(path)?;
        let set = Self::from_reader(file)?;
        debug!("Loaded {} baseline rows from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LearningError> {
        let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = csv.headers()?.clone();
        let label_idx = headers
            .iter()
            .position(|h| h == LABEL_COLUMN)
            .ok_or_else(|| LearningError::Dataset(format!("missing '{LABEL_COLUMN}' column")))?;
        let columns: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != label_idx)
            .map(|(_, h)| h.to_string())
            .collect();

        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for (line, record) in csv.records().enumerate() {
            let record = record?;
            let mut row = Vec::with_capacity(columns.len());
            for (i, field) in record.iter().enumerate() {
                if i == label_idx {
                    continue;
                }
                row.push(parse_flag(field).ok_or_else(|| {
                    LearningError::Dataset(format!("row {}: non-numeric feature '{field}'", line + 1))
                })?);
            }
            let label = record.get(label_idx).unwrap_or_default().to_string();
            if label.is_empty() {
                return Err(LearningError::Dataset(format!("row {}: empty label", line + 1)));
            }
            rows.push(row);
            labels.push(label);
        }

        Ok(Self { columns, rows, labels })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a synthetic row projected onto the existing columns: flags the
    /// baseline has no column for are dropped, the rest default to 0.
    pub fn push_synthetic(&mut self, synthetic: &SyntheticRow) {
        let flags: BTreeSet<&str> = synthetic.features.iter().map(String::as_str).collect();
        let row = self
            .columns
            .iter()
            .map(|c| u8::from(flags.contains(c.as_str())))
            .collect();
        self.rows.push(row);
        self.labels.push(synthetic.label.clone());
    }
}

fn parse_flag(field: &str) -> Option<u8> {
    let value: f64 = field.parse().ok()?;
    value.is_finite().then_some(u8::from(value != 0.0))
}

/// Shuffled train/test index split, reproducible for a given seed. The test
/// side gets `round(n × test_fraction)` rows, always leaving one for training.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_len = ((n as f64 * test_fraction).round() as usize).min(n.saturating_sub(1));
    let train = indices.split_off(test_len);
    (train, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Drawing,Coding,Course
1,0,B.Arch- Bachelor of Architecture
0,1,B.Tech.-Computer Science and Engineering
1,1,BCA- Bachelor of Computer Applications
";

    #[test]
    fn test_parses_columns_and_labels() {
        let set = TrainingSet::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(set.columns, vec!["Drawing", "Coding"]);
        assert_eq!(set.rows[1], vec![0, 1]);
        assert_eq!(set.labels[2], "BCA- Bachelor of Computer Applications");
    }

    #[test]
    fn test_missing_label_column_rejected() {
        let err = TrainingSet::from_reader("A,B\n1,0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LearningError::Dataset(_)));
    }

    #[test]
    fn test_non_numeric_feature_rejected() {
        let err = TrainingSet::from_reader("A,Course\nyes,BBA\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LearningError::Dataset(_)));
    }

    #[test]
    fn test_synthetic_rows_projected_onto_columns() {
        let mut set = TrainingSet::from_reader(SAMPLE.as_bytes()).unwrap();
        set.push_synthetic(&SyntheticRow {
            features: ["Coding".to_string(), "Science".to_string()].into_iter().collect(),
            label: "B.Sc Physics".to_string(),
        });
        assert_eq!(set.rows.last().unwrap(), &vec![0, 1]);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_split_is_deterministic_and_disjoint() {
        let (train_a, test_a) = train_test_split(50, 0.2, 42);
        let (train_b, test_b) = train_test_split(50, 0.2, 42);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(test_a.len(), 10);
        assert!(test_a.iter().all(|i| !train_a.contains(i)));
    }

    #[test]
    fn test_split_keeps_a_training_row() {
        let (train, test) = train_test_split(1, 0.9, 42);
        assert_eq!(train.len(), 1);
        assert!(test.is_empty());
    }
}
