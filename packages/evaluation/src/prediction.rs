//! Held-out predictions consumed by the metrics engine

use crate::error::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raw predictions as persisted by the training stage.
///
/// Labels are kept as plain integers here so that out-of-range values can be
/// reported instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionFile {
    pub y_true: Vec<i64>,
    pub y_pred: Vec<i64>,
    pub y_prob: Vec<f64>,
}

impl PredictionFile {
    pub fn read(path: &Path) -> EvalResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
        let file = serde_json::from_str(&raw)?;
        Ok(file)
    }
}

/// Validated, immutable set of parallel true labels, predicted labels and
/// positive-class probabilities.
///
/// Construction enforces `len >= 1`, equal lengths, labels in `{0, 1}` and
/// probabilities in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSet {
    y_true: Vec<u8>,
    y_pred: Vec<u8>,
    y_prob: Vec<f64>,
}

impl PredictionSet {
    pub fn try_new(y_true: Vec<i64>, y_pred: Vec<i64>, y_prob: Vec<f64>) -> EvalResult<Self> {
        if y_true.is_empty() {
            return Err(EvalError::invalid("prediction set is empty"));
        }
        if y_pred.len() != y_true.len() || y_prob.len() != y_true.len() {
            return Err(EvalError::invalid(format!(
                "length mismatch: y_true={}, y_pred={}, y_prob={}",
                y_true.len(),
                y_pred.len(),
                y_prob.len()
            )));
        }

        let y_true = binary_labels("y_true", &y_true)?;
        let y_pred = binary_labels("y_pred", &y_pred)?;

        if let Some((idx, p)) = y_prob
            .iter()
            .enumerate()
            .find(|(_, p)| !(0.0..=1.0).contains(*p))
        {
            return Err(EvalError::invalid(format!(
                "y_prob[{idx}] = {p} is outside [0, 1]"
            )));
        }

        Ok(Self {
            y_true,
            y_pred,
            y_prob,
        })
    }

    pub fn len(&self) -> usize {
        self.y_true.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y_true.is_empty()
    }

    pub fn y_true(&self) -> &[u8] {
        &self.y_true
    }

    pub fn y_pred(&self) -> &[u8] {
        &self.y_pred
    }

    pub fn y_prob(&self) -> &[f64] {
        &self.y_prob
    }

    /// Number of samples whose true label is positive (malignant).
    pub fn positives(&self) -> usize {
        self.y_true.iter().filter(|&&label| label == 1).count()
    }

    pub fn negatives(&self) -> usize {
        self.len() - self.positives()
    }
}

impl TryFrom<PredictionFile> for PredictionSet {
    type Error = EvalError;

    fn try_from(file: PredictionFile) -> EvalResult<Self> {
        Self::try_new(file.y_true, file.y_pred, file.y_prob)
    }
}

fn binary_labels(field: &str, values: &[i64]) -> EvalResult<Vec<u8>> {
    values
        .iter()
        .enumerate()
        .map(|(idx, &value)| match value {
            0 => Ok(0),
            1 => Ok(1),
            other => Err(EvalError::invalid(format!(
                "{field}[{idx}] = {other} is not a binary label"
            ))),
        })
        .collect()
}
