//! Binary confusion matrix and the closed-form scores derived from it
//!
//! Ratios whose denominator is zero are reported as `0.0`. This mirrors the
//! usual zero-division convention and keeps every score inside `[0, 1]`.

use crate::prediction::PredictionSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 2x2 table of prediction outcomes. Serialized with the short `tn/fp/fn/tp`
/// keys used by the persisted metrics file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConfusionMatrix {
    #[serde(rename = "tn")]
    pub true_negatives: u64,
    #[serde(rename = "fp")]
    pub false_positives: u64,
    #[serde(rename = "fn")]
    pub false_negatives: u64,
    #[serde(rename = "tp")]
    pub true_positives: u64,
}

impl ConfusionMatrix {
    pub fn from_counts(tn: u64, fp: u64, fn_: u64, tp: u64) -> Self {
        Self {
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
            true_positives: tp,
        }
    }

    pub fn from_predictions(set: &PredictionSet) -> Self {
        let mut matrix = Self::default();
        for (&actual, &predicted) in set.y_true().iter().zip(set.y_pred()) {
            match (actual, predicted) {
                (0, 0) => matrix.true_negatives += 1,
                (0, _) => matrix.false_positives += 1,
                (_, 0) => matrix.false_negatives += 1,
                _ => matrix.true_positives += 1,
            }
        }
        matrix
    }

    pub fn total(&self) -> u64 {
        self.true_negatives + self.false_positives + self.false_negatives + self.true_positives
    }

    pub fn actual_positives(&self) -> u64 {
        self.true_positives + self.false_negatives
    }

    pub fn actual_negatives(&self) -> u64 {
        self.true_negatives + self.false_positives
    }

    /// Rows are actual (benign, malignant), columns are predicted.
    pub fn as_matrix(&self) -> [[u64; 2]; 2] {
        [
            [self.true_negatives, self.false_positives],
            [self.false_negatives, self.true_positives],
        ]
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    /// Sensitivity / true positive rate.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.actual_positives())
    }

    /// True negative rate.
    pub fn specificity(&self) -> f64 {
        ratio(self.true_negatives, self.actual_negatives())
    }

    pub fn f1_score(&self) -> f64 {
        harmonic_mean(self.precision(), self.recall())
    }

    /// Precision of the negative class: TN / (TN + FN).
    pub fn negative_predictive_value(&self) -> f64 {
        ratio(
            self.true_negatives,
            self.true_negatives + self.false_negatives,
        )
    }
}

pub(crate) fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

pub(crate) fn harmonic_mean(precision: f64, recall: f64) -> f64 {
    let sum = precision + recall;
    if sum > 0.0 {
        2.0 * precision * recall / sum
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-4;

    #[test]
    fn test_from_predictions_counts_every_cell() {
        let set = PredictionSet::try_new(
            vec![0, 0, 1, 1, 1, 0],
            vec![0, 1, 0, 1, 1, 0],
            vec![0.1, 0.7, 0.3, 0.8, 0.9, 0.2],
        )
        .unwrap();
        let cm = ConfusionMatrix::from_predictions(&set);

        assert_eq!(cm, ConfusionMatrix::from_counts(2, 1, 1, 2));
        assert_eq!(cm.total(), set.len() as u64);
        assert_eq!(cm.as_matrix(), [[2, 1], [1, 2]]);
    }

    #[test]
    fn test_reference_report_values() {
        let cm = ConfusionMatrix::from_counts(71, 1, 3, 30);

        assert_eq!(cm.total(), 105);
        assert!((cm.accuracy() - 101.0 / 105.0).abs() < 1e-12);
        assert!((cm.accuracy() - 0.9619).abs() < EPS);
        assert!((cm.precision() - 0.9677).abs() < EPS);
        assert!((cm.recall() - 0.9091).abs() < EPS);
        assert!((cm.specificity() - 0.9861).abs() < EPS);
        assert!((cm.f1_score() - 0.9375).abs() < EPS);
    }

    #[test]
    fn test_zero_denominators_yield_zero() {
        // No positive predictions and no actual positives
        let cm = ConfusionMatrix::from_counts(5, 0, 0, 0);
        assert_eq!(cm.precision(), 0.0);
        assert_eq!(cm.recall(), 0.0);
        assert_eq!(cm.f1_score(), 0.0);
        assert_eq!(cm.specificity(), 1.0);

        let cm = ConfusionMatrix::from_counts(0, 0, 0, 4);
        assert_eq!(cm.specificity(), 0.0);
        assert_eq!(cm.negative_predictive_value(), 0.0);
    }

    #[test]
    fn test_serialized_keys() {
        let cm = ConfusionMatrix::from_counts(1, 2, 3, 4);
        let value = serde_json::to_value(cm).unwrap();
        assert_eq!(value["tn"], 1);
        assert_eq!(value["fp"], 2);
        assert_eq!(value["fn"], 3);
        assert_eq!(value["tp"], 4);
    }
}
