//! Per-class breakdown in the familiar `classification_report` layout

use super::confusion_matrix::{ConfusionMatrix, harmonic_mean, ratio};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    pub support: u64,
}

/// Class `0` is benign, class `1` is malignant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassificationReport {
    #[serde(rename = "0")]
    pub benign: ClassMetrics,
    #[serde(rename = "1")]
    pub malignant: ClassMetrics,
    pub accuracy: f64,
    #[serde(rename = "macro avg")]
    pub macro_avg: ClassMetrics,
    #[serde(rename = "weighted avg")]
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let benign_precision = cm.negative_predictive_value();
        let benign_recall = cm.specificity();
        let benign = ClassMetrics {
            precision: benign_precision,
            recall: benign_recall,
            f1_score: harmonic_mean(benign_precision, benign_recall),
            support: cm.actual_negatives(),
        };
        let malignant = ClassMetrics {
            precision: cm.precision(),
            recall: cm.recall(),
            f1_score: cm.f1_score(),
            support: cm.actual_positives(),
        };

        let total = cm.total();
        let macro_avg = ClassMetrics {
            precision: (benign.precision + malignant.precision) / 2.0,
            recall: (benign.recall + malignant.recall) / 2.0,
            f1_score: (benign.f1_score + malignant.f1_score) / 2.0,
            support: total,
        };

        let weighted = |a: f64, b: f64| {
            if total == 0 {
                0.0
            } else {
                (a * benign.support as f64 + b * malignant.support as f64) / total as f64
            }
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(benign.precision, malignant.precision),
            recall: weighted(benign.recall, malignant.recall),
            f1_score: weighted(benign.f1_score, malignant.f1_score),
            support: total,
        };

        Self {
            benign,
            malignant,
            accuracy: ratio(cm.true_positives + cm.true_negatives, total),
            macro_avg,
            weighted_avg,
        }
    }
}
