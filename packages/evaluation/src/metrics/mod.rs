//! Classification metrics for the binary diagnosis model
//!
//! - **confusion_matrix**: TN/FP/FN/TP counts and the closed-form scores
//! - **roc**: ROC curve and rank-based ROC-AUC
//! - **classification**: per-class precision, recall and F1 with averages

pub mod classification;
pub mod confusion_matrix;
pub mod roc;

pub use classification::{ClassMetrics, ClassificationReport};
pub use confusion_matrix::ConfusionMatrix;
pub use roc::{RocCurve, RocPoint, roc_auc, roc_curve};

use crate::prediction::PredictionSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SampleSupport {
    pub total_samples: u64,
    pub positive_samples: u64,
    pub negative_samples: u64,
}

/// Every score of one evaluation run. All scores lie in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricsReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub specificity: f64,
    /// Absent when the held-out set contains a single class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roc_auc: Option<f64>,
    pub support: SampleSupport,
    pub confusion_matrix: ConfusionMatrix,
    pub classification_report: ClassificationReport,
}

impl MetricsReport {
    /// Derives every label-based score from a confusion matrix. ROC-AUC needs
    /// the probabilities and is left to the caller.
    pub fn from_confusion(cm: ConfusionMatrix, roc_auc: Option<f64>) -> Self {
        Self {
            accuracy: cm.accuracy(),
            precision: cm.precision(),
            recall: cm.recall(),
            f1_score: cm.f1_score(),
            specificity: cm.specificity(),
            roc_auc,
            support: SampleSupport {
                total_samples: cm.total(),
                positive_samples: cm.actual_positives(),
                negative_samples: cm.actual_negatives(),
            },
            confusion_matrix: cm,
            classification_report: ClassificationReport::from_confusion(&cm),
        }
    }
}

/// Computes the full metrics report for a validated prediction set.
///
/// Pure and deterministic. Invalid input never reaches this point because
/// [`PredictionSet::try_new`] rejects it.
pub fn compute_metrics(set: &PredictionSet) -> MetricsReport {
    let cm = ConfusionMatrix::from_predictions(set);
    let auc = roc_auc(set);
    if auc.is_none() {
        tracing::warn!(
            samples = set.len(),
            "ROC AUC is undefined for a single-class prediction set"
        );
    }

    let report = MetricsReport::from_confusion(cm, auc);
    tracing::info!(
        accuracy = %format!("{:.4}", report.accuracy),
        f1_score = %format!("{:.4}", report.f1_score),
        "Metrics calculated"
    );
    report
}
