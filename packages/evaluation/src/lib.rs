//! Diagnosis Evaluation - metrics and reports for the binary diagnosis classifier
//!
//! The evaluation stage turns held-out predictions into a metrics document and a
//! human readable report:
//!
//! | Step | Module | Output |
//! |------|--------|--------|
//! | Validate | [`prediction`] | [`PredictionSet`] |
//! | Compute | [`metrics`] | [`MetricsReport`], [`RocCurve`] |
//! | Render | [`report`] | `model_metrics.json`, `evaluation_report.txt` |

mod error;

pub mod metrics;
pub mod prediction;
pub mod report;

pub use error::{EvalError, EvalResult};
pub use metrics::{
    ClassMetrics, ClassificationReport, ConfusionMatrix, MetricsReport, RocCurve, RocPoint,
    SampleSupport, compute_metrics, roc_auc, roc_curve,
};
pub use prediction::{PredictionFile, PredictionSet};
pub use report::{
    EvaluationDocument, InterpretationPolicy, METRICS_FILE, Metric, MetricRule, ModelMetadata,
    REPORT_FILE, RenderedReport, ReportGenerator, Tier,
};
