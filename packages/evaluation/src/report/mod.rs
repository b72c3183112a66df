//! Rendering of evaluation results
//!
//! [`ReportGenerator::render`] has no side effects. The caller decides where
//! the rendered artifacts go, usually through [`RenderedReport::write_to`].

mod document;
mod interpretation;
mod narrative;

pub use document::{EvaluationDocument, ModelMetadata};
pub use interpretation::{InterpretationPolicy, Metric, MetricRule, Tier};
pub use narrative::Narrative;

use crate::error::{EvalError, EvalResult};
use std::path::{Path, PathBuf};

pub const METRICS_FILE: &str = "model_metrics.json";
pub const REPORT_FILE: &str = "evaluation_report.txt";

/// Structured and narrative renditions of the same evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    /// Pretty-printed [`EvaluationDocument`].
    pub structured: String,
    pub narrative: String,
}

impl RenderedReport {
    /// Writes both renditions into `dir`, returning `(metrics_path, report_path)`.
    pub fn write_to(&self, dir: &Path) -> EvalResult<(PathBuf, PathBuf)> {
        std::fs::create_dir_all(dir).map_err(|e| EvalError::io(dir, e))?;

        let metrics_path = dir.join(METRICS_FILE);
        std::fs::write(&metrics_path, &self.structured)
            .map_err(|e| EvalError::io(&metrics_path, e))?;

        let report_path = dir.join(REPORT_FILE);
        std::fs::write(&report_path, &self.narrative)
            .map_err(|e| EvalError::io(&report_path, e))?;

        tracing::info!(
            metrics = %metrics_path.display(),
            report = %report_path.display(),
            "Evaluation report written"
        );
        Ok((metrics_path, report_path))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportGenerator {
    policy: InterpretationPolicy,
}

impl ReportGenerator {
    pub fn new(policy: InterpretationPolicy) -> Self {
        Self { policy }
    }

    pub fn render(&self, document: &EvaluationDocument) -> EvalResult<RenderedReport> {
        let interpretation = self.policy.interpret(&document.metrics);
        let narrative = Narrative {
            document,
            interpretation: &interpretation,
        }
        .to_string();

        Ok(RenderedReport {
            structured: document.to_json()?,
            narrative,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{ConfusionMatrix, MetricsReport};

    fn reference_document() -> EvaluationDocument {
        let metrics =
            MetricsReport::from_confusion(ConfusionMatrix::from_counts(71, 1, 3, 30), Some(0.9954));
        EvaluationDocument::new(&ModelMetadata::default(), metrics)
    }

    #[test]
    fn test_narrative_layout() {
        let rendered = ReportGenerator::default()
            .render(&reference_document())
            .unwrap();
        let text = rendered.narrative;

        assert!(text.starts_with("=== BREAST CANCER MODEL EVALUATION REPORT ===\n\n"));
        assert!(text.contains("Model Type: LogisticRegression\n"));
        assert!(text.contains("Test Set Size: 105\n"));
        assert!(text.contains("Feature Count: 30\n"));
        assert!(text.contains("Accuracy:     0.9619\n"));
        assert!(text.contains("Precision:    0.9677\n"));
        assert!(text.contains("Recall:       0.9091\n"));
        assert!(text.contains("F1-Score:     0.9375\n"));
        assert!(text.contains("Specificity:  0.9861\n"));
        assert!(text.contains("ROC AUC:      0.9954\n"));
        assert!(text.contains("True Negatives:  71\n"));
        assert!(text.contains("False Positives: 1\n"));
        assert!(text.contains("False Negatives: 3\n"));
        assert!(text.contains("True Positives:  30\n"));
        assert!(text.contains("Positive Samples: 33\n"));
        assert!(text.contains("Negative Samples: 72\n"));
        assert!(text.ends_with(
            "=== INTERPRETATION ===\n\
             + Excellent accuracy achieved\n\
             + Good recall\n\
             + Excellent precision (low false positives)\n"
        ));

        let sections = [
            "=== PERFORMANCE METRICS ===",
            "=== CONFUSION MATRIX ===",
            "=== SAMPLE DISTRIBUTION ===",
            "=== INTERPRETATION ===",
        ];
        let offsets: Vec<usize> = sections.iter().map(|s| text.find(s).unwrap()).collect();
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_narrative_without_roc_auc() {
        let metrics = MetricsReport::from_confusion(ConfusionMatrix::from_counts(4, 0, 0, 0), None);
        let document = EvaluationDocument::new(&ModelMetadata::default(), metrics);
        let rendered = ReportGenerator::default().render(&document).unwrap();
        assert!(!rendered.narrative.contains("ROC AUC"));
    }

    #[test]
    fn test_structured_round_trip() {
        let document = reference_document();
        let rendered = ReportGenerator::default().render(&document).unwrap();
        let parsed = EvaluationDocument::from_json(&rendered.structured).unwrap();
        assert_eq!(parsed, document);
    }

    #[test]
    fn test_write_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let rendered = ReportGenerator::default()
            .render(&reference_document())
            .unwrap();

        let (metrics_path, report_path) = rendered.write_to(&dir.path().join("results")).unwrap();
        assert_eq!(
            EvaluationDocument::read(&metrics_path).unwrap(),
            reference_document()
        );
        assert_eq!(std::fs::read_to_string(report_path).unwrap(), rendered.narrative);
    }

    #[test]
    fn test_schema_lists_stable_fields() {
        let schema = EvaluationDocument::json_schema().unwrap();
        let text = schema.to_string();
        for field in ["model_type", "test_set_size", "feature_count", "confusion_matrix"] {
            assert!(text.contains(field), "schema is missing {field}");
        }
    }
}
