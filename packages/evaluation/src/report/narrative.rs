use super::document::EvaluationDocument;
use std::fmt;

/// Fixed-template text report. Section order: title, performance metrics,
/// confusion matrix, sample distribution, interpretation.
pub struct Narrative<'a> {
    pub document: &'a EvaluationDocument,
    pub interpretation: &'a [String],
}

impl fmt::Display for Narrative<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.document;
        let metrics = &doc.metrics;

        writeln!(f, "=== BREAST CANCER MODEL EVALUATION REPORT ===")?;
        writeln!(f)?;
        writeln!(f, "Model Type: {}", doc.model_type)?;
        writeln!(f, "Test Set Size: {}", doc.test_set_size)?;
        writeln!(f, "Feature Count: {}", doc.feature_count)?;
        writeln!(f)?;

        writeln!(f, "=== PERFORMANCE METRICS ===")?;
        writeln!(f, "Accuracy:     {:.4}", metrics.accuracy)?;
        writeln!(f, "Precision:    {:.4}", metrics.precision)?;
        writeln!(f, "Recall:       {:.4}", metrics.recall)?;
        writeln!(f, "F1-Score:     {:.4}", metrics.f1_score)?;
        writeln!(f, "Specificity:  {:.4}", metrics.specificity)?;
        if let Some(auc) = metrics.roc_auc {
            writeln!(f, "ROC AUC:      {auc:.4}")?;
        }
        writeln!(f)?;

        let cm = &metrics.confusion_matrix;
        writeln!(f, "=== CONFUSION MATRIX ===")?;
        writeln!(f, "True Negatives:  {}", cm.true_negatives)?;
        writeln!(f, "False Positives: {}", cm.false_positives)?;
        writeln!(f, "False Negatives: {}", cm.false_negatives)?;
        writeln!(f, "True Positives:  {}", cm.true_positives)?;
        writeln!(f)?;

        let support = &metrics.support;
        writeln!(f, "=== SAMPLE DISTRIBUTION ===")?;
        writeln!(f, "Total Samples:    {}", support.total_samples)?;
        writeln!(f, "Positive Samples: {}", support.positive_samples)?;
        writeln!(f, "Negative Samples: {}", support.negative_samples)?;
        writeln!(f)?;

        writeln!(f, "=== INTERPRETATION ===")?;
        for line in self.interpretation {
            writeln!(f, "+ {line}")?;
        }
        Ok(())
    }
}
