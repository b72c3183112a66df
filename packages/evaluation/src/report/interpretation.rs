//! Threshold table turning scores into qualitative tags
//!
//! Each rule is evaluated on its own metric. The highest tier the score
//! reaches wins; a score below every tier produces no line.

use crate::metrics::MetricsReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Accuracy,
    Precision,
    Recall,
    F1Score,
    Specificity,
    RocAuc,
}

impl Metric {
    pub fn value(&self, report: &MetricsReport) -> Option<f64> {
        match self {
            Metric::Accuracy => Some(report.accuracy),
            Metric::Precision => Some(report.precision),
            Metric::Recall => Some(report.recall),
            Metric::F1Score => Some(report.f1_score),
            Metric::Specificity => Some(report.specificity),
            Metric::RocAuc => report.roc_auc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Inclusive lower bound.
    pub min: f64,
    pub tag: String,
}

impl Tier {
    pub fn new(min: f64, tag: impl Into<String>) -> Self {
        Self {
            min,
            tag: tag.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRule {
    pub metric: Metric,
    pub tiers: Vec<Tier>,
}

impl MetricRule {
    pub fn new(metric: Metric, tiers: Vec<Tier>) -> Self {
        Self { metric, tiers }
    }

    pub fn tag_for(&self, value: f64) -> Option<&str> {
        self.tiers
            .iter()
            .filter(|tier| value >= tier.min)
            .max_by(|a, b| a.min.total_cmp(&b.min))
            .map(|tier| tier.tag.as_str())
    }
}

/// Ordered list of rules. Lines are emitted in rule order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretationPolicy {
    pub rules: Vec<MetricRule>,
}

impl Default for InterpretationPolicy {
    fn default() -> Self {
        Self::empty()
            .with_rule(
                Metric::Accuracy,
                vec![
                    Tier::new(0.95, "Excellent accuracy achieved"),
                    Tier::new(0.90, "Good accuracy achieved"),
                ],
            )
            .with_rule(
                Metric::Recall,
                vec![
                    Tier::new(0.95, "Excellent recall"),
                    Tier::new(0.90, "Good recall"),
                ],
            )
            .with_rule(
                Metric::Precision,
                vec![
                    Tier::new(0.95, "Excellent precision (low false positives)"),
                    Tier::new(0.90, "Good precision"),
                ],
            )
    }
}

impl InterpretationPolicy {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, metric: Metric, tiers: Vec<Tier>) -> Self {
        self.rules.push(MetricRule::new(metric, tiers));
        self
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn interpret(&self, report: &MetricsReport) -> Vec<String> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let value = rule.metric.value(report)?;
                rule.tag_for(value).map(str::to_string)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ConfusionMatrix;

    fn report(tn: u64, fp: u64, fn_: u64, tp: u64) -> MetricsReport {
        MetricsReport::from_confusion(ConfusionMatrix::from_counts(tn, fp, fn_, tp), Some(0.99))
    }

    #[test]
    fn test_reference_report_tags() {
        let tags = InterpretationPolicy::default().interpret(&report(71, 1, 3, 30));
        assert_eq!(
            tags,
            vec![
                "Excellent accuracy achieved",
                "Good recall",
                "Excellent precision (low false positives)",
            ]
        );
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let rule = MetricRule::new(
            Metric::Accuracy,
            vec![Tier::new(0.90, "good"), Tier::new(0.95, "excellent")],
        );
        assert_eq!(rule.tag_for(0.95), Some("excellent"));
        assert_eq!(rule.tag_for(0.9499), Some("good"));
        assert_eq!(rule.tag_for(0.90), Some("good"));
        assert_eq!(rule.tag_for(0.8999), None);
    }

    #[test]
    fn test_no_qualifying_tier_emits_nothing() {
        // accuracy 0.5, recall 0.5, precision 0.5
        let tags = InterpretationPolicy::default().interpret(&report(5, 5, 5, 5));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_custom_policy_from_json() {
        let policy = InterpretationPolicy::from_json(
            r#"{"rules": [{"metric": "roc_auc", "tiers": [{"min": 0.98, "tag": "Outstanding discrimination"}]}]}"#,
        )
        .unwrap();
        assert_eq!(
            policy.interpret(&report(71, 1, 3, 30)),
            vec!["Outstanding discrimination"]
        );

        let undefined_auc = MetricsReport::from_confusion(ConfusionMatrix::from_counts(3, 0, 0, 0), None);
        assert!(policy.interpret(&undefined_auc).is_empty());
    }
}
