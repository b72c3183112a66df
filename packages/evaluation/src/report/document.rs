use crate::error::{EvalError, EvalResult};
use crate::metrics::MetricsReport;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Describes the model that produced the predictions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModelMetadata {
    pub model_type: String,
    pub feature_count: usize,
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            model_type: "LogisticRegression".to_string(),
            feature_count: 30,
        }
    }
}

/// Structured evaluation document persisted as `model_metrics.json`.
///
/// Field names are stable; downstream tooling reads them directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationDocument {
    pub model_type: String,
    pub test_set_size: u64,
    pub feature_count: usize,
    pub metrics: MetricsReport,
}

impl EvaluationDocument {
    pub fn new(metadata: &ModelMetadata, metrics: MetricsReport) -> Self {
        Self {
            model_type: metadata.model_type.clone(),
            test_set_size: metrics.support.total_samples,
            feature_count: metadata.feature_count,
            metrics,
        }
    }

    pub fn to_json(&self) -> EvalResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> EvalResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn read(path: &Path) -> EvalResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
        Self::from_json(&raw)
    }

    /// JSON schema of the persisted document.
    pub fn json_schema() -> EvalResult<serde_json::Value> {
        Ok(serde_json::to_value(schemars::schema_for!(
            EvaluationDocument
        ))?)
    }
}
