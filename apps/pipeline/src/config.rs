use diagnosis_evaluation::{InterpretationPolicy, ModelMetadata};
use diagnosis_storage::{StorageError, StorageProvider, StorageTarget};
use std::env;
use std::path::PathBuf;

/// Everything a run needs, resolved once at startup and passed to each stage.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub results_dir: PathBuf,
    pub metadata: ModelMetadata,
    pub storage: StorageTarget,
    /// JSON file overriding the default interpretation tiers
    pub policy_path: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&|key: &str| env::var(key).ok())
    }

    pub fn from_vars<F: Fn(&str) -> Option<String>>(vars: &F) -> Result<Self, ConfigError> {
        let value = |key: &str| vars(key).filter(|v| !v.trim().is_empty());
        let defaults = ModelMetadata::default();

        Ok(PipelineConfig {
            results_dir: value("RESULTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("results")),
            metadata: ModelMetadata {
                model_type: value("MODEL_TYPE").unwrap_or(defaults.model_type),
                feature_count: match value("FEATURE_COUNT") {
                    Some(raw) => raw
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("FEATURE_COUNT".to_string()))?,
                    None => defaults.feature_count,
                },
            },
            storage: StorageTarget::from_vars(vars).map_err(ConfigError::Storage)?,
            policy_path: value("INTERPRETATION_POLICY").map(PathBuf::from),
        })
    }

    /// Re-resolves the storage target for an explicitly chosen provider.
    pub fn with_provider<F: Fn(&str) -> Option<String>>(
        mut self,
        provider: StorageProvider,
        vars: &F,
    ) -> Result<Self, ConfigError> {
        if provider != self.storage.provider() {
            self.storage =
                StorageTarget::from_vars_with_provider(provider, vars).map_err(ConfigError::Storage)?;
        }
        Ok(self)
    }

    pub fn load_policy(&self) -> Result<InterpretationPolicy, ConfigError> {
        let Some(path) = &self.policy_path else {
            return Ok(InterpretationPolicy::default());
        };
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Policy(format!("{}: {e}", path.display())))?;
        InterpretationPolicy::from_json(&raw)
            .map_err(|e| ConfigError::Policy(format!("{}: {e}", path.display())))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
    Storage(StorageError),
    Policy(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
            ConfigError::Storage(e) => write!(f, "{}", e),
            ConfigError::Policy(msg) => write!(f, "Invalid interpretation policy {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_vars(&vars(&[])).unwrap();
        assert_eq!(config.results_dir, PathBuf::from("results"));
        assert_eq!(config.metadata.model_type, "LogisticRegression");
        assert_eq!(config.metadata.feature_count, 30);
        assert_eq!(config.storage.provider(), StorageProvider::Local);
        assert!(config.policy_path.is_none());
        assert_eq!(config.load_policy().unwrap(), InterpretationPolicy::default());
    }

    #[test]
    fn test_invalid_feature_count() {
        let err = PipelineConfig::from_vars(&vars(&[("FEATURE_COUNT", "thirty")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for: FEATURE_COUNT");
    }

    #[test]
    fn test_storage_errors_surface() {
        let err = PipelineConfig::from_vars(&vars(&[("STORAGE_TYPE", "gcs")])).unwrap_err();
        assert!(matches!(err, ConfigError::Storage(StorageError::FatalConfig(_))));
    }

    #[test]
    fn test_with_provider_switches_target() {
        let source = vars(&[("S3_BUCKET_NAME", "bucket")]);
        let config = PipelineConfig::from_vars(&source)
            .unwrap()
            .with_provider(StorageProvider::S3, &source)
            .unwrap();
        assert_eq!(config.storage.provider(), StorageProvider::S3);
    }

    #[test]
    fn test_policy_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(
            &path,
            r#"{"rules":[{"metric":"recall","tiers":[{"min":0.5,"tag":"Usable recall"}]}]}"#,
        )
        .unwrap();

        let config = PipelineConfig::from_vars(&vars(&[(
            "INTERPRETATION_POLICY",
            path.to_str().unwrap(),
        )]))
        .unwrap();
        let policy = config.load_policy().unwrap();
        assert_eq!(policy.rules.len(), 1);
    }
}
