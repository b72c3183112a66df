use crate::config::StorageProvider;
use crate::error::{StorageError, StorageResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of uploading one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadOutcome {
    pub fn uploaded(name: impl Into<String>, remote_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: true,
            remote_ref: Some(remote_ref.into()),
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: false,
            remote_ref: None,
            error: Some(error.into()),
        }
    }
}

/// Per-artifact outcomes of one upload, in upload order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSummary {
    pub storage_type: StorageProvider,
    pub total_files: usize,
    pub successful_uploads: usize,
    pub failed_uploads: usize,
    pub files: Vec<UploadOutcome>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl UploadSummary {
    pub fn new(storage_type: StorageProvider) -> Self {
        Self {
            storage_type,
            total_files: 0,
            successful_uploads: 0,
            failed_uploads: 0,
            files: Vec::new(),
            completed_at: None,
        }
    }

    pub fn record(&mut self, outcome: UploadOutcome) {
        if outcome.success {
            self.successful_uploads += 1;
        } else {
            self.failed_uploads += 1;
        }
        self.total_files += 1;
        self.files.push(outcome);
    }

    pub fn finish(mut self) -> Self {
        self.completed_at = Some(Utc::now());
        self
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_uploads == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &UploadOutcome> {
        self.files.iter().filter(|outcome| !outcome.success)
    }

    pub fn write(&self, path: &Path) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| StorageError::io(path, e))
    }

    pub fn read(path: &Path) -> StorageResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }
}
