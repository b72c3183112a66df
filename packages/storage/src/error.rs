use std::path::PathBuf;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Credentials or target cannot be resolved; raised before any artifact
    /// is attempted.
    #[error("Invalid storage configuration: {0}")]
    FatalConfig(String),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single remote call failed. Collected into the upload summary.
    #[error("Transient upload failure: {0}")]
    Transient(String),

    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_fatal(&self) -> bool {
        !matches!(self, StorageError::Transient(_))
    }
}
