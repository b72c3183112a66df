//! Uploads pipeline artifacts to one configured storage target.

pub mod artifact;
pub mod backend;
pub mod config;
pub mod error;
pub mod summary;

pub use artifact::{Artifact, ArtifactSet, SUMMARY_FILE};
pub use backend::{DropboxBackend, LocalBackend, ObjectStoreBackend, RemoteClient, StorageBackend};
pub use config::{DropboxConfig, GcsConfig, LocalConfig, S3Config, StorageProvider, StorageTarget};
pub use error::{StorageError, StorageResult};
pub use summary::{UploadOutcome, UploadSummary};

pub use object_store;
