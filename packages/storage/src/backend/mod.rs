//! Closed set of upload targets behind one `upload` operation

mod dropbox;
mod local;
mod object;
mod remote;

pub use dropbox::DropboxBackend;
pub use local::LocalBackend;
pub use object::ObjectStoreBackend;
pub use remote::{RemoteClient, upload_all};

use crate::artifact::ArtifactSet;
use crate::config::StorageProvider;
use crate::error::StorageResult;
use crate::summary::UploadSummary;

#[derive(Debug, Clone)]
pub enum StorageBackend {
    Local(LocalBackend),
    Dropbox(DropboxBackend),
    Gcs(ObjectStoreBackend),
    S3(ObjectStoreBackend),
}

impl StorageBackend {
    pub fn provider(&self) -> StorageProvider {
        match self {
            StorageBackend::Local(_) => StorageProvider::Local,
            StorageBackend::Dropbox(_) => StorageProvider::Dropbox,
            StorageBackend::Gcs(_) => StorageProvider::Gcs,
            StorageBackend::S3(_) => StorageProvider::S3,
        }
    }

    /// Uploads the artifacts in order.
    ///
    /// Local copies fail on the first filesystem error. Network variants
    /// probe the target once, returning [`StorageError::FatalConfig`] before
    /// any artifact is attempted, then upload best-effort and report
    /// per-artifact failures in the summary.
    ///
    /// [`StorageError::FatalConfig`]: crate::StorageError::FatalConfig
    pub async fn upload(&self, artifacts: &ArtifactSet) -> StorageResult<UploadSummary> {
        tracing::info!(storage = %self.provider(), count = artifacts.len(), "Uploading artifacts");

        let client: &dyn RemoteClient = match self {
            StorageBackend::Local(local) => return local.upload(artifacts).await,
            StorageBackend::Dropbox(client) => client,
            StorageBackend::Gcs(client) | StorageBackend::S3(client) => client,
        };
        client.probe().await?;
        Ok(upload_all(client, self.provider(), artifacts).await)
    }

    /// Logical names of stored artifacts starting with `prefix`, relative to
    /// the backend's root or configured prefix, sorted.
    pub async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        match self {
            StorageBackend::Local(local) => local.list(prefix).await,
            StorageBackend::Dropbox(client) => client.list(prefix).await,
            StorageBackend::Gcs(client) | StorageBackend::S3(client) => client.list(prefix).await,
        }
    }
}
