//! Best-effort upload loop shared by the network backends

use crate::artifact::{Artifact, ArtifactSet};
use crate::config::StorageProvider;
use crate::error::{StorageError, StorageResult};
use crate::summary::{UploadOutcome, UploadSummary};
use async_trait::async_trait;
use bytes::Bytes;

/// Minimal capability a network backend provides
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Verifies credentials and target once, before the first artifact.
    /// Failures are [`StorageError::FatalConfig`].
    async fn probe(&self) -> StorageResult<()>;

    /// Stores `data` under `name`, overwriting any existing object, and
    /// returns a reference to the remote copy.
    async fn put(&self, name: &str, data: Bytes) -> StorageResult<String>;

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;
}

/// Uploads every artifact in order with a single attempt each. A failed
/// artifact is recorded and the loop moves on.
pub async fn upload_all<C>(
    client: &C,
    provider: StorageProvider,
    artifacts: &ArtifactSet,
) -> UploadSummary
where
    C: RemoteClient + ?Sized,
{
    let mut summary = UploadSummary::new(provider);

    for artifact in artifacts {
        let outcome = match upload_one(client, artifact).await {
            Ok(remote_ref) => {
                tracing::info!(artifact = %artifact.name, remote = %remote_ref, "Uploaded artifact");
                UploadOutcome::uploaded(&artifact.name, remote_ref)
            }
            Err(e) => {
                tracing::warn!(artifact = %artifact.name, error = %e, "Artifact upload failed");
                UploadOutcome::failed(&artifact.name, e.to_string())
            }
        };
        summary.record(outcome);
    }

    tracing::info!(
        storage = %provider,
        uploaded = summary.successful_uploads,
        failed = summary.failed_uploads,
        "Uploaded {}/{} files",
        summary.successful_uploads,
        summary.total_files
    );
    summary.finish()
}

async fn upload_one<C>(client: &C, artifact: &Artifact) -> StorageResult<String>
where
    C: RemoteClient + ?Sized,
{
    let data = tokio::fs::read(&artifact.path)
        .await
        .map_err(|e| StorageError::io(&artifact.path, e))?;
    client.put(&artifact.name, Bytes::from(data)).await
}
