use super::object::list_names;
use crate::artifact::ArtifactSet;
use crate::config::StorageProvider;
use crate::error::{StorageError, StorageResult};
use crate::summary::{UploadOutcome, UploadSummary};
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Copies artifacts into a directory, keeping their logical names.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
    store: Arc<LocalFileSystem>,
}

impl LocalBackend {
    pub fn new(root: PathBuf) -> StorageResult<Self> {
        std::fs::create_dir_all(&root).map_err(|e| StorageError::io(&root, e))?;
        let store = LocalFileSystem::new_with_prefix(&root)
            .map_err(|e| StorageError::io(&root, std::io::Error::other(e)))?;
        Ok(Self {
            root,
            store: Arc::new(store),
        })
    }

    /// Copies every artifact. The first filesystem error aborts the upload.
    pub async fn upload(&self, artifacts: &ArtifactSet) -> StorageResult<UploadSummary> {
        let mut summary = UploadSummary::new(StorageProvider::Local);

        for artifact in artifacts {
            let target = self.root.join(&artifact.name);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::io(parent, e))?;
            }

            // copying a file onto itself truncates it
            if !same_file(&artifact.path, &target).await {
                tokio::fs::copy(&artifact.path, &target)
                    .await
                    .map_err(|e| StorageError::io(&artifact.path, e))?;
            }

            tracing::debug!(artifact = %artifact.name, target = %target.display(), "Copied artifact");
            summary.record(UploadOutcome::uploaded(
                &artifact.name,
                target.display().to_string(),
            ));
        }

        tracing::info!(
            root = %self.root.display(),
            "Copied {} files",
            summary.successful_uploads
        );
        Ok(summary.finish())
    }

    /// Logical names of stored files starting with `prefix`, sorted.
    pub async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        list_names(self.store.as_ref(), &ObjectPath::default(), prefix)
            .await
            .map_err(|e| StorageError::io(&self.root, std::io::Error::other(e)))
    }
}

async fn same_file(a: &Path, b: &Path) -> bool {
    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
