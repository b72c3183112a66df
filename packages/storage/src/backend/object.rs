use super::remote::RemoteClient;
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::{ObjectStore, PutPayload, path::Path};
use std::fmt;
use std::sync::Arc;

/// Bucket-backed store shared by the GCS and S3 variants.
#[derive(Clone)]
pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
    scheme: String,
    bucket: String,
    prefix: Path,
}

impl fmt::Debug for ObjectStoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectStoreBackend({}://{}/{})", self.scheme, self.bucket, self.prefix)
    }
}

impl ObjectStoreBackend {
    pub fn new(store: Arc<dyn ObjectStore>, scheme: &str, bucket: &str, prefix: Option<&str>) -> Self {
        Self {
            store,
            scheme: scheme.to_string(),
            bucket: bucket.to_string(),
            prefix: prefix.map(Path::from).unwrap_or_default(),
        }
    }

    /// Object key for an artifact: the configured prefix followed by every
    /// segment of the logical name.
    pub fn location(&self, name: &str) -> Path {
        name.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.prefix.clone(), |acc, seg| acc.child(seg))
    }

    pub fn remote_ref(&self, location: &Path) -> String {
        format!("{}://{}/{}", self.scheme, self.bucket, location)
    }
}

#[async_trait]
impl RemoteClient for ObjectStoreBackend {
    async fn probe(&self) -> StorageResult<()> {
        let prefix = (!self.prefix.as_ref().is_empty()).then_some(&self.prefix);
        self.store
            .list_with_delimiter(prefix)
            .await
            .map(|_| ())
            .map_err(|e| {
                StorageError::FatalConfig(format!(
                    "cannot reach {}://{}: {e}",
                    self.scheme, self.bucket
                ))
            })
    }

    async fn put(&self, name: &str, data: Bytes) -> StorageResult<String> {
        let location = self.location(name);
        self.store
            .put(&location, PutPayload::from(data))
            .await
            .map_err(|e| StorageError::Transient(e.to_string()))?;
        Ok(self.remote_ref(&location))
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        list_names(self.store.as_ref(), &self.prefix, prefix)
            .await
            .map_err(|e| StorageError::Transient(e.to_string()))
    }
}

/// Logical names below `base` that start with `prefix`, sorted. Names are
/// relative to `base`, so they match the names the artifacts were put under.
pub(crate) async fn list_names(
    store: &dyn ObjectStore,
    base: &Path,
    prefix: &str,
) -> object_store::Result<Vec<String>> {
    let root = (!base.as_ref().is_empty()).then_some(base);
    let locations: Vec<Path> = store
        .list(root)
        .map_ok(|meta| meta.location)
        .try_collect()
        .await?;

    let mut names: Vec<String> = locations
        .iter()
        .filter_map(|location| relative_key(base, location))
        .filter(|name| name.starts_with(prefix))
        .collect();
    names.sort();
    Ok(names)
}

fn relative_key(base: &Path, location: &Path) -> Option<String> {
    let parts: Vec<String> = location
        .prefix_match(base)?
        .map(|part| part.as_ref().to_string())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    #[test]
    fn test_location_joins_prefix_and_name() {
        let backend = ObjectStoreBackend::new(Arc::new(InMemory::new()), "s3", "bucket", Some("runs/42"));
        assert_eq!(backend.location("plots/roc.png").as_ref(), "runs/42/plots/roc.png");
        assert_eq!(
            backend.remote_ref(&backend.location("model.bin")),
            "s3://bucket/runs/42/model.bin"
        );

        let bare = ObjectStoreBackend::new(Arc::new(InMemory::new()), "gs", "bucket", None);
        assert_eq!(bare.location("model.bin").as_ref(), "model.bin");
    }

    #[tokio::test]
    async fn test_put_overwrites_and_lists() {
        let store = Arc::new(InMemory::new());
        let backend = ObjectStoreBackend::new(store.clone(), "gs", "bucket", Some("runs"));

        backend.probe().await.unwrap();
        backend.put("report.txt", Bytes::from_static(b"v1")).await.unwrap();
        let remote = backend.put("report.txt", Bytes::from_static(b"v2")).await.unwrap();
        assert_eq!(remote, "gs://bucket/runs/report.txt");

        let data = store
            .get(&Path::from("runs/report.txt"))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(data.as_ref(), b"v2");

        assert_eq!(backend.list("").await.unwrap(), vec!["report.txt"]);
    }

    #[tokio::test]
    async fn test_list_matches_partial_names_below_prefix() {
        let store = Arc::new(InMemory::new());
        let backend = ObjectStoreBackend::new(store.clone(), "s3", "bucket", Some("runs/1"));
        backend.put("model_metrics.json", Bytes::from_static(b"{}")).await.unwrap();
        backend.put("plots/roc.json", Bytes::from_static(b"[]")).await.unwrap();
        store
            .put(&Path::from("runs/10/model.bin"), PutPayload::from(Bytes::from_static(b"x")))
            .await
            .unwrap();

        assert_eq!(
            backend.list("").await.unwrap(),
            vec!["model_metrics.json", "plots/roc.json"]
        );
        assert_eq!(backend.list("model").await.unwrap(), vec!["model_metrics.json"]);
        assert_eq!(backend.list("plots/r").await.unwrap(), vec!["plots/roc.json"]);
    }
}
