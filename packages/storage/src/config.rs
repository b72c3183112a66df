//! Storage target configuration
//!
//! Exactly one backend is selected per run through `STORAGE_TYPE`. Each
//! variant reads its own variables; missing required values are reported as
//! [`StorageError::FatalConfig`] before anything is uploaded.

use crate::backend::{DropboxBackend, LocalBackend, ObjectStoreBackend, StorageBackend};
use crate::error::{StorageError, StorageResult};
use object_store::aws::AmazonS3Builder;
use object_store::gcp::GoogleCloudStorageBuilder;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::path::PathBuf;
use std::sync::Arc;

/// Storage provider type
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    Local,
    Dropbox,
    Gcs,
    S3,
}

impl Display for StorageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageProvider::Local => write!(f, "local"),
            StorageProvider::Dropbox => write!(f, "dropbox"),
            StorageProvider::Gcs => write!(f, "gcs"),
            StorageProvider::S3 => write!(f, "s3"),
        }
    }
}

impl std::str::FromStr for StorageProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "fs" | "file" => Ok(StorageProvider::Local),
            "dropbox" => Ok(StorageProvider::Dropbox),
            "gcs" | "gcp" | "google" => Ok(StorageProvider::Gcs),
            "s3" | "aws" => Ok(StorageProvider::S3),
            _ => Err(format!("Unknown storage provider: {}", s)),
        }
    }
}

/// Reads a variable, treating empty values as unset.
fn lookup<F>(vars: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    vars(key).filter(|v| !v.trim().is_empty())
}

fn require<F>(vars: &F, key: &'static str) -> StorageResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(vars, key).ok_or_else(|| StorageError::FatalConfig(format!("{key} not set")))
}

/// Copies artifacts into a directory on the local filesystem
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalConfig {
    pub base_path: PathBuf,
}

impl LocalConfig {
    pub fn from_vars<F: Fn(&str) -> Option<String>>(vars: &F) -> Self {
        LocalConfig {
            base_path: lookup(vars, "LOCAL_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
        }
    }

    pub fn build_backend(&self) -> StorageResult<LocalBackend> {
        LocalBackend::new(self.base_path.clone())
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DropboxConfig {
    pub access_token: String,
    /// Folder the artifacts land in; empty for the app root.
    #[serde(default)]
    pub root: String,
}

impl fmt::Debug for DropboxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropboxConfig")
            .field("access_token", &"<redacted>")
            .field("root", &self.root)
            .finish()
    }
}

impl DropboxConfig {
    pub fn from_vars<F: Fn(&str) -> Option<String>>(vars: &F) -> StorageResult<Self> {
        Ok(DropboxConfig {
            access_token: require(vars, "DROPBOX_ACCESS_TOKEN")?,
            root: lookup(vars, "DROPBOX_ROOT").unwrap_or_default(),
        })
    }

    pub fn build_backend(&self) -> StorageResult<DropboxBackend> {
        DropboxBackend::new(&self.access_token, &self.root)
    }
}

/// Google Cloud Storage configuration
///
/// Without `credentials_path` the builder falls back to the standard
/// `GOOGLE_*` environment variables.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GcsConfig {
    pub bucket_name: String,
    pub credentials_path: Option<PathBuf>,
    pub prefix: Option<String>,
}

impl GcsConfig {
    pub fn from_vars<F: Fn(&str) -> Option<String>>(vars: &F) -> StorageResult<Self> {
        Ok(GcsConfig {
            bucket_name: require(vars, "GCS_BUCKET_NAME")?,
            credentials_path: lookup(vars, "GCS_CREDENTIALS_PATH").map(PathBuf::from),
            prefix: lookup(vars, "STORAGE_PREFIX"),
        })
    }

    pub fn build_backend(&self) -> StorageResult<ObjectStoreBackend> {
        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(&self.bucket_name);

        if let Some(path) = &self.credentials_path {
            builder = builder.with_service_account_path(path.to_string_lossy());
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::FatalConfig(format!("Failed to build GCS store: {e}")))?;
        Ok(ObjectStoreBackend::new(
            Arc::new(store),
            "gs",
            &self.bucket_name,
            self.prefix.as_deref(),
        ))
    }
}

/// AWS S3 configuration
///
/// Static credentials are used when both keys are set; otherwise the AWS
/// credential chain (instance role, web identity, ...) applies.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct S3Config {
    pub bucket_name: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub prefix: Option<String>,
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl S3Config {
    pub fn from_vars<F: Fn(&str) -> Option<String>>(vars: &F) -> StorageResult<Self> {
        Ok(S3Config {
            bucket_name: require(vars, "S3_BUCKET_NAME")?,
            region: lookup(vars, "AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            endpoint: lookup(vars, "AWS_ENDPOINT"),
            access_key_id: lookup(vars, "AWS_ACCESS_KEY_ID"),
            secret_access_key: lookup(vars, "AWS_SECRET_ACCESS_KEY"),
            prefix: lookup(vars, "STORAGE_PREFIX"),
        })
    }

    pub fn build_backend(&self) -> StorageResult<ObjectStoreBackend> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(&self.region)
            .with_bucket_name(&self.bucket_name);

        if let Some(endpoint) = &self.endpoint {
            builder = builder.with_endpoint(endpoint).with_allow_http(true);
        }

        if let (Some(access_key), Some(secret_key)) = (&self.access_key_id, &self.secret_access_key)
        {
            builder = builder
                .with_access_key_id(access_key)
                .with_secret_access_key(secret_key);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::FatalConfig(format!("Failed to build S3 store: {e}")))?;
        Ok(ObjectStoreBackend::new(
            Arc::new(store),
            "s3",
            &self.bucket_name,
            self.prefix.as_deref(),
        ))
    }
}

/// Unified storage target. Resolved once at startup and immutable afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageTarget {
    Local(LocalConfig),
    Dropbox(DropboxConfig),
    Gcs(GcsConfig),
    S3(S3Config),
}

impl StorageTarget {
    /// Load the target from the process environment based on STORAGE_TYPE
    pub fn from_env() -> StorageResult<Self> {
        Self::from_vars(&|key: &str| std::env::var(key).ok())
    }

    /// Load the target from an arbitrary variable source. `STORAGE_TYPE`
    /// defaults to `local`.
    pub fn from_vars<F: Fn(&str) -> Option<String>>(vars: &F) -> StorageResult<Self> {
        let provider: StorageProvider = lookup(vars, "STORAGE_TYPE")
            .unwrap_or_else(|| "local".to_string())
            .parse()
            .map_err(StorageError::FatalConfig)?;

        Self::from_vars_with_provider(provider, vars)
    }

    pub fn from_vars_with_provider<F: Fn(&str) -> Option<String>>(
        provider: StorageProvider,
        vars: &F,
    ) -> StorageResult<Self> {
        match provider {
            StorageProvider::Local => Ok(StorageTarget::Local(LocalConfig::from_vars(vars))),
            StorageProvider::Dropbox => Ok(StorageTarget::Dropbox(DropboxConfig::from_vars(vars)?)),
            StorageProvider::Gcs => Ok(StorageTarget::Gcs(GcsConfig::from_vars(vars)?)),
            StorageProvider::S3 => Ok(StorageTarget::S3(S3Config::from_vars(vars)?)),
        }
    }

    pub fn provider(&self) -> StorageProvider {
        match self {
            StorageTarget::Local(_) => StorageProvider::Local,
            StorageTarget::Dropbox(_) => StorageProvider::Dropbox,
            StorageTarget::Gcs(_) => StorageProvider::Gcs,
            StorageTarget::S3(_) => StorageProvider::S3,
        }
    }

    /// Builds the backend for this target. Does not touch the network.
    pub fn build_backend(&self) -> StorageResult<StorageBackend> {
        match self {
            StorageTarget::Local(cfg) => Ok(StorageBackend::Local(cfg.build_backend()?)),
            StorageTarget::Dropbox(cfg) => Ok(StorageBackend::Dropbox(cfg.build_backend()?)),
            StorageTarget::Gcs(cfg) => Ok(StorageBackend::Gcs(cfg.build_backend()?)),
            StorageTarget::S3(cfg) => Ok(StorageBackend::S3(cfg.build_backend()?)),
        }
    }
}
