//! Named pipeline outputs waiting to be uploaded

use crate::error::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Written after every other upload; never part of an artifact set.
pub const SUMMARY_FILE: &str = "upload_summary.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Logical name, `/`-separated and relative. Used as the remote key.
    pub name: String,
    pub path: PathBuf,
}

/// Ordered artifacts of one pipeline run. Uploads happen in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSet {
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> StorageResult<()> {
        let name = name.into();
        validate_name(&name)?;
        if self.artifacts.iter().any(|a| a.name == name) {
            return Err(StorageError::InvalidArtifact(format!(
                "duplicate artifact name `{name}`"
            )));
        }
        self.artifacts.push(Artifact {
            name,
            path: path.into(),
        });
        Ok(())
    }

    pub fn with(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> StorageResult<Self> {
        self.push(name, path)?;
        Ok(self)
    }

    /// Collects every file below `dir`, named by its relative path, in sorted
    /// order. The upload summary file is skipped. A file whose relative path
    /// is not UTF-8 is an [`StorageError::InvalidArtifact`].
    pub fn from_dir(dir: &Path) -> StorageResult<Self> {
        let mut set = Self::new();
        for path in walk_files(dir)? {
            let name = relative_name(dir, &path).ok_or_else(|| {
                StorageError::InvalidArtifact(format!(
                    "`{}` has no UTF-8 name relative to {}",
                    path.display(),
                    dir.display()
                ))
            })?;
            if name == SUMMARY_FILE {
                continue;
            }
            set.push(name, path)?;
        }
        tracing::debug!(dir = %dir.display(), count = set.len(), "Collected artifacts");
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.artifacts.iter()
    }
}

impl<'a> IntoIterator for &'a ArtifactSet {
    type Item = &'a Artifact;
    type IntoIter = std::slice::Iter<'a, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.iter()
    }
}

fn validate_name(name: &str) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::InvalidArtifact("empty artifact name".into()));
    }
    let safe = Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !safe {
        return Err(StorageError::InvalidArtifact(format!(
            "artifact name `{name}` must be a relative path without `..`"
        )));
    }
    Ok(())
}

fn relative_name(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Recursively lists regular files below `dir`, sorted by path.
fn walk_files(dir: &Path) -> StorageResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = std::fs::read_dir(&current).map_err(|e| StorageError::io(&current, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&current, e))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|e| StorageError::io(&path, e))?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unsafe_names() {
        let mut set = ArtifactSet::new();
        assert!(set.push("", "/tmp/a").is_err());
        assert!(set.push("../escape.txt", "/tmp/a").is_err());
        assert!(set.push("/etc/passwd", "/tmp/a").is_err());
        assert!(set.push("plots/roc.png", "/tmp/a").is_ok());
        assert!(set.push("plots/roc.png", "/tmp/b").is_err());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_from_dir_is_sorted_and_skips_summary() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("plots")).unwrap();
        std::fs::write(dir.path().join("model_metrics.json"), "{}").unwrap();
        std::fs::write(dir.path().join("evaluation_report.txt"), "report").unwrap();
        std::fs::write(dir.path().join("plots/roc_curve.json"), "[]").unwrap();
        std::fs::write(dir.path().join(SUMMARY_FILE), "{}").unwrap();

        let set = ArtifactSet::from_dir(dir.path()).unwrap();
        let names: Vec<&str> = set.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["evaluation_report.txt", "model_metrics.json", "plots/roc_curve.json"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_from_dir_rejects_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("model_metrics.json"), "{}").unwrap();
        let name = OsStr::from_bytes(b"plot-\xff.png");
        if std::fs::write(dir.path().join(name), b"png").is_err() {
            // filesystem refuses non-UTF-8 names
            return;
        }

        let err = ArtifactSet::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, StorageError::InvalidArtifact(ref msg) if msg.contains("UTF-8")));
    }

    #[test]
    fn test_from_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArtifactSet::from_dir(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
