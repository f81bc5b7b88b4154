//! Artifact repositories.
//!
//! An [`ArtifactRepository`] is a rooted file store addressed by relative,
//! `/`-separated paths. Model directories, run artifact roots and anything a
//! registered URI scheme resolves to are all exposed through it, so manifest
//! operations never touch the filesystem directly.

use crate::error::{ModelkitError, ModelkitResult};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Rooted store of artifact files.
pub trait ArtifactRepository: Send + Sync {
    /// URI of the repository root, for display and model info.
    fn root_uri(&self) -> String;

    /// Reads the file at `rel_path`. A missing file is `ResourceNotFound`.
    fn read_file(&self, rel_path: &str) -> ModelkitResult<Vec<u8>>;

    /// Writes `contents` to `rel_path`, replacing any existing file and
    /// creating parent directories.
    fn write_file(&self, rel_path: &str, contents: &[u8]) -> ModelkitResult<()>;

    /// Whether a file or directory exists at `rel_path`.
    fn exists(&self, rel_path: &str) -> ModelkitResult<bool>;
}

/// Repository over a local directory.
#[derive(Debug, Clone)]
pub struct LocalArtifactRepository {
    root: PathBuf,
}

impl LocalArtifactRepository {
    /// Repository rooted at `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Repository for a `file://` URI or a plain local path.
    pub fn from_uri(uri: &str) -> Self {
        Self::new(uri.strip_prefix("file://").unwrap_or(uri))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, rel_path: &str) -> ModelkitResult<PathBuf> {
        let rel = Path::new(rel_path);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ModelkitError::invalid_parameter(format!(
                "Artifact path must be relative and stay inside the repository: '{}'",
                rel_path
            )));
        }
        Ok(self.root.join(rel))
    }
}

impl ArtifactRepository for LocalArtifactRepository {
    fn root_uri(&self) -> String {
        self.root.display().to_string()
    }

    fn read_file(&self, rel_path: &str) -> ModelkitResult<Vec<u8>> {
        let path = self.resolve(rel_path)?;
        if !path.is_file() {
            return Err(ModelkitError::not_found(format!(
                "Artifact '{}' not found under '{}'",
                rel_path,
                self.root.display()
            )));
        }
        Ok(fs::read(&path)?)
    }

    fn write_file(&self, rel_path: &str, contents: &[u8]) -> ModelkitResult<()> {
        let path = self.resolve(rel_path)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        log::debug!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }

    fn exists(&self, rel_path: &str) -> ModelkitResult<bool> {
        Ok(self.resolve(rel_path)?.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_creates_parents() -> ModelkitResult<()> {
        let dir = TempDir::new()?;
        let repo = LocalArtifactRepository::new(dir.path());
        repo.write_file("model/MLmodel", b"flavors: {}\n")?;
        assert!(repo.exists("model/MLmodel")?);
        assert_eq!(repo.read_file("model/MLmodel")?, b"flavors: {}\n");
        Ok(())
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let repo = LocalArtifactRepository::new(dir.path());
        let err = repo.read_file("MLmodel").unwrap_err();
        assert!(matches!(err, ModelkitError::ResourceNotFound(_)));
    }

    #[test]
    fn test_paths_cannot_escape_root() {
        let repo = LocalArtifactRepository::new("/tmp/repo");
        for bad in ["../MLmodel", "/etc/passwd", "a/../../b"] {
            assert!(matches!(
                repo.exists(bad),
                Err(ModelkitError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_from_uri_strips_file_scheme() {
        let repo = LocalArtifactRepository::from_uri("file:///data/model");
        assert_eq!(repo.root(), Path::new("/data/model"));
    }
}
