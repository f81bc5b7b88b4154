//! Maps model URIs to artifact repositories.

use super::artifact::{ArtifactRepository, LocalArtifactRepository};
use super::runs::FileRunStore;
use crate::config::ModelkitConfig;
use crate::error::{ModelkitError, ModelkitResult};
use crate::model::ModelUri;
use std::collections::HashMap;

/// Builds a repository for a full `<scheme>://` URI.
pub type RepositoryFactory =
    Box<dyn Fn(&str) -> ModelkitResult<Box<dyn ArtifactRepository>> + Send + Sync>;

/// Resolves model URIs to the repository holding the model directory.
///
/// Local paths and `file://` URIs map to [`LocalArtifactRepository`];
/// `runs:/` URIs go through the [`FileRunStore`]. Other schemes must be
/// registered with [`ArtifactResolver::register_scheme`].
pub struct ArtifactResolver {
    runs: FileRunStore,
    schemes: HashMap<String, RepositoryFactory>,
}

impl ArtifactResolver {
    pub fn new(runs: FileRunStore) -> Self {
        Self {
            runs,
            schemes: HashMap::new(),
        }
    }

    /// Resolver whose run store lives at the configured tracking root.
    pub fn from_config(config: &ModelkitConfig) -> Self {
        Self::new(FileRunStore::new(config.tracking_root()))
    }

    pub fn run_store(&self) -> &FileRunStore {
        &self.runs
    }

    /// Registers a repository factory for `scheme` (case-insensitive).
    pub fn register_scheme(&mut self, scheme: impl Into<String>, factory: RepositoryFactory) {
        let scheme = scheme.into().to_ascii_lowercase();
        log::debug!("Registered artifact repository for scheme '{}'", scheme);
        self.schemes.insert(scheme, factory);
    }

    /// Repository rooted at a run's artifact directory.
    pub fn run_repository(&self, run_id: &str) -> ModelkitResult<Box<dyn ArtifactRepository>> {
        let artifact_uri = self.runs.artifact_uri(run_id)?;
        self.for_root_uri(&artifact_uri)
    }

    /// Repository rooted at the model directory `uri` points to.
    pub fn resolve(&self, uri: &ModelUri) -> ModelkitResult<Box<dyn ArtifactRepository>> {
        log::debug!("Resolving model URI {}", uri);
        match uri {
            ModelUri::Local(path) => Ok(Box::new(LocalArtifactRepository::new(path))),
            ModelUri::Run {
                run_id,
                artifact_path,
            } => {
                let artifact_uri = self.runs.artifact_uri(run_id)?;
                let root = join_uri(&artifact_uri, artifact_path);
                self.for_root_uri(&root)
            }
            ModelUri::Remote { .. } => self.for_root_uri(&uri.to_string()),
            ModelUri::Registered { .. } => Err(ModelkitError::unsupported_uri(format!(
                "Cannot resolve '{}': no model registry is configured",
                uri
            ))),
        }
    }

    fn for_root_uri(&self, root: &str) -> ModelkitResult<Box<dyn ArtifactRepository>> {
        match root.split_once("://") {
            Some(("file", _)) | None => Ok(Box::new(LocalArtifactRepository::from_uri(root))),
            Some((scheme, _)) => {
                let factory = self
                    .schemes
                    .get(&scheme.to_ascii_lowercase())
                    .ok_or_else(|| {
                        ModelkitError::unsupported_uri(format!(
                            "No artifact repository registered for scheme '{}' (URI '{}')",
                            scheme, root
                        ))
                    })?;
                factory(root)
            }
        }
    }
}

fn join_uri(base: &str, rel: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), rel.trim_start_matches('/'))
}
