//! Artifact storage: repositories, the file-based run store, and URI
//! resolution.

mod artifact;
mod resolver;
mod runs;

pub use artifact::{ArtifactRepository, LocalArtifactRepository};
pub use resolver::{ArtifactResolver, RepositoryFactory};
pub use runs::{FileRunStore, RunInfo, DEFAULT_EXPERIMENT_ID};
