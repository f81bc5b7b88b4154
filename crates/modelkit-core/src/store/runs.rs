//! File-based run store.
//!
//! Runs are kept under the tracking root as:
//!
//! ```text
//! <tracking_root>/
//!   <experiment_id>/
//!     <run_id>/
//!       meta.yaml
//!       artifacts/
//! ```
//!
//! `meta.yaml` records where the run's artifacts live; `runs:/` URIs are
//! resolved against that location.

use crate::error::{ModelkitError, ModelkitResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const META_FILE: &str = "meta.yaml";

/// Experiment that runs are created under when none is given.
pub const DEFAULT_EXPERIMENT_ID: &str = "0";

/// Contents of a run's `meta.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: String,
    pub experiment_id: String,
    pub artifact_uri: String,
    pub start_time: DateTime<Utc>,
}

/// Run metadata stored in a local directory tree.
#[derive(Debug, Clone)]
pub struct FileRunStore {
    root: PathBuf,
}

impl FileRunStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates a run with a fresh id and an empty artifact directory.
    pub fn create_run(&self, experiment_id: &str) -> ModelkitResult<RunInfo> {
        let run_id = uuid::Uuid::new_v4().simple().to_string();
        let run_dir = self.root.join(experiment_id).join(&run_id);
        let artifact_dir = run_dir.join("artifacts");
        fs::create_dir_all(&artifact_dir)?;

        let info = RunInfo {
            run_id,
            experiment_id: experiment_id.to_string(),
            artifact_uri: artifact_dir.display().to_string(),
            start_time: Utc::now(),
        };
        fs::write(run_dir.join(META_FILE), serde_yaml::to_string(&info)?)?;
        log::info!("Created run {} in experiment {}", info.run_id, experiment_id);
        Ok(info)
    }

    /// Looks a run up by id across all experiments.
    pub fn get_run(&self, run_id: &str) -> ModelkitResult<RunInfo> {
        let meta = self
            .find_meta(run_id)?
            .ok_or_else(|| ModelkitError::not_found(format!("Run '{}' not found", run_id)))?;
        let text = fs::read_to_string(&meta)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Artifact root of a run.
    pub fn artifact_uri(&self, run_id: &str) -> ModelkitResult<String> {
        Ok(self.get_run(run_id)?.artifact_uri)
    }

    fn find_meta(&self, run_id: &str) -> ModelkitResult<Option<PathBuf>> {
        if run_id.is_empty() || run_id.contains(['/', '\\']) || run_id == ".." {
            return Err(ModelkitError::invalid_parameter(format!(
                "Invalid run id '{}'",
                run_id
            )));
        }
        if !self.root.is_dir() {
            return Ok(None);
        }
        for entry in fs::read_dir(&self.root)? {
            let meta = entry?.path().join(run_id).join(META_FILE);
            if meta.is_file() {
                return Ok(Some(meta));
            }
        }
        Ok(None)
    }
}
