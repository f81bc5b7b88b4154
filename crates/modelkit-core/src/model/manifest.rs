//! The `MLmodel` manifest.
//!
//! A model directory is described by a YAML file named `MLmodel` at its root:
//!
//! ```yaml
//! artifact_path: model
//! flavors:
//!   python_function:
//!     code: code
//!     loader_module: my_flavor
//! model_uuid: 3c1e8f0b2f2a4c9e9f1d2b7a5e4c6d8f
//! run_id: 0a1b2c3d4e5f
//! signature:
//!   inputs: '[{"type": "double", "name": "x"}]'
//! utc_time_created: '2024-05-01 12:00:00.000000'
//! ```
//!
//! Keys this crate does not know about are kept and written back unchanged.

use crate::error::{ModelkitError, ModelkitResult};
use crate::signature::{ModelSignature, SignatureDict};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// File name of the manifest inside a model directory.
pub const MLMODEL_FILE_NAME: &str = "MLmodel";

/// Settings stored for one flavor.
pub type FlavorConfig = BTreeMap<String, serde_yaml::Value>;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// In-memory form of an `MLmodel` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<String>,

    #[serde(default)]
    pub flavors: BTreeMap<String, FlavorConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_uuid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    signature: Option<SignatureDict>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_time_created: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_yaml::Value>>,

    /// Top-level keys not modeled above
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// New manifest with a fresh UUID and creation time.
    pub fn new() -> Self {
        Self {
            artifact_path: None,
            flavors: BTreeMap::new(),
            model_uuid: Some(uuid::Uuid::new_v4().simple().to_string()),
            run_id: None,
            signature: None,
            utc_time_created: Some(chrono::Utc::now().format(TIME_FORMAT).to_string()),
            metadata: None,
            extra: BTreeMap::new(),
        }
    }

    /// Adds or replaces a flavor.
    pub fn add_flavor(mut self, name: impl Into<String>, config: FlavorConfig) -> Self {
        self.flavors.insert(name.into(), config);
        self
    }

    pub fn with_signature(mut self, signature: &ModelSignature) -> ModelkitResult<Self> {
        self.set_signature(Some(signature))?;
        Ok(self)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Decoded signature, if one is recorded.
    pub fn signature(&self) -> ModelkitResult<Option<ModelSignature>> {
        self.signature.as_ref().map(ModelSignature::from_dict).transpose()
    }

    /// Raw signature entry as stored in the manifest.
    pub fn signature_dict(&self) -> Option<&SignatureDict> {
        self.signature.as_ref()
    }

    /// Replaces the recorded signature; `None` removes it.
    pub fn set_signature(&mut self, signature: Option<&ModelSignature>) -> ModelkitResult<()> {
        self.signature = signature.map(ModelSignature::to_dict).transpose()?;
        Ok(())
    }

    /// Value of a top-level key this type does not model.
    pub fn extra(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.extra.get(key)
    }

    pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) {
        self.extra.insert(key.into(), value.into());
    }

    pub fn from_yaml(text: &str) -> ModelkitResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml(&self) -> ModelkitResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Loads a manifest from a model directory or from the `MLmodel` file
    /// itself.
    pub fn load(path: impl AsRef<Path>) -> ModelkitResult<Self> {
        let path = path.as_ref();
        let file = if path.is_dir() {
            path.join(MLMODEL_FILE_NAME)
        } else {
            path.to_path_buf()
        };
        if !file.is_file() {
            return Err(missing_manifest(path.display()));
        }
        Self::from_yaml(&fs::read_to_string(&file)?)
    }

    /// Writes the manifest as YAML to the file `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> ModelkitResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_yaml()?)?;
        log::info!("Wrote model manifest to {}", path.display());
        Ok(())
    }

    /// Summary of this manifest as located at `model_uri`.
    pub fn get_model_info(&self, model_uri: impl Into<String>) -> ModelInfo {
        ModelInfo {
            artifact_path: self.artifact_path.clone(),
            flavors: self.flavors.clone(),
            model_uri: model_uri.into(),
            model_uuid: self.model_uuid.clone(),
            run_id: self.run_id.clone(),
            signature: self.signature.clone(),
            utc_time_created: self.utc_time_created.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

pub(crate) fn missing_manifest(location: impl std::fmt::Display) -> ModelkitError {
    ModelkitError::not_found(format!(
        "Could not find an \"{}\" configuration file at \"{}\"",
        MLMODEL_FILE_NAME, location
    ))
}

/// Read-only summary of a stored model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub artifact_path: Option<String>,
    pub flavors: BTreeMap<String, FlavorConfig>,
    pub model_uri: String,
    pub model_uuid: Option<String>,
    pub run_id: Option<String>,
    pub signature: Option<SignatureDict>,
    pub utc_time_created: Option<String>,
    pub metadata: Option<BTreeMap<String, serde_yaml::Value>>,
}

impl ModelInfo {
    pub fn signature(&self) -> ModelkitResult<Option<ModelSignature>> {
        self.signature.as_ref().map(ModelSignature::from_dict).transpose()
    }
}
