//! Saving, logging and updating stored models.

use super::manifest::{missing_manifest, Model, ModelInfo, MLMODEL_FILE_NAME};
use super::uri::{strip_scheme, ModelUri, REGISTRY_PREFIX};
use crate::config::ModelkitConfig;
use crate::error::{ModelkitError, ModelkitResult};
use crate::signature::ModelSignature;
use crate::store::{ArtifactRepository, ArtifactResolver};
use std::fs;
use std::path::Path;

/// Writes `model` as a new model directory at `path`.
///
/// Fails with `ResourceAlreadyExists` if `path` exists and is not an empty
/// directory.
pub fn save_model(path: impl AsRef<Path>, model: &Model) -> ModelkitResult<()> {
    let path = path.as_ref();
    if path.exists() {
        let empty_dir = path.is_dir() && fs::read_dir(path)?.next().is_none();
        if !empty_dir {
            return Err(ModelkitError::already_exists(format!(
                "Path '{}' already exists and is not empty",
                path.display()
            )));
        }
    }
    fs::create_dir_all(path)?;
    model.save(path.join(MLMODEL_FILE_NAME))
}

/// Records `model` under `artifact_path` in the artifacts of run `run_id`.
///
/// The manifest is stamped with the run id and artifact path before it is
/// written. The returned info carries the model's `runs:/` URI.
pub fn log_model(
    resolver: &ArtifactResolver,
    run_id: &str,
    artifact_path: &str,
    mut model: Model,
) -> ModelkitResult<ModelInfo> {
    let artifact_path = artifact_path.trim_matches('/');
    if artifact_path.is_empty() {
        return Err(ModelkitError::invalid_parameter("artifact_path must not be empty"));
    }
    model.run_id = Some(run_id.to_string());
    model.artifact_path = Some(artifact_path.to_string());

    let repo = resolver.run_repository(run_id)?;
    repo.write_file(
        &format!("{}/{}", artifact_path, MLMODEL_FILE_NAME),
        model.to_yaml()?.as_bytes(),
    )?;
    log::info!("Logged model to run {} at '{}'", run_id, artifact_path);
    Ok(model.get_model_info(format!("runs:/{}/{}", run_id, artifact_path)))
}

/// Info for the model at `model_uri`, resolved with the environment's
/// configuration.
pub fn get_model_info(model_uri: &str) -> ModelkitResult<ModelInfo> {
    let resolver = ArtifactResolver::from_config(&ModelkitConfig::from_env()?);
    get_model_info_with(&resolver, model_uri)
}

pub fn get_model_info_with(resolver: &ArtifactResolver, model_uri: &str) -> ModelkitResult<ModelInfo> {
    let uri = ModelUri::parse(model_uri)?;
    let repo = resolver.resolve(&uri)?;
    Ok(read_manifest(repo.as_ref())?.get_model_info(model_uri))
}

/// Replaces the signature recorded for the model at `model_uri`.
///
/// Accepts local paths, `file://` and `runs:/` URIs, and any scheme known to
/// the resolver built from the environment's configuration.
pub fn set_signature(model_uri: &str, signature: &ModelSignature) -> ModelkitResult<()> {
    let resolver = ArtifactResolver::from_config(&ModelkitConfig::from_env()?);
    set_signature_with(&resolver, model_uri, signature)
}

/// [`set_signature`] with an explicit resolver.
///
/// `models:/` URIs are rejected before any storage is touched. The manifest
/// is read, updated and written back; there is no locking, so the last
/// writer wins.
pub fn set_signature_with(
    resolver: &ArtifactResolver,
    model_uri: &str,
    signature: &ModelSignature,
) -> ModelkitResult<()> {
    if strip_scheme(model_uri, REGISTRY_PREFIX).is_some() {
        return Err(ModelkitError::unsupported_uri(
            "Model URIs with the `models:/` scheme are not supported.",
        ));
    }

    let uri = ModelUri::parse(model_uri)?;
    let repo = resolver.resolve(&uri)?;
    let mut model = read_manifest(repo.as_ref())?;
    model.set_signature(Some(signature))?;
    repo.write_file(MLMODEL_FILE_NAME, model.to_yaml()?.as_bytes())?;
    log::info!("Set signature of model at {}", model_uri);
    Ok(())
}

fn read_manifest(repo: &dyn ArtifactRepository) -> ModelkitResult<Model> {
    if !repo.exists(MLMODEL_FILE_NAME)? {
        return Err(missing_manifest(repo.root_uri()));
    }
    let bytes = repo.read_file(MLMODEL_FILE_NAME)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| ModelkitError::serialization(format!("MLmodel is not valid UTF-8: {}", e)))?;
    Model::from_yaml(&text)
}
