use super::manifest::{missing_manifest, FlavorConfig, Model, MLMODEL_FILE_NAME};
use crate::error::{ModelkitError, ModelkitResult};
use std::path::Path;

/// Flavor configuration stored in the `MLmodel` file under `model_path`.
///
/// Fails with `ResourceNotFound` if the directory has no manifest or the
/// manifest has no entry for `flavor_name`.
pub fn get_flavor_configuration(
    model_path: impl AsRef<Path>,
    flavor_name: &str,
) -> ModelkitResult<FlavorConfig> {
    let model_path = model_path.as_ref();
    let manifest = model_path.join(MLMODEL_FILE_NAME);
    if !manifest.is_file() {
        return Err(missing_manifest(model_path.display()));
    }

    let mut model = Model::load(&manifest)?;
    log::debug!(
        "Model at {} has flavors {:?}",
        model_path.display(),
        model.flavors.keys().collect::<Vec<_>>()
    );
    model.flavors.remove(flavor_name).ok_or_else(|| {
        ModelkitError::not_found(format!(
            "Model does not have the \"{}\" flavor",
            flavor_name
        ))
    })
}
