//! Integration tests for updating the signature of saved and logged models.

use modelkit_core::model::{
    get_model_info_with, log_model, save_model, set_signature, set_signature_with, Model,
    MLMODEL_FILE_NAME,
};
use modelkit_core::signature::infer_signature;
use modelkit_core::store::{ArtifactResolver, FileRunStore, DEFAULT_EXPERIMENT_ID};
use modelkit_core::{ModelkitError, ModelkitResult};
use ndarray::array;
use tempfile::TempDir;

const ARTIFACT_PATH: &str = "regr-model";

fn regressor() -> Model {
    let mut flavor = modelkit_core::model::FlavorConfig::new();
    flavor.insert("pickled_model".into(), "model.pkl".into());
    Model::new().add_flavor("sklearn", flavor)
}

fn tracking() -> (TempDir, ArtifactResolver) {
    let dir = TempDir::new().unwrap();
    let resolver = ArtifactResolver::new(FileRunStore::new(dir.path()));
    (dir, resolver)
}

#[test]
fn test_set_signature_to_logged_model() -> ModelkitResult<()> {
    let (_dir, resolver) = tracking();
    let run = resolver.run_store().create_run(DEFAULT_EXPERIMENT_ID)?;
    log_model(&resolver, &run.run_id, ARTIFACT_PATH, regressor())?;

    let signature = infer_signature(&array![1i64], None)?;
    let model_uri = format!("runs:/{}/{}", run.run_id, ARTIFACT_PATH);
    set_signature_with(&resolver, &model_uri, &signature)?;

    let model_info = get_model_info_with(&resolver, &model_uri)?;
    assert_eq!(model_info.signature()?, Some(signature));
    Ok(())
}

#[test]
fn test_set_signature_to_saved_model() -> ModelkitResult<()> {
    let dir = TempDir::new()?;
    let model_path = dir.path().join("model");
    save_model(&model_path, &regressor())?;

    let signature = infer_signature(&array![1i64], None)?;
    set_signature(&model_path.display().to_string(), &signature)?;
    assert_eq!(Model::load(&model_path)?.signature()?, Some(signature));
    Ok(())
}

#[test]
fn test_set_signature_with_file_uri() -> ModelkitResult<()> {
    let dir = TempDir::new()?;
    save_model(dir.path(), &regressor())?;

    let signature = infer_signature(&array![[1.0f32, 2.0]], None)?;
    set_signature(&format!("file://{}", dir.path().display()), &signature)?;
    assert_eq!(Model::load(dir.path())?.signature()?, Some(signature));
    Ok(())
}

#[test]
fn test_set_signature_overwrite() -> ModelkitResult<()> {
    let (_dir, resolver) = tracking();
    let run = resolver.run_store().create_run(DEFAULT_EXPERIMENT_ID)?;
    let original = infer_signature(&array![1i64], None)?;
    log_model(
        &resolver,
        &run.run_id,
        ARTIFACT_PATH,
        regressor().with_signature(&original)?,
    )?;

    let new_signature = infer_signature(&array![1i64], Some(&array![1i64]))?;
    let model_uri = format!("runs:/{}/{}", run.run_id, ARTIFACT_PATH);
    set_signature_with(&resolver, &model_uri, &new_signature)?;

    let model_info = get_model_info_with(&resolver, &model_uri)?;
    assert_eq!(model_info.signature()?, Some(new_signature));
    Ok(())
}

#[test]
fn test_cannot_set_signature_on_models_scheme_uris() {
    let signature = infer_signature(&array![1i64], None).unwrap();
    for uri in ["models:/dummy_model@champion", "Models:/dummy_model@champion"] {
        let err = set_signature(uri, &signature).unwrap_err();
        assert!(matches!(err, ModelkitError::UnsupportedUri(_)));
        assert!(err
            .to_string()
            .contains("Model URIs with the `models:/` scheme are not supported."));
    }
}

#[test]
fn test_set_signature_keeps_unknown_manifest_keys() -> ModelkitResult<()> {
    let dir = TempDir::new()?;
    let mut model = regressor();
    model.set_extra("mlflow_version", "2.9.2");
    save_model(dir.path(), &model)?;

    let signature = infer_signature(&array![1.0f64], None)?;
    set_signature(&dir.path().display().to_string(), &signature)?;

    let reloaded = Model::load(dir.path().join(MLMODEL_FILE_NAME))?;
    assert_eq!(
        reloaded.extra("mlflow_version"),
        Some(&serde_yaml::Value::from("2.9.2"))
    );
    assert_eq!(reloaded.model_uuid, model.model_uuid);
    assert!(reloaded.flavors.contains_key("sklearn"));
    assert_eq!(reloaded.signature()?, Some(signature));
    Ok(())
}

#[test]
fn test_set_signature_on_unknown_run() {
    let (_dir, resolver) = tracking();
    let signature = infer_signature(&array![1i64], None).unwrap();
    let err = set_signature_with(&resolver, "runs:/0123abcd/model", &signature).unwrap_err();
    assert!(matches!(err, ModelkitError::ResourceNotFound(_)));
}
