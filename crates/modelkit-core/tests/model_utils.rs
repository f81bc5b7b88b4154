//! Integration tests for flavor lookup and bundled code registration.

use modelkit_core::model::{
    add_code_from_conf_to_system_path, copy_code_paths, get_flavor_configuration, save_model,
    search_path, FlavorConfig, Model, FLAVOR_CONFIG_CODE, MLMODEL_FILE_NAME,
};
use modelkit_core::{ErrorCode, ModelkitResult};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SKLEARN_FLAVOR: &str = "sklearn";
const MLEAP_FLAVOR: &str = "mleap";

fn sklearn_flavor() -> FlavorConfig {
    let mut config = FlavorConfig::new();
    config.insert("pickled_model".into(), "model.pkl".into());
    config.insert("serialization_format".into(), "cloudpickle".into());
    config
}

fn model_path(dir: &TempDir) -> PathBuf {
    dir.path().join("model")
}

/// Source tree with a top-level module and a package whose `operator`
/// module shares its name with a well-known top-level module.
fn write_test_resources(root: &Path) -> ModelkitResult<(PathBuf, PathBuf)> {
    let module = root.join("dummy_module.py");
    fs::write(&module, "def hello():\n    return 'hi'\n")?;

    let package = root.join("dummy_package");
    fs::create_dir_all(&package)?;
    fs::write(package.join("__init__.py"), "")?;
    fs::write(package.join("base.py"), "from dummy_package import operator\n")?;
    fs::write(package.join("operator.py"), "")?;
    fs::write(package.join("test.py"), "from dummy_package.operator import *\n")?;
    Ok((module, package))
}

#[test]
fn test_get_flavor_configuration_throws_exception_when_model_configuration_does_not_exist() {
    let dir = TempDir::new().unwrap();
    let err = get_flavor_configuration(model_path(&dir), MLEAP_FLAVOR).unwrap_err();
    assert!(err
        .to_string()
        .contains("Could not find an \"MLmodel\" configuration file"));
    assert_eq!(err.error_code(), ErrorCode::ResourceDoesNotExist);
}

#[test]
fn test_get_flavor_configuration_throws_exception_when_requested_flavor_is_missing(
) -> ModelkitResult<()> {
    let dir = TempDir::new()?;
    let path = model_path(&dir);
    save_model(&path, &Model::new().add_flavor(SKLEARN_FLAVOR, sklearn_flavor()))?;

    assert!(get_flavor_configuration(&path, SKLEARN_FLAVOR).is_ok());

    let err = get_flavor_configuration(&path, MLEAP_FLAVOR).unwrap_err();
    assert!(err.to_string().contains("Model does not have the \"mleap\" flavor"));
    assert_eq!(err.error_code(), ErrorCode::ResourceDoesNotExist);
    Ok(())
}

#[test]
fn test_get_flavor_configuration_with_present_flavor_returns_expected_configuration(
) -> ModelkitResult<()> {
    let dir = TempDir::new()?;
    let path = model_path(&dir);
    save_model(&path, &Model::new().add_flavor(SKLEARN_FLAVOR, sklearn_flavor()))?;

    let config = get_flavor_configuration(&path, SKLEARN_FLAVOR)?;
    let model = Model::load(path.join(MLMODEL_FILE_NAME))?;
    assert_eq!(Some(&config), model.flavors.get(SKLEARN_FLAVOR));
    Ok(())
}

#[test]
fn test_add_code_to_system_path() -> ModelkitResult<()> {
    let resources = TempDir::new()?;
    let (module, package) = write_test_resources(resources.path())?;

    let dir = TempDir::new()?;
    let path = model_path(&dir);
    fs::create_dir_all(&path)?;
    let mut flavor = sklearn_flavor();
    if let Some(code) = copy_code_paths(&[module, package], &path, "code")? {
        flavor.insert(FLAVOR_CONFIG_CODE.into(), code.into());
    }
    Model::new()
        .add_flavor(SKLEARN_FLAVOR, flavor)
        .save(path.join(MLMODEL_FILE_NAME))?;

    let config = get_flavor_configuration(&path, SKLEARN_FLAVOR)?;
    assert_eq!(search_path::global_resolve("dummy_module"), None);

    let added = add_code_from_conf_to_system_path(&path, &config)?;
    assert_eq!(added, Some(path.join("code")));

    let code_dir = fs::canonicalize(path.join("code"))?;
    assert_eq!(
        search_path::global_resolve("dummy_module"),
        Some(code_dir.join("dummy_module.py"))
    );
    assert_eq!(
        search_path::global_resolve("dummy_package.base"),
        Some(code_dir.join("dummy_package").join("base.py"))
    );
    assert_eq!(
        search_path::global_resolve("dummy_package.operator"),
        Some(code_dir.join("dummy_package").join("operator.py"))
    );
    // the package's own modules must not be importable at top level
    assert_eq!(search_path::global_resolve("operator"), None);

    // registering again keeps a single entry
    add_code_from_conf_to_system_path(&path, &config)?;
    let entries = search_path::global_entries();
    assert_eq!(entries.iter().filter(|e| **e == code_dir).count(), 1);
    Ok(())
}
