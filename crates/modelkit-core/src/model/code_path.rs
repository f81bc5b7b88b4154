//! Code bundled with a model.
//!
//! At save time [`copy_code_paths`] copies source files and packages into a
//! subdirectory of the model, whose name the flavor records under its `code`
//! key. At load time [`add_code_from_conf_to_system_path`] registers that
//! subdirectory on the process-wide [`search_path`](super::search_path).

use super::manifest::FlavorConfig;
use super::search_path;
use crate::config::ModelkitConfig;
use crate::error::{ModelkitError, ModelkitResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Flavor key naming the bundled code directory.
pub const FLAVOR_CONFIG_CODE: &str = "code";

/// Registers the code directory named by the flavor's `code` key.
///
/// See [`add_code_from_conf_to_system_path_with_config`].
pub fn add_code_from_conf_to_system_path(
    model_path: impl AsRef<Path>,
    flavor_config: &FlavorConfig,
) -> ModelkitResult<Option<PathBuf>> {
    add_code_from_conf_to_system_path_with_key(model_path, flavor_config, FLAVOR_CONFIG_CODE)
}

/// Like [`add_code_from_conf_to_system_path`] with a custom flavor key, using
/// the configuration read from the environment.
pub fn add_code_from_conf_to_system_path_with_key(
    model_path: impl AsRef<Path>,
    flavor_config: &FlavorConfig,
    code_key: &str,
) -> ModelkitResult<Option<PathBuf>> {
    let config = ModelkitConfig::from_env()?;
    add_code_from_conf_to_system_path_with_config(model_path, flavor_config, code_key, &config)
}

/// Registers `<model_path>/<flavor_config[code_key]>` on the global search
/// path and returns it.
///
/// Nothing happens, and `None` is returned, when the key is absent, null or
/// an empty string. The directory itself is registered, not the entries in
/// it, so modules inside a bundled package stay reachable only through that
/// package. Registering the same directory again is a no-op.
///
/// A plain search path prepend would accept a directory that is not there.
/// Here a missing code directory fails with `ResourceNotFound` unless
/// `config.validate_code_paths` is off, in which case it is logged and
/// skipped with `Ok(None)`.
pub fn add_code_from_conf_to_system_path_with_config(
    model_path: impl AsRef<Path>,
    flavor_config: &FlavorConfig,
    code_key: &str,
    config: &ModelkitConfig,
) -> ModelkitResult<Option<PathBuf>> {
    let code_dir_name = match flavor_config.get(code_key) {
        None | Some(serde_yaml::Value::Null) => return Ok(None),
        Some(serde_yaml::Value::String(name)) if name.is_empty() => {
            log::warn!("Flavor key '{}' is empty; no code to add", code_key);
            return Ok(None);
        }
        Some(serde_yaml::Value::String(name)) => name,
        Some(other) => {
            return Err(ModelkitError::invalid_parameter(format!(
                "Flavor key '{}' must name a directory, got {:?}",
                code_key, other
            )))
        }
    };

    let code_dir = model_path.as_ref().join(code_dir_name);
    if !code_dir.is_dir() {
        if config.validate_code_paths {
            return Err(ModelkitError::not_found(format!(
                "Code directory \"{}\" does not exist",
                code_dir.display()
            )));
        }
        log::warn!("Skipping missing code directory {}", code_dir.display());
        return Ok(None);
    }

    if search_path::global_prepend(&code_dir)? {
        log::info!("Added {} to the module search path", code_dir.display());
    } else {
        log::debug!("{} is already on the module search path", code_dir.display());
    }
    Ok(Some(code_dir))
}

/// Copies each file or directory in `code_paths` into
/// `<model_path>/<dir_name>/`, keeping its base name.
///
/// Returns the directory name to record under the flavor's `code` key, or
/// `None` when `code_paths` is empty. A source that does not exist fails with
/// `InvalidParameter` before anything is copied.
pub fn copy_code_paths<P: AsRef<Path>>(
    code_paths: &[P],
    model_path: impl AsRef<Path>,
    dir_name: &str,
) -> ModelkitResult<Option<String>> {
    if code_paths.is_empty() {
        return Ok(None);
    }
    for src in code_paths {
        let src = src.as_ref();
        if !src.exists() {
            return Err(ModelkitError::invalid_parameter(format!(
                "Code path \"{}\" does not exist",
                src.display()
            )));
        }
    }

    let target = model_path.as_ref().join(dir_name);
    fs::create_dir_all(&target)?;
    for src in code_paths {
        let src = src.as_ref();
        let name = src.file_name().ok_or_else(|| {
            ModelkitError::invalid_parameter(format!(
                "Code path \"{}\" has no file name",
                src.display()
            ))
        })?;
        copy_recursive(src, &target.join(name))?;
        log::debug!("Copied {} into {}", src.display(), target.display());
    }
    Ok(Some(dir_name.to_string()))
}

/// [`copy_code_paths`] into the configured `code_dir`.
pub fn copy_code_paths_with_config<P: AsRef<Path>>(
    code_paths: &[P],
    model_path: impl AsRef<Path>,
    config: &ModelkitConfig,
) -> ModelkitResult<Option<String>> {
    copy_code_paths(code_paths, model_path, &config.code_dir)
}

fn copy_recursive(src: &Path, dst: &Path) -> ModelkitResult<()> {
    if src.is_dir() {
        fs::create_dir_all(dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &dst.join(entry.file_name()))?;
        }
    } else {
        fs::copy(src, dst)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_code_paths_keeps_base_names() -> ModelkitResult<()> {
        let src = TempDir::new()?;
        fs::write(src.path().join("module.py"), "x = 1\n")?;
        fs::create_dir_all(src.path().join("pkg/sub"))?;
        fs::write(src.path().join("pkg/sub/leaf.py"), "")?;

        let model = TempDir::new()?;
        let recorded = copy_code_paths(
            &[src.path().join("module.py"), src.path().join("pkg")],
            model.path(),
            "code",
        )?;
        assert_eq!(recorded.as_deref(), Some("code"));
        assert!(model.path().join("code/module.py").is_file());
        assert!(model.path().join("code/pkg/sub/leaf.py").is_file());
        Ok(())
    }

    #[test]
    fn test_copy_code_paths_rejects_missing_source() {
        let model = TempDir::new().unwrap();
        let err = copy_code_paths(&["/nonexistent/module.py"], model.path(), "code").unwrap_err();
        assert!(matches!(err, ModelkitError::InvalidParameter(_)));
        assert!(!model.path().join("code").exists());
    }

    #[test]
    fn test_no_code_paths_records_nothing() -> ModelkitResult<()> {
        let model = TempDir::new()?;
        let none: [&str; 0] = [];
        assert_eq!(copy_code_paths(&none, model.path(), "code")?, None);
        Ok(())
    }

    #[test]
    fn test_absent_or_empty_code_key_is_noop() -> ModelkitResult<()> {
        let model = TempDir::new()?;
        let mut config = FlavorConfig::new();
        assert_eq!(add_code_from_conf_to_system_path(model.path(), &config)?, None);
        config.insert(FLAVOR_CONFIG_CODE.into(), serde_yaml::Value::Null);
        assert_eq!(add_code_from_conf_to_system_path(model.path(), &config)?, None);
        config.insert(FLAVOR_CONFIG_CODE.into(), "".into());
        assert_eq!(add_code_from_conf_to_system_path(model.path(), &config)?, None);
        Ok(())
    }

    #[test]
    fn test_non_string_code_key_is_rejected() {
        let mut config = FlavorConfig::new();
        config.insert(FLAVOR_CONFIG_CODE.into(), serde_yaml::Value::Bool(true));
        assert!(matches!(
            add_code_from_conf_to_system_path("/tmp", &config),
            Err(ModelkitError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_missing_code_directory_is_not_found() {
        let model = TempDir::new().unwrap();
        let mut config = FlavorConfig::new();
        config.insert(FLAVOR_CONFIG_CODE.into(), "code".into());
        assert!(matches!(
            add_code_from_conf_to_system_path(model.path(), &config),
            Err(ModelkitError::ResourceNotFound(_))
        ));
    }

    #[test]
    fn test_missing_code_directory_skipped_without_validation() -> ModelkitResult<()> {
        let model = TempDir::new()?;
        let mut flavor = FlavorConfig::new();
        flavor.insert(FLAVOR_CONFIG_CODE.into(), "code".into());
        let config = ModelkitConfig::builtin().with_validate_code_paths(false);

        let added = add_code_from_conf_to_system_path_with_config(
            model.path(),
            &flavor,
            FLAVOR_CONFIG_CODE,
            &config,
        )?;
        assert_eq!(added, None);

        let model_root = fs::canonicalize(model.path())?;
        assert!(search_path::global_entries()
            .iter()
            .all(|entry| !entry.starts_with(&model_root)));
        Ok(())
    }

    #[test]
    fn test_validation_on_reports_missing_directory() {
        let model = TempDir::new().unwrap();
        let mut flavor = FlavorConfig::new();
        flavor.insert("source_dir".into(), "src".into());
        let config = ModelkitConfig::builtin().with_validate_code_paths(true);
        let err = add_code_from_conf_to_system_path_with_config(
            model.path(),
            &flavor,
            "source_dir",
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, ModelkitError::ResourceNotFound(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_copy_into_configured_code_dir() -> ModelkitResult<()> {
        let src = TempDir::new()?;
        fs::write(src.path().join("module.py"), "")?;
        let model = TempDir::new()?;
        let config = ModelkitConfig::builtin().with_code_dir("src");

        let recorded =
            copy_code_paths_with_config(&[src.path().join("module.py")], model.path(), &config)?;
        assert_eq!(recorded.as_deref(), Some("src"));
        assert!(model.path().join("src/module.py").is_file());
        Ok(())
    }

    #[test]
    fn test_custom_key_registers_directory() -> ModelkitResult<()> {
        let model = TempDir::new()?;
        fs::create_dir(model.path().join("src"))?;
        let mut config = FlavorConfig::new();
        config.insert("source_dir".into(), "src".into());

        let added = add_code_from_conf_to_system_path_with_key(model.path(), &config, "source_dir")?;
        assert_eq!(added, Some(model.path().join("src")));
        assert!(search_path::global_contains(model.path().join("src")));
        Ok(())
    }
}
