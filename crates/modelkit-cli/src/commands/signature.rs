//! `signature show` and `signature set` commands.

use super::utils::to_pretty_json;
use anyhow::{Context, Result};
use colored::*;
use modelkit_core::model::{get_model_info_with, set_signature_with};
use modelkit_core::signature::ModelSignature;
use modelkit_core::store::ArtifactResolver;
use std::fs;
use std::path::Path;

pub fn handle_signature_show(resolver: &ArtifactResolver, model_uri: &str, json: bool) -> Result<()> {
    let info = get_model_info_with(resolver, model_uri)
        .with_context(|| format!("Failed to load model {}", model_uri))?;

    if json {
        println!("{}", to_pretty_json(&info.signature)?);
        return Ok(());
    }
    match info.signature().context("Stored signature is malformed")? {
        Some(signature) => print!("{}", signature),
        None => println!("{}", "Model has no signature".yellow()),
    }
    Ok(())
}

pub fn handle_signature_set(
    resolver: &ArtifactResolver,
    model_uri: &str,
    signature_file: &Path,
) -> Result<()> {
    let signature = read_signature_file(signature_file)?;
    set_signature_with(resolver, model_uri, &signature)
        .with_context(|| format!("Failed to set signature on {}", model_uri))?;
    println!("{} signature of {}", "Updated".green(), model_uri);
    Ok(())
}

/// Reads a signature in dict form: `{"inputs": "<schema json>", "outputs": ...}`.
pub fn read_signature_file(path: &Path) -> Result<ModelSignature> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    ModelSignature::from_json(&text)
        .with_context(|| format!("Invalid signature in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelkit_core::model::{save_model, Model};
    use modelkit_core::store::FileRunStore;
    use tempfile::TempDir;

    #[test]
    fn test_set_from_file_then_show() -> Result<()> {
        let dir = TempDir::new()?;
        let model_dir = dir.path().join("model");
        save_model(&model_dir, &Model::new())?;

        let sig_file = dir.path().join("signature.json");
        fs::write(
            &sig_file,
            r#"{"inputs": "[{\"type\": \"double\", \"name\": \"x\"}]", "outputs": "[{\"type\": \"long\", \"name\": null}]"}"#,
        )?;

        let resolver = ArtifactResolver::new(FileRunStore::new(dir.path().join("mlruns")));
        let uri = model_dir.display().to_string();
        handle_signature_set(&resolver, &uri, &sig_file)?;

        let stored = Model::load(&model_dir)?.signature()?;
        assert_eq!(stored, Some(read_signature_file(&sig_file)?));
        handle_signature_show(&resolver, &uri, false)?;
        Ok(())
    }

    #[test]
    fn test_invalid_signature_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let sig_file = dir.path().join("signature.json");
        fs::write(&sig_file, r#"{"outputs": "[]"}"#).unwrap();
        let err = read_signature_file(&sig_file).unwrap_err();
        assert!(format!("{:#}", err).contains("malformed signature"));
    }
}
