//! `flavor`, `info` and `code-path` commands.

use super::utils::{format_field, print_header, to_pretty_json};
use anyhow::{Context, Result};
use colored::*;
use modelkit_core::config::ModelkitConfig;
use modelkit_core::model::{
    add_code_from_conf_to_system_path_with_config, get_flavor_configuration, get_model_info_with,
    search_path, ModelInfo, FLAVOR_CONFIG_CODE,
};
use modelkit_core::store::ArtifactResolver;
use std::path::Path;

pub fn handle_flavor_command(model_path: &Path, flavor: &str) -> Result<()> {
    let config = get_flavor_configuration(model_path, flavor).with_context(|| {
        format!(
            "Failed to read flavor '{}' from {}",
            flavor,
            model_path.display()
        )
    })?;
    println!("{}", to_pretty_json(&config)?);
    Ok(())
}

pub fn handle_info_command(resolver: &ArtifactResolver, model_uri: &str) -> Result<()> {
    let info = get_model_info_with(resolver, model_uri)
        .with_context(|| format!("Failed to load model info for {}", model_uri))?;
    print_header("Model Info");
    println!("{}", render_info(&info)?);
    Ok(())
}

/// Human-readable summary of a [`ModelInfo`].
pub fn render_info(info: &ModelInfo) -> Result<String> {
    let mut lines = vec![
        format_field("model_uri", Some(&info.model_uri)),
        format_field("model_uuid", info.model_uuid.as_deref()),
        format_field("run_id", info.run_id.as_deref()),
        format_field("artifact_path", info.artifact_path.as_deref()),
        format_field("utc_time_created", info.utc_time_created.as_deref()),
    ];
    let flavors: Vec<&str> = info.flavors.keys().map(String::as_str).collect();
    lines.push(format_field("flavors", Some(&flavors.join(", "))));

    match info.signature()? {
        Some(signature) => {
            lines.push(format!("{}", "signature:".bright_black()));
            lines.extend(signature.to_string().lines().map(|l| format!("  {}", l)));
        }
        None => lines.push(format_field("signature", None)),
    }
    if let Some(metadata) = &info.metadata {
        lines.push(format_field("metadata", Some(&to_pretty_json(metadata)?)));
    }
    Ok(lines.join("\n"))
}

pub fn handle_code_path_command(
    config: &ModelkitConfig,
    model_path: &Path,
    flavor: &str,
) -> Result<()> {
    let flavor_config = get_flavor_configuration(model_path, flavor)
        .with_context(|| format!("Failed to read flavor '{}'", flavor))?;
    match add_code_from_conf_to_system_path_with_config(
        model_path,
        &flavor_config,
        FLAVOR_CONFIG_CODE,
        config,
    )
    .context("Failed to add model code to the search path")?
    {
        Some(dir) => println!("{} {}", "Added".green(), dir.display()),
        None => println!("{}", "Flavor has no bundled code".yellow()),
    }

    print_header("Search Path");
    for entry in search_path::global_entries() {
        println!("{}", entry.display());
    }
    Ok(())
}
