//! Shared output helpers for CLI commands.

use colored::*;
use serde::Serialize;

/// Pretty JSON for terminal output.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Section header followed by a rule.
pub fn print_header(title: &str) {
    println!("{}", title.bold().cyan());
    println!("{}", "=".repeat(60).bright_black());
}

/// `key: value` line with the key dimmed.
pub fn format_field(key: &str, value: Option<&str>) -> String {
    format!("{:<18} {}", format!("{}:", key).bright_black(), value.unwrap_or("-"))
}
