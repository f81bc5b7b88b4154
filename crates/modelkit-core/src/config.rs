//! Configuration read from the process environment.
//!
//! Every setting is declared once as a typed environment variable with a
//! default. [`ModelkitConfig`] collects them into a plain struct that can also
//! be built explicitly, which is what tests and embedding applications do.
//!
//! | Variable | Type | Default |
//! |----------|------|---------|
//! | `MODELKIT_TRACKING_URI` | path or `file://` URI | `./mlruns` |
//! | `MODELKIT_CODE_DIR` | directory name | `code` |
//! | `MODELKIT_VALIDATE_CODE_PATHS` | bool | `true` |

use crate::error::{ModelkitError, ModelkitResult};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// An environment variable parsed into `T`, falling back to a default.
#[derive(Debug, Clone)]
pub struct EnvironmentVariable<T> {
    name: &'static str,
    default: T,
}

impl<T> EnvironmentVariable<T>
where
    T: FromStr + Clone,
    T::Err: fmt::Display,
{
    pub fn new(name: &'static str, default: T) -> Self {
        Self { name, default }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn is_defined(&self) -> bool {
        std::env::var_os(self.name).is_some()
    }

    /// Raw value, if set and valid unicode.
    pub fn get_raw(&self) -> Option<String> {
        std::env::var(self.name).ok()
    }

    /// Parsed value, or the default when unset.
    pub fn get(&self) -> ModelkitResult<T> {
        match self.get_raw() {
            Some(raw) => raw.parse().map_err(|e: T::Err| {
                ModelkitError::invalid_parameter(format!(
                    "Failed to convert {:?} for {}: {}",
                    raw, self.name, e
                ))
            }),
            None => Ok(self.default.clone()),
        }
    }
}

impl<T: fmt::Debug> fmt::Display for EnvironmentVariable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (default: {:?})", self.name, self.default)
    }
}

/// A boolean environment variable accepting `true`, `false`, `1` or `0`,
/// case-insensitively.
#[derive(Debug, Clone, Copy)]
pub struct BooleanEnvironmentVariable {
    name: &'static str,
    default: bool,
}

impl BooleanEnvironmentVariable {
    pub const fn new(name: &'static str, default: bool) -> Self {
        Self { name, default }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_defined(&self) -> bool {
        std::env::var_os(self.name).is_some()
    }

    pub fn get(&self) -> ModelkitResult<bool> {
        match std::env::var(self.name) {
            Ok(raw) => parse_bool(self.name, &raw),
            Err(_) => Ok(self.default),
        }
    }
}

fn parse_bool(name: &str, raw: &str) -> ModelkitResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ModelkitError::invalid_parameter(format!(
            "{} value must be one of ['true', 'false', '1', '0'] (case-insensitive), but got {}",
            name, raw
        ))),
    }
}

lazy_static! {
    /// Root of the file-based run store used to resolve `runs:/` URIs.
    pub static ref MODELKIT_TRACKING_URI: EnvironmentVariable<String> =
        EnvironmentVariable::new("MODELKIT_TRACKING_URI", "./mlruns".to_string());

    /// Name of the directory inside a model that holds bundled code.
    pub static ref MODELKIT_CODE_DIR: EnvironmentVariable<String> =
        EnvironmentVariable::new("MODELKIT_CODE_DIR", "code".to_string());
}

/// Whether a flavor's configured code directory must exist when it is added
/// to the search path. When false a missing directory is logged and skipped.
pub const MODELKIT_VALIDATE_CODE_PATHS: BooleanEnvironmentVariable =
    BooleanEnvironmentVariable::new("MODELKIT_VALIDATE_CODE_PATHS", true);

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelkitConfig {
    /// Tracking store location: a local path or a `file://` URI.
    #[serde(default = "default_tracking_uri")]
    pub tracking_uri: String,

    /// Directory name under a model root that holds bundled code.
    #[serde(default = "default_code_dir")]
    pub code_dir: String,

    /// Fail instead of warn when a configured code directory is missing.
    #[serde(default = "default_validate_code_paths")]
    pub validate_code_paths: bool,
}

fn default_tracking_uri() -> String {
    MODELKIT_TRACKING_URI.default_value().clone()
}

fn default_code_dir() -> String {
    MODELKIT_CODE_DIR.default_value().clone()
}

fn default_validate_code_paths() -> bool {
    true
}

impl Default for ModelkitConfig {
    /// Environment values where they parse, built-in defaults otherwise.
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            log::warn!("Ignoring environment configuration: {}", e);
            Self::builtin()
        })
    }
}

impl ModelkitConfig {
    /// Built-in defaults, ignoring the environment.
    pub fn builtin() -> Self {
        Self {
            tracking_uri: default_tracking_uri(),
            code_dir: default_code_dir(),
            validate_code_paths: default_validate_code_paths(),
        }
    }

    /// Reads every variable, failing on values that do not parse.
    pub fn from_env() -> ModelkitResult<Self> {
        Ok(Self {
            tracking_uri: MODELKIT_TRACKING_URI.get()?,
            code_dir: MODELKIT_CODE_DIR.get()?,
            validate_code_paths: MODELKIT_VALIDATE_CODE_PATHS.get()?,
        })
    }

    /// Set the tracking URI.
    pub fn with_tracking_uri(mut self, uri: impl Into<String>) -> Self {
        self.tracking_uri = uri.into();
        self
    }

    /// Set the code directory name.
    pub fn with_code_dir(mut self, dir: impl Into<String>) -> Self {
        self.code_dir = dir.into();
        self
    }

    /// Set whether missing code directories are an error.
    pub fn with_validate_code_paths(mut self, validate: bool) -> Self {
        self.validate_code_paths = validate;
        self
    }

    /// Local directory backing the tracking URI.
    pub fn tracking_root(&self) -> PathBuf {
        let uri = self.tracking_uri.as_str();
        PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
    }
}
