//! Model URI parsing.
//!
//! Supported forms:
//!
//! | URI | Variant |
//! |-----|---------|
//! | `runs:/<run_id>/<path>` | [`ModelUri::Run`] |
//! | `models:/<name>/<version>` | [`ModelUri::Registered`] with a version |
//! | `models:/<name>@<alias>` | [`ModelUri::Registered`] with an alias |
//! | `file:///abs/path` | [`ModelUri::Local`] |
//! | `<scheme>://...` | [`ModelUri::Remote`] |
//! | anything else | [`ModelUri::Local`] |

use crate::error::{ModelkitError, ModelkitResult};
use std::fmt;
use std::path::PathBuf;

/// How a registered model is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisteredRef {
    Version(String),
    Alias(String),
}

/// A parsed model location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelUri {
    /// Model logged under a run's artifact root
    Run { run_id: String, artifact_path: String },
    /// Model in a model registry
    Registered { name: String, reference: RegisteredRef },
    /// Directory on the local filesystem
    Local(PathBuf),
    /// Any other `<scheme>://` location
    Remote { scheme: String, uri: String },
}

impl ModelUri {
    /// Parses a model URI.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelkit_core::model::ModelUri;
    ///
    /// let uri = ModelUri::parse("runs:/abc123/model").unwrap();
    /// assert_eq!(
    ///     uri,
    ///     ModelUri::Run { run_id: "abc123".into(), artifact_path: "model".into() }
    /// );
    /// assert!(ModelUri::parse("models:/clf/1").unwrap().is_registered());
    /// ```
    pub fn parse(uri: &str) -> ModelkitResult<Self> {
        if let Some(rest) = strip_scheme(uri, "runs:/") {
            return parse_run(uri, rest);
        }
        if let Some(rest) = strip_scheme(uri, REGISTRY_PREFIX) {
            return parse_registered(uri, rest);
        }
        if let Some(path) = strip_scheme(uri, "file://") {
            return Ok(ModelUri::Local(PathBuf::from(path)));
        }
        if let Some((scheme, _)) = uri.split_once("://") {
            if is_scheme(scheme) {
                return Ok(ModelUri::Remote {
                    scheme: scheme.to_ascii_lowercase(),
                    uri: uri.to_string(),
                });
            }
        }
        if uri.is_empty() {
            return Err(ModelkitError::invalid_parameter("Model URI must not be empty"));
        }
        Ok(ModelUri::Local(PathBuf::from(uri)))
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, ModelUri::Registered { .. })
    }
}

/// Prefix of model registry URIs.
pub(crate) const REGISTRY_PREFIX: &str = "models:/";

/// Strips a scheme prefix such as `runs:/`, ignoring ASCII case.
pub(crate) fn strip_scheme<'a>(uri: &'a str, prefix: &str) -> Option<&'a str> {
    let head = uri.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        uri.get(prefix.len()..)
    } else {
        None
    }
}

fn parse_run(uri: &str, rest: &str) -> ModelkitResult<ModelUri> {
    let rest = rest.trim_start_matches('/');
    let (run_id, path) = rest.split_once('/').unwrap_or((rest, ""));
    let path = path.trim_matches('/');
    if run_id.is_empty() || path.is_empty() {
        return Err(ModelkitError::invalid_parameter(format!(
            "Not a proper runs:/ URI: {}. Runs URIs must be of the form 'runs:/<run_id>/run-relative/path/to/artifact'",
            uri
        )));
    }
    Ok(ModelUri::Run {
        run_id: run_id.to_string(),
        artifact_path: path.to_string(),
    })
}

fn parse_registered(uri: &str, rest: &str) -> ModelkitResult<ModelUri> {
    let rest = rest.trim_matches('/');
    let invalid = || {
        ModelkitError::invalid_parameter(format!(
            "Not a proper models:/ URI: {}. Models URIs must be of the form 'models:/<name>/<version>' or 'models:/<name>@<alias>'",
            uri
        ))
    };

    if let Some((name, version)) = rest.split_once('/') {
        if name.is_empty() || version.is_empty() || version.contains('/') {
            return Err(invalid());
        }
        return Ok(ModelUri::Registered {
            name: name.to_string(),
            reference: RegisteredRef::Version(version.to_string()),
        });
    }
    match rest.rsplit_once('@') {
        Some((name, alias)) if !name.is_empty() && !alias.is_empty() => Ok(ModelUri::Registered {
            name: name.to_string(),
            reference: RegisteredRef::Alias(alias.to_string()),
        }),
        _ => Err(invalid()),
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl fmt::Display for ModelUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelUri::Run { run_id, artifact_path } => write!(f, "runs:/{}/{}", run_id, artifact_path),
            ModelUri::Registered {
                name,
                reference: RegisteredRef::Version(v),
            } => write!(f, "models:/{}/{}", name, v),
            ModelUri::Registered {
                name,
                reference: RegisteredRef::Alias(a),
            } => write!(f, "models:/{}@{}", name, a),
            ModelUri::Local(path) => write!(f, "{}", path.display()),
            ModelUri::Remote { uri, .. } => f.write_str(uri),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runs_uri_with_nested_path() {
        let uri = ModelUri::parse("runs:/0a1b/models/clf").unwrap();
        assert_eq!(
            uri,
            ModelUri::Run {
                run_id: "0a1b".into(),
                artifact_path: "models/clf".into()
            }
        );
        assert_eq!(uri.to_string(), "runs:/0a1b/models/clf");
    }

    #[test]
    fn test_runs_uri_requires_run_and_path() {
        for bad in ["runs:/", "runs:/abc", "runs:/abc/", "runs://model"] {
            assert!(
                matches!(ModelUri::parse(bad), Err(ModelkitError::InvalidParameter(_))),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_models_uri_version_and_alias() {
        assert_eq!(
            ModelUri::parse("models:/clf/3").unwrap(),
            ModelUri::Registered {
                name: "clf".into(),
                reference: RegisteredRef::Version("3".into())
            }
        );
        assert_eq!(
            ModelUri::parse("models:/clf@champion").unwrap(),
            ModelUri::Registered {
                name: "clf".into(),
                reference: RegisteredRef::Alias("champion".into())
            }
        );
        assert!(ModelUri::parse("models:/clf").is_err());
    }

    #[test]
    fn test_parse_file_remote_and_local() {
        assert_eq!(
            ModelUri::parse("file:///tmp/model").unwrap(),
            ModelUri::Local(PathBuf::from("/tmp/model"))
        );
        assert_eq!(
            ModelUri::parse("s3://bucket/model").unwrap(),
            ModelUri::Remote {
                scheme: "s3".into(),
                uri: "s3://bucket/model".into()
            }
        );
        assert_eq!(
            ModelUri::parse("relative/model").unwrap(),
            ModelUri::Local(PathBuf::from("relative/model"))
        );
        assert!(ModelUri::parse("").is_err());
    }

    #[test]
    fn test_scheme_prefixes_ignore_case() {
        assert_eq!(
            ModelUri::parse("RUNS:/0a1b/model").unwrap(),
            ModelUri::Run {
                run_id: "0a1b".into(),
                artifact_path: "model".into()
            }
        );
        assert!(ModelUri::parse("Models:/clf@champion").unwrap().is_registered());
        assert_eq!(
            ModelUri::parse("FILE:///tmp/model").unwrap(),
            ModelUri::Local(PathBuf::from("/tmp/model"))
        );
        assert_eq!(strip_scheme("mödels:/x", REGISTRY_PREFIX), None);
    }
}
