//! Unified error types for modelkit-core public API.
//!
//! Every fallible public operation returns [`ModelkitResult`]. Errors are raised
//! at the point of detection and never retried here; retry policy belongs to the
//! storage backends that sit behind [`crate::store::ArtifactRepository`].
//!
//! # Error Hierarchy
//!
//! ```text
//! ModelkitError
//! ├── Schema(SchemaError)        -- Malformed schema (mixed naming/kinds, bad shape, bad type)
//! ├── SignatureInference(String) -- Unsupported or ambiguous element type
//! ├── Serialization(String)      -- Malformed JSON/YAML or missing structural markers
//! ├── ResourceNotFound(String)   -- Missing MLmodel file, flavor, or run
//! ├── ResourceAlreadyExists(String)
//! ├── UnsupportedUri(String)     -- e.g. `models:/` URIs passed to set_signature
//! ├── InvalidParameter(String)
//! └── Io(std::io::Error)
//! ```
//!
//! Each variant maps to a machine-checkable [`ErrorCode`] so callers can branch
//! on the failure class without matching message text.

use std::fmt;
use thiserror::Error;

/// The canonical error type for modelkit-core public API.
#[derive(Error, Debug)]
pub enum ModelkitError {
    /// A schema or column spec could not be constructed
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Signature inference hit an element type it cannot map
    #[error("Failed to infer signature: {0}")]
    SignatureInference(String),

    /// Serialization/deserialization error (JSON, YAML, signature wire form)
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Resource not found (manifest, flavor, run, artifact)
    #[error("{0}")]
    ResourceNotFound(String),

    /// Resource already exists (e.g. saving into a non-empty directory)
    #[error("{0}")]
    ResourceAlreadyExists(String),

    /// The URI scheme cannot be used for the requested operation
    #[error("{0}")]
    UnsupportedUri(String),

    /// Invalid argument or configuration value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while constructing types and schemas.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Some column specs are named and others are not
    #[error("Creating Schema with a combination of named and unnamed columns is not supported. Got names {names:?}")]
    MixedNaming {
        /// Names as they appear in the offending schema
        names: Vec<Option<String>>,
    },

    /// ColSpec and TensorSpec in the same schema
    #[error("Please choose either TensorSpec or ColSpec to represent the inputs of the model. A schema cannot mix both kinds of column spec.")]
    MixedKinds,

    /// Tensor shape is empty or has an invalid dimension
    #[error("Invalid tensor shape {shape:?}: {reason}")]
    InvalidShape {
        /// The rejected shape
        shape: Vec<i64>,
        /// Why it was rejected
        reason: String,
    },

    /// A data type or dtype name is not part of the supported set
    #[error("Unsupported type '{0}'")]
    UnsupportedType(String),
}

/// Machine-checkable error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ResourceDoesNotExist,
    ResourceAlreadyExists,
    InvalidParameterValue,
    InternalError,
}

impl ErrorCode {
    /// Wire name of the code, e.g. `RESOURCE_DOES_NOT_EXIST`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ResourceDoesNotExist => "RESOURCE_DOES_NOT_EXIST",
            ErrorCode::ResourceAlreadyExists => "RESOURCE_ALREADY_EXISTS",
            ErrorCode::InvalidParameterValue => "INVALID_PARAMETER_VALUE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type alias for modelkit-core.
pub type ModelkitResult<T> = Result<T, ModelkitError>;

// ─────────────────────────────────────────────────────────────────────────────
// Conversions from external errors
// ─────────────────────────────────────────────────────────────────────────────

impl From<serde_json::Error> for ModelkitError {
    fn from(e: serde_json::Error) -> Self {
        ModelkitError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for ModelkitError {
    fn from(e: serde_yaml::Error) -> Self {
        ModelkitError::Serialization(e.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Convenience constructors
// ─────────────────────────────────────────────────────────────────────────────

impl ModelkitError {
    /// Create a "resource not found" error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        ModelkitError::ResourceNotFound(msg.into())
    }

    /// Create a "resource already exists" error.
    pub fn already_exists(msg: impl Into<String>) -> Self {
        ModelkitError::ResourceAlreadyExists(msg.into())
    }

    /// Create a signature inference error.
    pub fn inference(msg: impl Into<String>) -> Self {
        ModelkitError::SignatureInference(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        ModelkitError::Serialization(msg.into())
    }

    /// Create an unsupported URI error.
    pub fn unsupported_uri(msg: impl Into<String>) -> Self {
        ModelkitError::UnsupportedUri(msg.into())
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        ModelkitError::InvalidParameter(msg.into())
    }

    /// Classify this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ModelkitError::ResourceNotFound(_) => ErrorCode::ResourceDoesNotExist,
            ModelkitError::ResourceAlreadyExists(_) => ErrorCode::ResourceAlreadyExists,
            ModelkitError::Schema(_)
            | ModelkitError::SignatureInference(_)
            | ModelkitError::Serialization(_)
            | ModelkitError::UnsupportedUri(_)
            | ModelkitError::InvalidParameter(_) => ErrorCode::InvalidParameterValue,
            ModelkitError::Io(_) => ErrorCode::InternalError,
        }
    }
}
