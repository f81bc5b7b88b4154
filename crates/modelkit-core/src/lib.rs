//! Modelkit Core - Model signatures and model directory utilities.
//!
//! ## Quick Start
//!
//! Use the [`prelude`] module for common imports:
//!
//! ```rust
//! use modelkit_core::prelude::*;
//! use ndarray::Array2;
//!
//! let input = Array2::<f64>::zeros((4, 3));
//! let signature = infer_signature(&input, None).unwrap();
//! assert!(signature.inputs().is_tensor_spec());
//! ```
//!
//! ## Module Organization
//!
//! ### Types & Signatures
//! - [`types`] - Data types, tensor dtypes, column specs and schemas
//! - [`data`] - Sample data containers (tensors, series, data frames)
//! - [`signature`] - Model signatures and inference from sample data
//!
//! ### Models & Storage
//! - [`model`] - `MLmodel` manifests, flavors, bundled code, set_signature
//! - [`store`] - Artifact repositories, run store and URI resolution
//!
//! ### Ambient
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Error hierarchy

// ============================================================================
// Prelude - Common imports for convenience
// ============================================================================

/// Common imports for modelkit-core users.
pub mod prelude;

/// Unified error types for modelkit-core public API.
///
/// - [`ModelkitError`](error::ModelkitError) - Top-level error type
/// - [`SchemaError`](error::SchemaError) - Schema construction failures
pub mod error;
pub use error::{ErrorCode, ModelkitError, ModelkitResult, SchemaError};

/// Environment variables and resolved configuration
pub mod config;

// ============================================================================
// Types & Signatures
// ============================================================================

/// Data types, column specs and schemas
pub mod types;

/// Sample data used for signature inference
pub mod data;

/// Model signatures and signature inference
pub mod signature;

// ============================================================================
// Models & Storage
// ============================================================================

/// Model manifests and operations on stored models
pub mod model;

/// Artifact storage backends
pub mod store;

mod json;
