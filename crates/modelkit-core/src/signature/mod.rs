//! Model signatures.
//!
//! - [`ModelSignature`] - input schema plus optional output schema
//! - [`SignatureDict`] - the double-encoded form stored in `MLmodel`
//! - [`infer_signature`] - derive a signature from sample data

mod infer;
mod model_signature;

pub use infer::{infer_column_type, infer_signature, InferSchema};
pub use model_signature::{ModelSignature, SignatureDict};
