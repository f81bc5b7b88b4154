//! Common imports for modelkit-core users.
//!
//! ```rust
//! use modelkit_core::prelude::*;
//! ```

pub use crate::config::ModelkitConfig;
pub use crate::data::{ColumnValues, DataFrame, NamedTensors, Scalar, Series, Tensor};
pub use crate::error::{ErrorCode, ModelkitError, ModelkitResult, SchemaError};
pub use crate::model::{
    add_code_from_conf_to_system_path, get_flavor_configuration, get_model_info, log_model,
    save_model, set_signature, FlavorConfig, Model, ModelInfo, ModelUri,
};
pub use crate::signature::{infer_signature, InferSchema, ModelSignature};
pub use crate::store::{ArtifactRepository, ArtifactResolver, FileRunStore, LocalArtifactRepository};
pub use crate::types::{ColSpec, ColumnSpec, DataType, Schema, TensorDtype, TensorSpec};
