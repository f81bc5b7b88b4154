//! Model directories: the `MLmodel` manifest, flavor lookup, bundled code,
//! and operations on stored models.

mod code_path;
mod flavor;
mod manifest;
mod ops;
pub mod search_path;
mod uri;

pub use code_path::{
    add_code_from_conf_to_system_path, add_code_from_conf_to_system_path_with_config,
    add_code_from_conf_to_system_path_with_key, copy_code_paths, copy_code_paths_with_config,
    FLAVOR_CONFIG_CODE,
};
pub use flavor::get_flavor_configuration;
pub use manifest::{FlavorConfig, Model, ModelInfo, MLMODEL_FILE_NAME};
pub use ops::{
    get_model_info, get_model_info_with, log_model, save_model, set_signature, set_signature_with,
};
pub use search_path::SearchPath;
pub use uri::{ModelUri, RegisteredRef};
