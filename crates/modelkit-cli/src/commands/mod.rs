//! CLI command handlers organized by subcommand.
//!
//! | Module | Commands |
//! |--------|----------|
//! | [`model`] | `flavor`, `info`, `code-path` |
//! | [`signature`] | `signature show`, `signature set` |

pub mod model;
pub mod signature;
pub mod utils;

pub use model::{handle_code_path_command, handle_flavor_command, handle_info_command};
pub use signature::{handle_signature_set, handle_signature_show};
