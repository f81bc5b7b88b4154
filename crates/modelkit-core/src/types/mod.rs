//! Type and schema model.
//!
//! - [`DataType`] - scalar column types (`boolean` ... `datetime`)
//! - [`TensorDtype`] - numpy-style tensor element types
//! - [`ColSpec`] / [`TensorSpec`] - the two column kinds
//! - [`Schema`] - ordered, homogeneous list of column specs

mod data_type;
mod dtype;
mod schema;

pub use data_type::DataType;
pub use dtype::{TensorDtype, TensorElement, TimeUnit};
pub use schema::{ColSpec, ColumnSpec, Schema, TensorSpec};
