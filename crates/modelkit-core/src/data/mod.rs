//! In-memory sample data used for signature inference.
//!
//! Models are fed either tensors or tables. This module holds the minimal,
//! owned representations of both that [`crate::signature::infer_signature`]
//! can reflect over:
//!
//! - [`Tensor`] / [`NamedTensors`] - dtype-erased `ndarray` arrays
//! - [`Series`] / [`DataFrame`] - typed columns, optionally named
//!
//! Plain `ndarray` arrays can be passed to inference directly; [`Tensor`] only
//! exists so that arrays of different element types can share a collection.

mod table;
mod tensor;

pub use table::{ColumnValues, DataFrame, Scalar, Series};
pub use tensor::{NamedTensors, Tensor};
