//! Dtype-erased tensors.

use crate::types::TensorDtype;
use ndarray::{Array, ArrayD, Dimension};

macro_rules! define_tensor {
    ($($variant:ident($ty:ty) => $dtype:ident),+ $(,)?) => {
        /// An owned n-dimensional array of any supported element type.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Tensor {
            $($variant(ArrayD<$ty>),)+
        }

        impl Tensor {
            /// Element dtype.
            pub fn dtype(&self) -> TensorDtype {
                match self {
                    $(Tensor::$variant(_) => TensorDtype::$dtype,)+
                }
            }

            /// Dimensions in row-major order.
            pub fn shape(&self) -> &[usize] {
                match self {
                    $(Tensor::$variant(a) => a.shape(),)+
                }
            }
        }

        $(impl<D: Dimension> From<Array<$ty, D>> for Tensor {
            fn from(array: Array<$ty, D>) -> Self {
                Tensor::$variant(array.into_dyn())
            }
        })+
    };
}

define_tensor! {
    Bool(bool) => Bool,
    Int8(i8) => Int8,
    Int16(i16) => Int16,
    Int32(i32) => Int32,
    Int64(i64) => Int64,
    UInt8(u8) => UInt8,
    UInt16(u16) => UInt16,
    UInt32(u32) => UInt32,
    UInt64(u64) => UInt64,
    Float32(f32) => Float32,
    Float64(f64) => Float64,
    Str(String) => Str,
    Bytes(Vec<u8>) => Bytes,
}

/// Insertion-ordered mapping from input name to tensor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedTensors {
    entries: Vec<(String, Tensor)>,
}

impl NamedTensors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the tensor stored under `name`. A replaced entry keeps
    /// its original position.
    pub fn insert(&mut self, name: impl Into<String>, tensor: impl Into<Tensor>) {
        let name = name.into();
        let tensor = tensor.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = tensor,
            None => self.entries.push((name, tensor)),
        }
    }

    /// Builder form of [`NamedTensors::insert`].
    pub fn with(mut self, name: impl Into<String>, tensor: impl Into<Tensor>) -> Self {
        self.insert(name, tensor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tensor)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
