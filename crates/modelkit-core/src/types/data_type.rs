//! Scalar column data types.

use super::dtype::{TensorDtype, TimeUnit};
use crate::error::{ModelkitError, ModelkitResult, SchemaError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of data types a [`ColSpec`](super::ColSpec) may carry.
///
/// Each variant has exactly one serialized name (its lowercase variant name)
/// and one canonical in-memory representation, see [`DataType::to_dtype`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Logical, true/false
    Boolean,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// UTF-8 text
    String,
    /// Raw bytes
    Binary,
    /// Point in time; every precision normalizes to this variant
    Datetime,
}

impl DataType {
    pub const ALL: [DataType; 8] = [
        DataType::Boolean,
        DataType::Integer,
        DataType::Long,
        DataType::Float,
        DataType::Double,
        DataType::String,
        DataType::Binary,
        DataType::Datetime,
    ];

    /// Serialized name, e.g. `"double"`.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::String => "string",
            DataType::Binary => "binary",
            DataType::Datetime => "datetime",
        }
    }

    /// Canonical in-memory representation of this type.
    pub fn to_dtype(&self) -> TensorDtype {
        match self {
            DataType::Boolean => TensorDtype::Bool,
            DataType::Integer => TensorDtype::Int32,
            DataType::Long => TensorDtype::Int64,
            DataType::Float => TensorDtype::Float32,
            DataType::Double => TensorDtype::Float64,
            DataType::String => TensorDtype::Str,
            DataType::Binary => TensorDtype::Bytes,
            DataType::Datetime => TensorDtype::Datetime64(TimeUnit::Nanosecond),
        }
    }

    /// Maps a column element dtype to its data type.
    ///
    /// Integers widen to the smallest type that holds every value: signed up to
    /// 4 bytes and unsigned below 4 bytes become `integer`, `int64` and `uint32`
    /// become `long`. `uint64` has no lossless target and is rejected, as is
    /// `object`, whose type can only be decided by looking at the values.
    pub fn from_dtype(dtype: TensorDtype) -> ModelkitResult<Self> {
        let itemsize = dtype.itemsize();
        let data_type = match dtype.kind() {
            'b' => DataType::Boolean,
            'i' if itemsize <= 4 => DataType::Integer,
            'i' => DataType::Long,
            'u' if itemsize < 4 => DataType::Integer,
            'u' if itemsize < 8 => DataType::Long,
            'f' if itemsize <= 4 => DataType::Float,
            'f' => DataType::Double,
            'U' => DataType::String,
            'S' => DataType::Binary,
            'M' => DataType::Datetime,
            'O' => {
                return Err(ModelkitError::inference(
                    "Can not infer object without looking at the values, call the column inference instead",
                ))
            }
            _ => {
                return Err(ModelkitError::inference(format!(
                    "Unsupported numpy data type '{}', kind '{}'",
                    dtype,
                    dtype.kind()
                )))
            }
        };
        Ok(data_type)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| SchemaError::UnsupportedType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for t in DataType::ALL {
            assert_eq!(t.name().parse::<DataType>().unwrap(), t);
        }
        assert!("decimal".parse::<DataType>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&DataType::Double).unwrap(), "\"double\"");
        let t: DataType = serde_json::from_str("\"binary\"").unwrap();
        assert_eq!(t, DataType::Binary);
    }

    #[test]
    fn test_integer_widening() {
        assert_eq!(DataType::from_dtype(TensorDtype::Int8).unwrap(), DataType::Integer);
        assert_eq!(DataType::from_dtype(TensorDtype::Int32).unwrap(), DataType::Integer);
        assert_eq!(DataType::from_dtype(TensorDtype::Int64).unwrap(), DataType::Long);
        assert_eq!(DataType::from_dtype(TensorDtype::UInt16).unwrap(), DataType::Integer);
        assert_eq!(DataType::from_dtype(TensorDtype::UInt32).unwrap(), DataType::Long);
        assert!(DataType::from_dtype(TensorDtype::UInt64).is_err());
    }

    #[test]
    fn test_float_and_text_mapping() {
        assert_eq!(DataType::from_dtype(TensorDtype::Float16).unwrap(), DataType::Float);
        assert_eq!(DataType::from_dtype(TensorDtype::Float32).unwrap(), DataType::Float);
        assert_eq!(DataType::from_dtype(TensorDtype::Float64).unwrap(), DataType::Double);
        assert_eq!(DataType::from_dtype(TensorDtype::Str).unwrap(), DataType::String);
        assert_eq!(DataType::from_dtype(TensorDtype::Bytes).unwrap(), DataType::Binary);
    }

    #[test]
    fn test_every_datetime_unit_normalizes() {
        for unit in [
            TimeUnit::Day,
            TimeUnit::Second,
            TimeUnit::Millisecond,
            TimeUnit::Microsecond,
            TimeUnit::Nanosecond,
        ] {
            assert_eq!(
                DataType::from_dtype(TensorDtype::Datetime64(unit)).unwrap(),
                DataType::Datetime
            );
        }
    }

    #[test]
    fn test_object_needs_values() {
        let err = DataType::from_dtype(TensorDtype::Object).unwrap_err();
        assert!(matches!(err, ModelkitError::SignatureInference(_)));
    }
}
