//! Tensor element types.
//!
//! [`TensorDtype`] names element types the way numpy prints them (`float64`,
//! `int32`, `datetime64[ns]`, ...). The string form is what appears under
//! `tensor-spec.dtype` in a serialized schema, so `Display` and `FromStr` must
//! stay in lockstep with manifests written by other tooling.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Precision of a datetime64 element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Day,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl TimeUnit {
    /// numpy unit code (`D`, `s`, `ms`, `us`, `ns`).
    pub fn code(&self) -> &'static str {
        match self {
            TimeUnit::Day => "D",
            TimeUnit::Second => "s",
            TimeUnit::Millisecond => "ms",
            TimeUnit::Microsecond => "us",
            TimeUnit::Nanosecond => "ns",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "D" => Some(TimeUnit::Day),
            "s" => Some(TimeUnit::Second),
            "ms" => Some(TimeUnit::Millisecond),
            "us" => Some(TimeUnit::Microsecond),
            "ns" => Some(TimeUnit::Nanosecond),
            _ => None,
        }
    }
}

/// Element type of a tensor or of a column's in-memory representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TensorDtype {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
    /// Variable-length unicode string
    Str,
    /// Variable-length byte string
    Bytes,
    /// Arbitrary values; only meaningful for columns, never inferable on its own
    Object,
    Datetime64(TimeUnit),
}

impl TensorDtype {
    /// numpy kind character: `b`, `i`, `u`, `f`, `U`, `S`, `O` or `M`.
    pub fn kind(&self) -> char {
        match self {
            TensorDtype::Bool => 'b',
            TensorDtype::Int8 | TensorDtype::Int16 | TensorDtype::Int32 | TensorDtype::Int64 => {
                'i'
            }
            TensorDtype::UInt8
            | TensorDtype::UInt16
            | TensorDtype::UInt32
            | TensorDtype::UInt64 => 'u',
            TensorDtype::Float16 | TensorDtype::Float32 | TensorDtype::Float64 => 'f',
            TensorDtype::Str => 'U',
            TensorDtype::Bytes => 'S',
            TensorDtype::Object => 'O',
            TensorDtype::Datetime64(_) => 'M',
        }
    }

    /// Size of one element in bytes. Variable-length kinds report 0.
    pub fn itemsize(&self) -> usize {
        match self {
            TensorDtype::Bool | TensorDtype::Int8 | TensorDtype::UInt8 => 1,
            TensorDtype::Int16 | TensorDtype::UInt16 | TensorDtype::Float16 => 2,
            TensorDtype::Int32 | TensorDtype::UInt32 | TensorDtype::Float32 => 4,
            TensorDtype::Int64
            | TensorDtype::UInt64
            | TensorDtype::Float64
            | TensorDtype::Object
            | TensorDtype::Datetime64(_) => 8,
            TensorDtype::Str | TensorDtype::Bytes => 0,
        }
    }
}

impl fmt::Display for TensorDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorDtype::Bool => f.write_str("bool"),
            TensorDtype::Int8 => f.write_str("int8"),
            TensorDtype::Int16 => f.write_str("int16"),
            TensorDtype::Int32 => f.write_str("int32"),
            TensorDtype::Int64 => f.write_str("int64"),
            TensorDtype::UInt8 => f.write_str("uint8"),
            TensorDtype::UInt16 => f.write_str("uint16"),
            TensorDtype::UInt32 => f.write_str("uint32"),
            TensorDtype::UInt64 => f.write_str("uint64"),
            TensorDtype::Float16 => f.write_str("float16"),
            TensorDtype::Float32 => f.write_str("float32"),
            TensorDtype::Float64 => f.write_str("float64"),
            TensorDtype::Str => f.write_str("str"),
            TensorDtype::Bytes => f.write_str("bytes"),
            TensorDtype::Object => f.write_str("object"),
            TensorDtype::Datetime64(unit) => write!(f, "datetime64[{}]", unit.code()),
        }
    }
}

impl FromStr for TensorDtype {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dtype = match s {
            "bool" | "bool_" | "?" => TensorDtype::Bool,
            "int8" | "i1" => TensorDtype::Int8,
            "int16" | "i2" => TensorDtype::Int16,
            "int32" | "i4" => TensorDtype::Int32,
            "int64" | "i8" | "int" => TensorDtype::Int64,
            "uint8" | "u1" => TensorDtype::UInt8,
            "uint16" | "u2" => TensorDtype::UInt16,
            "uint32" | "u4" => TensorDtype::UInt32,
            "uint64" | "u8" => TensorDtype::UInt64,
            "float16" | "f2" | "half" => TensorDtype::Float16,
            "float32" | "f4" | "single" => TensorDtype::Float32,
            "float64" | "f8" | "float" | "double" => TensorDtype::Float64,
            "str" | "unicode" => TensorDtype::Str,
            "bytes" => TensorDtype::Bytes,
            "object" | "O" => TensorDtype::Object,
            "datetime64" => TensorDtype::Datetime64(TimeUnit::Nanosecond),
            other => return parse_sized(other).ok_or_else(|| SchemaError::UnsupportedType(other.to_string())),
        };
        Ok(dtype)
    }
}

/// Parses byte-order/size decorated forms: `<U12`, `|S5`, `<M8[ns]`, `datetime64[ms]`.
fn parse_sized(s: &str) -> Option<TensorDtype> {
    let body = s.trim_start_matches(['<', '>', '|', '=']);

    if let Some(unit) = body
        .strip_prefix("datetime64[")
        .or_else(|| body.strip_prefix("M8["))
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return TimeUnit::from_code(unit).map(TensorDtype::Datetime64);
    }

    let (kind, digits) = body.split_at(body.chars().next()?.len_utf8());
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match kind {
        "U" => Some(TensorDtype::Str),
        "S" => Some(TensorDtype::Bytes),
        _ => None,
    }
}

impl TryFrom<String> for TensorDtype {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TensorDtype> for String {
    fn from(dtype: TensorDtype) -> Self {
        dtype.to_string()
    }
}

/// Rust element types that can back an inferable tensor.
pub trait TensorElement {
    /// The dtype recorded for arrays of this element.
    const DTYPE: TensorDtype;
}

macro_rules! tensor_element {
    ($($ty:ty => $dtype:expr),+ $(,)?) => {
        $(impl TensorElement for $ty {
            const DTYPE: TensorDtype = $dtype;
        })+
    };
}

tensor_element! {
    bool => TensorDtype::Bool,
    i8 => TensorDtype::Int8,
    i16 => TensorDtype::Int16,
    i32 => TensorDtype::Int32,
    i64 => TensorDtype::Int64,
    u8 => TensorDtype::UInt8,
    u16 => TensorDtype::UInt16,
    u32 => TensorDtype::UInt32,
    u64 => TensorDtype::UInt64,
    f32 => TensorDtype::Float32,
    f64 => TensorDtype::Float64,
    String => TensorDtype::Str,
    Vec<u8> => TensorDtype::Bytes,
    chrono::NaiveDateTime => TensorDtype::Datetime64(TimeUnit::Microsecond),
}
