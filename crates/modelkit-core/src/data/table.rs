//! Tabular sample data.

use crate::error::{ModelkitError, ModelkitResult};
use crate::types::{TensorDtype, TimeUnit};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// A dynamically typed cell of an `object` column.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
}

/// Values of one column, stored with their element type.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Bool(Vec<bool>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Utf8(Vec<String>),
    Binary(Vec<Vec<u8>>),
    /// Ticks since the Unix epoch in the given unit
    Timestamp { unit: TimeUnit, values: Vec<i64> },
    Date(Vec<NaiveDate>),
    /// Heterogeneous cells; the type is decided from the values
    Object(Vec<Scalar>),
}

impl ColumnValues {
    /// Element dtype of the column.
    pub fn dtype(&self) -> TensorDtype {
        match self {
            ColumnValues::Bool(_) => TensorDtype::Bool,
            ColumnValues::Int8(_) => TensorDtype::Int8,
            ColumnValues::Int16(_) => TensorDtype::Int16,
            ColumnValues::Int32(_) => TensorDtype::Int32,
            ColumnValues::Int64(_) => TensorDtype::Int64,
            ColumnValues::UInt8(_) => TensorDtype::UInt8,
            ColumnValues::UInt16(_) => TensorDtype::UInt16,
            ColumnValues::UInt32(_) => TensorDtype::UInt32,
            ColumnValues::UInt64(_) => TensorDtype::UInt64,
            ColumnValues::Float32(_) => TensorDtype::Float32,
            ColumnValues::Float64(_) => TensorDtype::Float64,
            ColumnValues::Utf8(_) => TensorDtype::Str,
            ColumnValues::Binary(_) => TensorDtype::Bytes,
            ColumnValues::Timestamp { unit, .. } => TensorDtype::Datetime64(*unit),
            ColumnValues::Date(_) => TensorDtype::Datetime64(TimeUnit::Day),
            ColumnValues::Object(_) => TensorDtype::Object,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Bool(v) => v.len(),
            ColumnValues::Int8(v) => v.len(),
            ColumnValues::Int16(v) => v.len(),
            ColumnValues::Int32(v) => v.len(),
            ColumnValues::Int64(v) => v.len(),
            ColumnValues::UInt8(v) => v.len(),
            ColumnValues::UInt16(v) => v.len(),
            ColumnValues::UInt32(v) => v.len(),
            ColumnValues::UInt64(v) => v.len(),
            ColumnValues::Float32(v) => v.len(),
            ColumnValues::Float64(v) => v.len(),
            ColumnValues::Utf8(v) => v.len(),
            ColumnValues::Binary(v) => v.len(),
            ColumnValues::Timestamp { values, .. } => values.len(),
            ColumnValues::Date(v) => v.len(),
            ColumnValues::Object(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! column_from_vec {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(impl From<Vec<$ty>> for ColumnValues {
            fn from(values: Vec<$ty>) -> Self {
                ColumnValues::$variant(values)
            }
        })+
    };
}

column_from_vec! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    String => Utf8,
    Vec<u8> => Binary,
    NaiveDate => Date,
    Scalar => Object,
}

impl From<Vec<&str>> for ColumnValues {
    fn from(values: Vec<&str>) -> Self {
        ColumnValues::Utf8(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<NaiveDateTime>> for ColumnValues {
    fn from(values: Vec<NaiveDateTime>) -> Self {
        ColumnValues::Timestamp {
            unit: TimeUnit::Microsecond,
            values: values.iter().map(|dt| dt.and_utc().timestamp_micros()).collect(),
        }
    }
}

impl From<Vec<DateTime<Utc>>> for ColumnValues {
    fn from(values: Vec<DateTime<Utc>>) -> Self {
        ColumnValues::Timestamp {
            unit: TimeUnit::Microsecond,
            values: values.iter().map(DateTime::timestamp_micros).collect(),
        }
    }
}

/// A single column, optionally named.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: Option<String>,
    values: ColumnValues,
}

impl Series {
    /// Unnamed series.
    pub fn new(values: impl Into<ColumnValues>) -> Self {
        Self {
            name: None,
            values: values.into(),
        }
    }

    /// Named series.
    pub fn named(name: impl Into<String>, values: impl Into<ColumnValues>) -> Self {
        Self {
            name: Some(name.into()),
            values: values.into(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn dtype(&self) -> TensorDtype {
        self.values.dtype()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Single-column frame holding this series under `name`.
    pub fn to_frame(&self, name: impl Into<String>) -> DataFrame {
        DataFrame {
            columns: vec![Series::named(name, self.values.clone())],
        }
    }
}

/// Ordered set of equally long, named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<Series>,
}

impl DataFrame {
    /// Empty frame with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a frame from `(name, values)` pairs in order.
    pub fn from_columns<N, V>(columns: impl IntoIterator<Item = (N, V)>) -> ModelkitResult<Self>
    where
        N: Into<String>,
        V: Into<ColumnValues>,
    {
        columns
            .into_iter()
            .try_fold(Self::new(), |frame, (name, values)| frame.with_column(name, values))
    }

    /// Appends a column. Fails if its length differs from the existing columns.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: impl Into<ColumnValues>,
    ) -> ModelkitResult<Self> {
        let series = Series::named(name, values);
        if let Some(first) = self.columns.first() {
            if first.len() != series.len() {
                return Err(ModelkitError::invalid_parameter(format!(
                    "column '{}' has {} rows, expected {}",
                    series.name().unwrap_or_default(),
                    series.len(),
                    first.len()
                )));
            }
        }
        self.columns.push(series);
        Ok(self)
    }

    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().filter_map(Series::name).collect()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Series::len)
    }
}
