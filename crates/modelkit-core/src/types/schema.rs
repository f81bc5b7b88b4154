//! Column specs and schemas.
//!
//! A [`Schema`] is an ordered list of [`ColumnSpec`]s that is homogeneous in two
//! ways, both checked at construction:
//!
//! - kind: every spec is a [`ColSpec`] (tabular contract) or every spec is a
//!   [`TensorSpec`] (tensor contract);
//! - naming: every spec has a name or none has.
//!
//! # Wire form
//!
//! ```text
//! [{"type": "double", "name": "x"}, {"type": "long", "name": null}]
//! [{"type": "tensor", "tensor-spec": {"dtype": "float64", "shape": [-1, 28, 28], "name": "image"}}]
//! ```
//!
//! The `tensor-spec` key is the marker that selects the tensor kind when
//! reading. Readers also accept a tensor `name` at the element's top level and a
//! column spec with no `name` key at all.

use super::data_type::DataType;
use super::dtype::TensorDtype;
use crate::error::{ModelkitError, ModelkitResult, SchemaError};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

const TENSOR_TYPE: &str = "tensor";
const TENSOR_SPEC_KEY: &str = "tensor-spec";

/// A named or unnamed scalar column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColSpec {
    data_type: DataType,
    name: Option<String>,
}

impl ColSpec {
    /// Unnamed column of the given type.
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            name: None,
        }
    }

    /// Named column of the given type.
    pub fn named(data_type: DataType, name: impl Into<String>) -> Self {
        Self {
            data_type,
            name: Some(name.into()),
        }
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// A named or unnamed tensor with a fixed element type and shape.
///
/// `-1` in the shape marks a variable-size dimension (usually the batch axis).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TensorSpec {
    dtype: TensorDtype,
    shape: Vec<i64>,
    name: Option<String>,
}

impl TensorSpec {
    /// Unnamed tensor spec. Fails if `shape` is empty or holds a dimension
    /// other than `-1` or a positive size.
    pub fn new(dtype: TensorDtype, shape: impl Into<Vec<i64>>) -> Result<Self, SchemaError> {
        Self::build(dtype, shape.into(), None)
    }

    /// Named tensor spec, validated like [`TensorSpec::new`].
    pub fn named(
        dtype: TensorDtype,
        shape: impl Into<Vec<i64>>,
        name: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        Self::build(dtype, shape.into(), Some(name.into()))
    }

    fn build(dtype: TensorDtype, shape: Vec<i64>, name: Option<String>) -> Result<Self, SchemaError> {
        if shape.is_empty() {
            return Err(SchemaError::InvalidShape {
                shape,
                reason: "shape must have at least one dimension".to_string(),
            });
        }
        if let Some(bad) = shape.iter().find(|&&d| d == 0 || d < -1) {
            let reason = format!("dimension {} is neither -1 nor a positive size", bad);
            return Err(SchemaError::InvalidShape { shape, reason });
        }
        Ok(Self { dtype, shape, name })
    }

    pub fn dtype(&self) -> TensorDtype {
        self.dtype
    }

    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Either kind of column spec.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawColumnSpec")]
pub enum ColumnSpec {
    Col(ColSpec),
    Tensor(TensorSpec),
}

impl ColumnSpec {
    pub fn name(&self) -> Option<&str> {
        match self {
            ColumnSpec::Col(c) => c.name(),
            ColumnSpec::Tensor(t) => t.name(),
        }
    }

    pub fn is_tensor(&self) -> bool {
        matches!(self, ColumnSpec::Tensor(_))
    }
}

impl From<ColSpec> for ColumnSpec {
    fn from(spec: ColSpec) -> Self {
        ColumnSpec::Col(spec)
    }
}

impl From<TensorSpec> for ColumnSpec {
    fn from(spec: TensorSpec) -> Self {
        ColumnSpec::Tensor(spec)
    }
}

#[derive(Serialize)]
struct TensorSpecBody<'a> {
    dtype: String,
    shape: &'a [i64],
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

impl Serialize for ColumnSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            ColumnSpec::Col(c) => {
                map.serialize_entry("type", c.data_type.name())?;
                map.serialize_entry("name", &c.name)?;
            }
            ColumnSpec::Tensor(t) => {
                map.serialize_entry("type", TENSOR_TYPE)?;
                map.serialize_entry(
                    TENSOR_SPEC_KEY,
                    &TensorSpecBody {
                        dtype: t.dtype.to_string(),
                        shape: &t.shape,
                        name: t.name(),
                    },
                )?;
            }
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct RawColumnSpec {
    #[serde(rename = "type", default)]
    data_type: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "tensor-spec", default)]
    tensor_spec: Option<RawTensorSpec>,
}

#[derive(Deserialize)]
struct RawTensorSpec {
    dtype: String,
    shape: Vec<i64>,
    #[serde(default)]
    name: Option<String>,
}

impl TryFrom<RawColumnSpec> for ColumnSpec {
    type Error = ModelkitError;

    fn try_from(raw: RawColumnSpec) -> Result<Self, Self::Error> {
        if let Some(tensor) = raw.tensor_spec {
            let dtype: TensorDtype = tensor.dtype.parse()?;
            let spec = match tensor.name.or(raw.name) {
                Some(name) => TensorSpec::named(dtype, tensor.shape, name)?,
                None => TensorSpec::new(dtype, tensor.shape)?,
            };
            return Ok(ColumnSpec::Tensor(spec));
        }

        let type_name = raw
            .data_type
            .ok_or_else(|| ModelkitError::serialization("column spec is missing the 'type' key"))?;
        if type_name == TENSOR_TYPE {
            return Err(ModelkitError::serialization(
                "column spec of type 'tensor' is missing the 'tensor-spec' block",
            ));
        }
        let data_type: DataType = type_name.parse()?;
        Ok(ColumnSpec::Col(ColSpec {
            data_type,
            name: raw.name,
        }))
    }
}

/// Ordered, homogeneous sequence of column specs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColumnSpec>", into = "Vec<ColumnSpec>")]
pub struct Schema {
    inputs: Vec<ColumnSpec>,
}

impl Schema {
    /// Builds a schema, rejecting mixed naming and mixed column kinds.
    ///
    /// # Example
    ///
    /// ```
    /// use modelkit_core::types::{ColSpec, DataType, Schema};
    ///
    /// let schema = Schema::new(vec![
    ///     ColSpec::named(DataType::Double, "x"),
    ///     ColSpec::named(DataType::String, "label"),
    /// ])?;
    /// assert!(schema.has_input_names());
    /// # Ok::<(), modelkit_core::error::SchemaError>(())
    /// ```
    pub fn new<I, C>(specs: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnSpec>,
    {
        let inputs: Vec<ColumnSpec> = specs.into_iter().map(Into::into).collect();

        let named = inputs.iter().filter(|s| s.name().is_some()).count();
        if named != 0 && named != inputs.len() {
            return Err(SchemaError::MixedNaming {
                names: inputs.iter().map(|s| s.name().map(str::to_string)).collect(),
            });
        }

        let tensors = inputs.iter().filter(|s| s.is_tensor()).count();
        if tensors != 0 && tensors != inputs.len() {
            return Err(SchemaError::MixedKinds);
        }

        Ok(Self { inputs })
    }

    /// Column specs in order.
    pub fn inputs(&self) -> &[ColumnSpec] {
        &self.inputs
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// True if every spec is named. An empty schema has no names.
    pub fn has_input_names(&self) -> bool {
        self.inputs.first().and_then(ColumnSpec::name).is_some()
    }

    /// Names of the specs, or their positions when the schema is unnamed.
    pub fn input_names(&self) -> Vec<String> {
        self.inputs
            .iter()
            .enumerate()
            .map(|(i, s)| s.name().map_or_else(|| i.to_string(), str::to_string))
            .collect()
    }

    /// True if this schema describes tensors rather than columns.
    pub fn is_tensor_spec(&self) -> bool {
        self.inputs.first().is_some_and(ColumnSpec::is_tensor)
    }

    /// Column data types. Fails for tensor schemas, which have no `DataType`.
    pub fn column_types(&self) -> ModelkitResult<Vec<DataType>> {
        self.inputs
            .iter()
            .map(|s| match s {
                ColumnSpec::Col(c) => Ok(c.data_type),
                ColumnSpec::Tensor(_) => Err(ModelkitError::invalid_parameter(
                    "TensorSpec only supports dtypes, use tensor_dtypes() instead",
                )),
            })
            .collect()
    }

    /// Element dtype of every spec; column specs report their canonical dtype.
    pub fn tensor_dtypes(&self) -> Vec<TensorDtype> {
        self.inputs
            .iter()
            .map(|s| match s {
                ColumnSpec::Col(c) => c.data_type.to_dtype(),
                ColumnSpec::Tensor(t) => t.dtype,
            })
            .collect()
    }

    /// Serializes to the JSON list form with Python-compatible separators.
    pub fn to_json(&self) -> ModelkitResult<String> {
        crate::json::to_python_string(self)
    }

    /// Parses the JSON list form.
    pub fn from_json(json: &str) -> ModelkitResult<Self> {
        serde_json::from_str(json).map_err(|e| ModelkitError::serialization(format!("invalid schema JSON: {}", e)))
    }
}

impl TryFrom<Vec<ColumnSpec>> for Schema {
    type Error = SchemaError;

    fn try_from(specs: Vec<ColumnSpec>) -> Result<Self, Self::Error> {
        Schema::new(specs)
    }
}

impl From<Schema> for Vec<ColumnSpec> {
    fn from(schema: Schema) -> Self {
        schema.inputs
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            write!(f, "{:?}: ", name)?;
        }
        match self {
            ColumnSpec::Col(c) => write!(f, "{}", c.data_type),
            ColumnSpec::Tensor(t) => {
                let dims: Vec<String> = t.shape.iter().map(i64::to_string).collect();
                write!(f, "Tensor('{}', ({}))", t.dtype, dims.join(", "))
            }
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, spec) in self.inputs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", spec)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_spec(name: &str) -> TensorSpec {
        TensorSpec::named(TensorDtype::Float64, vec![-1, 28, 28], name).unwrap()
    }

    #[test]
    fn test_tensor_spec_rejects_bad_shapes() {
        assert!(matches!(
            TensorSpec::new(TensorDtype::Float32, Vec::<i64>::new()),
            Err(SchemaError::InvalidShape { .. })
        ));
        assert!(TensorSpec::new(TensorDtype::Float32, vec![-1, 0]).is_err());
        assert!(TensorSpec::new(TensorDtype::Float32, vec![-2, 3]).is_err());
        assert!(TensorSpec::new(TensorDtype::Float32, vec![-1, 3]).is_ok());
    }

    #[test]
    fn test_schema_rejects_mixed_naming() {
        let err = Schema::new(vec![
            ColSpec::named(DataType::Double, "a"),
            ColSpec::new(DataType::Double),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::MixedNaming { .. }));
    }

    #[test]
    fn test_schema_rejects_mixed_kinds() {
        let err = Schema::new(vec![
            ColumnSpec::from(ColSpec::new(DataType::Double)),
            ColumnSpec::from(TensorSpec::new(TensorDtype::Float64, vec![-1]).unwrap()),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::MixedKinds);
    }

    #[test]
    fn test_duplicate_names_are_allowed() {
        let schema = Schema::new(vec![
            ColSpec::named(DataType::Long, "x"),
            ColSpec::named(DataType::Long, "x"),
        ])
        .unwrap();
        assert_eq!(schema.input_names(), vec!["x", "x"]);
    }

    #[test]
    fn test_equality_is_ordered() {
        let a = Schema::new(vec![
            ColSpec::named(DataType::Long, "x"),
            ColSpec::named(DataType::String, "y"),
        ])
        .unwrap();
        let b = Schema::new(vec![
            ColSpec::named(DataType::String, "y"),
            ColSpec::named(DataType::Long, "x"),
        ])
        .unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let t1 = Schema::new(vec![TensorSpec::new(TensorDtype::Float64, vec![-1, 28, 10]).unwrap()]).unwrap();
        let t2 = Schema::new(vec![TensorSpec::new(TensorDtype::Float64, vec![-1, 10, 28]).unwrap()]).unwrap();
        assert_ne!(t1, t2);
    }

    #[test]
    fn test_unnamed_queries() {
        let schema = Schema::new(vec![ColSpec::new(DataType::Boolean), ColSpec::new(DataType::Binary)]).unwrap();
        assert!(!schema.has_input_names());
        assert_eq!(schema.input_names(), vec!["0", "1"]);
        assert_eq!(
            schema.column_types().unwrap(),
            vec![DataType::Boolean, DataType::Binary]
        );
        assert_eq!(schema.tensor_dtypes(), vec![TensorDtype::Bool, TensorDtype::Bytes]);
        assert!(!schema.is_tensor_spec());
    }

    #[test]
    fn test_tensor_schema_has_no_column_types() {
        let schema = Schema::new(vec![image_spec("image")]).unwrap();
        assert!(schema.is_tensor_spec());
        assert!(schema.column_types().is_err());
        assert_eq!(schema.tensor_dtypes(), vec![TensorDtype::Float64]);
    }

    #[test]
    fn test_col_spec_wire_form() {
        let schema = Schema::new(vec![ColSpec::new(DataType::Double)]).unwrap();
        assert_eq!(schema.to_json().unwrap(), r#"[{"type": "double", "name": null}]"#);
    }

    #[test]
    fn test_tensor_spec_wire_form() {
        let schema = Schema::new(vec![image_spec("image")]).unwrap();
        assert_eq!(
            schema.to_json().unwrap(),
            r#"[{"type": "tensor", "tensor-spec": {"dtype": "float64", "shape": [-1, 28, 28], "name": "image"}}]"#
        );

        let unnamed = Schema::new(vec![TensorSpec::new(TensorDtype::Int64, vec![-1]).unwrap()]).unwrap();
        assert_eq!(
            unnamed.to_json().unwrap(),
            r#"[{"type": "tensor", "tensor-spec": {"dtype": "int64", "shape": [-1]}}]"#
        );
    }

    #[test]
    fn test_reads_legacy_layouts() {
        let legacy = r#"[{"name": "image", "type": "tensor", "tensor-spec": {"dtype": "float", "shape": [-1, 28, 28]}}]"#;
        let schema = Schema::from_json(legacy).unwrap();
        assert_eq!(schema, Schema::new(vec![image_spec("image")]).unwrap());

        let no_name = r#"[{"type": "boolean"}]"#;
        let schema = Schema::from_json(no_name).unwrap();
        assert_eq!(schema, Schema::new(vec![ColSpec::new(DataType::Boolean)]).unwrap());
    }

    #[test]
    fn test_from_json_rejects_malformed_elements() {
        for bad in [
            r#"[{"name": "x"}]"#,
            r#"[{"type": "tensor"}]"#,
            r#"[{"type": "decimal"}]"#,
            r#"[{"type": "tensor", "tensor-spec": {"dtype": "complex64", "shape": [-1]}}]"#,
            r#"[{"type": "double", "name": "a"}, {"type": "double"}]"#,
            r#"{"type": "double"}"#,
        ] {
            let err = Schema::from_json(bad).unwrap_err();
            assert!(matches!(err, ModelkitError::Serialization(_)), "{}", bad);
        }
    }

    #[test]
    fn test_display() {
        let schema = Schema::new(vec![
            ColSpec::named(DataType::Double, "x"),
            ColSpec::named(DataType::Datetime, "ts"),
        ])
        .unwrap();
        assert_eq!(schema.to_string(), r#"["x": double, "ts": datetime]"#);
        let tensors = Schema::new(vec![TensorSpec::new(TensorDtype::Float32, vec![-1, 10]).unwrap()]).unwrap();
        assert_eq!(tensors.to_string(), "[Tensor('float32', (-1, 10))]");
    }
}
