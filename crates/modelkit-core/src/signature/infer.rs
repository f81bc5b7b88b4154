//! Signature inference from sample data.
//!
//! Inference dispatches over a closed set of representations, each of which
//! implements [`InferSchema`]:
//!
//! | Input | Schema |
//! |-------|--------|
//! | `ndarray` array, [`Tensor`] | one unnamed `TensorSpec`, shape `[-1, ...]` |
//! | [`NamedTensors`] | one named `TensorSpec` per entry |
//! | [`DataFrame`] | one named `ColSpec` per column |
//! | [`Series`] | one unnamed `ColSpec` |
//! | `String`, `&str`, `Vec<String>` | one unnamed `string` `ColSpec` |
//!
//! The leading dimension of every inferred tensor is recorded as `-1`
//! (unconstrained batch size).

use super::ModelSignature;
use crate::data::{ColumnValues, DataFrame, NamedTensors, Scalar, Series, Tensor};
use crate::error::{ModelkitError, ModelkitResult};
use crate::types::{ColSpec, DataType, Schema, TensorDtype, TensorElement, TensorSpec};
use ndarray::{ArrayBase, Data, Dimension};

/// A sample value whose structure determines a [`Schema`].
pub trait InferSchema {
    fn infer_schema(&self) -> ModelkitResult<Schema>;
}

/// Infers a signature from a sample input and, optionally, a sample output.
///
/// Input and output are inferred independently. Without an output the
/// signature's `outputs` is `None`.
///
/// # Example
///
/// ```
/// use modelkit_core::signature::infer_signature;
/// use ndarray::array;
///
/// let x = array![[1.0f64, 2.0], [3.0, 4.0]];
/// let signature = infer_signature(&x, None)?;
/// assert!(signature.outputs().is_none());
/// assert_eq!(signature.inputs().to_json()?,
///     r#"[{"type": "tensor", "tensor-spec": {"dtype": "float64", "shape": [-1, 2]}}]"#);
/// # Ok::<(), modelkit_core::error::ModelkitError>(())
/// ```
pub fn infer_signature(
    input: &dyn InferSchema,
    output: Option<&dyn InferSchema>,
) -> ModelkitResult<ModelSignature> {
    let inputs = input.infer_schema()?;
    log::debug!("Inferred input schema {}", inputs);

    let outputs = output.map(|o| o.infer_schema()).transpose()?;
    if let Some(ref outputs) = outputs {
        log::debug!("Inferred output schema {}", outputs);
    }

    Ok(ModelSignature::new(inputs, outputs))
}

/// Shape recorded for a sample tensor: the batch axis becomes `-1`.
fn batch_shape(shape: &[usize]) -> ModelkitResult<Vec<i64>> {
    if shape.is_empty() {
        return Err(ModelkitError::inference(
            "cannot infer a tensor signature from a 0-dimensional value",
        ));
    }
    let mut dims = Vec::with_capacity(shape.len());
    dims.push(-1);
    for &d in &shape[1..] {
        let d = i64::try_from(d)
            .map_err(|_| ModelkitError::inference(format!("dimension {} does not fit in i64", d)))?;
        dims.push(d);
    }
    Ok(dims)
}

fn tensor_spec(dtype: TensorDtype, shape: &[usize], name: Option<&str>) -> ModelkitResult<TensorSpec> {
    let dims = batch_shape(shape)?;
    let spec = match name {
        Some(name) => TensorSpec::named(dtype, dims, name)?,
        None => TensorSpec::new(dtype, dims)?,
    };
    Ok(spec)
}

/// Data type of a column, looking at the values only for `object` columns.
pub fn infer_column_type(values: &ColumnValues) -> ModelkitResult<DataType> {
    match values {
        ColumnValues::Object(cells) => infer_object_type(cells),
        other => DataType::from_dtype(other.dtype()),
    }
}

fn infer_object_type(cells: &[Scalar]) -> ModelkitResult<DataType> {
    let mut inferred: Option<DataType> = None;
    for cell in cells {
        let cell_type = match cell {
            Scalar::Null => continue,
            Scalar::Bool(_) => DataType::Boolean,
            Scalar::Int(_) => DataType::Long,
            Scalar::Float(_) => DataType::Double,
            Scalar::Str(_) => DataType::String,
            Scalar::Bytes(_) => DataType::Binary,
        };
        inferred = match inferred {
            None => Some(cell_type),
            Some(prev) if prev == cell_type => Some(prev),
            Some(DataType::Long | DataType::Double)
                if matches!(cell_type, DataType::Long | DataType::Double) =>
            {
                Some(DataType::Double)
            }
            Some(prev) => {
                return Err(ModelkitError::inference(format!(
                    "Unable to map 'object' type to a DataType: found both {} and {} values. \
                     An object column can be mapped only if all values have the same type",
                    prev, cell_type
                )))
            }
        };
    }
    inferred.ok_or_else(|| {
        ModelkitError::inference("Unable to map 'object' type to a DataType: column has no non-null values")
    })
}

impl<S, D, A> InferSchema for ArrayBase<S, D>
where
    S: Data<Elem = A>,
    D: Dimension,
    A: TensorElement,
{
    fn infer_schema(&self) -> ModelkitResult<Schema> {
        let spec = tensor_spec(A::DTYPE, self.shape(), None)?;
        Ok(Schema::new(vec![spec])?)
    }
}

impl InferSchema for Tensor {
    fn infer_schema(&self) -> ModelkitResult<Schema> {
        let spec = tensor_spec(self.dtype(), self.shape(), None)?;
        Ok(Schema::new(vec![spec])?)
    }
}

impl InferSchema for NamedTensors {
    fn infer_schema(&self) -> ModelkitResult<Schema> {
        let specs = self
            .iter()
            .map(|(name, tensor)| tensor_spec(tensor.dtype(), tensor.shape(), Some(name)))
            .collect::<ModelkitResult<Vec<_>>>()?;
        Ok(Schema::new(specs)?)
    }
}

impl InferSchema for DataFrame {
    fn infer_schema(&self) -> ModelkitResult<Schema> {
        let mut specs = Vec::with_capacity(self.num_columns());
        for column in self.columns() {
            let name = column.name().unwrap_or_default();
            let data_type = infer_column_type(column.values()).map_err(|e| match e {
                ModelkitError::SignatureInference(msg) => {
                    ModelkitError::inference(format!("column '{}': {}", name, msg))
                }
                other => other,
            })?;
            specs.push(ColSpec::named(data_type, name));
        }
        Ok(Schema::new(specs)?)
    }
}

impl InferSchema for Series {
    fn infer_schema(&self) -> ModelkitResult<Schema> {
        let data_type = infer_column_type(self.values())?;
        Ok(Schema::new(vec![ColSpec::new(data_type)])?)
    }
}

fn string_schema() -> ModelkitResult<Schema> {
    Ok(Schema::new(vec![ColSpec::new(DataType::String)])?)
}

impl InferSchema for String {
    fn infer_schema(&self) -> ModelkitResult<Schema> {
        string_schema()
    }
}

impl InferSchema for &str {
    fn infer_schema(&self) -> ModelkitResult<Schema> {
        string_schema()
    }
}

impl InferSchema for Vec<String> {
    fn infer_schema(&self) -> ModelkitResult<Schema> {
        string_schema()
    }
}
