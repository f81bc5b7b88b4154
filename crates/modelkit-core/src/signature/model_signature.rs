//! Model signature and its dict/JSON wire form.

use crate::error::{ModelkitError, ModelkitResult};
use crate::types::Schema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input contract of a model, plus an optional output contract.
///
/// Two signatures are equal when their input schemas are equal and their output
/// schemas are equal or both absent. A missing output schema is not the same as
/// an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSignature {
    inputs: Schema,
    outputs: Option<Schema>,
}

/// Plain-data form of a [`ModelSignature`], as stored under `signature` in an
/// `MLmodel` file.
///
/// Both fields hold a JSON *string* (the schema's list form), not a nested
/// structure, so the dict is double-encoded once it is itself written as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureDict {
    pub inputs: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<String>,
}

impl ModelSignature {
    pub fn new(inputs: Schema, outputs: Option<Schema>) -> Self {
        Self { inputs, outputs }
    }

    pub fn inputs(&self) -> &Schema {
        &self.inputs
    }

    pub fn outputs(&self) -> Option<&Schema> {
        self.outputs.as_ref()
    }

    /// Encodes each schema to its JSON string. `outputs` is left out when absent.
    pub fn to_dict(&self) -> ModelkitResult<SignatureDict> {
        Ok(SignatureDict {
            inputs: self.inputs.to_json()?,
            outputs: self.outputs.as_ref().map(Schema::to_json).transpose()?,
        })
    }

    /// Decodes the JSON strings of a [`SignatureDict`] back into schemas.
    pub fn from_dict(dict: &SignatureDict) -> ModelkitResult<Self> {
        let inputs = Schema::from_json(&dict.inputs)?;
        let outputs = dict.outputs.as_deref().map(Schema::from_json).transpose()?;
        Ok(Self { inputs, outputs })
    }

    /// Decodes an untyped dict, checking its structural markers first.
    ///
    /// `inputs` must be present and a string; `outputs` may be absent, `null`
    /// or a string.
    pub fn from_value(value: &serde_json::Value) -> ModelkitResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| malformed("expected an object with an 'inputs' key"))?;
        let inputs = match object.get("inputs") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => return Err(malformed(format!("'inputs' must be a JSON string, got {}", other))),
            None => return Err(malformed("missing 'inputs'")),
        };
        let outputs = match object.get("outputs") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => return Err(malformed(format!("'outputs' must be a JSON string, got {}", other))),
        };
        Self::from_dict(&SignatureDict { inputs, outputs })
    }

    /// JSON text of the dict form.
    pub fn to_json(&self) -> ModelkitResult<String> {
        crate::json::to_python_string(&self.to_dict()?)
    }

    /// Parses JSON text of the dict form.
    pub fn from_json(json: &str) -> ModelkitResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }
}

fn malformed(msg: impl fmt::Display) -> ModelkitError {
    ModelkitError::serialization(format!("malformed signature: {}", msg))
}

impl fmt::Display for ModelSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "inputs:")?;
        writeln!(f, "  {}", self.inputs)?;
        writeln!(f, "outputs:")?;
        match &self.outputs {
            Some(outputs) => writeln!(f, "  {}", outputs),
            None => writeln!(f, "  None"),
        }
    }
}
