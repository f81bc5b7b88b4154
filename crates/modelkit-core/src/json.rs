//! JSON output compatible with Python's `json.dumps` defaults.
//!
//! Signature schemas are stored as JSON strings inside the `MLmodel` YAML, so
//! the exact bytes matter when other tooling compares or hashes them. Python's
//! default encoder separates items with `", "`, keys from values with `": "`,
//! and escapes every non-ASCII character as `\uXXXX`.

use crate::error::ModelkitResult;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use std::io::{self, Write};

/// [`Formatter`] reproducing `json.dumps(obj)` output.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonFormatter;

impl Formatter for PythonFormatter {
    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Serializes `value` the way Python's `json.dumps` would.
pub fn to_python_string<T: Serialize + ?Sized>(value: &T) -> ModelkitResult<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PythonFormatter);
    value.serialize(&mut serializer)?;
    // serde_json only writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_separators() {
        let value = json!([{"a": 1}, {"b": [1, 2]}]);
        assert_eq!(to_python_string(&value).unwrap(), r#"[{"a": 1}, {"b": [1, 2]}]"#);
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        let value = json!({"name": "café 🚀"});
        assert_eq!(
            to_python_string(&value).unwrap(),
            r#"{"name": "caf\u00e9 \ud83d\ude80"}"#
        );
    }

    #[test]
    fn test_output_parses_back() {
        let value = json!({"k": ["x", null, true, -1.5]});
        let text = to_python_string(&value).unwrap();
        let back: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, value);
    }
}
