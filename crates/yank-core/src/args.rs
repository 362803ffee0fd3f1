//! Schema argument flattening for loosely-typed callers.
//!
//! Callers that build schema arguments from JSON (the CLI, the WASM binding)
//! may pass strings or arbitrarily nested arrays of strings. They are
//! flattened to one ordered list and type-checked before anything compiles.

use crate::error::{Result, YankError};
use serde_json::Value;

/// Flatten nested arrays of schema fragments into one ordered list.
///
/// # Errors
///
/// Returns [`YankError::SchemaType`] for the first element (in flattened
/// order) that is neither a string nor an array.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use yank_core::flatten_fragments;
///
/// let args = [json!("a"), json!(["b", ["c"]])];
/// assert_eq!(flatten_fragments(&args).unwrap(), vec!["a", "b", "c"]);
///
/// assert!(flatten_fragments(&[json!("a"), json!(1)]).is_err());
/// ```
pub fn flatten_fragments(args: &[Value]) -> Result<Vec<String>> {
    let mut out = Vec::new();
    flatten_into(args, &mut out)?;
    Ok(out)
}

fn flatten_into(args: &[Value], out: &mut Vec<String>) -> Result<()> {
    for arg in args {
        match arg {
            Value::String(s) => out.push(s.clone()),
            Value::Array(items) => flatten_into(items, out)?,
            other => {
                return Err(YankError::SchemaType {
                    index: out.len(),
                    found: json_type_name(other),
                })
            }
        }
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
