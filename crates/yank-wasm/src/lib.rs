//! WASM bindings for yank-core.
//!
//! Exposes `project` and `projectWithAbsentMarkers` as `#[wasm_bindgen]`
//! functions callable from JavaScript/TypeScript. Documents cross the boundary
//! as JSON text. `fragments` is the JSON text of one schema argument: a
//! fragment string or a (nested) array of them, so a non-string fragment
//! surfaces as a type error and `[]` selects nothing.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p yank-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/yank-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/yank_wasm.wasm
//! ```

use serde_json::Value;
use wasm_bindgen::prelude::*;
use yank_core::{Mode, YankError};

/// Project a JSON document, omitting unmatched properties.
///
/// `fragments` is a JSON array of schema fragments. Returns the projected
/// JSON, or throws a JS error for invalid JSON or schemas.
#[wasm_bindgen]
pub fn project(json: &str, fragments: &str) -> std::result::Result<String, JsValue> {
    run(json, fragments, Mode::Strict).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Project a JSON document, writing `null` for unmatched properties.
///
/// Returns `"null"` if nothing at all was selected.
#[wasm_bindgen(js_name = projectWithAbsentMarkers)]
pub fn project_with_absent_markers(
    json: &str,
    fragments: &str,
) -> std::result::Result<String, JsValue> {
    run(json, fragments, Mode::AbsentMarkers).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn run(json: &str, fragments: &str, mode: Mode) -> Result<String, YankError> {
    // One JS argument: a fragment string or a (nested) array of them.
    let args = [serde_json::from_str::<Value>(fragments)?];
    let source: Value = serde_json::from_str(json)?;
    let projected = yank_core::project_args(&source, &args, mode)?;
    Ok(serde_json::to_string(&projected)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_projects_with_nested_fragment_arrays() {
        let out = run(
            r#"{"a":1,"b":{"c":2}}"#,
            r#"["a", ["b: { c->d }"]]"#,
            Mode::Strict,
        )
        .unwrap();
        assert_eq!(out, r#"{"a":1,"b":{"d":2}}"#);
    }

    #[test]
    fn run_accepts_a_single_fragment_string() {
        let out = run(r#"{"a":1}"#, r#""a, b""#, Mode::AbsentMarkers).unwrap();
        assert_eq!(out, r#"{"a":1,"b":null}"#);
    }

    #[test]
    fn run_with_empty_fragment_array_selects_nothing() {
        assert_eq!(run(r#"{"a":1}"#, "[]", Mode::Strict).unwrap(), "{}");
        assert_eq!(run(r#"{"a":1}"#, "[]", Mode::AbsentMarkers).unwrap(), "null");
    }

    #[test]
    fn run_rejects_non_string_fragments() {
        let err = run(r#"{"a":1}"#, r#"["a", 1]"#, Mode::Strict).unwrap_err();
        assert!(matches!(err, YankError::SchemaType { index: 1, .. }));
    }
}
