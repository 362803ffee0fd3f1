//! Error types for schema compilation and projection entry points.

use thiserror::Error;

/// Errors that can occur while preparing a projection.
///
/// Projection itself never fails: missing properties and mismatched nesting
/// degrade to omitted (strict) or absent (`null`) output.
#[derive(Error, Debug)]
pub enum YankError {
    /// A schema argument was not a string (after flattening nested arrays).
    /// `index` is the position in the flattened argument list.
    #[error("All arguments must be strings: argument {index} is {found}")]
    SchemaType { index: usize, found: &'static str },

    /// A schema fragment did not conform to the grammar.
    /// `offset` is the byte offset into the fragment as written by the caller.
    #[error("Schema syntax error at offset {offset}: {message}")]
    SchemaSyntax { offset: usize, message: String },

    /// The input text was not valid JSON (string entry point only).
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Convenience alias used throughout yank-core.
pub type Result<T> = std::result::Result<T, YankError>;
