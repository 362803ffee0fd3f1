//! # yank-core
//!
//! Declarative projection of JSON values: pick a subset of properties out of a
//! nested object with a small schema language, optionally renaming and nesting
//! them, and get back a new object containing only what matched.
//!
//! ## Schema language
//!
//! - `"a, b"` -- select properties `a` and `b`
//! - `"a->x"` -- select `a`, write it under `x`
//! - `"a: { b, c }"` -- descend into object `a` and select `b` and `c`
//!
//! Several fragments can be passed at once; they are applied in order into
//! the same result, so later fragments overwrite leaves and merge objects.
//!
//! ## Quick start
//!
//! ```rust
//! use serde_json::json;
//! use yank_core::{project, project_with_absent_markers};
//!
//! let user = json!({
//!     "firstName": "John",
//!     "addressDetails": {"city": "London", "postcode": "SW1A 2AB"}
//! });
//!
//! let picked = project(&user, &["firstName->name", "addressDetails: { city }"]).unwrap();
//! assert_eq!(picked, json!({"name": "John", "addressDetails": {"city": "London"}}));
//!
//! let filled = project_with_absent_markers(&user, &["firstName, email"]).unwrap();
//! assert_eq!(filled, json!({"firstName": "John", "email": null}));
//! ```
//!
//! ## Modules
//!
//! - [`schema`] — schema fragment → [`SelectionTree`]
//! - [`projector`] — selection trees × source value → result (`project`, [`Schema`])
//! - [`args`] — flattening and type-checking of loosely-typed schema arguments
//! - [`error`] — Error types for schema type/syntax failures

pub mod args;
pub mod error;
pub mod projector;
pub mod schema;

pub use args::flatten_fragments;
pub use error::YankError;
pub use projector::{
    project, project_args, project_json, project_tree, project_with_absent_markers, Mode, Schema,
};
pub use schema::{compile, Selection, SelectionKey, SelectionTree, MAX_NESTING};
