//! Projector -- walk selection trees against a source value.
//!
//! The projector matches each selection key against the source object's own
//! properties, renames, descends into nested selections, and merges the
//! outcome into one result object shared by every fragment of a call.
//!
//! # Modes
//!
//! - [`Mode::Strict`] -- unmatched keys are omitted and nested results that
//!   end up empty are pruned.
//! - [`Mode::AbsentMarkers`] -- unmatched keys are written as `null`, and a
//!   nested selection that cannot be entered is materialized as an object of
//!   `null` leaves shaped like the selection.

use crate::args::flatten_fragments;
use crate::error::Result;
use crate::schema::{compile, SelectionTree};
use serde_json::{Map, Value};

/// How unmatched selections are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Omit anything that did not match.
    #[default]
    Strict,
    /// Write `null` for anything that did not match.
    AbsentMarkers,
}

/// A list of compiled schema fragments, reusable across projections.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use yank_core::{Mode, Schema};
///
/// let schema = Schema::compile(&["id", "owner: { name->owner_name }"]).unwrap();
///
/// let a = schema.apply(&json!({"id": 1, "owner": {"name": "Ann"}}), Mode::Strict);
/// assert_eq!(a, json!({"id": 1, "owner": {"owner_name": "Ann"}}));
///
/// let b = schema.apply(&json!({"id": 2}), Mode::AbsentMarkers);
/// assert_eq!(b, json!({"id": 2, "owner": {"owner_name": null}}));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    trees: Vec<SelectionTree>,
}

impl Schema {
    /// Compile every fragment, in order.
    ///
    /// # Errors
    ///
    /// Fails fast with the first [`crate::YankError::SchemaSyntax`]; no
    /// partially compiled schema is returned.
    pub fn compile<S: AsRef<str>>(fragments: &[S]) -> Result<Self> {
        let trees = fragments
            .iter()
            .map(|fragment| compile(fragment.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("compiled {} schema fragment(s)", trees.len());
        Ok(Self { trees })
    }

    pub fn trees(&self) -> &[SelectionTree] {
        &self.trees
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Project `source` through every fragment into one result.
    ///
    /// With no fragments the source is returned unchanged. In
    /// [`Mode::AbsentMarkers`] a result with no keys at all collapses to
    /// `null`; strict mode returns `{}` instead.
    pub fn apply(&self, source: &Value, mode: Mode) -> Value {
        if self.trees.is_empty() {
            return source.clone();
        }
        self.fold(source, mode)
    }

    /// Fold every tree into one result, with no pass-through for an empty
    /// schema: zero trees give `{}` (strict) or `null` (absent markers).
    fn fold(&self, source: &Value, mode: Mode) -> Value {
        log::debug!(
            "projecting through {} fragment(s) in {mode:?} mode",
            self.trees.len()
        );

        let mut result = Map::new();
        for tree in &self.trees {
            project_tree(source, &mut result, tree, mode);
        }

        if mode == Mode::AbsentMarkers && result.is_empty() {
            return Value::Null;
        }
        Value::Object(result)
    }
}

impl From<Vec<SelectionTree>> for Schema {
    fn from(trees: Vec<SelectionTree>) -> Self {
        Self { trees }
    }
}

/// Select properties from `source`, omitting anything unmatched.
///
/// # Errors
///
/// Returns [`crate::YankError::SchemaSyntax`] if any fragment is malformed.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use yank_core::project;
///
/// let source = json!({"firstName": "John", "lastName": "Doe"});
/// let result = project(&source, &["firstName->first_name", "emailAddress"]).unwrap();
/// assert_eq!(result, json!({"first_name": "John"}));
/// ```
pub fn project<S: AsRef<str>>(source: &Value, fragments: &[S]) -> Result<Value> {
    Ok(Schema::compile(fragments)?.apply(source, Mode::Strict))
}

/// Select properties from `source`, writing `null` for anything unmatched.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use yank_core::project_with_absent_markers;
///
/// let source = json!({"exists": "one", "yank": "two"});
/// let result = project_with_absent_markers(&source, &["exists", "notexists"]).unwrap();
/// assert_eq!(result, json!({"exists": "one", "notexists": null}));
/// ```
pub fn project_with_absent_markers<S: AsRef<str>>(
    source: &Value,
    fragments: &[S],
) -> Result<Value> {
    Ok(Schema::compile(fragments)?.apply(source, Mode::AbsentMarkers))
}

/// Project with loosely-typed arguments: strings or nested arrays of strings.
///
/// All arguments are flattened and type-checked before any fragment is
/// compiled, so one bad argument aborts the whole call. Only an empty
/// argument list returns the source unchanged; arguments that flatten to no
/// fragments (`[[]]`) select nothing, giving `{}` or, with absent markers,
/// `null`.
///
/// # Errors
///
/// Returns [`crate::YankError::SchemaType`] for a non-string argument, or
/// [`crate::YankError::SchemaSyntax`] for a malformed fragment.
pub fn project_args(source: &Value, args: &[Value], mode: Mode) -> Result<Value> {
    if args.is_empty() {
        return Ok(source.clone());
    }
    let fragments = flatten_fragments(args)?;
    Ok(Schema::compile(fragments.as_slice())?.fold(source, mode))
}

/// Parse a JSON document, project it, and serialize the result compactly.
///
/// # Errors
///
/// Returns [`crate::YankError::JsonParse`] if `json` is not valid JSON, or a
/// schema error as for [`project`].
///
/// # Examples
///
/// ```
/// use yank_core::{project_json, Mode};
///
/// let out = project_json(r#"{"a":1,"b":2}"#, &["b"], Mode::Strict).unwrap();
/// assert_eq!(out, r#"{"b":2}"#);
/// ```
pub fn project_json<S: AsRef<str>>(json: &str, fragments: &[S], mode: Mode) -> Result<String> {
    let schema = Schema::compile(fragments)?;
    let source: Value = serde_json::from_str(json)?;
    let projected = schema.apply(&source, mode);
    Ok(serde_json::to_string(&projected)?)
}

/// Walk one selection tree against `source`, merging into `result`.
///
/// For each selection key, in declaration order:
///
/// 1. **Nested match**: the source owns the property and it is an object --
///    descend, reusing an object already present under the output name.
/// 2. **Nested miss**: the property is missing or not an object -- strict
///    mode skips it; absent-marker mode fills a `null`-leaved object shaped
///    like the subtree.
/// 3. **Leaf match**: copy the value verbatim, overwriting earlier writes.
/// 4. **Leaf miss**: strict mode skips it; absent-marker mode writes `null`
///    unless an earlier fragment already set the key.
///
/// Only objects own properties. Arrays and scalars are leaves and are never
/// indexed into.
pub fn project_tree(
    source: &Value,
    result: &mut Map<String, Value>,
    tree: &SelectionTree,
    mode: Mode,
) {
    let owned = source.as_object();

    for (key, selection) in tree.iter() {
        let output = key.output_name();
        let matched = owned.and_then(|props| props.get(key.original()));

        match (selection.subtree(), matched) {
            (Some(subtree), Some(value @ Value::Object(_))) => match result.get_mut(output) {
                Some(Value::Object(child)) => project_tree(value, child, subtree, mode),
                _ => {
                    let mut child = Map::new();
                    project_tree(value, &mut child, subtree, mode);
                    if mode == Mode::AbsentMarkers || !child.is_empty() {
                        result.insert(output.to_string(), Value::Object(child));
                    }
                }
            },
            (Some(subtree), _) => {
                log::trace!("'{}' cannot be entered", key.original());
                if mode == Mode::AbsentMarkers {
                    fill_absent(result, output, subtree);
                }
            }
            (None, Some(value)) => {
                result.insert(output.to_string(), value.clone());
            }
            (None, None) => {
                log::trace!("'{}' not found", key.original());
                if mode == Mode::AbsentMarkers {
                    result.entry(output).or_insert(Value::Null);
                }
            }
        }

        if mode == Mode::Strict {
            prune(result);
        }
    }
}

/// Materialize `tree` as `null` leaves under `result[name]`, keeping any
/// value an earlier fragment already wrote.
fn fill_absent(result: &mut Map<String, Value>, name: &str, tree: &SelectionTree) {
    match result.get_mut(name) {
        Some(Value::Object(child)) => fill_absent_tree(child, tree),
        Some(_) => {}
        None => {
            let mut child = Map::new();
            fill_absent_tree(&mut child, tree);
            result.insert(name.to_string(), Value::Object(child));
        }
    }
}

fn fill_absent_tree(result: &mut Map<String, Value>, tree: &SelectionTree) {
    for (key, selection) in tree.iter() {
        match selection.subtree() {
            Some(subtree) => fill_absent(result, key.output_name(), subtree),
            None => {
                result.entry(key.output_name()).or_insert(Value::Null);
            }
        }
    }
}

/// Drop direct children that are empty objects. Other values, `null`
/// included, are never pruned.
fn prune(result: &mut Map<String, Value>) {
    result.retain(|_, value| !matches!(value, Value::Object(map) if map.is_empty()));
}
