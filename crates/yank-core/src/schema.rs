//! Schema compiler -- turns a schema fragment into a [`SelectionTree`].
//!
//! # Grammar
//!
//! ```text
//! fragment := entry (',' entry)*
//! entry    := name ('->' name)? (':' '{' (fragment)? '}')?
//! name     := [A-Za-z0-9_-]+
//! ```
//!
//! Whitespace is insignificant anywhere, including inside names
//! (`"first Name"` selects `firstName`). A `-` directly followed by `>` is
//! always the rename arrow, never part of a name.
//!
//! # Examples
//!
//! ```
//! use yank_core::schema::{compile, Selection};
//!
//! let tree = compile("id, name->title, address: { city }").unwrap();
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.to_string(), "id,name->title,address:{city}");
//!
//! let (key, selection) = tree.iter().nth(1).unwrap();
//! assert_eq!(key.original(), "name");
//! assert_eq!(key.output_name(), "title");
//! assert_eq!(selection, &Selection::Leaf);
//! ```

use crate::error::{Result, YankError};
use std::fmt;
use std::str::FromStr;

/// Deepest `{ }` nesting a fragment may use, matching serde_json's recursion
/// limit. Keeps the parser and the projector's recursion off the stack limit.
pub const MAX_NESTING: usize = 128;

/// One selection key: the source property to read and, optionally, the name
/// to write it under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionKey {
    original: String,
    renamed: Option<String>,
}

impl SelectionKey {
    pub fn new(original: impl Into<String>, renamed: Option<String>) -> Self {
        Self {
            original: original.into(),
            renamed,
        }
    }

    /// Name of the property read from the source object.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn renamed(&self) -> Option<&str> {
        self.renamed.as_deref()
    }

    /// Key written into the result: the rename target if present, else the
    /// original name.
    pub fn output_name(&self) -> &str {
        self.renamed.as_deref().unwrap_or(&self.original)
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.renamed {
            Some(renamed) => write!(f, "{}->{}", self.original, renamed),
            None => f.write_str(&self.original),
        }
    }
}

/// What to do with a matched property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Copy the property's value verbatim.
    Leaf,
    /// Descend into the property as an object.
    Nested(SelectionTree),
}

impl Selection {
    /// The nested tree, if this selection descends and has anything to select.
    ///
    /// An empty nested tree behaves exactly like a leaf.
    pub fn subtree(&self) -> Option<&SelectionTree> {
        match self {
            Selection::Nested(tree) if !tree.is_empty() => Some(tree),
            _ => None,
        }
    }
}

/// Compiled form of a schema fragment, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTree {
    entries: Vec<(SelectionKey, Selection)>,
}

impl SelectionTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. A key declared twice keeps its first position and takes
    /// the later selection, like a repeated key in an object literal.
    pub fn insert(&mut self, key: SelectionKey, selection: Selection) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = selection,
            None => self.entries.push((key, selection)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SelectionKey, &Selection)> + '_ {
        self.entries.iter().map(|(k, s)| (k, s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for SelectionTree {
    /// Canonical compact form. Compiling the output yields an equal tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, selection)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}")?;
            if let Some(subtree) = selection.subtree() {
                write!(f, ":{{{subtree}}}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for SelectionTree {
    type Err = YankError;

    fn from_str(s: &str) -> Result<Self> {
        compile(s)
    }
}

/// Compile one schema fragment into a [`SelectionTree`].
///
/// # Errors
///
/// Returns [`YankError::SchemaSyntax`] if the fragment is empty, has an empty
/// or illegal name, a dangling or repeated `->`, unbalanced braces, a `:` not
/// followed by `{`, or blocks nested deeper than [`MAX_NESTING`].
pub fn compile(fragment: &str) -> Result<SelectionTree> {
    let mut parser = Parser::new(fragment);
    let tree = parser.parse_entries(false)?;
    log::trace!("compiled schema fragment {fragment:?} -> {tree}");
    Ok(tree)
}

/// Recursive-descent parser over the non-whitespace characters of a fragment.
///
/// Each character keeps its byte offset in the original text so errors point
/// at what the caller actually wrote.
struct Parser<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source
                .char_indices()
                .filter(|(_, c)| !c.is_whitespace())
                .collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|&(i, _)| i)
            .unwrap_or(self.source.len())
    }

    fn at_arrow(&self) -> bool {
        self.peek() == Some('-') && self.peek_at(1) == Some('>')
    }

    fn error(&self, message: impl Into<String>) -> YankError {
        YankError::SchemaSyntax {
            offset: self.offset(),
            message: message.into(),
        }
    }

    fn unexpected(&self, expected: &str) -> YankError {
        match self.peek() {
            Some(c) => self.error(format!("expected {expected}, found '{c}'")),
            None => self.error(format!("expected {expected}, found end of schema")),
        }
    }

    /// Parse `entry (',' entry)*`. When `nested`, the list must be closed by
    /// `}` (which is consumed); otherwise it must run to the end of input.
    fn parse_entries(&mut self, nested: bool) -> Result<SelectionTree> {
        let mut tree = SelectionTree::new();
        loop {
            let (key, selection) = self.parse_entry()?;
            tree.insert(key, selection);

            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') if nested => {
                    self.pos += 1;
                    return Ok(tree);
                }
                None if !nested => return Ok(tree),
                None => return Err(self.error("unclosed '{'")),
                Some('}') => return Err(self.error("unmatched '}'")),
                Some(_) => return Err(self.unexpected("',' or end of entry")),
            }
        }
    }

    fn parse_entry(&mut self) -> Result<(SelectionKey, Selection)> {
        let original = self.parse_name()?;

        let renamed = if self.at_arrow() {
            self.pos += 2;
            let renamed = self.parse_name()?;
            if self.at_arrow() {
                return Err(self.error("only one '->' is allowed per key"));
            }
            Some(renamed)
        } else {
            None
        };

        let key = SelectionKey::new(original, renamed);

        if self.peek() != Some(':') {
            return Ok((key, Selection::Leaf));
        }
        self.pos += 1;

        if self.peek() != Some('{') {
            return Err(self.unexpected("'{' after ':'"));
        }
        self.pos += 1;

        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok((key, Selection::Leaf));
        }

        if self.depth == MAX_NESTING {
            return Err(self.error("schema nested too deeply"));
        }
        self.depth += 1;
        let subtree = self.parse_entries(true)?;
        self.depth -= 1;
        Ok((key, Selection::Nested(subtree)))
    }

    fn parse_name(&mut self) -> Result<String> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            let is_name_char =
                c.is_ascii_alphanumeric() || c == '_' || (c == '-' && !self.at_arrow());
            if !is_name_char {
                break;
            }
            name.push(c);
            self.pos += 1;
        }
        if name.is_empty() {
            return Err(self.unexpected("property name"));
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax_offset(fragment: &str) -> usize {
        match compile(fragment) {
            Err(YankError::SchemaSyntax { offset, .. }) => offset,
            other => panic!("expected syntax error for {fragment:?}, got {other:?}"),
        }
    }

    #[test]
    fn whitespace_is_stripped_inside_names() {
        let tree = compile(" first Name ").unwrap();
        assert_eq!(tree.to_string(), "firstName");
    }

    #[test]
    fn hyphen_before_arrow_ends_the_name() {
        let tree = compile("content-type->kind").unwrap();
        let (key, _) = tree.iter().next().unwrap();
        assert_eq!(key.original(), "content-type");
        assert_eq!(key.renamed(), Some("kind"));
    }

    #[test]
    fn trailing_hyphen_is_part_of_the_name() {
        let tree = compile("a-").unwrap();
        assert_eq!(tree.iter().next().unwrap().0.original(), "a-");
    }

    #[test]
    fn error_offsets_point_into_original_text() {
        // The '!' sits at byte 4 of the unstripped input.
        assert_eq!(syntax_offset("a,  !"), 4);
        assert_eq!(syntax_offset("a: { b"), 6);
        assert_eq!(syntax_offset(""), 0);
    }

    #[test]
    fn nesting_limit_is_inclusive() {
        let nested = |depth: usize| format!("{}b{}", "a:{".repeat(depth), "}".repeat(depth));
        assert!(compile(&nested(MAX_NESTING)).is_ok());
        // "a:{" is 3 bytes; the error points just past the first rejected '{'.
        assert_eq!(syntax_offset(&nested(MAX_NESTING + 1)), 3 * (MAX_NESTING + 1));
    }

    #[test]
    fn repeated_key_keeps_first_position_and_last_value() {
        let tree = compile("a, b, a: { c }").unwrap();
        assert_eq!(tree.to_string(), "a:{c},b");
    }

    #[test]
    fn empty_nested_block_is_a_leaf() {
        let tree = compile("a: {}").unwrap();
        assert_eq!(tree.iter().next().unwrap().1, &Selection::Leaf);
    }
}
