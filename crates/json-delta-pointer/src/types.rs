//! Type definitions for JSON Pointer paths and resolved locations.

use serde_json::Value;

/// A step in a JSON Pointer path: an object key or a stringified array index.
pub type PathStep = String;

/// A JSON Pointer path as decoded segments. The empty path is the document
/// root.
pub type Path = Vec<PathStep>;

/// The key half of a resolved `(parent, key)` location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// An object member key. Also produced when the parent is not a
    /// container, so callers can report the offending location.
    Member(String),
    /// A numeric array index.
    Index(usize),
    /// The `-` append marker: one past the end of an array.
    Append,
}

/// Outcome of resolving a pointer against a document.
#[derive(Debug)]
pub enum Target<'a> {
    /// The empty pointer: the whole document.
    Doc(&'a mut Value),
    /// A location inside the document, addressed as parent container plus
    /// final key.
    Inside {
        /// The container (or scalar, for malformed addressing) holding the
        /// addressed slot.
        parent: &'a mut Value,
        /// The final path segment, classified against the parent's shape.
        key: Key,
    },
}
