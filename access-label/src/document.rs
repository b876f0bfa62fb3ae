//! Borrowed, tagged view over decoded documents.
//!
//! Documents arrive already decoded as [`serde_json::Value`]. Extraction never
//! inspects a `Value` directly; it classifies each value into a [`Node`] and
//! matches on the tag. The view borrows from the document, so classifying is
//! free and nothing is copied until a label string is produced.

use std::fmt;

use serde_json::{Map, Number, Value};

/// The kind of a value the extractor cannot turn into a label on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    String,
    Number,
    List,
    Mapping,
}

impl ValueKind {
    /// Stable lowercase name, used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::List => "list",
            ValueKind::Mapping => "mapping",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged view of a single document value.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    String(&'a str),
    Number(&'a Number),
    List(&'a [Value]),
    Mapping(&'a Map<String, Value>),
    /// Values that never carry a label (`null`, booleans).
    Other(ValueKind),
}

impl<'a> Node<'a> {
    /// Classifies a value.
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::String(s) => Node::String(s),
            Value::Number(n) => Node::Number(n),
            Value::Array(items) => Node::List(items),
            Value::Object(map) => Node::Mapping(map),
            Value::Bool(_) => Node::Other(ValueKind::Bool),
            Value::Null => Node::Other(ValueKind::Null),
        }
    }

    /// Returns the kind tag of this node.
    pub fn kind(&self) -> ValueKind {
        match self {
            Node::String(_) => ValueKind::String,
            Node::Number(_) => ValueKind::Number,
            Node::List(_) => ValueKind::List,
            Node::Mapping(_) => ValueKind::Mapping,
            Node::Other(kind) => *kind,
        }
    }

    /// Returns the mapping if this node is one.
    pub fn as_mapping(&self) -> Option<&'a Map<String, Value>> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

/// A dotted field path split into segments.
///
/// Splitting follows the `a.b.c` convention: every `.` separates a segment and
/// trailing empty segments are discarded, so `"a.b."` has the segments `a` and
/// `b` while `"."` and `""` have none. A path without segments is never found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath<'a> {
    segments: Vec<&'a str>,
}

impl<'a> FieldPath<'a> {
    /// Splits `path` on `.`.
    pub fn parse(path: &'a str) -> Self {
        let mut segments: Vec<&'a str> = path.split('.').collect();
        while segments.last().is_some_and(|segment| segment.is_empty()) {
            segments.pop();
        }
        Self { segments }
    }

    /// Splits the path into its first segment and the remaining path joined
    /// back with `.`.
    pub fn split_first(&self) -> Option<(&'a str, String)> {
        let (head, rest) = self.segments.split_first()?;
        Some((head, rest.join(".")))
    }
}
