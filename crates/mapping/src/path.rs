//! Access paths used to locate errors inside a JSON tree.
//!
//! A [`Path`] is a borrowed, singly-linked chain: every level of a decode or
//! encode call extends its parent on the stack, so building a path never
//! allocates. The chain is only rendered when an error is constructed.

use std::fmt;

use crate::error::MappingError;

/// One step from a parent value to a child value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor<'a> {
    Root,
    /// An object key. Names starting with `[` render verbatim.
    Field(&'a str),
    /// An array element.
    Index(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct Path<'a> {
    accessor: Accessor<'a>,
    parent: Option<&'a Path<'a>>,
}

impl Path<'static> {
    pub const fn root() -> Self {
        Path {
            accessor: Accessor::Root,
            parent: None,
        }
    }
}

impl<'a> Path<'a> {
    /// Child path for the object key `name`.
    pub fn extend<'b>(&'b self, name: &'b str) -> Path<'b> {
        Path {
            accessor: Accessor::Field(name),
            parent: Some(self),
        }
    }

    /// Child path for the array element at `index`.
    pub fn index(&self, index: usize) -> Path<'_> {
        Path {
            accessor: Accessor::Index(index),
            parent: Some(self),
        }
    }

    pub fn accessor(&self) -> Accessor<'a> {
        self.accessor
    }

    pub fn parent(&self) -> Option<&'a Path<'a>> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Render the chain from the root, e.g. `object.foo[2].bar`.
    pub fn render(&self) -> String {
        let mut segments = Vec::new();
        let mut current = Some(self);

        while let Some(path) = current {
            match path.accessor {
                Accessor::Root => {
                    segments.push("object".to_string());
                    break;
                }
                Accessor::Field(name) if name.starts_with('[') => {
                    segments.push(name.to_string());
                }
                Accessor::Field(name) => segments.push(format!(".{}", name)),
                Accessor::Index(index) => segments.push(format!("[{}]", index)),
            }
            current = path.parent;
        }

        segments.reverse();
        segments.concat()
    }

    // ── Error constructors ──────────────────────────────────────────

    pub fn missing_field(&self) -> MappingError {
        MappingError::MissingField {
            path: self.render(),
        }
    }

    pub fn type_mismatch(&self, expected: impl Into<String>, got: &serde_json::Value) -> MappingError {
        MappingError::TypeMismatch {
            path: self.render(),
            expected: expected.into(),
            got: describe(got),
        }
    }

    pub fn missing_variant_tag(&self) -> MappingError {
        MappingError::MissingVariantTag {
            path: self.render(),
        }
    }

    pub fn unknown_variant_tag(&self, tag: &str, known: &[&str]) -> MappingError {
        MappingError::UnknownVariantTag {
            path: self.render(),
            tag: tag.to_string(),
            known: known.join(", "),
        }
    }

    pub fn invalid(&self, message: impl Into<String>) -> MappingError {
        MappingError::InvalidValue {
            path: self.render(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Short rendering of a raw value for error messages. Containers are named
/// rather than dumped, since they can be arbitrarily large.
pub(crate) fn describe(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Array(_) => "array".to_string(),
        serde_json::Value::Object(_) => "object".to_string(),
        scalar => scalar.to_string(),
    }
}
