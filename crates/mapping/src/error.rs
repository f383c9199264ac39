//! The single error category produced by the mapping engine.

use serde::Serialize;

/// Discriminant of a [`MappingError`], suitable for programmatic matching
/// and for the JSON error report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingField,
    TypeMismatch,
    MissingVariantTag,
    UnknownVariantTag,
    UnregisteredOverrideKey,
    OverrideType,
    InvalidValue,
    Construct,
    Syntax,
}

/// All errors that can be returned by decode, encode, clone and mutate.
///
/// Errors raised while walking a JSON tree carry the rendered access path
/// (e.g. `object.components[2].visualization`). Errors raised by `clone` and
/// `mutate` carry the name of the schema instead, since no tree is walked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// A required field was absent or null.
    #[error("{path}: missing value")]
    MissingField { path: String },

    /// The raw value does not have the expected shape.
    #[error("{path}: expected {expected}, got: {got}")]
    TypeMismatch {
        path: String,
        expected: String,
        got: String,
    },

    /// A tagged-union object has no `type` key.
    #[error("{path}: missing field: type")]
    MissingVariantTag { path: String },

    /// The `type` key names no registered variant.
    #[error("{path}: does not correspond to a sub-type: {tag}, expected one of: {known}")]
    UnknownVariantTag {
        path: String,
        tag: String,
        known: String,
    },

    /// A clone/mutate override names a field the schema does not declare.
    #[error("{schema}: field does not exist: {key}")]
    UnregisteredOverrideKey { schema: String, key: String },

    /// A clone/mutate override value does not have the field's value type.
    #[error("{schema}: override for field {key} does not match its type {expected}")]
    OverrideType {
        schema: String,
        key: String,
        expected: String,
    },

    /// The value is well-typed but has no representation on the other side.
    #[error("{path}: {message}")]
    InvalidValue { path: String, message: String },

    /// A type could not be built from its decoded values.
    #[error("{schema}: {message}")]
    Construct { schema: String, message: String },

    /// Input text is not JSON.
    #[error("invalid JSON: {message}")]
    Syntax { message: String },
}

impl MappingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MappingError::MissingField { .. } => ErrorKind::MissingField,
            MappingError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            MappingError::MissingVariantTag { .. } => ErrorKind::MissingVariantTag,
            MappingError::UnknownVariantTag { .. } => ErrorKind::UnknownVariantTag,
            MappingError::UnregisteredOverrideKey { .. } => ErrorKind::UnregisteredOverrideKey,
            MappingError::OverrideType { .. } => ErrorKind::OverrideType,
            MappingError::InvalidValue { .. } => ErrorKind::InvalidValue,
            MappingError::Construct { .. } => ErrorKind::Construct,
            MappingError::Syntax { .. } => ErrorKind::Syntax,
        }
    }

    /// The rendered access path, for errors raised during a tree walk.
    pub fn path(&self) -> Option<&str> {
        match self {
            MappingError::MissingField { path }
            | MappingError::TypeMismatch { path, .. }
            | MappingError::MissingVariantTag { path }
            | MappingError::UnknownVariantTag { path, .. }
            | MappingError::InvalidValue { path, .. } => Some(path),
            MappingError::UnregisteredOverrideKey { .. }
            | MappingError::OverrideType { .. }
            | MappingError::Construct { .. }
            | MappingError::Syntax { .. } => None,
        }
    }

    /// Serialize to a `{kind, path, message}` report.
    /// `path` is null for errors that were not raised during a tree walk.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "kind":    self.kind(),
            "path":    self.path(),
            "message": self.to_string(),
        })
    }
}
