//! The codec contract every mapped value goes through.

use crate::error::MappingError;
use crate::path::Path;

/// A typed codec and structural comparator for one value.
///
/// Fields are immutable once constructed and are shared by every decode
/// and encode call that goes through the schema owning them.
pub trait Field {
    type Value;

    /// Human-readable name of the value type, e.g. `Array<Number>`.
    fn descriptor(&self) -> String;

    fn decode(&self, raw: &serde_json::Value, path: &Path<'_>) -> Result<Self::Value, MappingError>;

    fn encode(&self, value: &Self::Value, path: &Path<'_>) -> Result<serde_json::Value, MappingError>;

    fn equals(&self, a: &Self::Value, b: &Self::Value) -> bool;

    fn is_optional(&self) -> bool {
        false
    }

    /// The value bound when the owning object has no (or a null) entry for
    /// this field. Required fields return `None`, which the owner reports as
    /// a missing field.
    fn absent(&self) -> Option<Self::Value> {
        None
    }

    /// Whether `value` should be left out of the encoded object entirely.
    fn is_absent(&self, _value: &Self::Value) -> bool {
        false
    }
}

impl<F: Field + ?Sized> Field for &F {
    type Value = F::Value;

    fn descriptor(&self) -> String {
        (**self).descriptor()
    }

    fn decode(&self, raw: &serde_json::Value, path: &Path<'_>) -> Result<Self::Value, MappingError> {
        (**self).decode(raw, path)
    }

    fn encode(&self, value: &Self::Value, path: &Path<'_>) -> Result<serde_json::Value, MappingError> {
        (**self).encode(value, path)
    }

    fn equals(&self, a: &Self::Value, b: &Self::Value) -> bool {
        (**self).equals(a, b)
    }

    fn is_optional(&self) -> bool {
        (**self).is_optional()
    }

    fn absent(&self) -> Option<Self::Value> {
        (**self).absent()
    }

    fn is_absent(&self, value: &Self::Value) -> bool {
        (**self).is_absent(value)
    }
}

/// Makes a field optional: a missing or null entry decodes to `None`. The
/// inner field only ever sees present values.
///
/// Inside a class schema a `None` field is omitted from the encoded object.
/// Used directly, or as an array element or map value, `None` encodes as
/// `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optional<F>(pub F);

pub fn optional<F: Field>(field: F) -> Optional<F> {
    Optional(field)
}

impl<F: Field> Field for Optional<F> {
    type Value = Option<F::Value>;

    fn descriptor(&self) -> String {
        format!("Optional<{}>", self.0.descriptor())
    }

    fn decode(&self, raw: &serde_json::Value, path: &Path<'_>) -> Result<Self::Value, MappingError> {
        if raw.is_null() {
            return Ok(None);
        }
        self.0.decode(raw, path).map(Some)
    }

    fn encode(&self, value: &Self::Value, path: &Path<'_>) -> Result<serde_json::Value, MappingError> {
        match value {
            Some(inner) => self.0.encode(inner, path),
            None => Ok(serde_json::Value::Null),
        }
    }

    fn equals(&self, a: &Self::Value, b: &Self::Value) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.0.equals(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn absent(&self) -> Option<Self::Value> {
        Some(None)
    }

    fn is_absent(&self, value: &Self::Value) -> bool {
        value.is_none()
    }
}
