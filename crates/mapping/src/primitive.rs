//! Scalar fields. Each decodes and encodes the matching JSON scalar as-is.

use serde_json::Value as Json;

use crate::error::MappingError;
use crate::field::Field;
use crate::path::Path;

/// A JSON number as `f64`.
///
/// Integral values encode as JSON integers: `2.0` and `-0.0` come back as
/// `2` and `0`. The decoded values are equal (`equals` compares the `f64`),
/// but the raw `serde_json::Value`s are not, since serde_json keeps integer
/// and float numbers distinct.
#[derive(Debug, Clone, Copy, Default)]
pub struct Number;

/// A JSON number that must be an integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integer;

/// A JSON string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

/// A JSON boolean.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

/// Any JSON value, passed through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

impl Field for Number {
    type Value = f64;

    fn descriptor(&self) -> String {
        "Number".to_string()
    }

    fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<f64, MappingError> {
        raw.as_f64().ok_or_else(|| path.type_mismatch("number", raw))
    }

    fn encode(&self, value: &f64, path: &Path<'_>) -> Result<Json, MappingError> {
        number_to_json(*value, path)
    }

    fn equals(&self, a: &f64, b: &f64) -> bool {
        a == b
    }
}

/// Integral values are emitted as JSON integers, so `2` encodes as `2`
/// rather than `2.0`.
pub(crate) fn number_to_json(value: f64, path: &Path<'_>) -> Result<Json, MappingError> {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        return Ok(Json::from(value as i64));
    }

    serde_json::Number::from_f64(value)
        .map(Json::Number)
        .ok_or_else(|| path.invalid(format!("number is not representable in JSON: {}", value)))
}

impl Field for Integer {
    type Value = i64;

    fn descriptor(&self) -> String {
        "Integer".to_string()
    }

    fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<i64, MappingError> {
        raw.as_i64().ok_or_else(|| path.type_mismatch("integer", raw))
    }

    fn encode(&self, value: &i64, _path: &Path<'_>) -> Result<Json, MappingError> {
        Ok(Json::from(*value))
    }

    fn equals(&self, a: &i64, b: &i64) -> bool {
        a == b
    }
}

impl Field for Text {
    type Value = String;

    fn descriptor(&self) -> String {
        "Text".to_string()
    }

    fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<String, MappingError> {
        raw.as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| path.type_mismatch("string", raw))
    }

    fn encode(&self, value: &String, _path: &Path<'_>) -> Result<Json, MappingError> {
        Ok(Json::String(value.clone()))
    }

    fn equals(&self, a: &String, b: &String) -> bool {
        a == b
    }
}

impl Field for Boolean {
    type Value = bool;

    fn descriptor(&self) -> String {
        "Boolean".to_string()
    }

    fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<bool, MappingError> {
        raw.as_bool().ok_or_else(|| path.type_mismatch("boolean", raw))
    }

    fn encode(&self, value: &bool, _path: &Path<'_>) -> Result<Json, MappingError> {
        Ok(Json::Bool(*value))
    }

    fn equals(&self, a: &bool, b: &bool) -> bool {
        a == b
    }
}

impl Field for Any {
    type Value = Json;

    fn descriptor(&self) -> String {
        "Any".to_string()
    }

    fn decode(&self, raw: &Json, _path: &Path<'_>) -> Result<Json, MappingError> {
        Ok(raw.clone())
    }

    fn encode(&self, value: &Json, _path: &Path<'_>) -> Result<Json, MappingError> {
        Ok(value.clone())
    }

    fn equals(&self, a: &Json, b: &Json) -> bool {
        a == b
    }
}

/// A closed set of string-named values, e.g. time units.
///
/// ```
/// use mapping::Enumeration;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Unit { Days, Weeks }
///
/// const UNIT: Enumeration<Unit> =
///     Enumeration::new("Unit", &[("days", Unit::Days), ("weeks", Unit::Weeks)]);
/// ```
#[derive(Debug)]
pub struct Enumeration<E: 'static> {
    name: &'static str,
    members: &'static [(&'static str, E)],
}

impl<E: 'static> Enumeration<E> {
    pub const fn new(name: &'static str, members: &'static [(&'static str, E)]) -> Self {
        Enumeration { name, members }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.members.iter().map(|(name, _)| *name)
    }
}

impl<E: Clone + PartialEq + 'static> Enumeration<E> {
    pub fn lookup(&self, name: &str) -> Option<&'static E> {
        self.members
            .iter()
            .find(|(member, _)| *member == name)
            .map(|(_, value)| value)
    }

    pub fn name_of(&self, value: &E) -> Option<&'static str> {
        self.members
            .iter()
            .find(|(_, member)| member == value)
            .map(|(name, _)| *name)
    }

    fn expected(&self) -> String {
        format!("one of: {}", self.names().collect::<Vec<_>>().join(", "))
    }
}

impl<E: 'static> Clone for Enumeration<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: 'static> Copy for Enumeration<E> {}

impl<E: Clone + PartialEq + 'static> Field for Enumeration<E> {
    type Value = E;

    fn descriptor(&self) -> String {
        self.name.to_string()
    }

    fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<E, MappingError> {
        raw.as_str()
            .and_then(|name| self.lookup(name))
            .cloned()
            .ok_or_else(|| path.type_mismatch(self.expected(), raw))
    }

    fn encode(&self, value: &E, path: &Path<'_>) -> Result<Json, MappingError> {
        self.name_of(value)
            .map(|name| Json::String(name.to_string()))
            .ok_or_else(|| path.invalid(format!("value is not a member of {}", self.name)))
    }

    fn equals(&self, a: &E, b: &E) -> bool {
        a == b
    }
}
