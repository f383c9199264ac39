//! Exact decimal numbers.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value as Json;

use crate::error::MappingError;
use crate::field::Field;
use crate::path::Path;

/// A [`Decimal`] carried as a JSON string, e.g. `"5000.00"`, so no precision
/// is lost to `f64` in either direction. JSON numbers are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalField;

impl Field for DecimalField {
    type Value = Decimal;

    fn descriptor(&self) -> String {
        "Decimal".to_string()
    }

    fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<Decimal, MappingError> {
        let text = raw
            .as_str()
            .ok_or_else(|| path.type_mismatch("decimal string", raw))?;

        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|e| path.invalid(format!("invalid decimal '{}': {}", text, e)))
    }

    fn encode(&self, value: &Decimal, _path: &Path<'_>) -> Result<Json, MappingError> {
        Ok(Json::String(value.to_string()))
    }

    fn equals(&self, a: &Decimal, b: &Decimal) -> bool {
        a == b
    }
}
