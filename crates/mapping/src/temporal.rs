//! Calendar timestamps carried as millisecond epoch numbers.

use serde_json::Value as Json;
use time::OffsetDateTime;

use crate::error::MappingError;
use crate::field::Field;
use crate::path::Path;
use crate::primitive::Number;

const NANOS_PER_MILLI: i128 = 1_000_000;

/// Decodes a millisecond epoch number into an [`OffsetDateTime`] (UTC) and
/// encodes it back at millisecond resolution.
///
/// `equals` always returns false, so timestamps never contribute to the
/// structural equality of the object that holds them, even when identical.
/// Compare the values directly when that is what you need.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timestamp;

impl Field for Timestamp {
    type Value = OffsetDateTime;

    fn descriptor(&self) -> String {
        "Timestamp".to_string()
    }

    fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<OffsetDateTime, MappingError> {
        if let Some(millis) = raw.as_i64() {
            return OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * NANOS_PER_MILLI)
                .map_err(|e| path.invalid(format!("timestamp out of range: {}", e)));
        }

        let millis = Number.decode(raw, path)?;
        let nanos = (millis * NANOS_PER_MILLI as f64).round();

        if !nanos.is_finite() || nanos.abs() >= i128::MAX as f64 {
            return Err(path.invalid(format!("timestamp out of range: {}", millis)));
        }

        OffsetDateTime::from_unix_timestamp_nanos(nanos as i128)
            .map_err(|e| path.invalid(format!("timestamp out of range: {}", e)))
    }

    fn encode(&self, value: &OffsetDateTime, path: &Path<'_>) -> Result<Json, MappingError> {
        let millis = value.unix_timestamp_nanos().div_euclid(NANOS_PER_MILLI);
        i64::try_from(millis)
            .map(Json::from)
            .map_err(|_| path.invalid(format!("timestamp out of range: {}", value)))
    }

    fn equals(&self, _a: &OffsetDateTime, _b: &OffsetDateTime) -> bool {
        false
    }
}
