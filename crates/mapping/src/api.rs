//! Top-level entry points.

use std::any::{Any as StdAny, TypeId};

use serde_json::Value as Json;

use crate::error::MappingError;
use crate::field::Field;
use crate::path::Path;
use crate::schema::{Class, ClassField, Values};

/// Decode `raw` into `T` through its schema.
pub fn decode<T: Class>(raw: &Json) -> Result<T, MappingError> {
    decode_with(raw, &ClassField::<T>::new())
}

/// Decode `raw` through an explicit field, e.g. a tagged union or an array.
pub fn decode_with<F: Field>(raw: &Json, field: &F) -> Result<F::Value, MappingError> {
    tracing::trace!(target_type = %field.descriptor(), "decode");
    let root = Path::root();
    field.decode(raw, &root).map_err(|e| {
        tracing::debug!(target_type = %field.descriptor(), error = %e, "decode failed");
        e
    })
}

/// Parse JSON text and decode it into `T`.
pub fn decode_str<T: Class>(text: &str) -> Result<T, MappingError> {
    let raw: Json = serde_json::from_str(text).map_err(|e| MappingError::Syntax {
        message: e.to_string(),
    })?;
    decode(&raw)
}

/// Encode `value` through the schema of its own type.
pub fn encode<T: Class>(value: &T) -> Result<Json, MappingError> {
    encode_with(value, &ClassField::<T>::new())
}

/// Encode `value` through an explicit field.
pub fn encode_with<F: Field>(value: &F::Value, field: &F) -> Result<Json, MappingError> {
    let root = Path::root();
    field.encode(value, &root).map_err(|e| {
        tracing::debug!(target_type = %field.descriptor(), error = %e, "encode failed");
        e
    })
}

/// Nominal-then-structural equality: values of different concrete types are
/// never equal, even with identical field layouts and values.
pub fn equals<A: Class, B: Class>(a: &A, b: &B) -> bool {
    if TypeId::of::<A>() != TypeId::of::<B>() {
        return false;
    }

    match (b as &dyn StdAny).downcast_ref::<A>() {
        Some(b) => A::schema().equals(a, b),
        None => false,
    }
}

/// Compare two values through an explicit field.
pub fn equals_with<F: Field>(a: &F::Value, b: &F::Value, field: &F) -> bool {
    field.equals(a, b)
}

/// A new instance of `T` carrying the field values of `value`, with
/// `overrides` applied. Fails if an override names an undeclared field.
pub fn clone<T: Class>(value: &T, overrides: Values) -> Result<T, MappingError> {
    T::schema().clone_with(value, overrides).map_err(|e| {
        tracing::debug!(schema = T::schema().name(), error = %e, "clone rejected");
        e
    })
}

/// Write `overrides` into `value` in place. Validated like [`clone`]; on
/// error `value` is left untouched.
pub fn mutate<T: Class>(value: &mut T, overrides: Values) -> Result<(), MappingError> {
    T::schema().mutate(value, overrides).map_err(|e| {
        tracing::debug!(schema = T::schema().name(), error = %e, "mutate rejected");
        e
    })
}
