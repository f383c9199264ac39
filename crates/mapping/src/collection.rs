//! Arrays and string-keyed maps over any inner field.

use std::collections::BTreeMap;

use serde_json::Value as Json;

use crate::error::MappingError;
use crate::field::Field;
use crate::path::Path;

/// An ordered sequence; element order is significant for equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayField<F>(pub F);

pub fn array<F: Field>(field: F) -> ArrayField<F> {
    ArrayField(field)
}

impl<F: Field> Field for ArrayField<F> {
    type Value = Vec<F::Value>;

    fn descriptor(&self) -> String {
        format!("Array<{}>", self.0.descriptor())
    }

    fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<Self::Value, MappingError> {
        let items = raw
            .as_array()
            .ok_or_else(|| path.type_mismatch("array", raw))?;

        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.0.decode(item, &path.index(index)))
            .collect()
    }

    fn encode(&self, value: &Self::Value, path: &Path<'_>) -> Result<Json, MappingError> {
        value
            .iter()
            .enumerate()
            .map(|(index, item)| self.0.encode(item, &path.index(index)))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array)
    }

    fn equals(&self, a: &Self::Value, b: &Self::Value) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(a, b)| self.0.equals(a, b))
    }
}

/// A string-keyed map applying the inner field to every value. Key order is
/// not significant.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapField<F>(pub F);

pub fn map<F: Field>(field: F) -> MapField<F> {
    MapField(field)
}

impl<F: Field> Field for MapField<F> {
    type Value = BTreeMap<String, F::Value>;

    fn descriptor(&self) -> String {
        format!("Map<{}>", self.0.descriptor())
    }

    fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<Self::Value, MappingError> {
        let object = raw
            .as_object()
            .ok_or_else(|| path.type_mismatch("object", raw))?;

        object
            .iter()
            .map(|(key, item)| -> Result<(String, F::Value), MappingError> {
                let value = self.0.decode(item, &path.extend(key))?;
                Ok((key.clone(), value))
            })
            .collect()
    }

    fn encode(&self, value: &Self::Value, path: &Path<'_>) -> Result<Json, MappingError> {
        let mut object = serde_json::Map::new();
        for (key, item) in value {
            object.insert(key.clone(), self.0.encode(item, &path.extend(key))?);
        }
        Ok(Json::Object(object))
    }

    fn equals(&self, a: &Self::Value, b: &Self::Value) -> bool {
        a.len() == b.len()
            && a.iter().all(|(key, a)| match b.get(key) {
                Some(b) => self.0.equals(a, b),
                None => false,
            })
    }
}
