//! Serde adapter for schema-mapped types.

use std::ops::{Deref, DerefMut};

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::schema::Class;

/// Routes a [`Class`] type through the mapping engine wherever serde is
/// used, so mapped types can sit inside ordinary `#[derive(Serialize)]`
/// documents. Mapping errors surface as the serializer's custom error,
/// path included.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapped<T>(pub T);

impl<T> Mapped<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Mapped<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Mapped<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: Class> Serialize for Mapped<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        crate::encode(&self.0)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de, T: Class> Deserialize<'de> for Mapped<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        crate::decode(&raw).map(Mapped).map_err(D::Error::custom)
    }
}
