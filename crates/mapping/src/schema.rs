//! Per-type schemas: the ordered field tables that drive decoding, encoding,
//! comparison and copying of one concrete type.
//!
//! A type takes part in mapping by implementing [`Class`]: it hands out a
//! `'static` [`Schema`] built once with [`Schema::builder`], and knows how to
//! construct itself from the decoded [`Values`] bag.
//!
//! ```
//! use std::sync::OnceLock;
//! use mapping::{Class, MappingError, Number, Schema, Text, Values};
//!
//! struct Sampling {
//!     size: f64,
//!     label: Option<String>,
//! }
//!
//! impl Class for Sampling {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: OnceLock<Schema<Sampling>> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             Schema::<Self>::builder("Sampling")
//!                 .field("size", Number, |s| &s.size, |s| &mut s.size)
//!                 .optional("label", Text, |s| &s.label, |s| &mut s.label)
//!                 .build()
//!         })
//!     }
//!
//!     fn from_values(values: &mut Values) -> Result<Self, MappingError> {
//!         Ok(Sampling {
//!             size: values.take("size")?,
//!             label: values.take("label")?,
//!         })
//!     }
//! }
//!
//! let sampling: Sampling = mapping::decode(&serde_json::json!({"size": 42})).unwrap();
//! assert_eq!(sampling.size, 42.0);
//! assert!(sampling.label.is_none());
//! ```

use std::any::Any as StdAny;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value as Json;

use crate::error::MappingError;
use crate::field::{Field, Optional};
use crate::path::Path;
use crate::primitive::Any;

/// A type whose shape is described by a [`Schema`].
pub trait Class: Sized + 'static {
    /// The schema governing this type. Must return the same table on every
    /// call; equality and copying rely on it.
    fn schema() -> &'static Schema<Self>;

    /// Build an instance from the values bag, taking every declared field.
    fn from_values(values: &mut Values) -> Result<Self, MappingError>;
}

// ──────────────────────────────────────────────
// Values bag
// ──────────────────────────────────────────────

/// Field values keyed by field name.
///
/// Decoding fills a bag and hands it to [`Class::from_values`]. Callers fill
/// one to pass overrides to [`crate::clone`] and [`crate::mutate`]; each
/// value must have exactly the field's value type (e.g. `f64` for
/// [`crate::Number`], `Option<_>` for optional fields).
#[derive(Default)]
pub struct Values {
    owner: &'static str,
    values: BTreeMap<String, Box<dyn StdAny>>,
}

impl Values {
    pub fn new() -> Self {
        Values::default()
    }

    pub(crate) fn for_schema(owner: &'static str) -> Self {
        Values {
            owner,
            values: BTreeMap::new(),
        }
    }

    pub fn with<V: 'static>(mut self, name: impl Into<String>, value: V) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert<V: 'static>(&mut self, name: impl Into<String>, value: V) {
        self.values.insert(name.into(), Box::new(value));
    }

    /// Remove and return the value for `name`.
    pub fn take<V: 'static>(&mut self, name: &str) -> Result<V, MappingError> {
        let value = self.values.remove(name).ok_or_else(|| MappingError::Construct {
            schema: self.owner.to_string(),
            message: format!("no value for field: {}", name),
        })?;

        value
            .downcast::<V>()
            .map(|v| *v)
            .map_err(|_| MappingError::Construct {
                schema: self.owner.to_string(),
                message: format!(
                    "field {} is not a {}",
                    name,
                    std::any::type_name::<V>()
                ),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert_boxed(&mut self, name: String, value: Box<dyn StdAny>) {
        self.values.insert(name, value);
    }
}

impl fmt::Debug for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Values")
            .field("owner", &self.owner)
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ──────────────────────────────────────────────
// Entries
// ──────────────────────────────────────────────

/// Introspection record for one declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub name: &'static str,
    pub descriptor: String,
    pub optional: bool,
}

/// A declared field with its accessors, erased over the field's value type
/// so heterogeneous fields can share one table.
trait Entry<T>: Send + Sync {
    fn name(&self) -> &'static str;

    fn info(&self) -> FieldInfo;

    fn decode(
        &self,
        object: &serde_json::Map<String, Json>,
        path: &Path<'_>,
        values: &mut Values,
    ) -> Result<(), MappingError>;

    fn encode(
        &self,
        value: &T,
        path: &Path<'_>,
        object: &mut serde_json::Map<String, Json>,
    ) -> Result<(), MappingError>;

    fn equals(&self, a: &T, b: &T) -> bool;

    fn copy(&self, value: &T, values: &mut Values);

    fn accepts(&self, value: &dyn StdAny) -> bool;

    /// Write `value` into `target`; hands the value back if it has the wrong type.
    fn assign(&self, target: &mut T, value: Box<dyn StdAny>) -> Result<(), Box<dyn StdAny>>;
}

struct FieldEntry<T, F: Field> {
    name: &'static str,
    field: F,
    get: fn(&T) -> &F::Value,
    get_mut: fn(&mut T) -> &mut F::Value,
}

impl<T, F> Entry<T> for FieldEntry<T, F>
where
    F: Field + Send + Sync,
    F::Value: Clone + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn info(&self) -> FieldInfo {
        FieldInfo {
            name: self.name,
            descriptor: self.field.descriptor(),
            optional: self.field.is_optional(),
        }
    }

    fn decode(
        &self,
        object: &serde_json::Map<String, Json>,
        path: &Path<'_>,
        values: &mut Values,
    ) -> Result<(), MappingError> {
        let path = path.extend(self.name);

        let value = match object.get(self.name) {
            None | Some(Json::Null) => self.field.absent().ok_or_else(|| path.missing_field())?,
            Some(raw) => self.field.decode(raw, &path)?,
        };

        values.insert(self.name, value);
        Ok(())
    }

    fn encode(
        &self,
        value: &T,
        path: &Path<'_>,
        object: &mut serde_json::Map<String, Json>,
    ) -> Result<(), MappingError> {
        let value = (self.get)(value);

        if self.field.is_absent(value) {
            return Ok(());
        }

        let encoded = self.field.encode(value, &path.extend(self.name))?;
        object.insert(self.name.to_string(), encoded);
        Ok(())
    }

    fn equals(&self, a: &T, b: &T) -> bool {
        self.field.equals((self.get)(a), (self.get)(b))
    }

    fn copy(&self, value: &T, values: &mut Values) {
        values.insert(self.name, (self.get)(value).clone());
    }

    fn accepts(&self, value: &dyn StdAny) -> bool {
        value.is::<F::Value>()
    }

    fn assign(&self, target: &mut T, value: Box<dyn StdAny>) -> Result<(), Box<dyn StdAny>> {
        let value = value.downcast::<F::Value>()?;
        *(self.get_mut)(target) = *value;
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Schema
// ──────────────────────────────────────────────

/// The ordered field table of one concrete type.
pub struct Schema<T> {
    name: &'static str,
    entries: Vec<Box<dyn Entry<T>>>,
}

impl<T: 'static> Schema<T> {
    pub fn builder(name: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder {
            name,
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = FieldInfo> + '_ {
        self.entries.iter().map(|entry| entry.info())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, name: &str) -> Option<&dyn Entry<T>> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name)
            .map(|entry| &**entry)
    }

    /// Encode every declared field of `value`. Absent optionals are omitted.
    pub fn encode(&self, value: &T, path: &Path<'_>) -> Result<Json, MappingError> {
        let mut object = serde_json::Map::new();
        for entry in &self.entries {
            entry.encode(value, path, &mut object)?;
        }
        Ok(Json::Object(object))
    }

    /// Pairwise comparison of every declared field.
    pub fn equals(&self, a: &T, b: &T) -> bool {
        self.entries.iter().all(|entry| entry.equals(a, b))
    }

    /// Reject overrides naming undeclared fields or carrying the wrong type.
    fn check_overrides(&self, overrides: &Values) -> Result<(), MappingError> {
        for (key, value) in &overrides.values {
            let entry = self
                .entry(key)
                .ok_or_else(|| MappingError::UnregisteredOverrideKey {
                    schema: self.name.to_string(),
                    key: key.clone(),
                })?;

            if !entry.accepts(&**value) {
                return Err(self.override_type(entry, key));
            }
        }
        Ok(())
    }

    fn override_type(&self, entry: &dyn Entry<T>, key: &str) -> MappingError {
        MappingError::OverrideType {
            schema: self.name.to_string(),
            key: key.to_string(),
            expected: entry.info().descriptor,
        }
    }

    /// Write overrides into an existing instance. Nothing is written unless
    /// every override is valid.
    pub fn mutate(&self, target: &mut T, overrides: Values) -> Result<(), MappingError> {
        self.check_overrides(&overrides)?;

        for (key, value) in overrides.values {
            let entry = self
                .entry(&key)
                .ok_or_else(|| MappingError::UnregisteredOverrideKey {
                    schema: self.name.to_string(),
                    key: key.clone(),
                })?;
            entry
                .assign(target, value)
                .map_err(|_| self.override_type(entry, &key))?;
        }
        Ok(())
    }
}

impl<T: Class> Schema<T> {
    /// Decode an object-shaped value. Keys not declared in the schema are
    /// ignored.
    pub fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<T, MappingError> {
        let object = raw
            .as_object()
            .ok_or_else(|| path.type_mismatch("object", raw))?;

        let mut values = Values::for_schema(self.name);
        for entry in &self.entries {
            entry.decode(object, path, &mut values)?;
        }

        T::from_values(&mut values)
    }

    /// Build a new instance from the current field values of `value`, with
    /// `overrides` applied on top.
    pub fn clone_with(&self, value: &T, overrides: Values) -> Result<T, MappingError> {
        self.check_overrides(&overrides)?;

        let mut values = Values::for_schema(self.name);
        for entry in &self.entries {
            entry.copy(value, &mut values);
        }
        for (key, value) in overrides.values {
            values.insert_boxed(key, value);
        }

        T::from_values(&mut values)
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field(
                "fields",
                &self.entries.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Collects field declarations for a [`Schema`]. Declaring the same name
/// twice panics, since it can only be a mistake in the type's registration.
pub struct SchemaBuilder<T> {
    name: &'static str,
    entries: Vec<Box<dyn Entry<T>>>,
}

impl<T: 'static> SchemaBuilder<T> {
    /// Declare a field. Whether it is required follows the field itself, so
    /// passing an [`Optional`] here is the same as calling [`Self::optional`].
    pub fn field<F>(
        mut self,
        name: &'static str,
        field: F,
        get: fn(&T) -> &F::Value,
        get_mut: fn(&mut T) -> &mut F::Value,
    ) -> Self
    where
        F: Field + Send + Sync + 'static,
        F::Value: Clone + 'static,
    {
        assert!(
            !self.entries.iter().any(|entry| entry.name() == name),
            "{}: duplicate field: {}",
            self.name,
            name
        );

        self.entries.push(Box::new(FieldEntry {
            name,
            field,
            get,
            get_mut,
        }));
        self
    }

    /// Declare an optional field, stored as `Option<_>`.
    pub fn optional<F>(
        self,
        name: &'static str,
        field: F,
        get: fn(&T) -> &Option<F::Value>,
        get_mut: fn(&mut T) -> &mut Option<F::Value>,
    ) -> Self
    where
        F: Field + Send + Sync + 'static,
        F::Value: Clone + 'static,
    {
        self.field(name, Optional(field), get, get_mut)
    }

    /// Declare a pass-through field holding raw JSON.
    pub fn assign(
        self,
        name: &'static str,
        get: fn(&T) -> &Json,
        get_mut: fn(&mut T) -> &mut Json,
    ) -> Self {
        self.field(name, Any, get, get_mut)
    }

    pub fn build(self) -> Schema<T> {
        Schema {
            name: self.name,
            entries: self.entries,
        }
    }
}

// ──────────────────────────────────────────────
// Class field
// ──────────────────────────────────────────────

/// Maps a nested object through its type's schema.
pub struct ClassField<T>(PhantomData<fn() -> T>);

impl<T> ClassField<T> {
    pub const fn new() -> Self {
        ClassField(PhantomData)
    }
}

pub fn class<T: Class>() -> ClassField<T> {
    ClassField::new()
}

impl<T> Default for ClassField<T> {
    fn default() -> Self {
        ClassField::new()
    }
}

impl<T> Clone for ClassField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ClassField<T> {}

impl<T> fmt::Debug for ClassField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassField<{}>", std::any::type_name::<T>())
    }
}

impl<T: Class> Field for ClassField<T> {
    type Value = T;

    fn descriptor(&self) -> String {
        T::schema().name().to_string()
    }

    fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<T, MappingError> {
        T::schema().decode(raw, path)
    }

    fn encode(&self, value: &T, path: &Path<'_>) -> Result<Json, MappingError> {
        T::schema().encode(value, path)
    }

    fn equals(&self, a: &T, b: &T) -> bool {
        T::schema().equals(a, b)
    }
}
