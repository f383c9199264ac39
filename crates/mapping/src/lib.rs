//! mapping: schema-driven decoding of JSON trees into typed, immutable
//! domain objects, and back.
//!
//! Every mapped type implements [`Class`], exposing an ordered [`Schema`] of
//! named [`Field`]s. The engine uses that table to decode raw
//! `serde_json::Value`s with path-qualified errors, encode values back to
//! JSON, compare them (nominally, then field by field) and copy them with
//! overrides. Closed sets of variant types are handled by [`TypeField`],
//! which dispatches on the reserved `"type"` key.
//!
//! Schemas and union registries are built once and shared read-only; all
//! operations are synchronous and fail fast on the first error.
//!
//! Cargo features: `temporal` ([`Timestamp`], via `time`) and `decimal`
//! ([`DecimalField`], via `rust_decimal`), both on by default.

pub mod api;
pub mod collection;
#[cfg(feature = "decimal")]
pub mod decimal;
pub mod error;
pub mod field;
pub mod mapped;
pub mod path;
pub mod primitive;
pub mod schema;
#[cfg(feature = "temporal")]
pub mod temporal;
pub mod union;

pub use api::{
    clone, decode, decode_str, decode_with, encode, encode_with, equals, equals_with, mutate,
};
pub use collection::{array, map, ArrayField, MapField};
#[cfg(feature = "decimal")]
pub use decimal::DecimalField;
pub use error::{ErrorKind, MappingError};
pub use field::{optional, Field, Optional};
pub use mapped::Mapped;
pub use path::{Accessor, Path};
pub use primitive::{Any, Boolean, Enumeration, Integer, Number, Text};
pub use schema::{class, Class, ClassField, FieldInfo, Schema, SchemaBuilder, Values};
#[cfg(feature = "temporal")]
pub use temporal::Timestamp;
pub use union::{Tagged, TypeField, TypeFieldBuilder, Variant, TYPE_KEY};
