//! Tagged unions: a closed set of variant types selected by the reserved
//! `"type"` key.
//!
//! The union itself is a Rust enum implementing [`Tagged`]; each variant
//! payload is a [`Class`] implementing [`Variant`] for that enum. A
//! [`TypeField`] registers the variants once and dispatches on the tag:
//!
//! ```ignore
//! static DATA_SOURCE: OnceLock<TypeField<DataSource>> = OnceLock::new();
//! DATA_SOURCE.get_or_init(|| {
//!     TypeField::builder("DataSource")
//!         .variant::<EmbeddedDataSource>()
//!         .variant::<ReferenceDataSource>()
//!         .build()
//! })
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde_json::Value as Json;

use crate::error::MappingError;
use crate::field::Field;
use crate::path::Path;
use crate::schema::Class;

/// The reserved discriminator key.
pub const TYPE_KEY: &str = "type";

/// A union type that can name the variant it currently holds.
pub trait Tagged {
    fn tag(&self) -> &'static str;
}

/// A variant payload of the union `U`.
pub trait Variant<U>: Class {
    const TAG: &'static str;

    fn wrap(self) -> U;

    /// The payload, if `union` currently holds this variant.
    fn project(union: &U) -> Option<&Self>;
}

/// Codec for one registered variant, erased over the payload type.
trait VariantCodec<U>: Send + Sync {
    fn descriptor(&self) -> String;

    fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<U, MappingError>;

    fn encode(&self, value: &U, path: &Path<'_>) -> Result<Json, MappingError>;

    fn equals(&self, a: &U, b: &U) -> bool;
}

struct VariantOf<V>(PhantomData<fn() -> V>);

impl<U, V: Variant<U>> VariantCodec<U> for VariantOf<V> {
    fn descriptor(&self) -> String {
        V::schema().name().to_string()
    }

    fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<U, MappingError> {
        V::schema().decode(raw, path).map(V::wrap)
    }

    fn encode(&self, value: &U, path: &Path<'_>) -> Result<Json, MappingError> {
        let payload = V::project(value).ok_or_else(|| {
            path.invalid(format!("value tagged {} does not hold a {}", V::TAG, self.descriptor()))
        })?;
        V::schema().encode(payload, path)
    }

    fn equals(&self, a: &U, b: &U) -> bool {
        match (V::project(a), V::project(b)) {
            (Some(a), Some(b)) => V::schema().equals(a, b),
            _ => false,
        }
    }
}

/// Dispatches a tagged union to its variants.
pub struct TypeField<U> {
    name: &'static str,
    tags: Vec<&'static str>,
    variants: BTreeMap<&'static str, Box<dyn VariantCodec<U>>>,
}

impl<U: Tagged + 'static> TypeField<U> {
    pub fn builder(name: &'static str) -> TypeFieldBuilder<U> {
        TypeFieldBuilder {
            name,
            tags: Vec::new(),
            variants: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registered tags, in registration order.
    pub fn tags(&self) -> &[&'static str] {
        &self.tags
    }

    fn variant(&self, tag: &str) -> Option<&dyn VariantCodec<U>> {
        self.variants.get(tag).map(|codec| &**codec)
    }
}

impl<U: Tagged + 'static> Field for TypeField<U> {
    type Value = U;

    fn descriptor(&self) -> String {
        self.name.to_string()
    }

    fn decode(&self, raw: &Json, path: &Path<'_>) -> Result<U, MappingError> {
        let object = raw
            .as_object()
            .ok_or_else(|| path.type_mismatch("object", raw))?;

        let tag = match object.get(TYPE_KEY) {
            None | Some(Json::Null) => return Err(path.missing_variant_tag()),
            Some(Json::String(tag)) if tag.is_empty() => return Err(path.missing_variant_tag()),
            Some(Json::String(tag)) => tag,
            Some(other) => return Err(path.extend(TYPE_KEY).type_mismatch("string", other)),
        };

        let codec = self.variant(tag).ok_or_else(|| {
            tracing::debug!(union = self.name, tag = %tag, "unknown variant tag");
            path.unknown_variant_tag(tag, &self.tags)
        })?;

        codec.decode(raw, path)
    }

    fn encode(&self, value: &U, path: &Path<'_>) -> Result<Json, MappingError> {
        let tag = value.tag();
        let codec = self
            .variant(tag)
            .ok_or_else(|| path.unknown_variant_tag(tag, &self.tags))?;

        let mut encoded = codec.encode(value, path)?;
        if let Json::Object(object) = &mut encoded {
            object.insert(TYPE_KEY.to_string(), Json::String(tag.to_string()));
        }
        Ok(encoded)
    }

    fn equals(&self, a: &U, b: &U) -> bool {
        let tag = a.tag();
        if tag != b.tag() {
            return false;
        }

        match self.variant(tag) {
            Some(codec) => codec.equals(a, b),
            None => false,
        }
    }
}

impl<U> fmt::Debug for TypeField<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeField")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .finish()
    }
}

/// Registers the variants of a [`TypeField`]. Registering a tag twice, or a
/// variant whose schema declares the reserved `type` key, panics.
pub struct TypeFieldBuilder<U> {
    name: &'static str,
    tags: Vec<&'static str>,
    variants: BTreeMap<&'static str, Box<dyn VariantCodec<U>>>,
}

impl<U: Tagged + 'static> TypeFieldBuilder<U> {
    pub fn variant<V: Variant<U>>(mut self) -> Self {
        assert!(
            !self.variants.contains_key(V::TAG),
            "{}: duplicate variant tag: {}",
            self.name,
            V::TAG
        );
        assert!(
            !V::schema().contains(TYPE_KEY),
            "{}: variant {} declares the reserved field: {}",
            self.name,
            V::schema().name(),
            TYPE_KEY
        );

        self.tags.push(V::TAG);
        self.variants
            .insert(V::TAG, Box::new(VariantOf::<V>(PhantomData)));
        self
    }

    pub fn build(self) -> TypeField<U> {
        TypeField {
            name: self.name,
            tags: self.tags,
            variants: self.variants,
        }
    }
}
