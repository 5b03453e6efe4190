//! Reading property values back out of stored documents.

use docmap_bson::{Document, Value};
use indexmap::IndexMap;

use crate::error::{MappingError, MissingReason};
use crate::metadata::{EntityType, Property};
use crate::native::{NativeValue, StaticType};
use crate::serializer::SerializerResolver;

/// Reads `property` from `document` along its element path.
///
/// A missing element yields the property's default-when-missing value,
/// then null for nullable properties. A missing or null element of a
/// required property is [`MappingError::MissingRequiredValue`].
pub fn property_value(
    resolver: &SerializerResolver,
    property: &Property,
    document: &Document,
) -> Result<NativeValue, MappingError> {
    match document.get_path(property.element_path()) {
        None => {
            if let Some(default) = property.default_when_missing() {
                Ok(default.clone())
            } else if property.is_nullable() {
                Ok(NativeValue::Null)
            } else {
                Err(missing(property.name(), MissingReason::Missing))
            }
        }
        Some(Value::Null) if property.is_nullable() => Ok(NativeValue::Null),
        Some(Value::Null) => Err(missing(property.name(), MissingReason::Null)),
        Some(value) => resolver.property_serializer(property)?.deserialize(value),
    }
}

/// Reads the element `name` as `ty`. Whether missing or null elements are
/// accepted follows `ty`.
pub fn element_value(
    resolver: &SerializerResolver,
    document: &Document,
    name: &str,
    ty: &StaticType,
) -> Result<NativeValue, MappingError> {
    match document.get(name) {
        None | Some(Value::Null) if ty.accepts_null() => Ok(NativeValue::Null),
        None => Err(missing(name, MissingReason::Missing)),
        Some(Value::Null) => Err(missing(name, MissingReason::Null)),
        Some(value) => resolver.resolve_type(ty)?.deserialize(value),
    }
}

/// Reads every stored scalar property of `entity`, keyed by property name
/// in declaration order. Owned-type keys are not stored and are skipped.
pub fn read_entity(
    resolver: &SerializerResolver,
    entity: &EntityType,
    document: &Document,
) -> Result<IndexMap<String, NativeValue>, MappingError> {
    entity
        .properties()
        .iter()
        .filter(|p| !p.element_name().is_empty())
        .map(|p| Ok((p.name().to_owned(), property_value(resolver, p, document)?)))
        .collect()
}

fn missing(property: &str, reason: MissingReason) -> MappingError {
    MappingError::MissingRequiredValue {
        property: property.to_owned(),
        reason,
    }
}
