//! Serializer resolution and caching.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use super::{
    CollectionSerializer, ConverterSerializer, DictionarySerializer, NullableSerializer, RepresentationConfig,
    ScalarSerializer, Serializer, ValueConverter,
};
use crate::error::MappingError;
use crate::metadata::Property;
use crate::native::StaticType;

/// Resolves serializers for static types, converters and representation
/// hints.
///
/// Base serializers (type only) are cached per distinct type. The cache is
/// the resolver's only state.
#[derive(Debug, Default)]
pub struct SerializerResolver {
    cache: RwLock<HashMap<StaticType, Serializer>>,
}

impl SerializerResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializer for `ty`, optionally stored through `converter` and
    /// retargeted to `representation`.
    ///
    /// With a converter the representation applies to the provider type.
    pub fn resolve(
        &self,
        ty: &StaticType,
        converter: Option<&Arc<dyn ValueConverter>>,
        representation: Option<&RepresentationConfig>,
    ) -> Result<Serializer, MappingError> {
        if let Some(converter) = converter {
            let provider = self.resolve(converter.provider_type(), None, representation)?;
            return Ok(Arc::new(ConverterSerializer::new(converter.clone(), provider)));
        }
        let base = self.resolve_type(ty)?;
        match representation {
            Some(config) => apply_representation(base, config),
            None => Ok(base),
        }
    }

    /// Serializer for a mapped property.
    pub fn property_serializer(&self, property: &Property) -> Result<Serializer, MappingError> {
        self.resolve(property.static_type(), property.converter(), property.representation())
    }

    /// Default serializer for `ty`.
    pub fn resolve_type(&self, ty: &StaticType) -> Result<Serializer, MappingError> {
        if let Some(found) = self.cache.read().get(ty) {
            return Ok(found.clone());
        }
        let built = self.build(ty)?;
        trace!(ty = %ty, "caching serializer");
        Ok(self.cache.write().entry(ty.clone()).or_insert(built).clone())
    }

    /// Number of cached base serializers.
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    fn build(&self, ty: &StaticType) -> Result<Serializer, MappingError> {
        if let Some(scalar) = ScalarSerializer::new(ty.clone()) {
            return Ok(Arc::new(scalar));
        }
        Ok(match ty {
            StaticType::Nullable(inner) => Arc::new(NullableSerializer::new(self.resolve_type(inner)?)),
            StaticType::Array(element) | StaticType::List(element) => {
                Arc::new(CollectionSerializer::new(ty.clone(), self.resolve_type(element)?))
            }
            StaticType::Dictionary(key, value) => Arc::new(DictionarySerializer::new(
                ty.clone(),
                self.resolve_type(key)?,
                self.resolve_type(value)?,
            )),
            other => return Err(MappingError::UnsupportedType(other.to_string())),
        })
    }
}

/// Retargets `serializer` per `config`, then applies the overflow and
/// truncation policy when the result supports one. Serializers that are
/// not representation-configurable are returned unchanged.
fn apply_representation(serializer: Serializer, config: &RepresentationConfig) -> Result<Serializer, MappingError> {
    let Some(configurable) = serializer.as_representation_configurable() else {
        return Ok(serializer);
    };
    let retargeted = configurable.with_representation(config.kind)?;
    let converted = retargeted
        .as_converter_configurable()
        .map(|cc| cc.with_converter(config.converter()));
    Ok(converted.unwrap_or(retargeted))
}
