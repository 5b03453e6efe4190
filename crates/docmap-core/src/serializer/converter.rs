//! Value converters: a model-side type stored through a provider type.

use std::fmt;
use std::sync::Arc;

use docmap_bson::Value;

use super::{Serializer, ValueSerializer};
use crate::error::MappingError;
use crate::native::{NativeValue, StaticType};

/// Converts between a model type and the provider type actually stored.
pub trait ValueConverter: fmt::Debug + Send + Sync {
    fn model_type(&self) -> &StaticType;

    fn provider_type(&self) -> &StaticType;

    fn to_provider(&self, value: &NativeValue) -> Result<NativeValue, MappingError>;

    fn from_provider(&self, value: &NativeValue) -> Result<NativeValue, MappingError>;
}

type ConvertFn = Arc<dyn Fn(&NativeValue) -> Result<NativeValue, MappingError> + Send + Sync>;

/// A [`ValueConverter`] built from a pair of closures.
#[derive(Clone)]
pub struct FnConverter {
    model: StaticType,
    provider: StaticType,
    to: ConvertFn,
    from: ConvertFn,
}

impl FnConverter {
    pub fn new<T, F>(model: StaticType, provider: StaticType, to: T, from: F) -> Self
    where
        T: Fn(&NativeValue) -> Result<NativeValue, MappingError> + Send + Sync + 'static,
        F: Fn(&NativeValue) -> Result<NativeValue, MappingError> + Send + Sync + 'static,
    {
        Self {
            model,
            provider,
            to: Arc::new(to),
            from: Arc::new(from),
        }
    }
}

impl fmt::Debug for FnConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConverter")
            .field("model", &self.model)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl ValueConverter for FnConverter {
    fn model_type(&self) -> &StaticType {
        &self.model
    }

    fn provider_type(&self) -> &StaticType {
        &self.provider
    }

    fn to_provider(&self, value: &NativeValue) -> Result<NativeValue, MappingError> {
        (self.to)(value)
    }

    fn from_provider(&self, value: &NativeValue) -> Result<NativeValue, MappingError> {
        (self.from)(value)
    }
}

/// Applies a converter on top of the provider type's serializer. Null
/// passes through in both directions without reaching the converter.
#[derive(Debug, Clone)]
pub struct ConverterSerializer {
    converter: Arc<dyn ValueConverter>,
    provider: Serializer,
}

impl ConverterSerializer {
    pub fn new(converter: Arc<dyn ValueConverter>, provider: Serializer) -> Self {
        Self { converter, provider }
    }

    pub fn provider(&self) -> &Serializer {
        &self.provider
    }
}

impl ValueSerializer for ConverterSerializer {
    fn value_type(&self) -> &StaticType {
        self.converter.model_type()
    }

    fn serialize(&self, value: &NativeValue) -> Result<Value, MappingError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let provided = self.converter.to_provider(value)?;
        self.provider.serialize(&provided)
    }

    fn deserialize(&self, value: &Value) -> Result<NativeValue, MappingError> {
        if value.is_null() {
            return Ok(NativeValue::Null);
        }
        let provided = self.provider.deserialize(value)?;
        self.converter.from_provider(&provided)
    }
}
