//! Serializers parameterized by inner serializers.

use std::sync::Arc;

use docmap_bson::{Document, Value, ValueKind};

use super::{
    invalid_value, unexpected_value, ConverterConfigurable, RepresentationConfigurable, RepresentationConverter,
    Serializer, ValueSerializer,
};
use crate::error::MappingError;
use crate::native::{NativeValue, StaticType};

/// Passes null through and delegates everything else to the inner
/// serializer, representation and converter settings included.
#[derive(Debug, Clone)]
pub struct NullableSerializer {
    ty: StaticType,
    inner: Serializer,
}

impl NullableSerializer {
    pub fn new(inner: Serializer) -> Self {
        Self {
            ty: StaticType::nullable(inner.value_type().clone()),
            inner,
        }
    }

    pub fn inner(&self) -> &Serializer {
        &self.inner
    }
}

impl ValueSerializer for NullableSerializer {
    fn value_type(&self) -> &StaticType {
        &self.ty
    }

    fn serialize(&self, value: &NativeValue) -> Result<Value, MappingError> {
        match value {
            NativeValue::Null => Ok(Value::Null),
            other => self.inner.serialize(other),
        }
    }

    fn deserialize(&self, value: &Value) -> Result<NativeValue, MappingError> {
        match value {
            Value::Null => Ok(NativeValue::Null),
            other => self.inner.deserialize(other),
        }
    }

    fn as_representation_configurable(&self) -> Option<&dyn RepresentationConfigurable> {
        self.inner.as_representation_configurable().map(|_| self as &dyn RepresentationConfigurable)
    }

    fn as_converter_configurable(&self) -> Option<&dyn ConverterConfigurable> {
        self.inner.as_converter_configurable().map(|_| self as &dyn ConverterConfigurable)
    }
}

impl RepresentationConfigurable for NullableSerializer {
    fn representation(&self) -> ValueKind {
        self.inner
            .as_representation_configurable()
            .map_or(ValueKind::Null, |rc| rc.representation())
    }

    fn with_representation(&self, kind: ValueKind) -> Result<Serializer, MappingError> {
        let inner = match self.inner.as_representation_configurable() {
            Some(rc) => rc.with_representation(kind)?,
            None => self.inner.clone(),
        };
        Ok(Arc::new(NullableSerializer::new(inner)))
    }
}

impl ConverterConfigurable for NullableSerializer {
    fn converter(&self) -> RepresentationConverter {
        self.inner
            .as_converter_configurable()
            .map(|cc| cc.converter())
            .unwrap_or_default()
    }

    fn with_converter(&self, converter: RepresentationConverter) -> Serializer {
        let inner = self
            .inner
            .as_converter_configurable()
            .map(|cc| cc.with_converter(converter));
        Arc::new(NullableSerializer::new(inner.unwrap_or_else(|| self.inner.clone())))
    }
}

/// Arrays and lists: an Array of elements, each through `element`.
#[derive(Debug, Clone)]
pub struct CollectionSerializer {
    ty: StaticType,
    element: Serializer,
}

impl CollectionSerializer {
    /// `ty` is the collection type (`Array` or `List`) whose element type
    /// `element` serializes.
    pub fn new(ty: StaticType, element: Serializer) -> Self {
        Self { ty, element }
    }
}

impl ValueSerializer for CollectionSerializer {
    fn value_type(&self) -> &StaticType {
        &self.ty
    }

    fn serialize(&self, value: &NativeValue) -> Result<Value, MappingError> {
        match value {
            NativeValue::Null => Ok(Value::Null),
            NativeValue::List(items) => items
                .iter()
                .map(|item| self.element.serialize(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(invalid_value(&self.ty, other)),
        }
    }

    fn deserialize(&self, value: &Value) -> Result<NativeValue, MappingError> {
        match value {
            Value::Null => Ok(NativeValue::Null),
            Value::Array(items) => items
                .iter()
                .map(|item| self.element.deserialize(item))
                .collect::<Result<Vec<_>, _>>()
                .map(NativeValue::List),
            other => Err(unexpected_value(&self.ty, other)),
        }
    }
}

/// Dictionaries, stored either as a Document keyed by the serialized keys
/// or as an Array of `[key, value]` pairs.
#[derive(Debug, Clone)]
pub struct DictionarySerializer {
    ty: StaticType,
    key: Serializer,
    value: Serializer,
    representation: ValueKind,
}

impl DictionarySerializer {
    pub fn new(ty: StaticType, key: Serializer, value: Serializer) -> Self {
        Self {
            ty,
            key,
            value,
            representation: ValueKind::Document,
        }
    }

    fn key_name(&self, key: &NativeValue) -> Result<String, MappingError> {
        match self.key.serialize(key)? {
            Value::String(name) => Ok(name),
            _ => Err(MappingError::InvalidValue {
                ty: self.ty.to_string(),
                value: format!("key {} does not serialize as a string", key.describe()),
            }),
        }
    }
}

impl ValueSerializer for DictionarySerializer {
    fn value_type(&self) -> &StaticType {
        &self.ty
    }

    fn serialize(&self, value: &NativeValue) -> Result<Value, MappingError> {
        let pairs = match value {
            NativeValue::Null => return Ok(Value::Null),
            NativeValue::Dictionary(pairs) => pairs,
            other => return Err(invalid_value(&self.ty, other)),
        };
        if self.representation == ValueKind::Array {
            let mut items = Vec::with_capacity(pairs.len());
            for (k, v) in pairs {
                items.push(Value::Array(vec![self.key.serialize(k)?, self.value.serialize(v)?]));
            }
            return Ok(Value::Array(items));
        }
        let mut doc = Document::with_capacity(pairs.len());
        for (k, v) in pairs {
            doc.insert(self.key_name(k)?, self.value.serialize(v)?);
        }
        Ok(Value::Document(doc))
    }

    fn deserialize(&self, value: &Value) -> Result<NativeValue, MappingError> {
        let mut pairs = Vec::new();
        match value {
            Value::Null => return Ok(NativeValue::Null),
            Value::Document(doc) => {
                for (name, v) in doc {
                    pairs.push((self.key.deserialize(&Value::String(name.clone()))?, self.value.deserialize(v)?));
                }
            }
            Value::Array(items) => {
                for item in items {
                    match item.as_array() {
                        Some([k, v]) => pairs.push((self.key.deserialize(k)?, self.value.deserialize(v)?)),
                        _ => return Err(unexpected_value(&self.ty, item)),
                    }
                }
            }
            other => return Err(unexpected_value(&self.ty, other)),
        }
        Ok(NativeValue::Dictionary(pairs))
    }

    fn as_representation_configurable(&self) -> Option<&dyn RepresentationConfigurable> {
        Some(self)
    }
}

impl RepresentationConfigurable for DictionarySerializer {
    fn representation(&self) -> ValueKind {
        self.representation
    }

    fn with_representation(&self, kind: ValueKind) -> Result<Serializer, MappingError> {
        if !matches!(kind, ValueKind::Document | ValueKind::Array) {
            return Err(MappingError::InvalidRepresentation {
                ty: self.ty.to_string(),
                kind,
            });
        }
        Ok(Arc::new(Self {
            representation: kind,
            ..self.clone()
        }))
    }
}
