//! Conversion between native property values and stored [`Value`]s.
//!
//! A [`ValueSerializer`] converts one [`StaticType`] both ways. Serializers
//! are immutable and shared behind [`Serializer`]; retargeting one to a
//! different stored representation produces a new serializer.

mod collection;
mod converter;
mod numeric;
mod resolver;
mod scalar;

use std::fmt;
use std::sync::Arc;

use docmap_bson::{Value, ValueKind};
use serde::{Deserialize, Serialize};

use crate::error::MappingError;
use crate::native::{NativeValue, StaticType};

pub use collection::{CollectionSerializer, DictionarySerializer, NullableSerializer};
pub use converter::{ConverterSerializer, FnConverter, ValueConverter};
pub use numeric::RepresentationConverter;
pub use resolver::SerializerResolver;
pub use scalar::{default_representation, is_representation_allowed, ScalarSerializer};

/// Shared handle to a serializer.
pub type Serializer = Arc<dyn ValueSerializer>;

/// Converts native values of one static type to and from stored values.
pub trait ValueSerializer: fmt::Debug + Send + Sync {
    /// The native type this serializer reads and writes.
    fn value_type(&self) -> &StaticType;

    fn serialize(&self, value: &NativeValue) -> Result<Value, MappingError>;

    fn deserialize(&self, value: &Value) -> Result<NativeValue, MappingError>;

    fn as_representation_configurable(&self) -> Option<&dyn RepresentationConfigurable> {
        None
    }

    fn as_converter_configurable(&self) -> Option<&dyn ConverterConfigurable> {
        None
    }
}

/// A serializer whose stored value kind can be changed.
pub trait RepresentationConfigurable {
    fn representation(&self) -> ValueKind;

    /// A copy writing `kind`. Fails with
    /// [`MappingError::InvalidRepresentation`] when the type cannot be
    /// stored that way.
    fn with_representation(&self, kind: ValueKind) -> Result<Serializer, MappingError>;
}

/// A serializer whose numeric overflow/truncation policy can be changed.
pub trait ConverterConfigurable {
    fn converter(&self) -> RepresentationConverter;

    fn with_converter(&self, converter: RepresentationConverter) -> Serializer;
}

/// Requested stored representation of a property.
///
/// Unset flags take their defaults when applied: overflow is refused, and
/// truncation is allowed only for a `Decimal128` target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentationConfig {
    pub kind: ValueKind,
    #[serde(default)]
    pub allow_overflow: Option<bool>,
    #[serde(default)]
    pub allow_truncation: Option<bool>,
}

impl RepresentationConfig {
    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            allow_overflow: None,
            allow_truncation: None,
        }
    }

    pub fn allow_overflow(mut self, allow: bool) -> Self {
        self.allow_overflow = Some(allow);
        self
    }

    pub fn allow_truncation(mut self, allow: bool) -> Self {
        self.allow_truncation = Some(allow);
        self
    }

    /// The converter these flags produce once defaults are filled in.
    pub fn converter(&self) -> RepresentationConverter {
        RepresentationConverter::new(
            self.allow_overflow.unwrap_or(false),
            self.allow_truncation.unwrap_or(self.kind == ValueKind::Decimal128),
        )
    }
}

fn invalid_value(ty: &StaticType, value: &NativeValue) -> MappingError {
    MappingError::InvalidValue {
        ty: ty.to_string(),
        value: value.describe(),
    }
}

fn unexpected_value(ty: &StaticType, value: &Value) -> MappingError {
    MappingError::UnexpectedValue {
        ty: ty.to_string(),
        found: value.kind(),
    }
}
