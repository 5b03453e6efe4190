use std::fmt;
use std::sync::Arc;

use crate::native::{NativeValue, StaticType};
use crate::serializer::{RepresentationConfig, ValueConverter};

/// Role of a key property synthesized for an owned type. Both roles are
/// stored under an empty element name, so they never reach a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnedKeyKind {
    /// Foreign key back to the owner.
    OwnerForeignKey,
    /// Position of the element inside an owned collection, starting at 1.
    Ordinal,
}

/// A mapped scalar property of an entity type.
///
/// Built through [`PropertyBuilder`] and finalized when its entity type is
/// built, which is when the element name and path are decided.
#[derive(Clone)]
pub struct Property {
    pub(crate) name: String,
    pub(crate) element_name: String,
    pub(crate) element_path: Vec<String>,
    pub(crate) static_type: StaticType,
    pub(crate) converter: Option<Arc<dyn ValueConverter>>,
    pub(crate) representation: Option<RepresentationConfig>,
    pub(crate) is_primary_key: bool,
    pub(crate) is_concurrency_token: bool,
    pub(crate) is_row_version: bool,
    pub(crate) is_nullable: bool,
    pub(crate) owned_key: Option<OwnedKeyKind>,
    pub(crate) default_when_missing: Option<NativeValue>,
}

impl Property {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field name in the stored document. Empty for owned-type keys.
    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    /// Field names leading to the element: `["_id", element]` for a member
    /// of a composite primary key, `[element]` otherwise.
    pub fn element_path(&self) -> &[String] {
        &self.element_path
    }

    pub fn static_type(&self) -> &StaticType {
        &self.static_type
    }

    pub fn converter(&self) -> Option<&Arc<dyn ValueConverter>> {
        self.converter.as_ref()
    }

    pub fn representation(&self) -> Option<&RepresentationConfig> {
        self.representation.as_ref()
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }

    pub fn is_concurrency_token(&self) -> bool {
        self.is_concurrency_token
    }

    pub fn is_row_version(&self) -> bool {
        self.is_row_version
    }

    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    pub fn owned_key(&self) -> Option<OwnedKeyKind> {
        self.owned_key
    }

    pub fn is_owned_type_key(&self) -> bool {
        self.owned_key.is_some()
    }

    /// Value returned on read when the element is absent.
    pub fn default_when_missing(&self) -> Option<&NativeValue> {
        self.default_when_missing.as_ref()
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("element_path", &self.element_path)
            .field("static_type", &self.static_type)
            .field("is_primary_key", &self.is_primary_key)
            .field("owned_key", &self.owned_key)
            .finish_non_exhaustive()
    }
}

/// Declares a property for an [`EntityTypeBuilder`](super::EntityTypeBuilder).
#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    pub(crate) name: String,
    pub(crate) element_name: Option<String>,
    pub(crate) static_type: StaticType,
    pub(crate) converter: Option<Arc<dyn ValueConverter>>,
    pub(crate) representation: Option<RepresentationConfig>,
    pub(crate) is_primary_key: bool,
    pub(crate) is_concurrency_token: bool,
    pub(crate) is_row_version: bool,
    pub(crate) is_nullable: bool,
    pub(crate) owned_key: Option<OwnedKeyKind>,
    pub(crate) default_when_missing: Option<NativeValue>,
}

impl PropertyBuilder {
    /// A property named `name` of type `ty`. Nullability defaults to
    /// whether `ty` admits null.
    pub fn new(name: impl Into<String>, ty: StaticType) -> Self {
        Self {
            name: name.into(),
            element_name: None,
            is_nullable: ty.accepts_null(),
            static_type: ty,
            converter: None,
            representation: None,
            is_primary_key: false,
            is_concurrency_token: false,
            is_row_version: false,
            owned_key: None,
            default_when_missing: None,
        }
    }

    pub fn element_name(mut self, name: impl Into<String>) -> Self {
        self.element_name = Some(name.into());
        self
    }

    pub fn converter(mut self, converter: Arc<dyn ValueConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn representation(mut self, config: RepresentationConfig) -> Self {
        self.representation = Some(config);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn concurrency_token(mut self) -> Self {
        self.is_concurrency_token = true;
        self
    }

    /// An integer version bumped on every write. Implies a concurrency
    /// token.
    pub fn row_version(mut self) -> Self {
        self.is_row_version = true;
        self.is_concurrency_token = true;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.is_nullable = nullable;
        self
    }

    pub fn default_when_missing(mut self, value: impl Into<NativeValue>) -> Self {
        self.default_when_missing = Some(value.into());
        self
    }

    /// Key property pointing back at the owner of an owned type.
    pub fn owner_key(mut self) -> Self {
        self.owned_key = Some(OwnedKeyKind::OwnerForeignKey);
        self.is_primary_key = true;
        self
    }

    /// Position key of an owned collection element.
    pub fn ordinal_key(mut self) -> Self {
        self.owned_key = Some(OwnedKeyKind::Ordinal);
        self.is_primary_key = true;
        self
    }

    pub(crate) fn build(self, element_name: String, element_path: Vec<String>, is_primary_key: bool) -> Property {
        Property {
            name: self.name,
            element_name,
            element_path,
            static_type: self.static_type,
            converter: self.converter,
            representation: self.representation,
            is_primary_key,
            is_concurrency_token: self.is_concurrency_token,
            is_row_version: self.is_row_version,
            is_nullable: self.is_nullable,
            owned_key: self.owned_key,
            default_when_missing: self.default_when_missing,
        }
    }
}

impl From<&Property> for PropertyBuilder {
    /// Re-declares a built property, keeping its resolved element name.
    fn from(property: &Property) -> Self {
        Self {
            name: property.name.clone(),
            element_name: Some(property.element_name.clone()),
            static_type: property.static_type.clone(),
            converter: property.converter.clone(),
            representation: property.representation.clone(),
            is_primary_key: property.is_primary_key,
            is_concurrency_token: property.is_concurrency_token,
            is_row_version: property.is_row_version,
            is_nullable: property.is_nullable,
            owned_key: property.owned_key,
            default_when_missing: property.default_when_missing.clone(),
        }
    }
}
