use docmap_bson::Value;

use super::{Navigation, Property};
use crate::error::MappingError;

/// Element name used for discriminators unless one is configured.
pub const DEFAULT_DISCRIMINATOR_ELEMENT: &str = "_t";

/// Stored field identifying a concrete type within a hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Discriminator {
    pub(crate) element_name: String,
    pub(crate) value: Value,
}

impl Discriminator {
    pub fn new(element_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            element_name: element_name.into(),
            value: value.into(),
        }
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Static metadata of one mapped entity type.
#[derive(Debug, Clone)]
pub struct EntityType {
    pub(crate) name: String,
    pub(crate) collection: String,
    pub(crate) properties: Vec<Property>,
    pub(crate) navigations: Vec<Navigation>,
    /// Indexes into `properties`, in key order. Empty when keyless.
    pub(crate) primary_key: Vec<usize>,
    pub(crate) discriminator: Option<Discriminator>,
    pub(crate) base_type: Option<String>,
    pub(crate) is_owned: bool,
}

impl EntityType {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the collection documents of this type are stored in.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Like [`property`](Self::property), failing with
    /// [`MappingError::UnknownProperty`].
    pub fn require_property(&self, name: &str) -> Result<&Property, MappingError> {
        self.property(name).ok_or_else(|| MappingError::UnknownProperty {
            entity: self.name.clone(),
            property: name.to_owned(),
        })
    }

    pub fn navigations(&self) -> &[Navigation] {
        &self.navigations
    }

    pub fn navigation(&self, name: &str) -> Option<&Navigation> {
        self.navigations.iter().find(|n| n.name == name)
    }

    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }

    /// Primary-key properties in key order.
    pub fn key_properties(&self) -> impl Iterator<Item = &Property> + '_ {
        self.primary_key.iter().map(move |&i| &self.properties[i])
    }

    pub fn concurrency_tokens(&self) -> impl Iterator<Item = &Property> + '_ {
        self.properties.iter().filter(|p| p.is_concurrency_token)
    }

    /// The ordinal key of an owned collection element type.
    pub fn ordinal_key(&self) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.owned_key == Some(super::OwnedKeyKind::Ordinal))
    }

    pub fn discriminator(&self) -> Option<&Discriminator> {
        self.discriminator.as_ref()
    }

    pub fn base_type(&self) -> Option<&str> {
        self.base_type.as_deref()
    }

    /// Whether this type only exists embedded in an owner's documents.
    pub fn is_owned(&self) -> bool {
        self.is_owned
    }
}
