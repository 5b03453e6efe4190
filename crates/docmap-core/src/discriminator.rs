//! Discriminators of polymorphic entity hierarchies.
//!
//! Types sharing a collection are told apart by a discriminator element.
//! Discriminator values can be looked up for a concrete type or for a base
//! type and everything deriving from it. Resolving a concrete type back
//! from a stored document is not supported and always fails.

use std::sync::Arc;

use docmap_bson::{Document, Value};

use crate::error::MappingError;
use crate::metadata::{EntityType, Model, DEFAULT_DISCRIMINATOR_ELEMENT};

/// Discriminator lookups over a [`Model`].
#[derive(Debug, Clone, Copy)]
pub struct DiscriminatorConvention<'m> {
    model: &'m Model,
}

impl<'m> DiscriminatorConvention<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self { model }
    }

    /// Element the discriminator of `entity` is stored under.
    pub fn element_name<'e>(&self, entity: &'e EntityType) -> &'e str {
        entity
            .discriminator()
            .map_or(DEFAULT_DISCRIMINATOR_ELEMENT, |d| d.element_name())
    }

    /// Discriminator value declared by the type named `name`, if any.
    pub fn discriminator(&self, name: &str) -> Result<Option<&'m Value>, MappingError> {
        let entity = self.model.get(name)?;
        Ok(entity.discriminator().map(|d| d.value()))
    }

    /// Values for `name` and every type deriving from it, self first, then
    /// in model order. Types without a discriminator contribute nothing.
    pub fn discriminators_for_type_and_subtypes(&self, name: &str) -> Result<Vec<Value>, MappingError> {
        let entity = self.model.get(name)?;
        let values = std::iter::once(entity)
            .chain(self.model.derived_types(name))
            .filter_map(|t| t.discriminator().map(|d| d.value().clone()))
            .collect();
        Ok(values)
    }

    /// Filter matching documents of `name` or any subtype:
    /// `{field: value}` for a single value, `{field: {"$in": [...]}}`
    /// otherwise. `None` when the hierarchy declares no discriminators.
    pub fn type_filter(&self, name: &str) -> Result<Option<Document>, MappingError> {
        let entity = self.model.get(name)?;
        let mut values = self.discriminators_for_type_and_subtypes(name)?;
        let condition = match values.len() {
            0 => return Ok(None),
            1 => values.remove(0),
            _ => {
                let mut any_of = Document::with_capacity(1);
                any_of.insert("$in", Value::Array(values));
                Value::Document(any_of)
            }
        };
        let mut filter = Document::with_capacity(1);
        filter.insert(self.element_name(entity), condition);
        Ok(Some(filter))
    }

    /// Concrete type of a stored document. Unsupported: always fails with
    /// [`MappingError::UnresolvedDiscriminator`].
    pub fn actual_type(&self, nominal: &str, _document: &Document) -> Result<Arc<EntityType>, MappingError> {
        Err(MappingError::UnresolvedDiscriminator(nominal.to_owned()))
    }
}
