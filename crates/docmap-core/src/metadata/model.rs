use std::sync::Arc;

use indexmap::IndexMap;

use super::EntityType;
use crate::error::MappingError;

/// The set of mapped entity types, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Model {
    types: IndexMap<String, Arc<EntityType>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entity`, replacing a type of the same name in place.
    pub fn add(&mut self, entity: EntityType) -> Arc<EntityType> {
        let entity = Arc::new(entity);
        self.types.insert(entity.name.clone(), entity.clone());
        entity
    }

    pub fn find(&self, name: &str) -> Option<&Arc<EntityType>> {
        self.types.get(name)
    }

    pub fn get(&self, name: &str) -> Result<&Arc<EntityType>, MappingError> {
        self.find(name)
            .ok_or_else(|| MappingError::EntityTypeNotFound(name.to_owned()))
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &Arc<EntityType>> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Types deriving from `name`, directly or transitively, in model
    /// order.
    pub fn derived_types(&self, name: &str) -> Vec<&Arc<EntityType>> {
        self.types
            .values()
            .filter(|candidate| self.derives_from(candidate, name))
            .collect()
    }

    fn derives_from(&self, entity: &EntityType, ancestor: &str) -> bool {
        let mut base = entity.base_type();
        // Bounded by the model size so a cyclic declaration cannot loop.
        for _ in 0..self.types.len() {
            match base {
                Some(name) if name == ancestor => return true,
                Some(name) => base = self.find(name).and_then(|b| b.base_type()),
                None => return false,
            }
        }
        false
    }
}
