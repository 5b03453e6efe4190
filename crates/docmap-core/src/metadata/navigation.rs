use std::sync::Arc;

use super::EntityType;

/// A navigation from an entity type to an owned type embedded in its
/// documents.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub(crate) name: String,
    pub(crate) element_name: String,
    pub(crate) target: Arc<EntityType>,
    pub(crate) is_collection: bool,
}

impl Navigation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    /// The owned type the navigation points at.
    pub fn target(&self) -> &Arc<EntityType> {
        &self.target
    }

    /// `true` for an embedded array, `false` for a single embedded
    /// document.
    pub fn is_collection(&self) -> bool {
        self.is_collection
    }
}

/// Declares an owned navigation for an
/// [`EntityTypeBuilder`](super::EntityTypeBuilder).
#[derive(Debug, Clone)]
pub struct NavigationBuilder {
    pub(crate) name: String,
    pub(crate) element_name: Option<String>,
    pub(crate) target: Arc<EntityType>,
    pub(crate) is_collection: bool,
}

impl NavigationBuilder {
    pub fn one(name: impl Into<String>, target: Arc<EntityType>) -> Self {
        Self {
            name: name.into(),
            element_name: None,
            target,
            is_collection: false,
        }
    }

    pub fn many(name: impl Into<String>, target: Arc<EntityType>) -> Self {
        Self {
            is_collection: true,
            ..Self::one(name, target)
        }
    }

    pub fn element_name(mut self, name: impl Into<String>) -> Self {
        self.element_name = Some(name.into());
        self
    }
}
