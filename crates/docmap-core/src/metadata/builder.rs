//! Entity type construction and the model-building conventions: primary
//! key discovery, `_id` mapping and element naming.

use docmap_bson::{Value, ID_FIELD};

use super::{
    Discriminator, EntityType, Navigation, NavigationBuilder, PropertyBuilder, DEFAULT_DISCRIMINATOR_ELEMENT,
};
use crate::error::MappingError;
use crate::options::ModelOptions;

/// Declares an entity type.
///
/// ```
/// use docmap_core::metadata::{EntityTypeBuilder, PropertyBuilder};
/// use docmap_core::native::StaticType;
/// use docmap_core::options::ModelOptions;
///
/// let order = EntityTypeBuilder::new("Order")
///     .property(PropertyBuilder::new("Id", StaticType::I32))
///     .property(PropertyBuilder::new("Customer", StaticType::String))
///     .build(&ModelOptions::default())
///     .unwrap();
/// let key: Vec<_> = order.key_properties().map(|p| p.element_name()).collect();
/// assert_eq!(key, ["_id"]);
/// ```
#[derive(Debug, Clone)]
pub struct EntityTypeBuilder {
    name: String,
    collection: Option<String>,
    properties: Vec<PropertyBuilder>,
    key: Option<Vec<String>>,
    navigations: Vec<NavigationBuilder>,
    discriminator: Option<Value>,
    discriminator_element: Option<String>,
    base_type: Option<String>,
    is_owned: bool,
}

impl EntityTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: None,
            properties: Vec::new(),
            key: None,
            navigations: Vec::new(),
            discriminator: None,
            discriminator_element: None,
            base_type: None,
            is_owned: false,
        }
    }

    /// A type stored only inside its owner's documents.
    pub fn owned(name: impl Into<String>) -> Self {
        Self {
            is_owned: true,
            ..Self::new(name)
        }
    }

    /// Derives from `base`: shares its collection, properties, key,
    /// navigations and discriminator element.
    pub fn derived(name: impl Into<String>, base: &EntityType) -> Self {
        Self {
            collection: Some(base.collection.clone()),
            properties: base.properties.iter().map(PropertyBuilder::from).collect(),
            key: Some(base.key_properties().map(|p| p.name.clone()).collect()),
            navigations: base
                .navigations
                .iter()
                .map(|n| NavigationBuilder {
                    name: n.name.clone(),
                    element_name: Some(n.element_name.clone()),
                    target: n.target.clone(),
                    is_collection: n.is_collection,
                })
                .collect(),
            discriminator_element: base.discriminator.as_ref().map(|d| d.element_name.clone()),
            base_type: Some(base.name.clone()),
            is_owned: base.is_owned,
            ..Self::new(name)
        }
    }

    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }

    /// Adds a property, replacing an earlier one of the same name.
    pub fn property(mut self, property: PropertyBuilder) -> Self {
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
        self
    }

    /// Declares the primary key by property names, in key order.
    pub fn key<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn navigation(mut self, navigation: NavigationBuilder) -> Self {
        self.navigations.push(navigation);
        self
    }

    pub fn discriminator(mut self, value: impl Into<Value>) -> Self {
        self.discriminator = Some(value.into());
        self
    }

    /// Element the discriminator is stored under; `_t` unless set.
    pub fn discriminator_element(mut self, name: impl Into<String>) -> Self {
        self.discriminator_element = Some(name.into());
        self
    }

    pub fn build(self, options: &ModelOptions) -> Result<EntityType, MappingError> {
        let key_names = match self.key {
            Some(names) => names,
            None => {
                let flagged: Vec<String> = self
                    .properties
                    .iter()
                    .filter(|p| p.is_primary_key)
                    .map(|p| p.name.clone())
                    .collect();
                if flagged.is_empty() && options.discover_primary_key && !self.is_owned {
                    discover_key(&self.name, &self.properties).into_iter().collect()
                } else {
                    flagged
                }
            }
        };

        let mut primary_key = Vec::with_capacity(key_names.len());
        for key in &key_names {
            let index = self
                .properties
                .iter()
                .position(|p| &p.name == key)
                .ok_or_else(|| MappingError::UnknownProperty {
                    entity: self.name.clone(),
                    property: key.clone(),
                })?;
            primary_key.push(index);
        }
        let mapped_keys = primary_key
            .iter()
            .filter(|&&i| self.properties[i].owned_key.is_none())
            .count();

        let mut properties = Vec::with_capacity(self.properties.len());
        for (index, property) in self.properties.into_iter().enumerate() {
            let is_key = primary_key.contains(&index);
            let mapped_key = is_key && property.owned_key.is_none();
            let element_name = match &property.element_name {
                Some(explicit) => explicit.clone(),
                None if property.owned_key.is_some() => String::new(),
                None if mapped_key && mapped_keys == 1 => ID_FIELD.to_owned(),
                None => options.element_naming.apply(&property.name),
            };
            let element_path = if mapped_key && mapped_keys > 1 {
                vec![ID_FIELD.to_owned(), element_name.clone()]
            } else {
                vec![element_name.clone()]
            };
            properties.push(property.build(element_name, element_path, is_key));
        }

        let mut navigations = Vec::with_capacity(self.navigations.len());
        for navigation in self.navigations {
            if !navigation.target.is_owned {
                return Err(MappingError::NavigationShape(format!(
                    "navigation '{}.{}' targets '{}', which is not an owned type",
                    self.name, navigation.name, navigation.target.name
                )));
            }
            navigations.push(Navigation {
                element_name: navigation
                    .element_name
                    .unwrap_or_else(|| options.element_naming.apply(&navigation.name)),
                name: navigation.name,
                target: navigation.target,
                is_collection: navigation.is_collection,
            });
        }

        let discriminator_element = self.discriminator_element;
        let discriminator = self.discriminator.map(|value| {
            let element = discriminator_element
                .clone()
                .unwrap_or_else(|| DEFAULT_DISCRIMINATOR_ELEMENT.to_owned());
            Discriminator::new(element, value)
        });

        Ok(EntityType {
            collection: self.collection.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            properties,
            navigations,
            primary_key,
            discriminator,
            base_type: self.base_type,
            is_owned: self.is_owned,
        })
    }
}

/// First property named `_id`, `Id` or `<type>Id`, ignoring ASCII case.
fn discover_key(type_name: &str, properties: &[PropertyBuilder]) -> Option<String> {
    let typed = format!("{type_name}Id");
    [ID_FIELD, "Id", typed.as_str()].iter().find_map(|candidate| {
        properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(candidate))
            .map(|p| p.name.clone())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::native::StaticType;
    use crate::options::ElementNaming;

    fn prop(name: &str) -> PropertyBuilder {
        PropertyBuilder::new(name, StaticType::I32)
    }

    #[test]
    fn discovers_type_named_key() {
        let entity = EntityTypeBuilder::new("Customer")
            .property(prop("Name"))
            .property(prop("customerID"))
            .build(&ModelOptions::default())
            .unwrap();
        let key: Vec<_> = entity.key_properties().map(|p| p.name()).collect();
        assert_eq!(key, ["customerID"]);
        assert_eq!(entity.property("customerID").unwrap().element_path(), ["_id"]);
    }

    #[test]
    fn discovery_can_be_disabled() {
        let options = ModelOptions {
            discover_primary_key: false,
            ..ModelOptions::default()
        };
        let entity = EntityTypeBuilder::new("Customer")
            .property(prop("Id"))
            .build(&options)
            .unwrap();
        assert!(!entity.has_primary_key());
        assert_eq!(entity.property("Id").unwrap().element_name(), "Id");
    }

    #[test]
    fn composite_key_members_nest_under_id() {
        let entity = EntityTypeBuilder::new("Line")
            .property(prop("OrderId"))
            .property(prop("LineNo").element_name("n"))
            .property(prop("Qty"))
            .key(["OrderId", "LineNo"])
            .build(&ModelOptions {
                element_naming: ElementNaming::CamelCase,
                ..ModelOptions::default()
            })
            .unwrap();
        assert_eq!(entity.property("OrderId").unwrap().element_path(), ["_id", "orderId"]);
        assert_eq!(entity.property("LineNo").unwrap().element_path(), ["_id", "n"]);
        assert_eq!(entity.property("Qty").unwrap().element_path(), ["qty"]);
    }

    #[test]
    fn unknown_key_property_is_reported() {
        let err = EntityTypeBuilder::new("Line").key(["Nope"]).build(&ModelOptions::default());
        assert_eq!(
            err.unwrap_err(),
            MappingError::UnknownProperty {
                entity: "Line".into(),
                property: "Nope".into()
            }
        );
    }

    #[test]
    fn owned_keys_have_empty_element_names() {
        let item = EntityTypeBuilder::owned("Item")
            .property(prop("OwnerId").owner_key())
            .property(prop("Ordinal").ordinal_key())
            .property(prop("Qty"))
            .build(&ModelOptions::default())
            .unwrap();
        assert_eq!(item.ordinal_key().map(|p| p.name()), Some("Ordinal"));
        assert!(item.key_properties().all(|p| p.element_name().is_empty()));
        assert_eq!(item.property("Qty").unwrap().element_path(), ["Qty"]);
    }

    #[test]
    fn navigation_must_target_an_owned_type() {
        let other = Arc::new(
            EntityTypeBuilder::new("Other")
                .property(prop("Id"))
                .build(&ModelOptions::default())
                .unwrap(),
        );
        let err = EntityTypeBuilder::new("Root")
            .property(prop("Id"))
            .navigation(NavigationBuilder::one("Other", other))
            .build(&ModelOptions::default())
            .unwrap_err();
        assert!(matches!(err, MappingError::NavigationShape(_)));
    }

    #[test]
    fn derived_type_shares_collection_and_key() {
        let animal = EntityTypeBuilder::new("Animal")
            .property(prop("Id"))
            .discriminator("Animal")
            .discriminator_element("kind")
            .build(&ModelOptions::default())
            .unwrap();
        let cat = EntityTypeBuilder::derived("Cat", &animal)
            .property(PropertyBuilder::new("Lives", StaticType::I32))
            .discriminator("Cat")
            .build(&ModelOptions::default())
            .unwrap();
        assert_eq!(cat.collection(), "Animal");
        assert_eq!(cat.base_type(), Some("Animal"));
        assert_eq!(cat.key_properties().next().unwrap().element_name(), "_id");
        assert_eq!(cat.discriminator(), Some(&Discriminator::new("kind", "Cat")));
    }
}
