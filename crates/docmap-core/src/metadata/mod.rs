//! Entity type metadata: properties, owned navigations, keys and
//! discriminators, grouped into a [`Model`].

mod builder;
mod entity_type;
mod model;
mod navigation;
mod property;

pub use builder::EntityTypeBuilder;
pub use entity_type::{Discriminator, EntityType, DEFAULT_DISCRIMINATOR_ELEMENT};
pub use model::Model;
pub use navigation::{Navigation, NavigationBuilder};
pub use property::{OwnedKeyKind, Property, PropertyBuilder};
