//! Maps change-tracked entities onto documents.
//!
//! - [`metadata`]: entity types, properties, owned navigations and keys.
//! - [`serializer`]: conversion of native property values to stored values,
//!   resolved per type, converter and representation.
//! - [`update`]: translation of tracked changes into insert, update and
//!   delete operations.
//! - [`read`] and [`discriminator`]: reading stored documents back.

pub mod discriminator;
pub mod error;
pub mod metadata;
pub mod native;
pub mod naming;
pub mod options;
pub mod read;
pub mod serializer;
pub mod tracker;
pub mod update;

pub use discriminator::DiscriminatorConvention;
pub use error::{MappingError, MissingReason};
pub use metadata::{EntityType, EntityTypeBuilder, Model, Navigation, NavigationBuilder, Property, PropertyBuilder};
pub use native::{NativeValue, StaticType};
pub use options::{ElementNaming, MapperOptions, ModelOptions, TranslatorOptions};
pub use serializer::{RepresentationConfig, Serializer, SerializerResolver, ValueSerializer};
pub use tracker::MemoryChangeTracker;
pub use update::{
    BatchError, ChangeTracker, DocumentUpdate, EntityState, EntryId, NavigationValue, UpdateTranslator, WriteOperation,
};
