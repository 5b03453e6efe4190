//! Translation of tracked entity changes into document write operations.
//!
//! The translator reads entries through the [`ChangeTracker`] capability,
//! so it never holds references into the caller's object graph. Owned
//! entities are rewritten as part of their owner's document.

mod filter;
mod ordinals;
mod translator;

use std::fmt;
use std::sync::Arc;

use docmap_bson::Document;
use thiserror::Error;

use crate::error::MappingError;
use crate::metadata::{EntityType, Navigation, Property};
use crate::native::NativeValue;

pub use translator::UpdateTranslator;

/// Handle of one tracked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub usize);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State of a tracked entry. Discriminants are the raw codes accepted by
/// [`TryFrom<u8>`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityState {
    Detached = 0,
    Unchanged = 1,
    Deleted = 2,
    Modified = 3,
    Added = 4,
}

impl TryFrom<u8> for EntityState {
    type Error = MappingError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => EntityState::Detached,
            1 => EntityState::Unchanged,
            2 => EntityState::Deleted,
            3 => EntityState::Modified,
            4 => EntityState::Added,
            other => return Err(MappingError::UnsupportedState(other)),
        })
    }
}

/// Reference identity of an owned collection instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionId(pub u64);

/// An owned collection: its identity and its elements in enumeration
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedCollection {
    pub identity: CollectionId,
    pub entries: Vec<EntryId>,
}

/// Value of an owned navigation on one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NavigationValue {
    #[default]
    Null,
    Reference(EntryId),
    Collection(OwnedCollection),
}

impl NavigationValue {
    /// Reference equality: the same entry, the same collection instance,
    /// or both null. Collection contents are not compared.
    pub fn same_reference(&self, other: &NavigationValue) -> bool {
        match (self, other) {
            (NavigationValue::Null, NavigationValue::Null) => true,
            (NavigationValue::Reference(a), NavigationValue::Reference(b)) => a == b,
            (NavigationValue::Collection(a), NavigationValue::Collection(b)) => a.identity == b.identity,
            _ => false,
        }
    }
}

/// Access to tracked entries, addressed by [`EntryId`].
///
/// Implementations may panic when handed an id they do not track.
pub trait ChangeTracker {
    fn entity_type(&self, entry: EntryId) -> Arc<EntityType>;

    fn state(&self, entry: EntryId) -> EntityState;

    fn current_value(&self, entry: EntryId, property: &Property) -> NativeValue;

    fn original_value(&self, entry: EntryId, property: &Property) -> NativeValue;

    fn is_modified(&self, entry: EntryId, property: &Property) -> bool;

    /// Whether the property holds a placeholder awaiting a store-generated
    /// value.
    fn has_temporary_value(&self, entry: EntryId, property: &Property) -> bool;

    /// Stores a permanent generated value, clearing the temporary flag.
    fn set_store_generated_value(&mut self, entry: EntryId, property: &Property, value: NativeValue);

    /// Stores a placeholder value and marks it temporary.
    fn set_temporary_value(&mut self, entry: EntryId, property: &Property, value: NativeValue);

    fn navigation_value(&self, entry: EntryId, navigation: &Navigation) -> NavigationValue;

    fn original_navigation_value(&self, entry: EntryId, navigation: &Navigation) -> NavigationValue;
}

/// One write against the document store.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOperation {
    Insert(Document),
    Delete { filter: Document },
    /// `update` is always `{"$set": {...}}`.
    Update { filter: Document, update: Document },
}

impl WriteOperation {
    pub fn kind(&self) -> &'static str {
        match self {
            WriteOperation::Insert(_) => "insert",
            WriteOperation::Delete { .. } => "delete",
            WriteOperation::Update { .. } => "update",
        }
    }
}

/// A write operation with the entry it came from and the collection it
/// targets.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpdate {
    pub entry: EntryId,
    pub collection: String,
    pub operation: WriteOperation,
}

/// A batch translation stopped at a failing entry.
#[derive(Debug, Clone, Error)]
#[error("failed to translate entry {entry}: {cause}")]
pub struct BatchError {
    pub entry: EntryId,
    #[source]
    pub cause: MappingError,
    /// Operations produced for the entries before the failing one.
    pub emitted: Vec<DocumentUpdate>,
}
