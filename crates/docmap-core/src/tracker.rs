//! An in-memory [`ChangeTracker`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::metadata::{EntityType, Navigation, Property};
use crate::native::NativeValue;
use crate::update::{ChangeTracker, CollectionId, EntityState, EntryId, NavigationValue, OwnedCollection};

#[derive(Debug, Clone)]
struct TrackedEntry {
    entity: Arc<EntityType>,
    state: EntityState,
    current: HashMap<String, NativeValue>,
    original: HashMap<String, NativeValue>,
    modified: HashSet<String>,
    temporary: HashSet<String>,
    navigations: HashMap<String, NavigationValue>,
    original_navigations: HashMap<String, NavigationValue>,
}

/// Tracks entries in memory. Property and navigation values are keyed by
/// name; anything never set reads as null.
///
/// Methods taking an [`EntryId`] panic when the id was not returned by
/// [`track`](Self::track) on the same tracker.
#[derive(Debug, Clone, Default)]
pub struct MemoryChangeTracker {
    entries: Vec<TrackedEntry>,
    next_collection: u64,
}

impl MemoryChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking an entry. Original values start equal to `values`.
    pub fn track<I, S>(&mut self, entity: Arc<EntityType>, state: EntityState, values: I) -> EntryId
    where
        I: IntoIterator<Item = (S, NativeValue)>,
        S: Into<String>,
    {
        let current: HashMap<String, NativeValue> = values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.entries.push(TrackedEntry {
            entity,
            state,
            original: current.clone(),
            current,
            modified: HashSet::new(),
            temporary: HashSet::new(),
            navigations: HashMap::new(),
            original_navigations: HashMap::new(),
        });
        EntryId(self.entries.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_state(&mut self, entry: EntryId, state: EntityState) {
        self.entries[entry.0].state = state;
    }

    /// Sets a current value. An unchanged entry whose value now differs
    /// from the original becomes modified.
    pub fn set_value(&mut self, entry: EntryId, property: &str, value: NativeValue) {
        let tracked = &mut self.entries[entry.0];
        if tracked.original.get(property) != Some(&value) {
            tracked.modified.insert(property.to_owned());
            if tracked.state == EntityState::Unchanged {
                tracked.state = EntityState::Modified;
            }
        }
        tracked.current.insert(property.to_owned(), value);
    }

    pub fn set_original_value(&mut self, entry: EntryId, property: &str, value: NativeValue) {
        self.entries[entry.0].original.insert(property.to_owned(), value);
    }

    /// Flags the current value of `property` as a placeholder.
    pub fn mark_temporary(&mut self, entry: EntryId, property: &str) {
        self.entries[entry.0].temporary.insert(property.to_owned());
    }

    pub fn value(&self, entry: EntryId, property: &str) -> Option<&NativeValue> {
        self.entries[entry.0].current.get(property)
    }

    pub fn is_temporary(&self, entry: EntryId, property: &str) -> bool {
        self.entries[entry.0].temporary.contains(property)
    }

    /// A new owned collection value with a fresh identity.
    pub fn new_collection(&mut self, entries: Vec<EntryId>) -> NavigationValue {
        self.next_collection += 1;
        NavigationValue::Collection(OwnedCollection {
            identity: CollectionId(self.next_collection),
            entries,
        })
    }

    pub fn set_navigation(&mut self, entry: EntryId, navigation: &str, value: NavigationValue) {
        self.entries[entry.0].navigations.insert(navigation.to_owned(), value);
    }

    pub fn set_original_navigation(&mut self, entry: EntryId, navigation: &str, value: NavigationValue) {
        self.entries[entry.0].original_navigations.insert(navigation.to_owned(), value);
    }

    /// Makes current values the originals and settles the state: added and
    /// modified entries become unchanged, deleted ones detached.
    pub fn accept_changes(&mut self, entry: EntryId) {
        let tracked = &mut self.entries[entry.0];
        tracked.original = tracked.current.clone();
        tracked.original_navigations = tracked.navigations.clone();
        tracked.modified.clear();
        tracked.temporary.clear();
        tracked.state = match tracked.state {
            EntityState::Deleted | EntityState::Detached => EntityState::Detached,
            _ => EntityState::Unchanged,
        };
    }

    /// [`accept_changes`](Self::accept_changes) for every entry.
    pub fn accept_all_changes(&mut self) {
        for i in 0..self.entries.len() {
            self.accept_changes(EntryId(i));
        }
    }
}

impl ChangeTracker for MemoryChangeTracker {
    fn entity_type(&self, entry: EntryId) -> Arc<EntityType> {
        self.entries[entry.0].entity.clone()
    }

    fn state(&self, entry: EntryId) -> EntityState {
        self.entries[entry.0].state
    }

    fn current_value(&self, entry: EntryId, property: &Property) -> NativeValue {
        self.value(entry, property.name()).cloned().unwrap_or_default()
    }

    fn original_value(&self, entry: EntryId, property: &Property) -> NativeValue {
        self.entries[entry.0]
            .original
            .get(property.name())
            .cloned()
            .unwrap_or_default()
    }

    fn is_modified(&self, entry: EntryId, property: &Property) -> bool {
        self.entries[entry.0].modified.contains(property.name())
    }

    fn has_temporary_value(&self, entry: EntryId, property: &Property) -> bool {
        self.is_temporary(entry, property.name())
    }

    fn set_store_generated_value(&mut self, entry: EntryId, property: &Property, value: NativeValue) {
        self.entries[entry.0].temporary.remove(property.name());
        if self.state(entry) == EntityState::Added {
            self.entries[entry.0].current.insert(property.name().to_owned(), value);
        } else {
            self.set_value(entry, property.name(), value);
        }
    }

    fn set_temporary_value(&mut self, entry: EntryId, property: &Property, value: NativeValue) {
        let tracked = &mut self.entries[entry.0];
        tracked.temporary.insert(property.name().to_owned());
        tracked.current.insert(property.name().to_owned(), value);
    }

    fn navigation_value(&self, entry: EntryId, navigation: &Navigation) -> NavigationValue {
        self.entries[entry.0]
            .navigations
            .get(navigation.name())
            .cloned()
            .unwrap_or_default()
    }

    fn original_navigation_value(&self, entry: EntryId, navigation: &Navigation) -> NavigationValue {
        self.entries[entry.0]
            .original_navigations
            .get(navigation.name())
            .cloned()
            .unwrap_or_default()
    }
}
