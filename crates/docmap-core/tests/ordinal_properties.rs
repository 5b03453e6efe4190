use std::sync::Arc;

use docmap_bson::Value;
use docmap_core::metadata::{EntityType, Navigation, Property};
use docmap_core::update::EntityState::{Added, Modified, Unchanged};
use docmap_core::{
    ChangeTracker, EntityState, EntityTypeBuilder, EntryId, MemoryChangeTracker, ModelOptions, NativeValue,
    NavigationBuilder, NavigationValue, PropertyBuilder, SerializerResolver, StaticType, TranslatorOptions,
    UpdateTranslator, WriteOperation,
};
use proptest::prelude::*;
use proptest::sample::subsequence;

fn item_type() -> Arc<EntityType> {
    Arc::new(
        EntityTypeBuilder::owned("Item")
            .property(PropertyBuilder::new("OwnerId", StaticType::I32).owner_key())
            .property(PropertyBuilder::new("Ordinal", StaticType::I32).ordinal_key())
            .property(PropertyBuilder::new("Sku", StaticType::String))
            .build(&ModelOptions::default())
            .unwrap(),
    )
}

fn order_type(item: Arc<EntityType>) -> Arc<EntityType> {
    Arc::new(
        EntityTypeBuilder::new("Order")
            .property(PropertyBuilder::new("Id", StaticType::I32))
            .navigation(NavigationBuilder::many("Items", item))
            .build(&ModelOptions::default())
            .unwrap(),
    )
}

/// Fails the moment two members of `members` hold the same ordinal.
struct Watched {
    inner: MemoryChangeTracker,
    members: Vec<EntryId>,
}

impl Watched {
    fn check(&self) {
        let ordinals: Vec<&NativeValue> = self
            .members
            .iter()
            .filter_map(|&e| self.inner.value(e, "Ordinal"))
            .collect();
        for (i, a) in ordinals.iter().enumerate() {
            assert!(!ordinals[i + 1..].contains(a), "ordinal {a:?} held twice");
        }
    }
}

impl ChangeTracker for Watched {
    fn entity_type(&self, entry: EntryId) -> Arc<EntityType> {
        self.inner.entity_type(entry)
    }

    fn state(&self, entry: EntryId) -> EntityState {
        self.inner.state(entry)
    }

    fn current_value(&self, entry: EntryId, property: &Property) -> NativeValue {
        self.inner.current_value(entry, property)
    }

    fn original_value(&self, entry: EntryId, property: &Property) -> NativeValue {
        self.inner.original_value(entry, property)
    }

    fn is_modified(&self, entry: EntryId, property: &Property) -> bool {
        self.inner.is_modified(entry, property)
    }

    fn has_temporary_value(&self, entry: EntryId, property: &Property) -> bool {
        self.inner.has_temporary_value(entry, property)
    }

    fn set_store_generated_value(&mut self, entry: EntryId, property: &Property, value: NativeValue) {
        self.inner.set_store_generated_value(entry, property, value);
        self.check();
    }

    fn set_temporary_value(&mut self, entry: EntryId, property: &Property, value: NativeValue) {
        self.inner.set_temporary_value(entry, property, value);
        self.check();
    }

    fn navigation_value(&self, entry: EntryId, navigation: &Navigation) -> NavigationValue {
        self.inner.navigation_value(entry, navigation)
    }

    fn original_navigation_value(&self, entry: EntryId, navigation: &Navigation) -> NavigationValue {
        self.inner.original_navigation_value(entry, navigation)
    }
}

/// Persisted item count, surviving items in their new order, appended count.
fn edits() -> impl Strategy<Value = (usize, Vec<usize>, usize)> {
    (1usize..8).prop_flat_map(|n| {
        (
            Just(n),
            subsequence((0..n).collect::<Vec<_>>(), 0..=n).prop_shuffle(),
            0usize..3,
        )
    })
}

fn sku(value: Option<&NativeValue>) -> String {
    match value {
        Some(NativeValue::String(s)) => s.clone(),
        other => panic!("unexpected sku {other:?}"),
    }
}

proptest! {
    #[test]
    fn ordinals_end_up_as_positions((persisted, kept, appended) in edits()) {
        let item = item_type();
        let mut inner = MemoryChangeTracker::new();
        let order = inner.track(order_type(item.clone()), Unchanged, [("Id", NativeValue::I32(1))]);
        let items: Vec<EntryId> = (0..persisted)
            .map(|i| {
                let ordinal = i32::try_from(i + 1).unwrap();
                inner.track(
                    item.clone(),
                    Unchanged,
                    [
                        ("OwnerId", NativeValue::I32(1)),
                        ("Ordinal", NativeValue::I32(ordinal)),
                        ("Sku", NativeValue::from(format!("p{i}"))),
                    ],
                )
            })
            .collect();
        let original = inner.new_collection(items.clone());
        inner.set_navigation(order, "Items", original);
        inner.accept_all_changes();

        let mut members: Vec<EntryId> = kept.iter().map(|&i| items[i]).collect();
        for i in 0..appended {
            let new = inner.track(
                item.clone(),
                Added,
                [
                    ("OwnerId", NativeValue::I32(1)),
                    ("Ordinal", NativeValue::I32(0)),
                    ("Sku", NativeValue::from(format!("n{i}"))),
                ],
            );
            inner.mark_temporary(new, "Ordinal");
            members.push(new);
        }
        let current = inner.new_collection(members.clone());
        inner.set_navigation(order, "Items", current);
        inner.set_state(order, Modified);

        let mut tracker = Watched { inner, members: members.clone() };
        let resolver = SerializerResolver::new();
        let update = UpdateTranslator::new(&resolver, TranslatorOptions::default())
            .translate(&mut tracker, order)
            .unwrap()
            .unwrap();

        for (position, &member) in members.iter().enumerate() {
            let expected = NativeValue::I32(i32::try_from(position + 1).unwrap());
            prop_assert_eq!(tracker.inner.value(member, "Ordinal"), Some(&expected));
            prop_assert!(!tracker.inner.is_temporary(member, "Ordinal"));
        }

        let WriteOperation::Update { update, .. } = update.operation else {
            panic!("expected an update");
        };
        let written = update.get_document("$set").and_then(|set| set.get("Items")).cloned();
        let moved = kept.iter().enumerate().any(|(position, &i)| position != i);
        let non_empty = !members.is_empty();
        prop_assert_eq!(written.is_some(), !non_empty || moved || appended > 0);
        if let Some(Value::Array(docs)) = written {
            let skus: Vec<String> = docs
                .iter()
                .map(|d| match d {
                    Value::Document(d) => d.get("Sku").and_then(Value::as_str).unwrap_or_default().to_owned(),
                    _ => String::new(),
                })
                .collect();
            let expected: Vec<String> = members.iter().map(|&m| sku(tracker.inner.value(m, "Sku"))).collect();
            prop_assert_eq!(skus, expected);
        }
    }
}
