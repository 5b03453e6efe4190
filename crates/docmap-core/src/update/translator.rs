use docmap_bson::{to_text, Document, Value};
use tracing::{debug, trace};

use super::filter::and_combine;
use super::ordinals;
use super::{BatchError, ChangeTracker, DocumentUpdate, EntityState, EntryId, NavigationValue, WriteOperation};
use crate::error::MappingError;
use crate::metadata::{EntityType, Navigation, Property};
use crate::native::{NativeValue, StaticType};
use crate::options::TranslatorOptions;
use crate::serializer::SerializerResolver;

/// Which non-key properties an entity document includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropertyFilter {
    All,
    /// Modified properties and row versions.
    Modified,
}

/// Turns tracked entries into [`WriteOperation`]s.
///
/// Added entries become inserts, modified entries `$set` updates and
/// deleted entries deletes. Filters match the key and the original values
/// of concurrency tokens. Store-generated values are assigned through the
/// tracker as a side effect.
#[derive(Debug, Clone, Copy)]
pub struct UpdateTranslator<'r> {
    resolver: &'r SerializerResolver,
    options: TranslatorOptions,
}

impl<'r> UpdateTranslator<'r> {
    pub fn new(resolver: &'r SerializerResolver, options: TranslatorOptions) -> Self {
        Self { resolver, options }
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// Translates `entries` in order, stopping at the first failure.
    pub fn translate_all<T, I>(&self, tracker: &mut T, entries: I) -> Result<Vec<DocumentUpdate>, BatchError>
    where
        T: ChangeTracker + ?Sized,
        I: IntoIterator<Item = EntryId>,
    {
        let _span = tracing::debug_span!("translate_batch").entered();
        let mut emitted = Vec::new();
        for entry in entries {
            match self.translate(tracker, entry) {
                Ok(Some(update)) => emitted.push(update),
                Ok(None) => {}
                Err(cause) => {
                    debug!(%entry, error = %cause, emitted = emitted.len(), "translation failed");
                    return Err(BatchError { entry, cause, emitted });
                }
            }
        }
        debug!(operations = emitted.len(), "batch translated");
        Ok(emitted)
    }

    /// Translates one entry. Unchanged, detached and owned entries produce
    /// nothing; an owned entry is written with its owner.
    pub fn translate<T>(&self, tracker: &mut T, entry: EntryId) -> Result<Option<DocumentUpdate>, MappingError>
    where
        T: ChangeTracker + ?Sized,
    {
        let entity = tracker.entity_type(entry);
        if entity.is_owned() {
            trace!(%entry, entity = entity.name(), "owned entry is written by its owner");
            return Ok(None);
        }
        let operation = match tracker.state(entry) {
            EntityState::Added => {
                self.set_store_generated_values(tracker, entry, &entity)?;
                WriteOperation::Insert(self.write_entity(tracker, entry, PropertyFilter::All)?)
            }
            EntityState::Modified => {
                // Captured before row versions move on.
                let filter = self.where_filter(tracker, entry, &entity)?;
                self.set_store_generated_values(tracker, entry, &entity)?;
                let mut update = Document::with_capacity(1);
                update.insert("$set", self.write_entity(tracker, entry, PropertyFilter::Modified)?);
                WriteOperation::Update { filter, update }
            }
            EntityState::Deleted => WriteOperation::Delete {
                filter: self.where_filter(tracker, entry, &entity)?,
            },
            state @ (EntityState::Unchanged | EntityState::Detached) => {
                trace!(%entry, ?state, "nothing to write");
                return Ok(None);
            }
        };
        debug!(
            %entry,
            collection = entity.collection(),
            operation = operation.kind(),
            payload = %self.payload(&operation),
            "write operation"
        );
        Ok(Some(DocumentUpdate {
            entry,
            collection: entity.collection().to_owned(),
            operation,
        }))
    }

    fn payload(&self, operation: &WriteOperation) -> String {
        if !self.options.log_sensitive_data {
            return "?".to_owned();
        }
        let mode = self.options.log_text_mode;
        match operation {
            WriteOperation::Insert(doc) => to_text(doc, mode),
            WriteOperation::Delete { filter } => to_text(filter, mode),
            WriteOperation::Update { filter, update } => {
                format!("{} {}", to_text(filter, mode), to_text(update, mode))
            }
        }
    }

    fn set_store_generated_values<T>(
        &self,
        tracker: &mut T,
        entry: EntryId,
        entity: &EntityType,
    ) -> Result<(), MappingError>
    where
        T: ChangeTracker + ?Sized,
    {
        for property in entity.properties() {
            if tracker.has_temporary_value(entry, property) {
                let value = tracker.current_value(entry, property);
                tracker.set_store_generated_value(entry, property, value);
            }
            if property.is_row_version() {
                let next = next_row_version(property, &tracker.current_value(entry, property))?;
                tracker.set_store_generated_value(entry, property, next);
            }
        }
        Ok(())
    }

    fn where_filter<T>(&self, tracker: &T, entry: EntryId, entity: &EntityType) -> Result<Document, MappingError>
    where
        T: ChangeTracker + ?Sized,
    {
        if !entity.has_primary_key() {
            return Err(MappingError::MissingPrimaryKey(entity.name().to_owned()));
        }
        let mut keys = Document::new();
        self.write_key_properties(tracker, entry, entity, &mut keys)?;
        let mut clauses: Vec<(String, Value)> = keys.into_iter().collect();
        for token in entity.concurrency_tokens().filter(|t| !t.element_name().is_empty()) {
            let value = self.serialize(token, &tracker.original_value(entry, token))?;
            clauses.push(nest(token.element_path(), value));
        }
        Ok(and_combine(clauses))
    }

    fn write_entity<T>(&self, tracker: &mut T, entry: EntryId, filter: PropertyFilter) -> Result<Document, MappingError>
    where
        T: ChangeTracker + ?Sized,
    {
        let entity = tracker.entity_type(entry);
        let mut doc = Document::new();
        self.write_key_properties(tracker, entry, &entity, &mut doc)?;

        for property in entity.properties() {
            if property.is_primary_key() || property.element_name().is_empty() {
                continue;
            }
            let include = match filter {
                PropertyFilter::All => true,
                PropertyFilter::Modified => property.is_row_version() || tracker.is_modified(entry, property),
            };
            if include {
                let value = self.serialize(property, &tracker.current_value(entry, property))?;
                doc.insert(property.element_name(), value);
            }
        }

        if filter == PropertyFilter::All {
            if let Some(discriminator) = entity.discriminator() {
                doc.insert(discriminator.element_name(), discriminator.value().clone());
            }
        }

        for navigation in entity.navigations() {
            if let Some(value) = self.write_navigation(tracker, entry, navigation)? {
                doc.insert(navigation.element_name(), value);
            }
        }
        Ok(doc)
    }

    fn write_key_properties<T>(
        &self,
        tracker: &T,
        entry: EntryId,
        entity: &EntityType,
        doc: &mut Document,
    ) -> Result<(), MappingError>
    where
        T: ChangeTracker + ?Sized,
    {
        for key in entity.key_properties().filter(|p| !p.is_owned_type_key()) {
            let value = self.serialize(key, &tracker.current_value(entry, key))?;
            let (last, parents) = match key.element_path().split_last() {
                Some(split) => split,
                None => continue,
            };
            let parent = doc.document_at_mut(parents).ok_or_else(|| MappingError::InvalidValue {
                ty: entity.name().to_owned(),
                value: format!("element path '{}' crosses a non-document field", key.element_path().join(".")),
            })?;
            parent.insert(last.clone(), value);
        }
        Ok(())
    }

    /// The navigation's field value, or `None` when the field is left out.
    fn write_navigation<T>(
        &self,
        tracker: &mut T,
        entry: EntryId,
        navigation: &Navigation,
    ) -> Result<Option<Value>, MappingError>
    where
        T: ChangeTracker + ?Sized,
    {
        let current = tracker.navigation_value(entry, navigation);
        if !navigation.is_collection() {
            return match current {
                NavigationValue::Null => Ok(Some(Value::Null)),
                NavigationValue::Reference(owned) => {
                    Ok(Some(Value::Document(self.write_entity(tracker, owned, PropertyFilter::All)?)))
                }
                NavigationValue::Collection(_) => Err(shape_error(navigation, "a collection")),
            };
        }

        let elements = match &current {
            NavigationValue::Reference(_) => return Err(shape_error(navigation, "a single entry")),
            NavigationValue::Collection(collection) if !collection.entries.is_empty() => collection.entries.clone(),
            empty => {
                let original = tracker.original_navigation_value(entry, navigation);
                if empty.same_reference(&original) {
                    trace!(%entry, navigation = navigation.name(), "empty collection unchanged");
                    return Ok(None);
                }
                return Ok(Some(match empty {
                    NavigationValue::Null => Value::Null,
                    _ => Value::Array(Vec::new()),
                }));
            }
        };

        if !ordinals::reconcile(tracker, navigation.target().ordinal_key(), &elements) {
            trace!(%entry, navigation = navigation.name(), "owned collection unchanged");
            return Ok(None);
        }
        let mut items = Vec::with_capacity(elements.len());
        for element in elements {
            items.push(Value::Document(self.write_entity(tracker, element, PropertyFilter::All)?));
        }
        Ok(Some(Value::Array(items)))
    }

    fn serialize(&self, property: &Property, value: &NativeValue) -> Result<Value, MappingError> {
        self.resolver.property_serializer(property)?.serialize(value)
    }
}

/// `(path[0], {path[1]: {...: value}})`.
fn nest(path: &[String], value: Value) -> (String, Value) {
    match path.split_first() {
        Some((head, rest)) if !rest.is_empty() => {
            let (name, inner) = nest(rest, value);
            let mut doc = Document::with_capacity(1);
            doc.insert(name, inner);
            (head.clone(), Value::Document(doc))
        }
        Some((head, _)) => (head.clone(), value),
        None => (String::new(), value),
    }
}

fn shape_error(navigation: &Navigation, found: &str) -> MappingError {
    let expected = if navigation.is_collection() { "collection" } else { "single" };
    MappingError::NavigationShape(format!(
        "{expected} navigation '{}' holds {found}",
        navigation.name()
    ))
}

/// Current version plus one; a null version starts at 1.
fn next_row_version(property: &Property, current: &NativeValue) -> Result<NativeValue, MappingError> {
    let invalid = || MappingError::InvalidRowVersion(property.name().to_owned());
    let next = match current {
        NativeValue::Null => 1,
        other => other.as_i64().and_then(|v| v.checked_add(1)).ok_or_else(invalid)?,
    };
    match property.static_type().underlying() {
        StaticType::I32 => i32::try_from(next).map(NativeValue::I32).map_err(|_| invalid()),
        StaticType::I64 => Ok(NativeValue::I64(next)),
        StaticType::U32 => u32::try_from(next).map(NativeValue::U32).map_err(|_| invalid()),
        StaticType::U64 => u64::try_from(next).map(NativeValue::U64).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use docmap_bson::doc;

    use super::*;
    use crate::metadata::PropertyBuilder;

    #[test]
    fn nest_builds_inner_documents() {
        let path = vec!["_id".to_owned(), "a".to_owned()];
        assert_eq!(
            nest(&path, Value::Int32(1)),
            ("_id".to_owned(), Value::Document(doc! { "a" => 1 }))
        );
    }

    #[test]
    fn row_versions_count_up_from_one() {
        let p = PropertyBuilder::new("Version", StaticType::nullable(StaticType::I32))
            .row_version()
            .build("Version".into(), vec!["Version".into()], false);
        assert_eq!(next_row_version(&p, &NativeValue::Null).unwrap(), NativeValue::I32(1));
        assert_eq!(next_row_version(&p, &NativeValue::I32(4)).unwrap(), NativeValue::I32(5));
        assert_eq!(
            next_row_version(&p, &NativeValue::I32(i32::MAX)).unwrap_err(),
            MappingError::InvalidRowVersion("Version".into())
        );
        assert!(next_row_version(&p, &NativeValue::from("x")).is_err());
    }
}
