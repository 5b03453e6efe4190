//! Ordered documents.

use indexmap::map::{IntoIter, Iter};
use indexmap::IndexMap;

use crate::value::Value;

/// Name of the element holding a document's identity.
pub const ID_FIELD: &str = "_id";

/// An ordered mapping from field name to [`Value`].
///
/// Field names are unique. Insertion order is preserved and is part of the
/// document's identity: two documents with the same fields in a different
/// order are not equal, and they render to different text.
#[derive(Debug, Clone, Default)]
pub struct Document {
    fields: IndexMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Inserts or replaces a field. A replaced field keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    pub fn get_document(&self, name: &str) -> Option<&Document> {
        self.get(name).and_then(Value::as_document)
    }

    /// Looks up a value by a path of field names.
    ///
    /// Returns `None` when any step is missing or when an intermediate value
    /// is not a document. An empty path yields `None`: a document is not a
    /// value of itself.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for step in parents {
            current = current.get(step.as_ref())?.as_document()?;
        }
        current.get(last.as_ref())
    }

    /// Mutable document at `path`, creating empty documents for missing
    /// steps. Returns `None` when a step exists but is not a document.
    pub fn document_at_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Document> {
        let mut current = self;
        for step in path {
            let slot = current
                .fields
                .entry(step.as_ref().to_owned())
                .or_insert_with(|| Value::Document(Document::new()));
            current = match slot {
                Value::Document(doc) => doc,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Removes a field, shifting later fields down to keep order.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len() && self.fields.iter().eq(other.fields.iter())
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        doc.extend(iter);
        doc
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Document {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Builds a [`Document`] from `name => value` pairs.
///
/// ```
/// use docmap_bson::{doc, Value};
///
/// let d = doc! { "a" => 1, "b" => "x" };
/// assert_eq!(d.get("a"), Some(&Value::Int32(1)));
/// ```
#[macro_export]
macro_rules! doc {
    () => { $crate::Document::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut doc = $crate::Document::new();
        $( doc.insert($name, $value); )+
        doc
    }};
}
