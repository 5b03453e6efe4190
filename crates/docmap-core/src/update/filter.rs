use std::collections::HashSet;

use docmap_bson::{Document, Value};

/// AND-combines equality clauses: a flat document when every field name is
/// distinct, `{"$and": [{..}, ..]}` otherwise.
pub(crate) fn and_combine(clauses: Vec<(String, Value)>) -> Document {
    let distinct = {
        let mut seen = HashSet::with_capacity(clauses.len());
        clauses.iter().all(|(name, _)| seen.insert(name.as_str()))
    };
    if distinct {
        return clauses.into_iter().collect();
    }
    let terms = clauses
        .into_iter()
        .map(|(name, value)| {
            let mut term = Document::with_capacity(1);
            term.insert(name, value);
            Value::Document(term)
        })
        .collect::<Vec<_>>();
    let mut filter = Document::with_capacity(1);
    filter.insert("$and", Value::Array(terms));
    filter
}

#[cfg(test)]
mod tests {
    use docmap_bson::doc;

    use super::*;

    #[test]
    fn distinct_names_stay_flat() {
        let filter = and_combine(vec![("_id".into(), Value::Int32(7)), ("Version".into(), Value::Int32(3))]);
        assert_eq!(filter, doc! { "_id" => 7, "Version" => 3 });
    }

    #[test]
    fn repeated_names_use_and() {
        let filter = and_combine(vec![("_id".into(), Value::Int32(7)), ("_id".into(), Value::Int32(6))]);
        assert_eq!(
            filter,
            doc! { "$and" => vec![Value::from(doc! { "_id" => 7 }), Value::from(doc! { "_id" => 6 })] }
        );
    }
}
