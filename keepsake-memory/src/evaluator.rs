//! Equality filter evaluation for in-memory document matching.
//!
//! Matching follows MongoDB's equality semantics closely enough for the service's needs:
//! numbers compare by value regardless of BSON width, a `null` constraint also matches a
//! missing field, and a scalar constraint matches an array field containing it.

use std::collections::HashMap;
use bson::{Bson, Document as BsonDocument, datetime::DateTime, oid::ObjectId};

use keepsake_core::filter::Filter;


/// Type-erased, comparable representation of BSON values.
///
/// Numeric types are normalized to f64 so that `Int32(1)`, `Int64(1)` and `Double(1.0)`
/// compare equal.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (all integers and floats normalized to f64)
    Number(f64),
    /// DateTime value
    DateTime(DateTime),
    /// ObjectId value
    ObjectId(ObjectId),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Any other BSON value; never equal to anything
    Opaque,
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::ObjectId(value) => Comparable::ObjectId(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            _ => Comparable::Opaque,
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}


/// Decides whether stored documents satisfy a [`Filter`].
pub(crate) struct DocumentEvaluator<'a> {
    document: &'a BsonDocument,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a BsonDocument) -> Self {
        Self { document }
    }

    /// Returns `true` if every constraint in `filter` holds for this document.
    pub fn matches(&self, filter: &Filter) -> bool {
        filter
            .iter()
            .all(|(field, value)| self.field_equals(field, value))
    }

    fn field_equals(&self, field: &str, expected: &Bson) -> bool {
        let expected = Comparable::from(expected);

        match self.document.get(field) {
            Some(actual) => match Comparable::from(actual) {
                Comparable::Array(items) if !matches!(expected, Comparable::Array(_)) => {
                    items.iter().any(|item| *item == expected)
                }
                actual => actual == expected,
            },
            None => expected == Comparable::Null,
        }
    }

    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a BsonDocument>,
        filter: &Filter,
    ) -> Vec<BsonDocument> {
        documents
            .into_iter()
            .filter(|doc| DocumentEvaluator::new(doc).matches(filter))
            .cloned()
            .collect::<Vec<_>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_empty_filter_matches_everything() {
        let doc = doc! { "title": "Heat" };
        assert!(DocumentEvaluator::new(&doc).matches(&Filter::new()));
    }

    #[test]
    fn test_all_constraints_must_hold() {
        let doc = doc! { "uploader": "A", "favorite": true };

        assert!(DocumentEvaluator::new(&doc).matches(&Filter::new().eq("uploader", "A").eq("favorite", true)));
        assert!(!DocumentEvaluator::new(&doc).matches(&Filter::new().eq("uploader", "A").eq("favorite", false)));
    }

    #[test]
    fn test_numbers_compare_across_widths() {
        let doc = doc! { "year": 1995_i64 };

        assert!(DocumentEvaluator::new(&doc).matches(&Filter::new().eq("year", 1995_i32)));
        assert!(DocumentEvaluator::new(&doc).matches(&Filter::new().eq("year", 1995.0_f64)));
        assert!(!DocumentEvaluator::new(&doc).matches(&Filter::new().eq("year", 1996_i32)));
    }

    #[test]
    fn test_no_type_coercion_between_bool_and_string() {
        let doc = doc! { "favorite": "true" };
        assert!(!DocumentEvaluator::new(&doc).matches(&Filter::new().eq("favorite", true)));
    }

    #[test]
    fn test_null_matches_missing_field() {
        let doc = doc! { "title": "Heat" };

        assert!(DocumentEvaluator::new(&doc).matches(&Filter::new().eq("artist", Bson::Null)));
        assert!(!DocumentEvaluator::new(&doc).matches(&Filter::new().eq("artist", "Neil Young")));
    }

    #[test]
    fn test_scalar_matches_array_member() {
        let doc = doc! { "tags": ["beach", "sunset"] };

        assert!(DocumentEvaluator::new(&doc).matches(&Filter::new().eq("tags", "sunset")));
        assert!(!DocumentEvaluator::new(&doc).matches(&Filter::new().eq("tags", "city")));
    }

    #[test]
    fn test_filter_documents_keeps_order() {
        let docs = vec![
            doc! { "n": 1, "favorite": true },
            doc! { "n": 2, "favorite": false },
            doc! { "n": 3, "favorite": true },
        ];

        let matched = DocumentEvaluator::filter_documents(&docs, &Filter::new().eq("favorite", true));
        let ns: Vec<_> = matched.iter().map(|d| d.get_i32("n").unwrap()).collect();
        assert_eq!(ns, vec![1, 3]);
    }
}
