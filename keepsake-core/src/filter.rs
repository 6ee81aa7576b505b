//! Equality filters for listing documents.
//!
//! A [`Filter`] is an ordered mapping of field name to exact-match value. A document matches
//! when every listed field equals its value (logical AND). An empty filter matches everything.
//! Range, partial and existence predicates are deliberately not expressible.
//!
//! ```ignore
//! use keepsake::filter::Filter;
//!
//! let favorites = Filter::new().eq("favorite", true);
//! let maybe = Filter::new().eq_opt("favorite", query.favorites);
//! ```

use bson::{Bson, Document as BsonDocument};

/// A conjunction of field equality constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Vec<(String, Bson)>,
}

impl Filter {
    /// Creates an empty filter that matches every document.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Requires `field` to equal `value` exactly.
    ///
    /// Constraining the same field twice keeps only the latest value.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        let field = field.into();
        let value = value.into();

        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((field, value)),
        }

        self
    }

    /// Requires `field` to equal `value` when a value is given; leaves the field
    /// unconstrained otherwise.
    ///
    /// This is how optional query parameters become filters: an absent parameter never
    /// turns into a match on `null`.
    pub fn eq_opt<V: Into<Bson>>(self, field: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    /// Returns `true` if the filter has no constraints.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of constrained fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns the value a field is constrained to, if any.
    pub fn get(&self, field: &str) -> Option<&Bson> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Iterates over the constraints in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bson)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Renders the filter as a BSON document of `field: value` pairs.
    pub fn to_document(&self) -> BsonDocument {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Filter
where
    K: Into<String>,
    V: Into<Bson>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Filter::new(), |filter, (field, value)| filter.eq(field, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_empty_filter() {
        let filter = Filter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.to_document(), doc! {});
    }

    #[test]
    fn test_eq_replaces_existing_field() {
        let filter = Filter::new()
            .eq("favorite", true)
            .eq("uploader", "A")
            .eq("favorite", false);

        assert_eq!(filter.len(), 2);
        assert_eq!(filter.get("favorite"), Some(&Bson::Boolean(false)));
        assert_eq!(filter.to_document(), doc! { "favorite": false, "uploader": "A" });
    }

    #[test]
    fn test_eq_opt_omits_absent_values() {
        let filter = Filter::new().eq_opt("favorite", None::<bool>);
        assert!(filter.is_empty());
        assert!(filter.get("favorite").is_none());

        let filter = Filter::new().eq_opt("favorite", Some(true));
        assert_eq!(filter.get("favorite"), Some(&Bson::Boolean(true)));
    }

    #[test]
    fn test_collect_from_pairs() {
        let filter: Filter = vec![("author", "A"), ("title", "Dinner")].into_iter().collect();
        let fields: Vec<_> = filter.iter().map(|(name, _)| name).collect();
        assert_eq!(fields, vec!["author", "title"]);
    }
}
