//! Field whitelist used by the parser.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Kind;

/// The fields an expression may reference, and the kind of each.
///
/// A schema is the parser's whitelist: a clause naming a field outside the
/// schema fails with `UNKNOWN_FIELD`, and literals are typed by the kind
/// recorded here. It serializes as a plain map, so it can live in a config
/// file:
///
/// ```
/// use sieve::{Kind, Schema};
///
/// let schema: Schema = serde_json::from_str(r#"{"age": "u8", "name": "string"}"#).unwrap();
/// assert_eq!(schema.get("age"), Some(Kind::U8));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, Kind>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Schema::default()
    }

    /// Adds a field, builder style.
    pub fn with_field(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.insert(name, kind);
        self
    }

    /// Adds or replaces a field, returning the previous kind.
    pub fn insert(&mut self, name: impl Into<String>, kind: Kind) -> Option<Kind> {
        self.fields.insert(name.into(), kind)
    }

    /// Returns the kind of a field.
    pub fn get(&self, name: &str) -> Option<Kind> {
        self.fields.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Kind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), *kind))
    }
}

impl<K: Into<String>> FromIterator<(K, Kind)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, Kind)>>(iter: I) -> Self {
        Schema {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_lookup() {
        let schema = Schema::new()
            .with_field("b", Kind::String)
            .with_field("a", Kind::I64);
        assert_eq!(schema.len(), 2);
        assert!(schema.contains("a"));
        assert_eq!(schema.get("b"), Some(Kind::String));
        assert_eq!(schema.get("c"), None);

        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn insert_replaces() {
        let mut schema = Schema::new();
        assert_eq!(schema.insert("a", Kind::I8), None);
        assert_eq!(schema.insert("a", Kind::U8), Some(Kind::I8));
        assert_eq!(schema.get("a"), Some(Kind::U8));
    }

    #[test]
    fn collects_from_pairs() {
        let schema: Schema = [("x", Kind::Bool), ("y", Kind::F64)].into_iter().collect();
        assert_eq!(schema.get("x"), Some(Kind::Bool));
        assert!(!schema.is_empty());
    }
}
