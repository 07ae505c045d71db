//! Named-field records.
//!
//! [`Record`] is what readers produce: an [`IndexMap`]-backed mapping whose
//! iteration order follows the table's field-name list. [`FieldLookup`] is what
//! writers consume, so plain `HashMap`s, `BTreeMap`s and `IndexMap`s can be
//! written directly alongside records.
//!
//! ```rust
//! use compressed_sheets::{Record, Value};
//!
//! let mut record = Record::new();
//! record.insert("name", "Alice");
//! record.insert("age", 30);
//!
//! assert_eq!(record.get("age").and_then(Value::as_i64), Some(30));
//! let keys: Vec<_> = record.keys().map(String::as_str).collect();
//! assert_eq!(keys, vec!["name", "age"]);
//! ```

use crate::value::Value;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};

/// An insertion-ordered mapping from field name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(IndexMap<String, Value>);

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Record(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Record(IndexMap::with_capacity(capacity))
    }

    /// Inserts a field, returning the previous value if the name was present.
    ///
    /// A re-inserted name keeps its original position.
    pub fn insert<K, V>(&mut self, field: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.0.insert(field.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.0.get_mut(field)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Consumes the record, returning every value as its stored text.
    #[must_use]
    pub fn into_text_map(self) -> IndexMap<String, String> {
        self.0.into_iter().map(|(k, v)| (k, v.into_text())).collect()
    }
}

impl std::ops::Index<&str> for Record {
    type Output = Value;

    fn index(&self, field: &str) -> &Value {
        &self.0[field]
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter())
    }
}

impl From<Record> for HashMap<String, Value> {
    fn from(record: Record) -> Self {
        record.0.into_iter().collect()
    }
}

impl From<Record> for IndexMap<String, Value> {
    fn from(record: Record) -> Self {
        record.0
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Record(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Rejects empty field-name lists and repeated names.
pub(crate) fn check_fieldnames(fieldnames: &[String]) -> crate::Result<()> {
    if fieldnames.is_empty() {
        return Err(crate::Error::EmptyFieldNames);
    }
    let mut seen = HashSet::with_capacity(fieldnames.len());
    for name in fieldnames {
        if !seen.insert(name.as_str()) {
            return Err(crate::Error::DuplicateField {
                field: name.clone(),
            });
        }
    }
    Ok(())
}

/// Source of field text for [`TableWriter::writerow`](crate::TableWriter::writerow).
///
/// Keys not asked for are ignored.
pub trait FieldLookup {
    /// Returns the text to store for `field`, or `None` if the field is absent.
    fn field_text(&self, field: &str) -> Option<String>;
}

impl FieldLookup for Record {
    fn field_text(&self, field: &str) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }
}

impl<K, V, H> FieldLookup for HashMap<K, V, H>
where
    K: Borrow<str> + Hash + Eq,
    V: Display,
    H: BuildHasher,
{
    fn field_text(&self, field: &str) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }
}

impl<K, V> FieldLookup for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Display,
{
    fn field_text(&self, field: &str) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }
}

impl<K, V, H> FieldLookup for IndexMap<K, V, H>
where
    K: Borrow<str> + Hash + Eq,
    V: Display,
    H: BuildHasher,
{
    fn field_text(&self, field: &str) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }
}

impl<T: FieldLookup + ?Sized> FieldLookup for &T {
    fn field_text(&self, field: &str) -> Option<String> {
        (**self).field_text(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_follows_insertion() {
        let record: Record = [("z", "1"), ("a", "2"), ("m", "3")].into_iter().collect();
        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(record["a"], "2");
    }

    #[test]
    fn test_lookup_across_map_types() {
        let mut hash = HashMap::new();
        hash.insert("n", 10);
        assert_eq!(hash.field_text("n").as_deref(), Some("10"));
        assert_eq!(hash.field_text("missing"), None);

        let mut btree = BTreeMap::new();
        btree.insert("s".to_string(), "text");
        assert_eq!(btree.field_text("s").as_deref(), Some("text"));

        let mut record = Record::new();
        record.insert("f", 1.5);
        assert_eq!((&record).field_text("f").as_deref(), Some("1.5"));
    }

    #[test]
    fn test_serialize_preserves_order() {
        let record: Record = [("b", Value::from(1)), ("a", Value::from("x"))]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"b":1,"a":"x"}"#);
    }

    #[test]
    fn test_check_fieldnames() {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert!(check_fieldnames(&names(&["a", "b", ""])).is_ok());
        assert!(matches!(
            check_fieldnames(&[]),
            Err(crate::Error::EmptyFieldNames)
        ));
        assert!(matches!(
            check_fieldnames(&names(&["a", "b", "a"])),
            Err(crate::Error::DuplicateField { ref field }) if field == "a"
        ));
    }

    #[test]
    fn test_into_text_map() {
        let record: Record = [("n", Value::from(7)), ("b", Value::from(true))]
            .into_iter()
            .collect();
        let text = record.into_text_map();
        assert_eq!(text["n"], "7");
        assert_eq!(text["b"], "true");
    }
}
