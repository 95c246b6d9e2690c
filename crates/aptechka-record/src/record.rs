use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{RecordError, Result};
use crate::value::{json_kind, Value};

/// Ordered mapping of field names to scalar values.
///
/// Insertion order is preserved. Re-inserting an existing key replaces the
/// value in place. Presence of a key is meaningful on its own: a key holding
/// [`Value::Null`] is distinct from an absent key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Insert a field, returning the previous value if the key existed.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Returns true if the key is present, whatever its value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(name, _)| name == key)?;
        Some(self.fields.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Build a record from a parsed JSON object.
    pub fn from_json(document: &serde_json::Value) -> Result<Self> {
        let object = match document {
            serde_json::Value::Object(object) => object,
            other => {
                return Err(RecordError::NotAnObject {
                    found: json_kind(other),
                })
            }
        };

        let mut record = Self::with_capacity(object.len());
        for (key, value) in object {
            let value = Value::from_json(value).ok_or_else(|| RecordError::NestedValue {
                field: key.clone(),
                found: json_kind(value),
            })?;
            record.insert(key.clone(), value);
        }
        Ok(record)
    }

    /// Parse JSON text into a record.
    pub fn from_json_slice(text: &[u8]) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_slice(text)?;
        Self::from_json(&document)
    }

    /// Render the record as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let object = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        serde_json::Value::Object(object)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn insert_preserves_order_and_replaces_in_place() {
        let mut record = Record::new();
        record.insert("b", 1);
        record.insert("a", 2);
        assert_eq!(record.insert("b", 3), Some(Value::Integer(1)));

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(record.get("b"), Some(&Value::Integer(3)));
    }

    #[test]
    fn null_value_is_still_present() {
        let mut record = Record::new();
        record.insert("created_at", Value::Null);
        assert!(record.contains_key("created_at"));
        assert!(!record.contains_key("updated_at"));
    }

    #[test]
    fn remove_returns_value() {
        let mut record: Record = [("x", 1), ("y", 2)].into_iter().collect();
        assert_eq!(record.remove("x"), Some(Value::Integer(1)));
        assert_eq!(record.remove("x"), None);
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn from_json_object() {
        let record =
            Record::from_json(&json!({"pharmacy_id": "p1", "quantity": 3, "notes": null}))
                .unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("quantity"), Some(&Value::Integer(3)));
        assert_eq!(record.get("notes"), Some(&Value::Null));
    }

    #[test]
    fn json_text_keeps_key_order() {
        let record =
            Record::from_json_slice(br#"{"pharmacy_id":"p1","name":"X","id":7}"#).unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["pharmacy_id", "name", "id"]);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"pharmacy_id":"p1","name":"X","id":7}"#
        );
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(matches!(
            Record::from_json(&json!([1, 2, 3])),
            Err(RecordError::NotAnObject { found: "array" })
        ));
        assert!(matches!(
            Record::from_json(&json!("text")),
            Err(RecordError::NotAnObject { found: "string" })
        ));
    }

    #[test]
    fn from_json_rejects_nested_values() {
        let result = Record::from_json(&json!({"tags": ["a"]}));
        assert!(matches!(
            result,
            Err(RecordError::NestedValue { ref field, found: "array" }) if field == "tags"
        ));
    }

    #[test]
    fn from_json_slice_reports_invalid_json() {
        assert!(matches!(
            Record::from_json_slice(b"{not json"),
            Err(RecordError::Json(_))
        ));
    }

    #[test]
    fn serialize_and_to_json_agree() {
        let record: Record = [("name", Value::from("X")), ("id", Value::from(7))]
            .into_iter()
            .collect();
        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, r#"{"name":"X","id":7}"#);
        assert_eq!(record.to_json(), json!({"name": "X", "id": 7}));
    }
}
