use std::collections::BTreeMap;
use std::collections::btree_map;

use serde_json::{Map, Value as JsonValue, json};

use crate::error::{PersonioError, Result};

/// Key prefix reserved for custom fields.
pub const DYNAMIC_PREFIX: &str = "dynamic_";

/// A custom field that is not part of a resource's mapping table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DynamicAttr {
    /// Numeric id taken from the `dynamic_<id>` key.
    pub field_id: i64,
    /// Human readable label reported by the API.
    pub label: String,
    /// Field value as text.
    pub value: String,
}

impl DynamicAttr {
    /// Custom field `field_id` with its display label and value.
    pub fn new(field_id: i64, label: impl Into<String>, value: impl Into<String>) -> Self {
        DynamicAttr {
            field_id,
            label: label.into(),
            value: value.into(),
        }
    }

    /// True if `key` uses the reserved custom field prefix.
    pub fn is_dynamic_key(key: &str) -> bool {
        key.starts_with(DYNAMIC_PREFIX)
    }

    /// Parse a `dynamic_<id>` entry of the form `{"label": .., "value": ..}`.
    ///
    /// Non-string values are kept as their JSON text and `null` becomes an
    /// empty string.
    pub fn from_entry(key: &str, entry: &JsonValue) -> Result<Self> {
        let field_id = key
            .strip_prefix(DYNAMIC_PREFIX)
            .and_then(|id| id.parse::<i64>().ok())
            .ok_or_else(|| PersonioError::MalformedFieldKey(key.to_string()))?;

        let entry = entry
            .as_object()
            .ok_or_else(|| PersonioError::malformed_entry(key, "expected an object"))?;

        let label = match entry.get("label") {
            Some(JsonValue::String(label)) => label.clone(),
            Some(JsonValue::Null) | None => String::new(),
            Some(other) => {
                return Err(PersonioError::malformed_entry(
                    key,
                    format!("label must be a string, found {}", other),
                ));
            }
        };

        let value = match entry.get("value") {
            Some(JsonValue::String(value)) => value.clone(),
            Some(JsonValue::Null) => String::new(),
            Some(other) => other.to_string(),
            None => return Err(PersonioError::malformed_entry(key, "missing 'value'")),
        };

        Ok(DynamicAttr {
            field_id,
            label,
            value,
        })
    }

    /// Payload key of this attribute.
    pub fn key(&self) -> String {
        format!("{}{}", DYNAMIC_PREFIX, self.field_id)
    }

    /// Wire entry without the key.
    pub fn to_entry(&self) -> JsonValue {
        json!({ "label": self.label, "value": self.value })
    }

    /// Collect every custom field of a payload, ignoring other keys.
    pub fn from_attributes(payload: &Map<String, JsonValue>) -> Result<DynamicAttrs> {
        payload
            .iter()
            .filter(|(key, _)| Self::is_dynamic_key(key))
            .map(|(key, entry)| Self::from_entry(key, entry))
            .collect()
    }

    /// Encode custom fields back into payload entries.
    pub fn to_attributes(attributes: &DynamicAttrs) -> Map<String, JsonValue> {
        attributes
            .iter()
            .map(|attr| (attr.key(), attr.to_entry()))
            .collect()
    }
}

/// Custom fields of one resource, unique per field id and ordered by it.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DynamicAttrs(BTreeMap<i64, DynamicAttr>);

impl DynamicAttrs {
    /// Empty set.
    pub fn new() -> Self {
        DynamicAttrs(BTreeMap::new())
    }

    /// Insert `attr`, replacing and returning any attribute with the same id.
    pub fn insert(&mut self, attr: DynamicAttr) -> Option<DynamicAttr> {
        self.0.insert(attr.field_id, attr)
    }

    /// Attribute with the given id.
    pub fn get(&self, field_id: i64) -> Option<&DynamicAttr> {
        self.0.get(&field_id)
    }

    /// Remove and return the attribute with the given id.
    pub fn remove(&mut self, field_id: i64) -> Option<DynamicAttr> {
        self.0.remove(&field_id)
    }

    /// Number of custom fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no custom fields are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Attributes in ascending field id order.
    pub fn iter(&self) -> btree_map::Values<'_, i64, DynamicAttr> {
        self.0.values()
    }
}

impl FromIterator<DynamicAttr> for DynamicAttrs {
    fn from_iter<I: IntoIterator<Item = DynamicAttr>>(iter: I) -> Self {
        let mut attrs = DynamicAttrs::new();
        for attr in iter {
            attrs.insert(attr);
        }
        attrs
    }
}

impl<'a> IntoIterator for &'a DynamicAttrs {
    type Item = &'a DynamicAttr;
    type IntoIter = btree_map::Values<'a, i64, DynamicAttr>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
