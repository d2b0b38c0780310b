use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use log::Level;
use serde_json::{Map, Value as JsonValue, json};

use crate::error::{PersonioError, Result};
use crate::logging::log_once_keyed;
use crate::models::dynamic::{DynamicAttr, DynamicAttrs};
use crate::models::mapping::FieldMapping;
use crate::models::schema::ResourceSchema;
use crate::models::value::{FromValue, Value};

/// Wire form of a resource: API field name to `{"label": .., "value": ..}`.
pub type Payload = Map<String, JsonValue>;

/// Decoded resource of any type, with values held in mapping order.
///
/// Equality, ordering and hashing all use the same projection: the mapped
/// values in declaration order, then the custom fields by id, then the type
/// tag. Records of different types are therefore never equal.
#[derive(Clone)]
pub struct Record {
    schema: &'static ResourceSchema,
    values: Vec<Option<Value>>,
    dynamic: DynamicAttrs,
}

/// One payload entry, with or without the label wrapper.
enum Entry<'a> {
    Wrapped {
        label: Option<&'a str>,
        value: &'a JsonValue,
    },
    Bare(&'a JsonValue),
}

impl<'a> Entry<'a> {
    fn read(key: &str, raw: &'a JsonValue) -> Result<Self> {
        let JsonValue::Object(entry) = raw else {
            return Ok(Entry::Bare(raw));
        };
        let Some(value) = entry.get("value") else {
            return Ok(Entry::Bare(raw));
        };

        let label = match entry.get("label") {
            Some(JsonValue::String(label)) => Some(label.as_str()),
            Some(JsonValue::Null) | None => None,
            Some(other) => {
                return Err(PersonioError::malformed_entry(
                    key,
                    format!("label must be a string or null, found {}", other),
                ));
            }
        };
        Ok(Entry::Wrapped { label, value })
    }

    fn value(&self) -> &'a JsonValue {
        match self {
            Entry::Wrapped { value, .. } => value,
            Entry::Bare(value) => value,
        }
    }
}

/// Strip a `{"type": .., "attributes": {..}}` envelope if present.
fn unwrap_envelope(payload: &Payload) -> &Payload {
    match (payload.get("type"), payload.get("attributes")) {
        (Some(JsonValue::String(_)), Some(JsonValue::Object(attributes))) if payload.len() == 2 => {
            attributes
        }
        _ => payload,
    }
}

/// Dedup key of the unexpected-field warning; shared by every resource type.
pub fn unexpected_field_key(key: &str) -> String {
    format!("unexpected field '{}'", key)
}

impl Record {
    /// Empty record of the given schema.
    pub fn new(schema: &'static ResourceSchema) -> Self {
        Record {
            schema,
            values: vec![None; schema.mappings().len()],
            dynamic: DynamicAttrs::new(),
        }
    }

    /// Decode a payload against `schema`.
    ///
    /// Labels of wrapped entries go to the schema's label cache. Mapped fields
    /// are deserialized, `dynamic_<id>` keys become custom fields, and any other
    /// key is dropped with a warning logged once per key for the whole process,
    /// whichever resource type sees it first.
    pub fn decode(schema: &'static ResourceSchema, payload: &Payload) -> Result<Self> {
        let payload = unwrap_envelope(payload);
        let mut record = Record::new(schema);

        for (key, raw) in payload {
            let entry = Entry::read(key, raw)?;
            if let Entry::Wrapped { label, .. } = entry {
                schema.record_label(key, label);
            }

            if let Some(index) = schema.api_index(key) {
                record.values[index] = schema.mappings()[index].deserialize(entry.value())?;
            } else if DynamicAttr::is_dynamic_key(key) {
                record.dynamic.insert(DynamicAttr::from_entry(key, raw)?);
            } else {
                log_once_keyed(
                    Level::Warn,
                    &unexpected_field_key(key),
                    &format!("unexpected field '{}' in {}", key, schema.kind()),
                );
            }
        }

        Ok(record)
    }

    /// Encode the record, wrapping each present value with its cached label.
    ///
    /// Absent values are omitted entirely.
    pub fn to_payload(&self) -> Result<Payload> {
        let mut payload = Payload::new();

        for (mapping, value) in self.schema.mappings().iter().zip(&self.values) {
            let Some(value) = value else {
                continue;
            };
            let wire = mapping.serialize(value)?;
            let label = self.schema.label(mapping.api_field());
            payload.insert(
                mapping.api_field().to_string(),
                json!({ "label": label, "value": wire }),
            );
        }

        payload.extend(DynamicAttr::to_attributes(&self.dynamic));
        Ok(payload)
    }

    /// Type tag of the resource.
    pub fn kind(&self) -> &'static str {
        self.schema.kind()
    }

    /// Mapping table and label cache of this record's type.
    pub fn schema(&self) -> &'static ResourceSchema {
        self.schema
    }

    /// Value of a local field, if present.
    pub fn get(&self, local_field: &str) -> Option<&Value> {
        self.schema
            .local_index(local_field)
            .and_then(|index| self.values[index].as_ref())
    }

    /// Set or clear a local field.
    pub fn put(&mut self, local_field: &str, value: Option<Value>) {
        let index = self.schema.local_index(local_field);
        debug_assert!(
            index.is_some(),
            "{} has no local field '{}'",
            self.kind(),
            local_field
        );
        if let Some(index) = index {
            self.values[index] = value;
        }
    }

    /// Move a local field out, converted to `T`.
    pub fn take<T: FromValue>(&mut self, local_field: &str) -> Result<Option<T>> {
        let Some(index) = self.schema.local_index(local_field) else {
            return Ok(None);
        };
        self.values[index]
            .take()
            .map(|value| T::from_value(value, local_field))
            .transpose()
    }

    /// Mapped values paired with their mappings, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldMapping, Option<&Value>)> {
        self.schema
            .mappings()
            .iter()
            .zip(self.values.iter().map(Option::as_ref))
    }

    /// Custom fields.
    pub fn dynamic(&self) -> &DynamicAttrs {
        &self.dynamic
    }

    /// Custom fields, mutably.
    pub fn dynamic_mut(&mut self) -> &mut DynamicAttrs {
        &mut self.dynamic
    }

    /// Replace all custom fields.
    pub fn set_dynamic(&mut self, dynamic: DynamicAttrs) {
        self.dynamic = dynamic;
    }

    /// Move the custom fields out, leaving none.
    pub fn take_dynamic(&mut self) -> DynamicAttrs {
        std::mem::take(&mut self.dynamic)
    }

    /// Stable text of the equality projection; equal records share it.
    pub fn canonical_text(&self) -> String {
        let mut text = String::new();
        self.write_canonical(&mut text);
        text
    }

    pub(crate) fn write_canonical(&self, out: &mut String) {
        out.push('o');
        out.push_str(self.kind());
        out.push('(');
        for (index, value) in self.values.iter().enumerate() {
            if index > 0 {
                out.push(';');
            }
            match value {
                Some(value) => value.write_canonical(out),
                None => out.push('-'),
            }
        }
        out.push('|');
        for attr in &self.dynamic {
            out.push_str(&format!("{}:{:?}={:?};", attr.field_id, attr.label, attr.value));
        }
        out.push(')');
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct(self.kind());
        for (mapping, value) in self.fields() {
            if let Some(value) = value {
                debug.field(mapping.local_field(), value);
            }
        }
        if !self.dynamic.is_empty() {
            debug.field("dynamic", &self.dynamic);
        }
        debug.finish()
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.values
            .cmp(&other.values)
            .then_with(|| self.dynamic.cmp(&other.dynamic))
            .then_with(|| self.kind().cmp(other.kind()))
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_text().hash(state);
    }
}

/// A record only equals a [`Value::Object`] holding an equal record.
impl PartialEq<Value> for Record {
    fn eq(&self, other: &Value) -> bool {
        match other {
            Value::Object(record) => self == record,
            _ => false,
        }
    }
}

/// Values that are not objects are unordered relative to a record.
impl PartialOrd<Value> for Record {
    fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
        match other {
            Value::Object(record) => Some(self.cmp(record)),
            _ => None,
        }
    }
}
