use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Number, Value as JsonValue};

use crate::error::{PersonioError, Result};
use crate::models::record::Record;
use crate::models::resource::Resource;
use crate::models::schema::{ResourceSchema, schema};
use crate::models::value::Value;

/// Target type of a plain field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlainType {
    /// Text, sent as a JSON string.
    Text,
    /// Flag, sent as a JSON boolean.
    Boolean,
}

/// Target type of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericType {
    Integer,
    Float,
}

/// Handle to the schema of a nested resource type.
#[derive(Clone, Copy)]
pub struct ResourceRef {
    kind: &'static str,
    schema: fn() -> &'static ResourceSchema,
}

impl ResourceRef {
    /// Reference the registered schema of `T`.
    pub fn of<T: Resource>() -> Self {
        ResourceRef {
            kind: T::KIND,
            schema: schema::<T>,
        }
    }

    /// Type tag of the referenced resource.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Schema of the referenced resource, registered on first use.
    pub fn schema(&self) -> &'static ResourceSchema {
        (self.schema)()
    }
}

impl fmt::Debug for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourceRef").field(&self.kind).finish()
    }
}

/// How a field converts between its wire form and its local [`Value`].
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Stored as sent; encoded as its textual (or boolean) wire form.
    Plain(PlainType),
    /// Native JSON numbers are taken as the target type, numeric strings are parsed.
    Numeric(NumericType),
    /// Decodes timestamps, encodes the `YYYY-MM-DD` date only.
    Date,
    /// Nested label-wrapped resource.
    Object(ResourceRef),
    /// Ordered sequence of the inner kind.
    List(Box<FieldKind>),
}

impl FieldKind {
    /// Free text.
    pub fn text() -> Self {
        FieldKind::Plain(PlainType::Text)
    }

    /// True/false flag.
    pub fn boolean() -> Self {
        FieldKind::Plain(PlainType::Boolean)
    }

    /// Whole number.
    pub fn integer() -> Self {
        FieldKind::Numeric(NumericType::Integer)
    }

    /// Number with a fractional part.
    pub fn float() -> Self {
        FieldKind::Numeric(NumericType::Float)
    }

    /// Calendar date, sent as `YYYY-MM-DD`.
    pub fn date() -> Self {
        FieldKind::Date
    }

    /// Nested resource of type `T`.
    pub fn object<T: Resource>() -> Self {
        FieldKind::Object(ResourceRef::of::<T>())
    }

    /// List whose elements use `item`.
    pub fn list_of(item: FieldKind) -> Self {
        FieldKind::List(Box::new(item))
    }

    /// Convert a local value into its wire form.
    pub fn serialize(&self, field: &str, value: &Value) -> Result<JsonValue> {
        match (self, value) {
            (FieldKind::Plain(PlainType::Text), Value::String(s)) => {
                Ok(JsonValue::String(s.clone()))
            }
            (FieldKind::Plain(PlainType::Text), Value::Int(i)) => Ok(JsonValue::String(i.to_string())),
            (FieldKind::Plain(PlainType::Text), Value::Float(f)) => {
                Ok(JsonValue::String(f.to_string()))
            }
            (FieldKind::Plain(PlainType::Text), Value::Boolean(b)) => {
                Ok(JsonValue::String(b.to_string()))
            }
            (FieldKind::Plain(PlainType::Boolean), Value::Boolean(b)) => Ok(JsonValue::Bool(*b)),
            (FieldKind::Numeric(_), Value::Int(i)) => Ok(JsonValue::Number(Number::from(*i))),
            (FieldKind::Numeric(_), Value::Float(f)) => Number::from_f64(*f)
                .map(JsonValue::Number)
                .ok_or_else(|| PersonioError::invalid_value(field, "finite number", f)),
            (FieldKind::Date, Value::Date(d)) => {
                // Four-digit years only; the wire form is exactly `YYYY-MM-DD`.
                if !(0..=9999).contains(&d.year()) {
                    return Err(PersonioError::invalid_value(field, "date between years 0 and 9999", d));
                }
                Ok(JsonValue::String(d.format("%Y-%m-%d").to_string()))
            }
            (FieldKind::Object(target), Value::Object(record)) => {
                if record.kind() != target.kind() {
                    return Err(PersonioError::invalid_value(field, "nested resource", record.kind()));
                }
                Ok(JsonValue::Object(record.to_payload()?))
            }
            (FieldKind::List(item), Value::List(values)) => values
                .iter()
                .map(|value| item.serialize(field, value))
                .collect::<Result<Vec<_>>>()
                .map(JsonValue::Array),
            (kind, value) => Err(PersonioError::invalid_value(
                field,
                kind.expected(),
                value.type_name(),
            )),
        }
    }

    /// Convert a non-null wire value into its local form.
    pub fn deserialize(&self, field: &str, wire: &JsonValue) -> Result<Value> {
        match (self, wire) {
            (FieldKind::Plain(PlainType::Text), JsonValue::String(s)) => Ok(Value::String(s.clone())),
            (FieldKind::Plain(PlainType::Text), JsonValue::Number(n)) => {
                Ok(Value::String(n.to_string()))
            }
            (FieldKind::Plain(PlainType::Text), JsonValue::Bool(b)) => Ok(Value::String(b.to_string())),
            (FieldKind::Plain(PlainType::Boolean), JsonValue::Bool(b)) => Ok(Value::Boolean(*b)),
            (FieldKind::Numeric(target), JsonValue::Number(n)) => number_value(field, *target, n),
            (FieldKind::Numeric(target), JsonValue::String(s)) => parse_number(field, *target, s),
            (FieldKind::Date, JsonValue::String(s)) => parse_timestamp(s)
                .map(Value::Date)
                .ok_or_else(|| PersonioError::invalid_value(field, "ISO-8601 date", s)),
            (FieldKind::Object(target), JsonValue::Object(payload)) => {
                Record::decode(target.schema(), payload).map(Value::Object)
            }
            (FieldKind::List(item), JsonValue::Array(items)) => items
                .iter()
                .map(|wire| item.deserialize(field, wire))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            (kind, wire) => Err(PersonioError::invalid_value(field, kind.expected(), wire)),
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            FieldKind::Plain(PlainType::Text) => "text",
            FieldKind::Plain(PlainType::Boolean) => "boolean",
            FieldKind::Numeric(NumericType::Integer) => "integer",
            FieldKind::Numeric(NumericType::Float) => "number",
            FieldKind::Date => "date",
            FieldKind::Object(_) => "object",
            FieldKind::List(_) => "list",
        }
    }
}

/// Native number in the target's kind; `3` and `"3"` decode alike.
fn number_value(field: &str, target: NumericType, number: &Number) -> Result<Value> {
    match target {
        NumericType::Integer => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .map(Value::Int)
            .ok_or_else(|| PersonioError::invalid_value(field, "integer", number)),
        NumericType::Float => number
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| PersonioError::invalid_value(field, "number", number)),
    }
}

fn parse_number(field: &str, target: NumericType, text: &str) -> Result<Value> {
    let trimmed = text.trim();
    match target {
        NumericType::Integer => trimmed
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| PersonioError::invalid_value(field, "integer", text)),
        NumericType::Float => trimmed
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| PersonioError::invalid_value(field, "number", text)),
    }
}

/// Parse an RFC 3339 timestamp, a naive timestamp (UTC) or a bare date (midnight UTC).
fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().fixed_offset());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::default()).and_utc().fixed_offset())
}

/// Declarative link between one API field and one local field.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    api_field: &'static str,
    local_field: &'static str,
    kind: FieldKind,
}

impl FieldMapping {
    /// Map `api_field` on the wire to `local_field` on the resource.
    pub fn new(api_field: &'static str, local_field: &'static str, kind: FieldKind) -> Self {
        FieldMapping {
            api_field,
            local_field,
            kind,
        }
    }

    /// Wrap `item` so it applies element-wise to a list under the same names.
    pub fn list(item: FieldMapping) -> Self {
        FieldMapping {
            api_field: item.api_field,
            local_field: item.local_field,
            kind: FieldKind::List(Box::new(item.kind)),
        }
    }

    /// Key in the API payload.
    pub fn api_field(&self) -> &'static str {
        self.api_field
    }

    /// Name of the resource field.
    pub fn local_field(&self) -> &'static str {
        self.local_field
    }

    /// How values are converted.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Encode a local value for the wire.
    pub fn serialize(&self, value: &Value) -> Result<JsonValue> {
        self.kind.serialize(self.api_field, value)
    }

    /// Decode a wire value; `null` means the field is absent.
    pub fn deserialize(&self, wire: &JsonValue) -> Result<Option<Value>> {
        if wire.is_null() {
            return Ok(None);
        }
        self.kind.deserialize(self.api_field, wire).map(Some)
    }
}

impl fmt::Display for FieldMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({})",
            self.api_field,
            self.local_field,
            self.kind.expected()
        )
    }
}
