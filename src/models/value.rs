use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

use crate::error::{PersonioError, Result};
use crate::models::record::Record;

/// Local value of a mapped resource field.
///
/// Values are totally ordered: variants of the same kind compare by content
/// (floats via [`f64::total_cmp`], dates by instant) and different kinds by a
/// fixed variant rank. Equality and hashing follow the same order.
#[derive(Debug, Clone)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(String),
    /// Boolean value.
    Boolean(bool),
    /// Timestamp with its UTC offset.
    Date(DateTime<FixedOffset>),
    /// Nested resource.
    Object(Record),
    /// Ordered list of values.
    List(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Date(_) => "date",
            Value::Object(_) => "object",
            Value::List(_) => "list",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) => 0,
            Value::Float(_) => 1,
            Value::String(_) => 2,
            Value::Boolean(_) => 3,
            Value::Date(_) => 4,
            Value::Object(_) => 5,
            Value::List(_) => 6,
        }
    }

    /// Append a stable textual encoding of the value to `out`.
    ///
    /// Equal values always produce the same text; dates are encoded as UTC so
    /// that the same instant under different offsets stays equal.
    pub(crate) fn write_canonical(&self, out: &mut String) {
        match self {
            Value::Int(i) => out.push_str(&format!("i{}", i)),
            Value::Float(f) => out.push_str(&format!("f{:?}", f)),
            Value::String(s) => out.push_str(&format!("s{:?}", s)),
            Value::Boolean(b) => out.push_str(&format!("b{}", b)),
            Value::Date(d) => {
                out.push('d');
                out.push_str(
                    &d.with_timezone(&Utc)
                        .to_rfc3339_opts(SecondsFormat::AutoSi, true),
                );
            }
            Value::Object(record) => record.write_canonical(out),
            Value::List(items) => {
                out.push('[');
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    item.write_canonical(out);
                }
                out.push(']');
            }
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Object(a), Value::Object(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut text = String::new();
        self.write_canonical(&mut text);
        text.hash(state);
    }
}

/// Conversion from a field [`Value`] into a typed struct member.
pub trait FromValue: Sized {
    /// Convert `value`; `field` names the local field for error messages.
    fn from_value(value: Value, field: &str) -> Result<Self>;
}

/// Conversion from a typed struct member into a field [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl FromValue for i64 {
    fn from_value(value: Value, field: &str) -> Result<Self> {
        match value {
            Value::Int(i) => Ok(i),
            // whole floats still fit an integer field
            Value::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Ok(f as i64)
            }
            other => Err(PersonioError::invalid_value(field, "integer", other.type_name())),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value, field: &str) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(PersonioError::invalid_value(field, "float", other.type_name())),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value, field: &str) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(PersonioError::invalid_value(field, "string", other.type_name())),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value, field: &str) -> Result<Self> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(PersonioError::invalid_value(field, "boolean", other.type_name())),
        }
    }
}

impl FromValue for DateTime<FixedOffset> {
    fn from_value(value: Value, field: &str) -> Result<Self> {
        match value {
            Value::Date(d) => Ok(d),
            other => Err(PersonioError::invalid_value(field, "date", other.type_name())),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value, field: &str) -> Result<Self> {
        match value {
            Value::List(items) => items
                .into_iter()
                .map(|item| T::from_value(item, field))
                .collect(),
            other => Err(PersonioError::invalid_value(field, "list", other.type_name())),
        }
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Boolean(self)
    }
}

impl IntoValue for DateTime<FixedOffset> {
    fn into_value(self) -> Value {
        Value::Date(self)
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}
