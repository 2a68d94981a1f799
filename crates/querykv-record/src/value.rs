use std::collections::HashMap;

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// One record's queryable state: attribute name to value.
///
/// Absent attributes are simply missing. An attribute holding
/// [`Value::Null`] is present with an explicit null.
pub type Attributes = HashMap<String, Value>;

/// Untyped attribute value.
///
/// Serialized untagged so JSON input and output read naturally. `Date`
/// serializes as its millisecond timestamp and deserializes as `Int`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(i64),
    List(Vec<Value>),
    Map(Attributes),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view: `Int` widens to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Attributes> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Convert a BSON value. `attribute` is only used for error reporting.
    fn from_bson(attribute: &str, bson: Bson) -> Result<Self, RecordError> {
        Ok(match bson {
            Bson::Null | Bson::Undefined => Value::Null,
            Bson::Boolean(b) => Value::Bool(b),
            Bson::Int32(n) => Value::Int(n as i64),
            Bson::Int64(n) => Value::Int(n),
            Bson::Double(f) => Value::Float(f),
            Bson::String(s) | Bson::Symbol(s) => Value::String(s),
            Bson::ObjectId(oid) => Value::String(oid.to_hex()),
            Bson::DateTime(dt) => Value::Date(dt.timestamp_millis()),
            Bson::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(|item| Value::from_bson(attribute, item))
                    .collect::<Result<_, _>>()?,
            ),
            Bson::Document(doc) => Value::Map(from_document(doc)?),
            other => {
                return Err(RecordError::UnsupportedType {
                    attribute: attribute.to_string(),
                    element_type: format!("{:?}", other.element_type()),
                });
            }
        })
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Attributes> for Value {
    fn from(m: Attributes) -> Self {
        Value::Map(m)
    }
}

/// Convert a BSON document into an attribute map.
pub fn from_document(doc: Document) -> Result<Attributes, RecordError> {
    let mut attributes = Attributes::with_capacity(doc.len());
    for (name, bson) in doc {
        let value = Value::from_bson(&name, bson)?;
        attributes.insert(name, value);
    }
    Ok(attributes)
}

/// Resolve a dot-separated path (`"address.city"`) through nested maps.
pub fn lookup<'a>(attributes: &'a Attributes, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = attributes.get(segments.next()?)?;
    for segment in segments {
        current = current.as_map()?.get(segment)?;
    }
    Some(current)
}
