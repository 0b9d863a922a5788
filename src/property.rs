//! Typed property values stored on nodes and edges.

use std::fmt;

use rusqlite::types::{Value, ValueRef};
use serde::{Deserialize, Serialize};

use crate::errors::GraphError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    NoValue,
    Integer,
    Float,
    String,
    Boolean,
}

impl PropertyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::NoValue => "novalue",
            PropertyKind::Integer => "integer",
            PropertyKind::Float => "float",
            PropertyKind::String => "string",
            PropertyKind::Boolean => "boolean",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "novalue" => Some(PropertyKind::NoValue),
            "integer" => Some(PropertyKind::Integer),
            "float" => Some(PropertyKind::Float),
            "string" => Some(PropertyKind::String),
            "boolean" => Some(PropertyKind::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    NoValue,
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::NoValue => PropertyKind::NoValue,
            PropertyValue::Integer(_) => PropertyKind::Integer,
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::String(_) => PropertyKind::String,
            PropertyValue::Boolean(_) => PropertyKind::Boolean,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub(crate) fn to_sql_value(&self) -> Value {
        match self {
            PropertyValue::NoValue => Value::Null,
            PropertyValue::Integer(v) => Value::Integer(*v),
            PropertyValue::Float(v) => Value::Real(*v),
            PropertyValue::String(v) => Value::Text(v.clone()),
            PropertyValue::Boolean(v) => Value::Integer(i64::from(*v)),
        }
    }

    pub(crate) fn from_sql(kind: &str, value: ValueRef<'_>) -> Result<Self, GraphError> {
        let kind = PropertyKind::parse(kind)
            .ok_or_else(|| GraphError::query(format!("unknown property kind {kind}")))?;
        let decoded = match (kind, value) {
            (PropertyKind::NoValue, _) => Some(PropertyValue::NoValue),
            (PropertyKind::Integer, ValueRef::Integer(v)) => Some(PropertyValue::Integer(v)),
            (PropertyKind::Float, ValueRef::Real(v)) => Some(PropertyValue::Float(v)),
            // SQLite may hand back integral reals as integers.
            (PropertyKind::Float, ValueRef::Integer(v)) => Some(PropertyValue::Float(v as f64)),
            (PropertyKind::String, ValueRef::Text(bytes)) => std::str::from_utf8(bytes)
                .ok()
                .map(|s| PropertyValue::String(s.to_string())),
            (PropertyKind::Boolean, ValueRef::Integer(v)) => Some(PropertyValue::Boolean(v != 0)),
            _ => None,
        };
        decoded.ok_or_else(|| {
            GraphError::query(format!(
                "stored value does not match property kind {kind}"
            ))
        })
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}
