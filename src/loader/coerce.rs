//! Mapping of parsed JSON scalars onto typed store properties.

use serde_json::Value;
use tracing::debug;

use crate::{backend::GraphStore, errors::GraphError, graph::Element, property::PropertyValue};

/// Maps a JSON value onto a property value.
///
/// Arrays, objects and unsigned integers above `i64::MAX` have no property
/// representation and yield `None`.
pub fn coerce(value: &Value) -> Option<PropertyValue> {
    match value {
        Value::Null => Some(PropertyValue::NoValue),
        Value::Bool(b) => Some(PropertyValue::Boolean(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(PropertyValue::Integer(i))
            } else if let Some(u) = n.as_u64() {
                i64::try_from(u).ok().map(PropertyValue::Integer)
            } else {
                n.as_f64().map(PropertyValue::Float)
            }
        }
        Value::String(s) => Some(PropertyValue::String(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Sets `key` on `element` from a JSON value. Unsupported shapes are skipped
/// without error; returns whether a property was written.
pub fn apply_property<S: GraphStore>(
    store: &S,
    element: Element,
    key: &str,
    value: &Value,
) -> Result<bool, GraphError> {
    match coerce(value) {
        Some(property) => {
            store.set_property(element, key, &property)?;
            Ok(true)
        }
        None => {
            debug!(%element, key, "skipping value with no property representation");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn scalars_map_to_matching_kinds() {
        assert_eq!(coerce(&json!(null)), Some(PropertyValue::NoValue));
        assert_eq!(coerce(&json!(-5)), Some(PropertyValue::Integer(-5)));
        assert_eq!(coerce(&json!(7u64)), Some(PropertyValue::Integer(7)));
        assert_eq!(coerce(&json!(3.5)), Some(PropertyValue::Float(3.5)));
        assert_eq!(coerce(&json!("x")), Some(PropertyValue::String("x".into())));
        assert_eq!(coerce(&json!(true)), Some(PropertyValue::Boolean(true)));
    }

    #[test]
    fn composite_values_are_skipped() {
        assert_eq!(coerce(&json!([1, 2])), None);
        assert_eq!(coerce(&json!({"a": 1})), None);
    }

    #[test]
    fn unsigned_beyond_signed_range_is_skipped() {
        assert_eq!(coerce(&json!(u64::MAX)), None);
        assert_eq!(
            coerce(&json!(i64::MAX as u64)),
            Some(PropertyValue::Integer(i64::MAX))
        );
    }
}
