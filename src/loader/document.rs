//! Field extraction for GraphSON vertex and edge records.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::{
    config::{COLLISION_PREFIX, LoaderConfig, ReservedKeyPolicy},
    errors::LoadError,
};

pub const VERTICES: &str = "vertices";
pub const EDGES: &str = "edges";

const ID: &str = "_id";
const TYPE: &str = "_type";
const IN_V: &str = "_inV";
const OUT_V: &str = "_outV";
const LABEL: &str = "_label";

/// A property carried by a record, after reserved-key handling.
pub type RecordProperty<'a> = (Cow<'a, str>, &'a Value);

#[derive(Debug)]
pub struct NodeRecord<'a> {
    pub id: i64,
    pub properties: Vec<RecordProperty<'a>>,
}

#[derive(Debug)]
pub struct EdgeRecord<'a> {
    pub id: i64,
    /// Destination endpoint.
    pub in_v: i64,
    /// Source endpoint.
    pub out_v: i64,
    pub label: &'a str,
    pub properties: Vec<RecordProperty<'a>>,
}

impl<'a> NodeRecord<'a> {
    pub fn from_value(
        index: usize,
        raw: &'a Value,
        config: &LoaderConfig,
    ) -> Result<Self, LoadError> {
        let fields = record_object(VERTICES, index, raw)?;
        let id = int_field(VERTICES, index, fields, ID)?;
        let properties = remaining_properties(VERTICES, index, fields, &[ID, TYPE], config)?;
        Ok(Self { id, properties })
    }
}

impl<'a> EdgeRecord<'a> {
    pub fn from_value(
        index: usize,
        raw: &'a Value,
        config: &LoaderConfig,
    ) -> Result<Self, LoadError> {
        let fields = record_object(EDGES, index, raw)?;
        let id = int_field(EDGES, index, fields, ID)?;
        let in_v = int_field(EDGES, index, fields, IN_V)?;
        let out_v = int_field(EDGES, index, fields, OUT_V)?;
        let label = fields
            .get(LABEL)
            .and_then(Value::as_str)
            .ok_or_else(|| LoadError::invalid_field(EDGES, index, LABEL, "a string"))?;
        let properties = remaining_properties(
            EDGES,
            index,
            fields,
            &[ID, TYPE, IN_V, OUT_V, LABEL],
            config,
        )?;
        Ok(Self {
            id,
            in_v,
            out_v,
            label,
            properties,
        })
    }
}

/// Returns the named top-level collection when it is an array.
pub fn collection<'a>(root: &'a Value, name: &str) -> Option<&'a [Value]> {
    root.get(name).and_then(Value::as_array).map(Vec::as_slice)
}

fn record_object<'a>(
    collection: &'static str,
    index: usize,
    raw: &'a Value,
) -> Result<&'a Map<String, Value>, LoadError> {
    raw.as_object()
        .ok_or_else(|| LoadError::invalid_field(collection, index, "record", "an object"))
}

fn int_field(
    collection: &'static str,
    index: usize,
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<i64, LoadError> {
    fields
        .get(field)
        .and_then(Value::as_i64)
        .ok_or_else(|| LoadError::invalid_field(collection, index, field, "an integer"))
}

fn remaining_properties<'a>(
    collection: &'static str,
    index: usize,
    fields: &'a Map<String, Value>,
    reserved_fields: &[&str],
    config: &LoaderConfig,
) -> Result<Vec<RecordProperty<'a>>, LoadError> {
    let mut properties = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        if reserved_fields.contains(&key.as_str()) {
            continue;
        }
        if *key == config.id_key {
            match config.reserved_key {
                ReservedKeyPolicy::Reject => {
                    return Err(LoadError::reserved_key(collection, index, key.as_str()));
                }
                ReservedKeyPolicy::Prefix => {
                    properties.push((Cow::Owned(format!("{COLLISION_PREFIX}{key}")), value));
                    continue;
                }
            }
        }
        properties.push((Cow::Borrowed(key.as_str()), value));
    }
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn keys<'a>(props: &'a [RecordProperty<'a>]) -> Vec<&'a str> {
        props.iter().map(|(k, _)| k.as_ref()).collect()
    }

    #[test]
    fn node_record_drops_id_and_type() {
        let raw = json!({"_id": 4, "_type": "vertex", "name": "A", "age": 3});
        let record = NodeRecord::from_value(0, &raw, &LoaderConfig::default()).unwrap();
        assert_eq!(record.id, 4);
        assert_eq!(keys(&record.properties), vec!["age", "name"]);
    }

    #[test]
    fn node_record_requires_integer_id() {
        for raw in [json!({"name": "A"}), json!({"_id": "1"}), json!({"_id": 1.5})] {
            let err = NodeRecord::from_value(2, &raw, &LoaderConfig::default()).unwrap_err();
            match err {
                LoadError::InvalidField {
                    collection,
                    index,
                    field,
                    ..
                } => {
                    assert_eq!(collection, VERTICES);
                    assert_eq!(index, 2);
                    assert_eq!(field, "_id");
                }
                other => panic!("expected InvalidField, got {other:?}"),
            }
        }
    }

    #[test]
    fn non_object_record_is_rejected() {
        let err = NodeRecord::from_value(0, &json!(7), &LoaderConfig::default()).unwrap_err();
        assert_eq!(err.code(), 204);
    }

    #[test]
    fn edge_record_extracts_endpoints_and_label() {
        let raw = json!({
            "_id": 10, "_outV": 1, "_inV": 2, "_label": "knows", "_type": "edge", "weight": 3
        });
        let record = EdgeRecord::from_value(0, &raw, &LoaderConfig::default()).unwrap();
        assert_eq!(record.id, 10);
        assert_eq!(record.out_v, 1);
        assert_eq!(record.in_v, 2);
        assert_eq!(record.label, "knows");
        assert_eq!(keys(&record.properties), vec!["weight"]);
    }

    #[test]
    fn edge_record_requires_string_label() {
        let raw = json!({"_id": 10, "_outV": 1, "_inV": 2, "_label": 5});
        let err = EdgeRecord::from_value(3, &raw, &LoaderConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidField {
                field: "_label",
                index: 3,
                ..
            }
        ));
    }

    #[test]
    fn reserved_key_is_rejected_by_default() {
        let raw = json!({"_id": 1, "loader.id": 99});
        let err = NodeRecord::from_value(0, &raw, &LoaderConfig::default()).unwrap_err();
        assert_eq!(err.code(), 205);
    }

    #[test]
    fn reserved_key_is_prefixed_on_request() {
        let cfg = LoaderConfig::default().with_reserved_key(ReservedKeyPolicy::Prefix);
        let raw = json!({"_id": 1, "loader.id": 99});
        let record = NodeRecord::from_value(0, &raw, &cfg).unwrap();
        assert_eq!(keys(&record.properties), vec!["doc.loader.id"]);
    }

    #[test]
    fn collection_requires_array() {
        let root = json!({"vertices": {}, "edges": []});
        assert!(collection(&root, VERTICES).is_none());
        assert_eq!(collection(&root, EDGES).map(<[Value]>::len), Some(0));
        assert!(collection(&json!([]), VERTICES).is_none());
    }
}
