use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{errors::GraphError, property::PropertyValue};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub i64);

impl NodeId {
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl EdgeId {
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Owner of a property: either a node or an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Node(NodeId),
    Edge(EdgeId),
}

impl Element {
    pub(crate) fn owner_kind(self) -> &'static str {
        match self {
            Element::Node(_) => "node",
            Element::Edge(_) => "edge",
        }
    }

    pub(crate) fn owner_id(self) -> i64 {
        match self {
            Element::Node(id) => id.0,
            Element::Edge(id) => id.0,
        }
    }
}

impl From<NodeId> for Element {
    fn from(id: NodeId) -> Self {
        Element::Node(id)
    }
}

impl From<EdgeId> for Element {
    fn from(id: EdgeId) -> Self {
        Element::Edge(id)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Node(id) => id.fmt(f),
            Element::Edge(id) => id.fmt(f),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeInfo {
    pub id: EdgeId,
    pub source: NodeId,
    pub destination: NodeId,
    pub tag: Option<String>,
}

/// Equality predicate over a single property key.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyPredicate {
    pub key: String,
    pub value: PropertyValue,
}

impl PropertyPredicate {
    pub fn equals<K: Into<String>, V: Into<PropertyValue>>(key: K, value: V) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, value: Option<&PropertyValue>) -> bool {
        value == Some(&self.value)
    }
}

pub(crate) fn validate_tag(tag: Option<&str>) -> Result<(), GraphError> {
    if let Some(tag) = tag
        && tag.trim().is_empty()
    {
        return Err(GraphError::invalid_input(
            "tag must not be blank; pass None for untyped elements",
        ));
    }
    Ok(())
}

pub(crate) fn row_to_edge(row: &rusqlite::Row<'_>) -> Result<EdgeInfo, rusqlite::Error> {
    Ok(EdgeInfo {
        id: EdgeId(row.get(0)?),
        source: NodeId(row.get(1)?),
        destination: NodeId(row.get(2)?),
        tag: row.get(3)?,
    })
}
