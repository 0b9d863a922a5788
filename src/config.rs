//! Loader and store configuration.
//!
//! [`LoaderConfig`] controls how documents are reconciled against a store;
//! [`SqliteConfig`] controls how the SQLite store is opened. Both deserialize
//! from JSON so they can be kept next to the data they apply to.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{errors::GraphError, graph::SqliteGraph};

/// Reserved property key carrying the external id on loaded nodes and edges.
pub const DEFAULT_ID_KEY: &str = "loader.id";

/// Prefix applied to a record key that collides with the reserved id key
/// under [`ReservedKeyPolicy::Prefix`].
pub const COLLISION_PREFIX: &str = "doc.";

/// How an existing edge is looked up by external id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeLookup {
    /// Scan every edge and test its id property.
    #[default]
    Scan,
    /// Push the equality predicate down to the store's property index.
    ///
    /// Finds the same edge as [`EdgeLookup::Scan`]; only the cost differs.
    Indexed,
}

/// What to do when a record carries its own property named like the id key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservedKeyPolicy {
    /// Fail the record with a structural error before its transaction opens.
    #[default]
    Reject,
    /// Store the record's value under [`COLLISION_PREFIX`] + key instead.
    Prefix,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub id_key: String,
    pub edge_lookup: EdgeLookup,
    pub reserved_key: ReservedKeyPolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            id_key: DEFAULT_ID_KEY.to_string(),
            edge_lookup: EdgeLookup::default(),
            reserved_key: ReservedKeyPolicy::default(),
        }
    }
}

impl LoaderConfig {
    pub fn with_id_key<K: Into<String>>(mut self, key: K) -> Self {
        self.id_key = key.into();
        self
    }

    pub fn with_edge_lookup(mut self, lookup: EdgeLookup) -> Self {
        self.edge_lookup = lookup;
        self
    }

    pub fn with_reserved_key(mut self, policy: ReservedKeyPolicy) -> Self {
        self.reserved_key = policy;
        self
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        if self.id_key.trim().is_empty() {
            return Err(GraphError::invalid_input("id key must be set"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Create the database file if it does not exist.
    pub create_if_missing: bool,
    /// Open without write access; the schema is not touched.
    pub read_only: bool,
    /// Page cache size in KiB, applied through `PRAGMA cache_size`.
    pub cache_size_kib: Option<u32>,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            read_only: false,
            cache_size_kib: None,
        }
    }
}

/// Opens a store at `path`; `memory` and `:memory:` select an in-memory database.
pub fn open_graph<P: AsRef<Path>>(path: P, config: &SqliteConfig) -> Result<SqliteGraph, GraphError> {
    let path = path.as_ref();
    match path.to_str() {
        Some("memory") | Some(":memory:") => SqliteGraph::open_in_memory(),
        _ => SqliteGraph::open_with_config(path, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_config_defaults() {
        let cfg = LoaderConfig::default();
        assert_eq!(cfg.id_key, "loader.id");
        assert_eq!(cfg.edge_lookup, EdgeLookup::Scan);
        assert_eq!(cfg.reserved_key, ReservedKeyPolicy::Reject);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn loader_config_deserializes_partial_json() {
        let cfg: LoaderConfig =
            serde_json::from_str(r#"{"edge_lookup":"indexed","reserved_key":"prefix"}"#).unwrap();
        assert_eq!(cfg.id_key, DEFAULT_ID_KEY);
        assert_eq!(cfg.edge_lookup, EdgeLookup::Indexed);
        assert_eq!(cfg.reserved_key, ReservedKeyPolicy::Prefix);
    }

    #[test]
    fn blank_id_key_is_invalid() {
        let cfg = LoaderConfig::default().with_id_key("  ");
        assert!(matches!(cfg.validate(), Err(GraphError::InvalidInput(_))));
    }

    #[test]
    fn open_graph_accepts_memory_alias() {
        let graph = open_graph("memory", &SqliteConfig::default()).expect("graph");
        assert_eq!(graph.node_count().unwrap(), 0);
    }
}
