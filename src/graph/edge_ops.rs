//! Edge operations for SqliteGraph.

use rusqlite::params;

use crate::errors::GraphError;

use super::{
    SqliteGraph,
    types::{EdgeId, EdgeInfo, NodeId, PropertyPredicate, row_to_edge, validate_tag},
};

impl SqliteGraph {
    /// Inserts a directed edge `source -> destination`. Self loops are allowed.
    pub fn add_edge(
        &self,
        source: NodeId,
        destination: NodeId,
        tag: Option<&str>,
    ) -> Result<EdgeId, GraphError> {
        validate_tag(tag)?;
        if !self.node_exists(source)? || !self.node_exists(destination)? {
            return Err(GraphError::invalid_input(format!(
                "edge endpoints must reference existing nodes ({source} -> {destination})"
            )));
        }
        self.connection()
            .execute(
                "INSERT INTO graph_edges(from_id, to_id, tag) VALUES(?1, ?2, ?3)",
                params![source.0, destination.0, tag],
            )
            .map_err(|e| GraphError::query(e.to_string()))?;
        self.invalidate_caches();
        Ok(EdgeId(self.connection().last_insert_rowid()))
    }

    pub fn get_edge(&self, id: EdgeId) -> Result<EdgeInfo, GraphError> {
        self.connection()
            .query_row(
                "SELECT id, from_id, to_id, tag FROM graph_edges WHERE id=?1",
                params![id.0],
                row_to_edge,
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => {
                    GraphError::not_found(format!("edge {}", id.0))
                }
                other => GraphError::query(other.to_string()),
            })
    }

    pub fn edge_ids(&self) -> Result<Vec<EdgeId>, GraphError> {
        let mut stmt = self
            .connection()
            .prepare_cached("SELECT id FROM graph_edges ORDER BY id")
            .map_err(|e| GraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get(0).map(EdgeId))
            .map_err(|e| GraphError::query(e.to_string()))?;
        let mut ids = Vec::new();
        for id in rows {
            ids.push(id.map_err(|e| GraphError::query(e.to_string()))?);
        }
        Ok(ids)
    }

    /// Edges whose property `predicate.key` equals `predicate.value`, lowest id first.
    pub fn find_edges(&self, predicate: &PropertyPredicate) -> Result<Vec<EdgeId>, GraphError> {
        self.find_owners("edge", predicate)
            .map(|ids| ids.into_iter().map(EdgeId).collect())
    }

    pub fn outgoing_edges(&self, node: NodeId) -> Result<Vec<EdgeId>, GraphError> {
        if let Some(cached) = self.outgoing_cache.get(node) {
            return Ok(cached);
        }
        let result = self.collect_adjacency(
            "SELECT id FROM graph_edges WHERE from_id=?1 ORDER BY id",
            node,
        )?;
        self.outgoing_cache.insert(node, result.clone());
        Ok(result)
    }

    pub fn incoming_edges(&self, node: NodeId) -> Result<Vec<EdgeId>, GraphError> {
        if let Some(cached) = self.incoming_cache.get(node) {
            return Ok(cached);
        }
        let result = self.collect_adjacency(
            "SELECT id FROM graph_edges WHERE to_id=?1 ORDER BY id",
            node,
        )?;
        self.incoming_cache.insert(node, result.clone());
        Ok(result)
    }

    fn collect_adjacency(&self, sql: &str, node: NodeId) -> Result<Vec<EdgeId>, GraphError> {
        let mut stmt = self
            .connection()
            .prepare_cached(sql)
            .map_err(|e| GraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map(params![node.0], |row| row.get(0).map(EdgeId))
            .map_err(|e| GraphError::query(e.to_string()))?;
        let mut result = Vec::new();
        for item in rows {
            result.push(item.map_err(|e| GraphError::query(e.to_string()))?);
        }
        Ok(result)
    }
}
