//! Node operations for SqliteGraph.

use rusqlite::{OptionalExtension, params};

use crate::errors::GraphError;

use super::{
    SqliteGraph,
    types::{NodeId, PropertyPredicate, validate_tag},
};

impl SqliteGraph {
    pub fn add_node(&self, tag: Option<&str>) -> Result<NodeId, GraphError> {
        validate_tag(tag)?;
        self.connection()
            .execute("INSERT INTO graph_nodes(tag) VALUES(?1)", params![tag])
            .map_err(|e| GraphError::query(e.to_string()))?;
        Ok(NodeId(self.connection().last_insert_rowid()))
    }

    pub fn node_exists(&self, id: NodeId) -> Result<bool, GraphError> {
        let exists: Option<i64> = self
            .connection()
            .query_row(
                "SELECT 1 FROM graph_nodes WHERE id=?1",
                params![id.0],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| GraphError::query(e.to_string()))?;
        Ok(exists.is_some())
    }

    pub fn node_tag(&self, id: NodeId) -> Result<Option<String>, GraphError> {
        self.connection()
            .query_row(
                "SELECT tag FROM graph_nodes WHERE id=?1",
                params![id.0],
                |row| row.get(0),
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => {
                    GraphError::not_found(format!("node {}", id.0))
                }
                other => GraphError::query(other.to_string()),
            })
    }

    pub fn node_ids(&self) -> Result<Vec<NodeId>, GraphError> {
        let mut stmt = self
            .connection()
            .prepare_cached("SELECT id FROM graph_nodes ORDER BY id")
            .map_err(|e| GraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get(0).map(NodeId))
            .map_err(|e| GraphError::query(e.to_string()))?;
        let mut ids = Vec::new();
        for id in rows {
            ids.push(id.map_err(|e| GraphError::query(e.to_string()))?);
        }
        Ok(ids)
    }

    /// Nodes whose property `predicate.key` equals `predicate.value`, lowest id first.
    pub fn find_nodes(&self, predicate: &PropertyPredicate) -> Result<Vec<NodeId>, GraphError> {
        self.find_owners("node", predicate)
            .map(|ids| ids.into_iter().map(NodeId).collect())
    }

    pub(crate) fn find_owners(
        &self,
        owner_kind: &str,
        predicate: &PropertyPredicate,
    ) -> Result<Vec<i64>, GraphError> {
        let mut stmt = self
            .connection()
            .prepare_cached(
                "SELECT owner_id FROM graph_properties \
                 WHERE owner_kind=?1 AND key=?2 AND kind=?3 AND value IS ?4 \
                 ORDER BY owner_id",
            )
            .map_err(|e| GraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map(
                params![
                    owner_kind,
                    predicate.key.as_str(),
                    predicate.value.kind().as_str(),
                    predicate.value.to_sql_value(),
                ],
                |row| row.get(0),
            )
            .map_err(|e| GraphError::query(e.to_string()))?;
        let mut ids = Vec::new();
        for id in rows {
            ids.push(id.map_err(|e| GraphError::query(e.to_string()))?);
        }
        Ok(ids)
    }
}
