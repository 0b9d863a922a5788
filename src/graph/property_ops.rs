//! Property reads and writes shared by nodes and edges.

use rusqlite::{OptionalExtension, params};

use crate::{errors::GraphError, property::PropertyValue};

use super::{
    SqliteGraph,
    types::{EdgeId, Element},
};

impl SqliteGraph {
    /// Sets `key` on `element`, replacing any previous value and kind.
    pub fn set_property(
        &self,
        element: Element,
        key: &str,
        value: &PropertyValue,
    ) -> Result<(), GraphError> {
        if key.is_empty() {
            return Err(GraphError::invalid_input("property key must be set"));
        }
        self.ensure_element(element)?;
        self.connection()
            .execute(
                "INSERT OR REPLACE INTO graph_properties(owner_kind, owner_id, key, kind, value) \
                 VALUES(?1, ?2, ?3, ?4, ?5)",
                params![
                    element.owner_kind(),
                    element.owner_id(),
                    key,
                    value.kind().as_str(),
                    value.to_sql_value(),
                ],
            )
            .map_err(|e| GraphError::query(e.to_string()))?;
        Ok(())
    }

    pub fn get_property(
        &self,
        element: Element,
        key: &str,
    ) -> Result<Option<PropertyValue>, GraphError> {
        let conn = self.connection();
        let mut stmt = conn
            .prepare_cached(
                "SELECT kind, value FROM graph_properties \
                 WHERE owner_kind=?1 AND owner_id=?2 AND key=?3",
            )
            .map_err(|e| GraphError::query(e.to_string()))?;
        let raw: Option<(String, rusqlite::types::Value)> = stmt
            .query_row(
                params![element.owner_kind(), element.owner_id(), key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| GraphError::query(e.to_string()))?;
        raw.map(|(kind, value)| PropertyValue::from_sql(&kind, (&value).into()))
            .transpose()
    }

    /// Removes `key` from `element`; returns whether it was present.
    pub fn remove_property(&self, element: Element, key: &str) -> Result<bool, GraphError> {
        let affected = self
            .connection()
            .execute(
                "DELETE FROM graph_properties WHERE owner_kind=?1 AND owner_id=?2 AND key=?3",
                params![element.owner_kind(), element.owner_id(), key],
            )
            .map_err(|e| GraphError::query(e.to_string()))?;
        Ok(affected > 0)
    }

    /// All properties of `element`, ordered by key.
    pub fn properties(&self, element: Element) -> Result<Vec<(String, PropertyValue)>, GraphError> {
        let conn = self.connection();
        let mut stmt = conn
            .prepare_cached(
                "SELECT key, kind, value FROM graph_properties \
                 WHERE owner_kind=?1 AND owner_id=?2 ORDER BY key",
            )
            .map_err(|e| GraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map(params![element.owner_kind(), element.owner_id()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, rusqlite::types::Value>(2)?,
                ))
            })
            .map_err(|e| GraphError::query(e.to_string()))?;
        let mut props = Vec::new();
        for row in rows {
            let (key, kind, value) = row.map_err(|e| GraphError::query(e.to_string()))?;
            let value = PropertyValue::from_sql(&kind, (&value).into())?;
            props.push((key, value));
        }
        Ok(props)
    }

    fn ensure_element(&self, element: Element) -> Result<(), GraphError> {
        let exists = match element {
            Element::Node(id) => self.node_exists(id)?,
            Element::Edge(id) => self.edge_exists(id)?,
        };
        if !exists {
            return Err(GraphError::not_found(element.to_string()));
        }
        Ok(())
    }

    fn edge_exists(&self, id: EdgeId) -> Result<bool, GraphError> {
        let exists: Option<i64> = self
            .connection()
            .query_row(
                "SELECT 1 FROM graph_edges WHERE id=?1",
                params![id.0],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| GraphError::query(e.to_string()))?;
        Ok(exists.is_some())
    }
}
