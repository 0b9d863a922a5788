use rusqlite::Connection;

use crate::errors::GraphError;

pub fn ensure_schema(conn: &Connection) -> Result<(), GraphError> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS graph_nodes (
            id  INTEGER PRIMARY KEY AUTOINCREMENT,
            tag TEXT
        );
        CREATE TABLE IF NOT EXISTS graph_edges (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            from_id INTEGER NOT NULL REFERENCES graph_nodes(id),
            to_id   INTEGER NOT NULL REFERENCES graph_nodes(id),
            tag     TEXT
        );
        CREATE TABLE IF NOT EXISTS graph_properties (
            owner_kind TEXT NOT NULL,
            owner_id   INTEGER NOT NULL,
            key        TEXT NOT NULL,
            kind       TEXT NOT NULL,
            value,
            PRIMARY KEY (owner_kind, owner_id, key)
        );
        CREATE INDEX IF NOT EXISTS idx_edges_from ON graph_edges(from_id);
        CREATE INDEX IF NOT EXISTS idx_edges_to ON graph_edges(to_id);
        CREATE INDEX IF NOT EXISTS idx_props_lookup ON graph_properties(owner_kind, key, value);
        "#,
    )
    .map_err(|e| GraphError::schema(e.to_string()))?;
    Ok(())
}
