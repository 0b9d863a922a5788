//! Core SqliteGraph struct, construction and transaction control.

use std::{cell::Cell, path::Path};

use rusqlite::{Connection, OpenFlags};

use crate::{cache::AdjacencyCache, config::SqliteConfig, errors::GraphError, schema::ensure_schema};

/// Embedded SQLite-backed property graph.
///
/// Nodes and edges carry an optional tag and a bag of typed properties.
/// Mutations run in autocommit mode unless a transaction was opened with
/// [`SqliteGraph::begin_transaction`].
pub struct SqliteGraph {
    pub(crate) conn: Connection,
    pub(crate) outgoing_cache: AdjacencyCache,
    pub(crate) incoming_cache: AdjacencyCache,
    in_transaction: Cell<bool>,
}

fn is_in_memory_connection(conn: &Connection) -> bool {
    match conn.pragma_query_value(None, "database_list", |row| {
        let name: String = row.get(2)?;
        Ok(name)
    }) {
        Ok(name) => name.is_empty() || name == ":memory:",
        Err(_) => true,
    }
}

impl SqliteGraph {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        Self::open_with_config(path, &SqliteConfig::default())
    }

    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: &SqliteConfig,
    ) -> Result<Self, GraphError> {
        let mut flags = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if config.read_only {
            flags |= OpenFlags::SQLITE_OPEN_READ_ONLY;
        } else {
            flags |= OpenFlags::SQLITE_OPEN_READ_WRITE;
            if config.create_if_missing {
                flags |= OpenFlags::SQLITE_OPEN_CREATE;
            }
        }
        let conn = Connection::open_with_flags(path.as_ref(), flags)
            .map_err(|e| GraphError::connection(format!("{}: {e}", path.as_ref().display())))?;
        if !config.read_only {
            ensure_schema(&conn)?;
        }
        Ok(Self::from_connection(conn, config))
    }

    pub fn open_in_memory() -> Result<Self, GraphError> {
        let conn =
            Connection::open_in_memory().map_err(|e| GraphError::connection(e.to_string()))?;
        ensure_schema(&conn)?;
        Ok(Self::from_connection(conn, &SqliteConfig::default()))
    }

    pub fn begin_transaction(&self) -> Result<(), GraphError> {
        if self.in_transaction.get() {
            return Err(GraphError::transaction("a transaction is already open"));
        }
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| GraphError::transaction(e.to_string()))?;
        self.in_transaction.set(true);
        Ok(())
    }

    pub fn commit_transaction(&self) -> Result<(), GraphError> {
        if !self.in_transaction.get() {
            return Err(GraphError::transaction("no open transaction to commit"));
        }
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| GraphError::transaction(e.to_string()))?;
        self.in_transaction.set(false);
        Ok(())
    }

    pub fn rollback_transaction(&self) -> Result<(), GraphError> {
        if !self.in_transaction.get() {
            return Err(GraphError::transaction("no open transaction to roll back"));
        }
        self.in_transaction.set(false);
        // Cached adjacency may hold edges that no longer exist.
        self.invalidate_caches();
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| GraphError::transaction(e.to_string()))
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction.get()
    }

    pub fn node_count(&self) -> Result<usize, GraphError> {
        self.count("SELECT COUNT(*) FROM graph_nodes")
    }

    pub fn edge_count(&self) -> Result<usize, GraphError> {
        self.count("SELECT COUNT(*) FROM graph_edges")
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn invalidate_caches(&self) {
        self.outgoing_cache.clear();
        self.incoming_cache.clear();
    }

    fn count(&self, sql: &str) -> Result<usize, GraphError> {
        let count: i64 = self
            .conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(|e| GraphError::query(e.to_string()))?;
        Ok(count as usize)
    }

    fn from_connection(conn: Connection, config: &SqliteConfig) -> Self {
        conn.set_prepared_statement_cache_capacity(64);

        if !is_in_memory_connection(&conn) && !config.read_only {
            if conn.pragma_update(None, "journal_mode", "WAL").is_err() {
                let _ = conn.pragma_update(None, "journal_mode", "DELETE");
            }
            let _ = conn.pragma_update(None, "synchronous", "NORMAL");
        }
        if let Some(kib) = config.cache_size_kib {
            let _ = conn.pragma_update(None, "cache_size", -(kib as i64));
        }

        Self {
            conn,
            outgoing_cache: AdjacencyCache::new(),
            incoming_cache: AdjacencyCache::new(),
            in_transaction: Cell::new(false),
        }
    }
}

impl Drop for SqliteGraph {
    fn drop(&mut self) {
        if self.in_transaction.get() {
            let _ = self.conn.execute_batch("ROLLBACK");
        }
    }
}
