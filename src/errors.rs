use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised by the graph store.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("connection error: {0}")]
    ConnectionError(String),
    #[error("schema error: {0}")]
    SchemaError(String),
    #[error("query error: {0}")]
    QueryError(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("transaction error: {0}")]
    TransactionError(String),
    #[error("fault injected: {0}")]
    FaultInjected(String),
}

impl GraphError {
    pub fn connection<T: Into<String>>(msg: T) -> Self {
        GraphError::ConnectionError(msg.into())
    }

    pub fn schema<T: Into<String>>(msg: T) -> Self {
        GraphError::SchemaError(msg.into())
    }

    pub fn query<T: Into<String>>(msg: T) -> Self {
        GraphError::QueryError(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        GraphError::NotFound(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        GraphError::InvalidInput(msg.into())
    }

    pub fn transaction<T: Into<String>>(msg: T) -> Self {
        GraphError::TransactionError(msg.into())
    }

    pub fn fault_injection<T: Into<String>>(msg: T) -> Self {
        GraphError::FaultInjected(msg.into())
    }

    pub fn name(&self) -> &'static str {
        match self {
            GraphError::ConnectionError(_) => "connection_failed",
            GraphError::SchemaError(_) => "schema_failed",
            GraphError::QueryError(_) => "query_failed",
            GraphError::NotFound(_) => "not_found",
            GraphError::InvalidInput(_) => "invalid_input",
            GraphError::TransactionError(_) => "transaction_failed",
            GraphError::FaultInjected(_) => "fault_injected",
        }
    }
}

/// Errors raised while loading a document into a store.
///
/// Structural variants carry a stable numeric code; store failures are
/// passed through unchanged in [`LoadError::Store`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse input: {0}")]
    Unparsable(#[from] serde_json::Error),
    #[error("`vertices` collection missing or not an array")]
    VerticesNotFound,
    #[error("`edges` collection missing or not an array")]
    EdgesNotFound,
    #[error("{collection}[{index}]: field `{field}` missing or not {expected}")]
    InvalidField {
        collection: &'static str,
        index: usize,
        field: &'static str,
        expected: &'static str,
    },
    #[error("{collection}[{index}]: key `{key}` collides with the reserved id key")]
    ReservedKey {
        collection: &'static str,
        index: usize,
        key: String,
    },
    #[error(transparent)]
    Store(#[from] GraphError),
}

impl LoadError {
    pub fn unreadable<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        LoadError::Unreadable {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_field(
        collection: &'static str,
        index: usize,
        field: &'static str,
        expected: &'static str,
    ) -> Self {
        LoadError::InvalidField {
            collection,
            index,
            field,
            expected,
        }
    }

    pub fn reserved_key<T: Into<String>>(collection: &'static str, index: usize, key: T) -> Self {
        LoadError::ReservedKey {
            collection,
            index,
            key: key.into(),
        }
    }

    /// Numeric code of a structural error; `0` for store errors.
    pub fn code(&self) -> u16 {
        match self {
            LoadError::Unreadable { .. } => 201,
            LoadError::Unparsable(_) => 202,
            LoadError::VerticesNotFound | LoadError::EdgesNotFound => 203,
            LoadError::InvalidField { .. } => 204,
            LoadError::ReservedKey { .. } => 205,
            LoadError::Store(_) => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoadError::Unreadable { .. } => "load_failed",
            LoadError::Unparsable(_) => "parse_failed",
            LoadError::VerticesNotFound => "nodes_not_found",
            LoadError::EdgesNotFound => "edges_not_found",
            LoadError::InvalidField { .. } => "field_invalid",
            LoadError::ReservedKey { .. } => "reserved_key",
            LoadError::Store(err) => err.name(),
        }
    }

    pub fn is_structural(&self) -> bool {
        !matches!(self, LoadError::Store(_))
    }
}
