//! External-id reconciling GraphSON loader on top of an embedded SQLite graph store.
//!
//! Documents are loaded with [`loader::load_path`] (or one of its siblings) into any
//! [`GraphStore`]; [`SqliteGraph`] is the bundled store. Re-loading a document
//! converges on the same nodes and edges instead of duplicating them.
//! Run Criterion benchmarks with `cargo bench` to inspect reports under `target/criterion`.

pub mod backend;
pub mod bench_utils;
pub mod cache;
pub mod config;
pub mod dump;
pub mod errors;
pub mod fault_injection;
pub mod graph;
pub mod loader;
pub mod property;
pub mod schema;

pub use crate::backend::{GraphStore, Transaction};
pub use crate::config::{EdgeLookup, LoaderConfig, ReservedKeyPolicy, SqliteConfig, open_graph};
pub use crate::dump::{GraphSummary, dump_graph, property_text, summary};
pub use crate::errors::{GraphError, LoadError};
pub use crate::graph::{EdgeId, EdgeInfo, Element, NodeId, PropertyPredicate, SqliteGraph};
pub use crate::loader::{
    ConstructionHooks, FnHooks, LoadStats, Loader, StampHooks, load_document, load_path,
    load_reader, load_str,
};
pub use crate::property::{PropertyKind, PropertyValue};
