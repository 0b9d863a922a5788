//! GraphSON loader that reconciles documents against a [`GraphStore`].
//!
//! A document is a JSON object with a `vertices` and an `edges` array. Every
//! record carries an integer `_id` that is stored on the created element under
//! the configured id key, so loading the same document again finds and reuses
//! the elements of the previous run instead of duplicating them.
//!
//! Loading runs in two phases: all vertices, then all edges. Each record is
//! applied in its own transaction; a failure rolls back the record in flight,
//! stops the load, and leaves every earlier record committed.
//!
//! ```rust
//! use graphload::{SqliteGraph, loader::load_str, LoaderConfig};
//!
//! let graph = SqliteGraph::open_in_memory()?;
//! let doc = r#"{"vertices":[{"_id":1},{"_id":2}],
//!               "edges":[{"_id":10,"_outV":1,"_inV":2,"_label":"knows"}]}"#;
//! let stats = load_str(&graph, doc, &LoaderConfig::default(), ())?;
//! assert_eq!(stats.nodes_created, 2);
//! assert_eq!(stats.edges_created, 1);
//! # Ok::<(), graphload::LoadError>(())
//! ```

mod coerce;
mod document;
mod hooks;
mod reconcile;

use std::{
    cell::RefCell,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    backend::{GraphStore, Transaction},
    config::LoaderConfig,
    errors::LoadError,
    fault_injection::{self, FaultPoint},
    graph::{EdgeId, Element, NodeId},
};

pub use coerce::{apply_property, coerce};
pub use document::{EDGES, EdgeRecord, NodeRecord, RecordProperty, VERTICES, collection};
pub use hooks::{ConstructionHooks, FnHooks, StampHooks};
pub use reconcile::{Reconciled, reconcile_edge, reconcile_node};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub nodes_created: usize,
    pub nodes_reused: usize,
    pub edges_created: usize,
    pub edges_reused: usize,
    /// Nodes created on demand as edge endpoints.
    pub endpoints_synthesized: usize,
    pub properties_set: usize,
    pub properties_skipped: usize,
}

pub struct Loader<'s, S, H = ()> {
    store: &'s S,
    config: LoaderConfig,
    hooks: H,
}

impl<'s, S: GraphStore> Loader<'s, S, ()> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            config: LoaderConfig::default(),
            hooks: (),
        }
    }
}

impl<'s, S, H> Loader<'s, S, H>
where
    S: GraphStore,
    H: ConstructionHooks<S>,
{
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_hooks<H2: ConstructionHooks<S>>(self, hooks: H2) -> Loader<'s, S, H2> {
        Loader {
            store: self.store,
            config: self.config,
            hooks,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn load_path<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadStats, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LoadError::unreadable(path, e))?;
        self.load_reader(BufReader::new(file))
    }

    pub fn load_reader<R: Read>(&mut self, reader: R) -> Result<LoadStats, LoadError> {
        let root: Value = serde_json::from_reader(reader)?;
        self.load_document(&root)
    }

    pub fn load_str(&mut self, text: &str) -> Result<LoadStats, LoadError> {
        let root: Value = serde_json::from_str(text)?;
        self.load_document(&root)
    }

    /// Loads an already parsed document: every vertex, then every edge.
    pub fn load_document(&mut self, root: &Value) -> Result<LoadStats, LoadError> {
        self.config.validate()?;
        let mut stats = LoadStats::default();

        let vertices = collection(root, VERTICES).ok_or(LoadError::VerticesNotFound)?;
        info!(records = vertices.len(), "loading vertices");
        for (index, raw) in vertices.iter().enumerate() {
            self.load_node(index, raw, &mut stats)?;
        }

        let edges = collection(root, EDGES).ok_or(LoadError::EdgesNotFound)?;
        info!(records = edges.len(), "loading edges");
        for (index, raw) in edges.iter().enumerate() {
            self.load_edge(index, raw, &mut stats)?;
        }

        info!(
            nodes_created = stats.nodes_created,
            nodes_reused = stats.nodes_reused,
            edges_created = stats.edges_created,
            edges_reused = stats.edges_reused,
            endpoints_synthesized = stats.endpoints_synthesized,
            properties_set = stats.properties_set,
            properties_skipped = stats.properties_skipped,
            "load finished"
        );
        Ok(stats)
    }

    fn load_node(
        &mut self,
        index: usize,
        raw: &Value,
        stats: &mut LoadStats,
    ) -> Result<(), LoadError> {
        let Self {
            store,
            config,
            hooks,
        } = self;
        let store: &S = *store;
        let record = NodeRecord::from_value(index, raw, config)?;

        let tx = Transaction::begin(store)?;
        let node = reconcile_node(
            store,
            &config.id_key,
            record.id,
            None,
            |store: &S, node: NodeId| hooks.on_node_created(store, node),
        )?;
        let (set, skipped) =
            apply_properties(store, Element::Node(node.id()), &record.properties)?;
        fault_injection::check_fault(FaultPoint::NodeRecordBeforeCommit)?;
        tx.commit()?;

        debug!(
            index,
            external_id = record.id,
            node = %node.id(),
            created = node.was_created(),
            "vertex reconciled"
        );
        if node.was_created() {
            stats.nodes_created += 1;
        } else {
            stats.nodes_reused += 1;
        }
        stats.properties_set += set;
        stats.properties_skipped += skipped;
        Ok(())
    }

    fn load_edge(
        &mut self,
        index: usize,
        raw: &Value,
        stats: &mut LoadStats,
    ) -> Result<(), LoadError> {
        let Self {
            store,
            config,
            hooks,
        } = self;
        let store: &S = *store;
        let record = EdgeRecord::from_value(index, raw, config)?;

        let tx = Transaction::begin(store)?;
        let mut synthesized = 0;
        let hooks = RefCell::new(hooks);
        let edge = reconcile_edge(
            store,
            &config.id_key,
            config.edge_lookup,
            record.id,
            record.out_v,
            record.in_v,
            record.label,
            |store: &S, node: NodeId| {
                synthesized += 1;
                hooks.borrow_mut().on_node_created(store, node)
            },
            |store: &S, edge: EdgeId| hooks.borrow_mut().on_edge_created(store, edge),
        )?;
        let (set, skipped) =
            apply_properties(store, Element::Edge(edge.id()), &record.properties)?;
        fault_injection::check_fault(FaultPoint::EdgeRecordBeforeCommit)?;
        tx.commit()?;

        debug!(
            index,
            external_id = record.id,
            edge = %edge.id(),
            created = edge.was_created(),
            endpoints_synthesized = synthesized,
            "edge reconciled"
        );
        if edge.was_created() {
            stats.edges_created += 1;
        } else {
            stats.edges_reused += 1;
        }
        stats.endpoints_synthesized += synthesized;
        stats.nodes_created += synthesized;
        stats.properties_set += set;
        stats.properties_skipped += skipped;
        Ok(())
    }
}

fn apply_properties<S: GraphStore>(
    store: &S,
    element: Element,
    properties: &[RecordProperty<'_>],
) -> Result<(usize, usize), LoadError> {
    let mut set = 0;
    let mut skipped = 0;
    for (key, value) in properties {
        if apply_property(store, element, key, value)? {
            set += 1;
        } else {
            skipped += 1;
        }
    }
    Ok((set, skipped))
}

pub fn load_document<S, H>(
    store: &S,
    root: &Value,
    config: &LoaderConfig,
    hooks: H,
) -> Result<LoadStats, LoadError>
where
    S: GraphStore,
    H: ConstructionHooks<S>,
{
    Loader::new(store)
        .with_config(config.clone())
        .with_hooks(hooks)
        .load_document(root)
}

pub fn load_str<S, H>(
    store: &S,
    text: &str,
    config: &LoaderConfig,
    hooks: H,
) -> Result<LoadStats, LoadError>
where
    S: GraphStore,
    H: ConstructionHooks<S>,
{
    Loader::new(store)
        .with_config(config.clone())
        .with_hooks(hooks)
        .load_str(text)
}

pub fn load_reader<S, H, R>(
    store: &S,
    reader: R,
    config: &LoaderConfig,
    hooks: H,
) -> Result<LoadStats, LoadError>
where
    S: GraphStore,
    H: ConstructionHooks<S>,
    R: Read,
{
    Loader::new(store)
        .with_config(config.clone())
        .with_hooks(hooks)
        .load_reader(reader)
}

pub fn load_path<S, H, P>(
    store: &S,
    path: P,
    config: &LoaderConfig,
    hooks: H,
) -> Result<LoadStats, LoadError>
where
    S: GraphStore,
    H: ConstructionHooks<S>,
    P: AsRef<Path>,
{
    Loader::new(store)
        .with_config(config.clone())
        .with_hooks(hooks)
        .load_path(path)
}
