//! Store capability surface consumed by the loader.
//!
//! [`GraphStore`] names exactly what the loader needs from a graph store:
//! transaction control, node/edge creation, typed property access, an equality
//! predicate over node properties, and a full scan over edges. [`SqliteGraph`]
//! implements it by delegating to its own primitives; any other store can be
//! plugged in the same way.

use crate::{
    errors::GraphError,
    graph::{EdgeId, EdgeInfo, Element, NodeId, PropertyPredicate, SqliteGraph},
    property::PropertyValue,
};

pub trait GraphStore {
    fn begin_transaction(&self) -> Result<(), GraphError>;
    fn commit_transaction(&self) -> Result<(), GraphError>;
    fn rollback_transaction(&self) -> Result<(), GraphError>;

    fn add_node(&self, tag: Option<&str>) -> Result<NodeId, GraphError>;
    fn add_edge(
        &self,
        source: NodeId,
        destination: NodeId,
        tag: Option<&str>,
    ) -> Result<EdgeId, GraphError>;

    fn set_property(
        &self,
        element: Element,
        key: &str,
        value: &PropertyValue,
    ) -> Result<(), GraphError>;
    fn get_property(&self, element: Element, key: &str)
    -> Result<Option<PropertyValue>, GraphError>;
    fn remove_property(&self, element: Element, key: &str) -> Result<bool, GraphError>;
    fn properties(&self, element: Element) -> Result<Vec<(String, PropertyValue)>, GraphError>;

    fn find_nodes(&self, predicate: &PropertyPredicate) -> Result<Vec<NodeId>, GraphError>;
    fn find_edges(&self, predicate: &PropertyPredicate) -> Result<Vec<EdgeId>, GraphError>;

    fn node_ids(&self) -> Result<Vec<NodeId>, GraphError>;
    fn edge_ids(&self) -> Result<Vec<EdgeId>, GraphError>;
    fn node_tag(&self, node: NodeId) -> Result<Option<String>, GraphError>;
    fn edge(&self, edge: EdgeId) -> Result<EdgeInfo, GraphError>;
    fn outgoing_edges(&self, node: NodeId) -> Result<Vec<EdgeId>, GraphError>;
    fn incoming_edges(&self, node: NodeId) -> Result<Vec<EdgeId>, GraphError>;

    /// Scans every edge in id order and returns the first one accepted by `filter`.
    fn find_edge_by<F>(&self, mut filter: F) -> Result<Option<EdgeId>, GraphError>
    where
        F: FnMut(&Self, EdgeId) -> Result<bool, GraphError>,
        Self: Sized,
    {
        for edge in self.edge_ids()? {
            if filter(self, edge)? {
                return Ok(Some(edge));
            }
        }
        Ok(None)
    }
}

/// Scoped transaction: begins on construction, rolls back on drop unless
/// [`Transaction::commit`] was called.
pub struct Transaction<'a, S: GraphStore + ?Sized> {
    store: &'a S,
    finished: bool,
}

impl<'a, S: GraphStore + ?Sized> Transaction<'a, S> {
    pub fn begin(store: &'a S) -> Result<Self, GraphError> {
        store.begin_transaction()?;
        Ok(Self {
            store,
            finished: false,
        })
    }

    pub fn commit(mut self) -> Result<(), GraphError> {
        self.finished = true;
        match self.store.commit_transaction() {
            Ok(()) => Ok(()),
            Err(err) => {
                let _ = self.store.rollback_transaction();
                Err(err)
            }
        }
    }

    pub fn rollback(mut self) -> Result<(), GraphError> {
        self.finished = true;
        self.store.rollback_transaction()
    }
}

impl<S: GraphStore + ?Sized> Drop for Transaction<'_, S> {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.store.rollback_transaction();
        }
    }
}

impl GraphStore for SqliteGraph {
    fn begin_transaction(&self) -> Result<(), GraphError> {
        SqliteGraph::begin_transaction(self)
    }

    fn commit_transaction(&self) -> Result<(), GraphError> {
        SqliteGraph::commit_transaction(self)
    }

    fn rollback_transaction(&self) -> Result<(), GraphError> {
        SqliteGraph::rollback_transaction(self)
    }

    fn add_node(&self, tag: Option<&str>) -> Result<NodeId, GraphError> {
        SqliteGraph::add_node(self, tag)
    }

    fn add_edge(
        &self,
        source: NodeId,
        destination: NodeId,
        tag: Option<&str>,
    ) -> Result<EdgeId, GraphError> {
        SqliteGraph::add_edge(self, source, destination, tag)
    }

    fn set_property(
        &self,
        element: Element,
        key: &str,
        value: &PropertyValue,
    ) -> Result<(), GraphError> {
        SqliteGraph::set_property(self, element, key, value)
    }

    fn get_property(
        &self,
        element: Element,
        key: &str,
    ) -> Result<Option<PropertyValue>, GraphError> {
        SqliteGraph::get_property(self, element, key)
    }

    fn remove_property(&self, element: Element, key: &str) -> Result<bool, GraphError> {
        SqliteGraph::remove_property(self, element, key)
    }

    fn properties(&self, element: Element) -> Result<Vec<(String, PropertyValue)>, GraphError> {
        SqliteGraph::properties(self, element)
    }

    fn find_nodes(&self, predicate: &PropertyPredicate) -> Result<Vec<NodeId>, GraphError> {
        SqliteGraph::find_nodes(self, predicate)
    }

    fn find_edges(&self, predicate: &PropertyPredicate) -> Result<Vec<EdgeId>, GraphError> {
        SqliteGraph::find_edges(self, predicate)
    }

    fn node_ids(&self) -> Result<Vec<NodeId>, GraphError> {
        SqliteGraph::node_ids(self)
    }

    fn edge_ids(&self) -> Result<Vec<EdgeId>, GraphError> {
        SqliteGraph::edge_ids(self)
    }

    fn node_tag(&self, node: NodeId) -> Result<Option<String>, GraphError> {
        SqliteGraph::node_tag(self, node)
    }

    fn edge(&self, edge: EdgeId) -> Result<EdgeInfo, GraphError> {
        SqliteGraph::get_edge(self, edge)
    }

    fn outgoing_edges(&self, node: NodeId) -> Result<Vec<EdgeId>, GraphError> {
        SqliteGraph::outgoing_edges(self, node)
    }

    fn incoming_edges(&self, node: NodeId) -> Result<Vec<EdgeId>, GraphError> {
        SqliteGraph::incoming_edges(self, node)
    }
}
