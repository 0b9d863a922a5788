//! Construction hooks run on every node and edge the loader creates.

use crate::{
    backend::GraphStore,
    errors::GraphError,
    graph::{EdgeId, Element, NodeId},
    property::PropertyValue,
};

/// Callbacks invoked exactly once per newly created node or edge.
///
/// The node hook also runs for endpoints synthesized while loading edges.
/// A hook error aborts the current record like any store error.
pub trait ConstructionHooks<S: GraphStore> {
    fn on_node_created(&mut self, _store: &S, _node: NodeId) -> Result<(), GraphError> {
        Ok(())
    }

    fn on_edge_created(&mut self, _store: &S, _edge: EdgeId) -> Result<(), GraphError> {
        Ok(())
    }
}

impl<S: GraphStore> ConstructionHooks<S> for () {}

impl<S: GraphStore, H: ConstructionHooks<S> + ?Sized> ConstructionHooks<S> for &mut H {
    fn on_node_created(&mut self, store: &S, node: NodeId) -> Result<(), GraphError> {
        (**self).on_node_created(store, node)
    }

    fn on_edge_created(&mut self, store: &S, edge: EdgeId) -> Result<(), GraphError> {
        (**self).on_edge_created(store, edge)
    }
}

/// Hooks built from a pair of closures.
pub struct FnHooks<N, E> {
    node: N,
    edge: E,
}

impl<N, E> FnHooks<N, E> {
    pub fn new<S>(node: N, edge: E) -> Self
    where
        S: GraphStore,
        N: FnMut(&S, NodeId) -> Result<(), GraphError>,
        E: FnMut(&S, EdgeId) -> Result<(), GraphError>,
    {
        Self { node, edge }
    }
}

impl<S, N, E> ConstructionHooks<S> for FnHooks<N, E>
where
    S: GraphStore,
    N: FnMut(&S, NodeId) -> Result<(), GraphError>,
    E: FnMut(&S, EdgeId) -> Result<(), GraphError>,
{
    fn on_node_created(&mut self, store: &S, node: NodeId) -> Result<(), GraphError> {
        (self.node)(store, node)
    }

    fn on_edge_created(&mut self, store: &S, edge: EdgeId) -> Result<(), GraphError> {
        (self.edge)(store, edge)
    }
}

/// Sets a fixed list of properties on every created node and edge.
#[derive(Clone, Debug, Default)]
pub struct StampHooks {
    properties: Vec<(String, PropertyValue)>,
}

impl StampHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K: Into<String>, V: Into<PropertyValue>>(mut self, key: K, value: V) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn stamp<S: GraphStore>(&self, store: &S, element: Element) -> Result<(), GraphError> {
        for (key, value) in &self.properties {
            store.set_property(element, key, value)?;
        }
        Ok(())
    }
}

impl<S: GraphStore> ConstructionHooks<S> for StampHooks {
    fn on_node_created(&mut self, store: &S, node: NodeId) -> Result<(), GraphError> {
        self.stamp(store, Element::Node(node))
    }

    fn on_edge_created(&mut self, store: &S, edge: EdgeId) -> Result<(), GraphError> {
        self.stamp(store, Element::Edge(edge))
    }
}
