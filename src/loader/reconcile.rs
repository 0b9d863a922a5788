//! Get-or-create of nodes and edges keyed by external id.

use tracing::warn;

use crate::{
    backend::GraphStore,
    config::EdgeLookup,
    errors::GraphError,
    graph::{EdgeId, Element, NodeId, PropertyPredicate},
    property::PropertyValue,
};

/// Outcome of a reconciliation: an existing element or a freshly created one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciled<T> {
    Found(T),
    Created(T),
}

impl<T: Copy> Reconciled<T> {
    pub fn id(&self) -> T {
        match self {
            Reconciled::Found(id) | Reconciled::Created(id) => *id,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Reconciled::Created(_))
    }
}

/// Returns the node whose `id_key` property equals `external_id`, creating it
/// with `tag` when absent. `on_create` runs only for a new node, after its id
/// property is set.
pub fn reconcile_node<S, F>(
    store: &S,
    id_key: &str,
    external_id: i64,
    tag: Option<&str>,
    on_create: F,
) -> Result<Reconciled<NodeId>, GraphError>
where
    S: GraphStore,
    F: FnOnce(&S, NodeId) -> Result<(), GraphError>,
{
    let predicate = PropertyPredicate::equals(id_key, external_id);
    let matches = store.find_nodes(&predicate)?;
    if let Some(&node) = matches.first() {
        if matches.len() > 1 {
            warn!(
                external_id,
                count = matches.len(),
                chosen = %node,
                "external id matches several nodes; using the lowest id"
            );
        }
        return Ok(Reconciled::Found(node));
    }

    let node = store.add_node(tag)?;
    store.set_property(
        Element::Node(node),
        id_key,
        &PropertyValue::Integer(external_id),
    )?;
    on_create(store, node)?;
    Ok(Reconciled::Created(node))
}

/// Returns the edge whose `id_key` property equals `external_id`, creating a
/// `source -> destination` edge labelled `label` when absent.
///
/// On a miss both endpoints are reconciled first; endpoints that do not exist
/// yet are created untyped and handed to `endpoint_hook`. `on_create` runs for
/// a new edge after its id property is set.
#[allow(clippy::too_many_arguments)]
pub fn reconcile_edge<S, N, E>(
    store: &S,
    id_key: &str,
    lookup: EdgeLookup,
    external_id: i64,
    source_id: i64,
    destination_id: i64,
    label: &str,
    mut endpoint_hook: N,
    on_create: E,
) -> Result<Reconciled<EdgeId>, GraphError>
where
    S: GraphStore,
    N: FnMut(&S, NodeId) -> Result<(), GraphError>,
    E: FnOnce(&S, EdgeId) -> Result<(), GraphError>,
{
    if let Some(edge) = find_edge(store, id_key, lookup, external_id)? {
        return Ok(Reconciled::Found(edge));
    }

    let source = reconcile_node(store, id_key, source_id, None, &mut endpoint_hook)?.id();
    let destination = reconcile_node(store, id_key, destination_id, None, &mut endpoint_hook)?.id();

    let tag = (!label.trim().is_empty()).then_some(label);
    let edge = store.add_edge(source, destination, tag)?;
    store.set_property(
        Element::Edge(edge),
        id_key,
        &PropertyValue::Integer(external_id),
    )?;
    on_create(store, edge)?;
    Ok(Reconciled::Created(edge))
}

fn find_edge<S: GraphStore>(
    store: &S,
    id_key: &str,
    lookup: EdgeLookup,
    external_id: i64,
) -> Result<Option<EdgeId>, GraphError> {
    let predicate = PropertyPredicate::equals(id_key, external_id);
    match lookup {
        EdgeLookup::Scan => store.find_edge_by(|store, edge| {
            let value = store.get_property(Element::Edge(edge), id_key)?;
            Ok(predicate.matches(value.as_ref()))
        }),
        EdgeLookup::Indexed => {
            let matches = store.find_edges(&predicate)?;
            if matches.len() > 1 {
                warn!(
                    external_id,
                    count = matches.len(),
                    "external id matches several edges; using the lowest id"
                );
            }
            Ok(matches.first().copied())
        }
    }
}
