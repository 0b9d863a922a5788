//! Human-readable listing of a store's nodes, edges and properties.

use std::io::Write;

use serde::Serialize;

use crate::{
    backend::GraphStore,
    errors::GraphError,
    graph::Element,
    property::PropertyValue,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Renders a property value the way [`dump_graph`] prints it.
pub fn property_text(value: &PropertyValue) -> String {
    match value {
        PropertyValue::NoValue => "no value".to_string(),
        PropertyValue::Boolean(true) => "T".to_string(),
        PropertyValue::Boolean(false) => "F".to_string(),
        PropertyValue::Integer(v) => v.to_string(),
        PropertyValue::String(v) => v.clone(),
        PropertyValue::Float(v) => format!("{v:.6}"),
    }
}

pub fn summary<S: GraphStore>(store: &S) -> Result<GraphSummary, GraphError> {
    Ok(GraphSummary {
        nodes: store.node_ids()?.len(),
        edges: store.edge_ids()?.len(),
    })
}

/// Writes every node with its properties and incident edges, then every edge.
///
/// ```text
/// Node 1:
///   name: A
///   -> n2 (e1)
/// Edge 1: n1 -> n2
///   weight: 3
/// ```
pub fn dump_graph<S: GraphStore, W: Write>(store: &S, mut writer: W) -> Result<(), GraphError> {
    for node in store.node_ids()? {
        write_line(&mut writer, format_args!("Node {}:", node.0))?;
        write_properties(store, Element::Node(node), &mut writer)?;
        for edge in store.outgoing_edges(node)? {
            let info = store.edge(edge)?;
            write_line(
                &mut writer,
                format_args!("  -> n{} (e{})", info.destination.0, edge.0),
            )?;
        }
        for edge in store.incoming_edges(node)? {
            let info = store.edge(edge)?;
            write_line(
                &mut writer,
                format_args!("  <- n{} (e{})", info.source.0, edge.0),
            )?;
        }
    }
    for edge in store.edge_ids()? {
        let info = store.edge(edge)?;
        write_line(
            &mut writer,
            format_args!("Edge {}: n{} -> n{}", edge.0, info.source.0, info.destination.0),
        )?;
        write_properties(store, Element::Edge(edge), &mut writer)?;
    }
    writer
        .flush()
        .map_err(|e| GraphError::invalid_input(e.to_string()))
}

pub fn dump_to_string<S: GraphStore>(store: &S) -> Result<String, GraphError> {
    let mut buffer = Vec::new();
    dump_graph(store, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| GraphError::invalid_input(e.to_string()))
}

fn write_properties<S: GraphStore, W: Write>(
    store: &S,
    element: Element,
    writer: &mut W,
) -> Result<(), GraphError> {
    for (key, value) in store.properties(element)? {
        write_line(writer, format_args!("  {key}: {}", property_text(&value)))?;
    }
    Ok(())
}

fn write_line<W: Write>(writer: &mut W, args: std::fmt::Arguments<'_>) -> Result<(), GraphError> {
    writer
        .write_fmt(args)
        .and_then(|_| writer.write_all(b"\n"))
        .map_err(|e| GraphError::invalid_input(e.to_string()))
}
