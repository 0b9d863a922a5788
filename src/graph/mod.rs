mod edge_ops;
mod node_ops;
mod property_ops;
mod sqlite_graph;
mod types;

pub use sqlite_graph::SqliteGraph;
pub use types::{EdgeId, EdgeInfo, Element, NodeId, PropertyPredicate};
