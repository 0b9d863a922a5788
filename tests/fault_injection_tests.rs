use graphload::{
    GraphError, LoadError, LoaderConfig, PropertyPredicate, PropertyValue, SqliteGraph,
    fault_injection::{FaultPoint, configure_fault, configure_fault_after, reset_faults},
    load_document,
};
use serde_json::{Value, json};
use std::sync::{Mutex, OnceLock};

fn document() -> Value {
    json!({
        "vertices": [
            {"_id": 1, "name": "a"},
            {"_id": 2, "name": "b"},
            {"_id": 3, "name": "c"}
        ],
        "edges": [
            {"_id": 10, "_outV": 1, "_inV": 2, "_label": "next"},
            {"_id": 11, "_outV": 2, "_inV": 4, "_label": "next"}
        ]
    })
}

fn assert_fault(err: &LoadError) {
    assert!(
        matches!(err, LoadError::Store(GraphError::FaultInjected(_))),
        "expected fault error, got {err:?}"
    );
    assert!(err.to_string().contains("fault injected"));
}

#[test]
fn node_fault_keeps_earlier_records_and_drops_the_one_in_flight() {
    let _guard = test_lock().lock().unwrap();
    reset_faults();
    configure_fault_after(FaultPoint::NodeRecordBeforeCommit, 1, 1);
    let graph = SqliteGraph::open_in_memory().unwrap();
    let err = load_document(&graph, &document(), &LoaderConfig::default(), ()).unwrap_err();
    assert_fault(&err);
    assert_eq!(graph.node_count().unwrap(), 1);
    assert!(!graph.in_transaction());
    assert!(
        graph
            .find_nodes(&PropertyPredicate::equals("name", "b"))
            .unwrap()
            .is_empty()
    );

    reset_faults();
    let stats = load_document(&graph, &document(), &LoaderConfig::default(), ()).unwrap();
    assert_eq!(stats.nodes_reused, 1);
    assert_eq!(graph.node_count().unwrap(), 4);
    assert_eq!(graph.edge_count().unwrap(), 2);
}

#[test]
fn edge_fault_rolls_back_synthesized_endpoint() {
    let _guard = test_lock().lock().unwrap();
    reset_faults();
    configure_fault_after(FaultPoint::EdgeRecordBeforeCommit, 1, 1);
    let graph = SqliteGraph::open_in_memory().unwrap();
    let err = load_document(&graph, &document(), &LoaderConfig::default(), ()).unwrap_err();
    assert_fault(&err);
    // Vertex phase and the first edge committed; node 4 went with the failed edge.
    assert_eq!(graph.node_count().unwrap(), 3);
    assert_eq!(graph.edge_count().unwrap(), 1);
    assert!(
        graph
            .find_nodes(&PropertyPredicate::equals("loader.id", 4i64))
            .unwrap()
            .is_empty()
    );
    reset_faults();
}

#[test]
fn first_record_fault_leaves_store_untouched() {
    let _guard = test_lock().lock().unwrap();
    reset_faults();
    configure_fault(FaultPoint::NodeRecordBeforeCommit, 1);
    let graph = SqliteGraph::open_in_memory().unwrap();
    let err = load_document(&graph, &document(), &LoaderConfig::default(), ()).unwrap_err();
    assert_fault(&err);
    assert_eq!(graph.node_count().unwrap(), 0);

    // The fault fired once; the next load goes through.
    load_document(&graph, &document(), &LoaderConfig::default(), ()).unwrap();
    assert_eq!(graph.node_count().unwrap(), 4);
    reset_faults();
}

#[test]
fn reused_record_fault_restores_previous_values() {
    let _guard = test_lock().lock().unwrap();
    reset_faults();
    let graph = SqliteGraph::open_in_memory().unwrap();
    load_document(&graph, &document(), &LoaderConfig::default(), ()).unwrap();

    configure_fault(FaultPoint::NodeRecordBeforeCommit, 1);
    let changed = json!({"vertices": [{"_id": 1, "name": "changed"}], "edges": []});
    let err = load_document(&graph, &changed, &LoaderConfig::default(), ()).unwrap_err();
    assert_fault(&err);
    let node = graph
        .find_nodes(&PropertyPredicate::equals("loader.id", 1i64))
        .unwrap()[0];
    assert_eq!(
        graph.get_property(node.into(), "name").unwrap(),
        Some(PropertyValue::String("a".into()))
    );
    reset_faults();
}

fn test_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}
