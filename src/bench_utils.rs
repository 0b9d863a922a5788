//! Seeded GraphSON document generator for benchmarks and tests.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::{Value, json};

#[derive(Clone, Copy, Debug)]
pub struct DocumentShape {
    pub vertices: usize,
    pub edges: usize,
    /// Share of edge endpoints that reference ids absent from `vertices`.
    pub dangling_ratio: f64,
}

impl DocumentShape {
    pub fn new(vertices: usize, edges: usize) -> Self {
        Self {
            vertices,
            edges,
            dangling_ratio: 0.0,
        }
    }
}

/// Builds a document with vertex ids `1..=vertices` and edge ids starting
/// after them, each record carrying a mix of scalar properties.
pub fn generate_document(shape: DocumentShape, seed: u64) -> Value {
    let mut rng = StdRng::seed_from_u64(seed);
    let vertices: Vec<Value> = (1..=shape.vertices as i64)
        .map(|id| {
            json!({
                "_id": id,
                "_type": "vertex",
                "name": format!("v{id}"),
                "rank": rng.gen_range(0..1_000),
                "score": rng.r#gen::<f64>(),
                "active": rng.gen_bool(0.5),
            })
        })
        .collect();

    let first_edge = shape.vertices as i64 + 1;
    let max_vertex = shape.vertices.max(1) as i64;
    let edges: Vec<Value> = (0..shape.edges as i64)
        .map(|offset| {
            let endpoint = |rng: &mut StdRng| {
                if rng.gen_bool(shape.dangling_ratio.clamp(0.0, 1.0)) {
                    max_vertex + rng.gen_range(1..=max_vertex)
                } else {
                    rng.gen_range(1..=max_vertex)
                }
            };
            let out_v = endpoint(&mut rng);
            let in_v = endpoint(&mut rng);
            json!({
                "_id": first_edge + offset,
                "_type": "edge",
                "_outV": out_v,
                "_inV": in_v,
                "_label": if offset % 2 == 0 { "knows" } else { "created" },
                "weight": rng.gen_range(1..10),
            })
        })
        .collect();

    json!({ "vertices": vertices, "edges": edges })
}
