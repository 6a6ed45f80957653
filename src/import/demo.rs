//! Built-in graphs for trying the client without a backend.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Edge, Graph, Node};

/// Node types used by [`synthetic`].
pub const DEMO_NODE_TYPES: [&str; 4] = ["server", "database", "api", "service"];

const PEOPLE: [(&str, u32); 8] = [
    ("Alice", 30),
    ("Bob", 25),
    ("Charlie", 35),
    ("David", 28),
    ("Eve", 32),
    ("Frank", 40),
    ("Grace", 27),
    ("Henry", 33),
];

const RELATIONSHIPS: [(&str, &str, &str, u32); 10] = [
    ("Alice", "Bob", "friend", 5),
    ("Alice", "Charlie", "colleague", 3),
    ("Bob", "David", "friend", 4),
    ("Charlie", "Eve", "friend", 5),
    ("David", "Frank", "family", 10),
    ("Eve", "Grace", "colleague", 3),
    ("Frank", "Henry", "friend", 4),
    ("Grace", "Alice", "friend", 5),
    ("Bob", "Eve", "friend", 4),
    ("Charlie", "Frank", "colleague", 2),
];

/// Small social network: eight people, ten weighted relationships.
pub fn social_demo() -> Graph {
    let nodes = PEOPLE
        .iter()
        .map(|(name, age)| {
            Node::new(*name)
                .with_type("person")
                .with_property("age", *age)
        })
        .collect();

    let edges = RELATIONSHIPS
        .iter()
        .map(|(source, target, relationship, weight)| {
            Edge::new(*source, *target)
                .with_property("relationship", *relationship)
                .with_property("weight", *weight)
        })
        .collect();

    let mut graph = Graph::new(nodes, edges);
    graph.metadata.format = Some("demo".to_string());
    graph
}

/// Random infrastructure-style graph with `node_count` nodes.
///
/// Every node after the first links back to an earlier node, so the graph
/// is connected; about a quarter as many extra edges are added on top.
pub fn synthetic(node_count: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);

    let nodes: Vec<Node> = (0..node_count)
        .map(|i| {
            let kind = DEMO_NODE_TYPES[rng.gen_range(0..DEMO_NODE_TYPES.len())];
            Node::new(format!("node_{i}"))
                .with_label(format!("{kind}-{i}"))
                .with_type(kind)
                .with_property("load", rng.gen_range(0..100u32))
                .with_property("healthy", rng.gen_bool(0.9))
        })
        .collect();

    let mut edges = Vec::new();
    for i in 1..node_count {
        let parent = rng.gen_range(0..i);
        edges.push(Edge::new(&nodes[i].id, &nodes[parent].id));
    }
    if node_count > 1 {
        for _ in 0..node_count / 4 {
            let source = rng.gen_range(0..node_count);
            let target = rng.gen_range(0..node_count);
            if source != target {
                edges.push(
                    Edge::new(&nodes[source].id, &nodes[target].id)
                        .with_property("latency_ms", rng.gen_range(1..250u32)),
                );
            }
        }
    }

    let mut graph = Graph::new(nodes, edges);
    graph.metadata.format = Some("synthetic".to_string());
    graph
}
