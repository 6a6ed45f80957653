//! Current graph plus the original snapshot filters are computed from.

use std::collections::HashSet;

use crate::models::Graph;

/// What sanitising an incoming graph repaired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub nodes: usize,
    pub edges: usize,
    /// Later nodes reusing an id that was already seen.
    pub duplicate_nodes: usize,
    /// Edges with an endpoint that isn't a node.
    pub dropped_edges: usize,
    /// Whether this load became the new filter baseline.
    pub replaced_snapshot: bool,
}

/// Enforce graph invariants on untrusted input.
///
/// First occurrence of a node id wins. Edges whose endpoints are not in the
/// node set are dropped and counted rather than reported as errors. Empty
/// labels become the node id.
pub fn sanitize(graph: &mut Graph) -> LoadReport {
    let mut seen: HashSet<String> = HashSet::with_capacity(graph.nodes.len());
    let before = graph.nodes.len();
    graph.nodes.retain(|node| seen.insert(node.id.clone()));
    let duplicate_nodes = before - graph.nodes.len();

    for node in &mut graph.nodes {
        if node.label.is_empty() {
            node.label = node.id.clone();
        }
    }

    let before = graph.edges.len();
    graph
        .edges
        .retain(|e| seen.contains(&e.source) && seen.contains(&e.target));
    let dropped_edges = before - graph.edges.len();

    if duplicate_nodes > 0 {
        tracing::warn!("Ignored {} duplicate node ids", duplicate_nodes);
    }
    if dropped_edges > 0 {
        tracing::warn!("Dropped {} edges referencing unknown nodes", dropped_edges);
        graph.metadata.dropped_edges = Some(dropped_edges);
    }
    graph.refresh_counts();

    LoadReport {
        nodes: graph.nodes.len(),
        edges: graph.edges.len(),
        duplicate_nodes,
        dropped_edges,
        replaced_snapshot: false,
    }
}

/// Owns the active graph and the baseline it was derived from.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    current: Option<Graph>,
    original: Option<Graph>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `graph` current.
    ///
    /// It also becomes the original snapshot when there is none yet or when it
    /// has at least as many nodes as the existing one. Returns whether the
    /// snapshot was replaced.
    pub fn load(&mut self, graph: Graph) -> bool {
        let replace = self
            .original
            .as_ref()
            .map_or(true, |original| graph.nodes.len() >= original.nodes.len());

        if replace {
            self.original = Some(graph.clone());
        }
        self.current = Some(graph);
        replace
    }

    /// Make a filter result current. The snapshot is left alone.
    pub fn apply_filtered(&mut self, graph: Graph) {
        self.current = Some(graph);
    }

    pub fn current_graph(&self) -> Option<&Graph> {
        self.current.as_ref()
    }

    /// Mutable access for position updates.
    pub fn current_graph_mut(&mut self) -> Option<&mut Graph> {
        self.current.as_mut()
    }

    pub fn original_graph(&self) -> Option<&Graph> {
        self.original.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// Drop the current graph. The snapshot survives.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, Node};

    fn sized(n: usize) -> Graph {
        Graph::new((0..n).map(|i| Node::new(format!("n{i}"))).collect(), vec![])
    }

    #[test]
    fn test_first_load_becomes_snapshot() {
        let mut model = GraphModel::new();
        assert!(model.original_graph().is_none());
        assert!(model.load(sized(3)));
        assert_eq!(model.original_graph().unwrap().nodes.len(), 3);
        assert_eq!(model.current_graph().unwrap().nodes.len(), 3);
    }

    #[test]
    fn test_smaller_load_keeps_snapshot() {
        let mut model = GraphModel::new();
        model.load(sized(10));
        assert!(!model.load(sized(5)));

        assert_eq!(model.original_graph().unwrap().nodes.len(), 10);
        assert_eq!(model.current_graph().unwrap().nodes.len(), 5);
    }

    #[test]
    fn test_equal_or_larger_load_replaces_snapshot() {
        let mut model = GraphModel::new();
        model.load(sized(5));
        assert!(model.load(sized(5)));
        assert!(model.load(sized(8)));
        assert_eq!(model.original_graph().unwrap().nodes.len(), 8);
    }

    #[test]
    fn test_filtered_result_never_touches_snapshot() {
        let mut model = GraphModel::new();
        model.load(sized(4));
        model.apply_filtered(sized(9));
        assert_eq!(model.original_graph().unwrap().nodes.len(), 4);
        assert_eq!(model.current_graph().unwrap().nodes.len(), 9);
    }

    #[test]
    fn test_clear_keeps_snapshot() {
        let mut model = GraphModel::new();
        model.load(sized(2));
        model.clear();
        assert!(!model.is_loaded());
        assert!(model.original_graph().is_some());
    }

    #[test]
    fn test_sanitize_drops_dangling_edges_and_duplicates() {
        let mut graph = Graph::new(
            vec![
                Node::new("a").with_label("first"),
                Node::new("b"),
                Node::new("a").with_label("second"),
            ],
            vec![Edge::new("a", "b"), Edge::new("b", "ghost")],
        );

        let report = sanitize(&mut graph);

        assert_eq!(report.duplicate_nodes, 1);
        assert_eq!(report.dropped_edges, 1);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.node("a").unwrap().label, "first");
        assert_eq!(graph.edges, vec![Edge::new("a", "b")]);
        assert_eq!(graph.metadata.dropped_edges, Some(1));
        assert_eq!(graph.metadata.edge_count, Some(1));
    }

    #[test]
    fn test_sanitize_fills_empty_labels() {
        let mut graph = Graph::new(vec![Node::new("x").with_label("")], vec![]);
        sanitize(&mut graph);
        assert_eq!(graph.nodes[0].label, "x");
        assert_eq!(graph.metadata.dropped_edges, None);
    }
}
