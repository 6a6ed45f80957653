//! Boundary to whatever draws the graph.
//!
//! A renderer builds its meshes from [`Graph`] and reflects selection
//! changes; the workspace calls it after every successful mutation.

use crate::models::Graph;

/// Node counts above which a renderer should reduce detail.
pub const MAX_NODES_FOR_FULL_DETAIL: usize = 100;
/// Node counts above which a renderer should hide edges.
pub const MAX_NODES_FOR_EDGES: usize = 200;

/// Receives graph and selection changes.
pub trait PresentationSink: Send {
    /// Rebuild the scene for `graph`.
    fn render(&mut self, graph: &Graph);

    /// Reflect a selection change on one node.
    fn selection_changed(&mut self, node_id: &str, selected: bool);

    /// The view was cleared.
    fn cleared(&mut self);
}

/// Detail level a renderer should use for a graph of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderBudget {
    pub show_edges: bool,
    pub full_detail: bool,
}

impl RenderBudget {
    pub fn for_node_count(nodes: usize) -> Self {
        Self {
            show_edges: nodes <= MAX_NODES_FOR_EDGES,
            full_detail: nodes <= MAX_NODES_FOR_FULL_DETAIL,
        }
    }
}

/// Sink that only logs what it would draw.
#[derive(Debug, Default)]
pub struct LogSink {
    renders: usize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of renders so far.
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl PresentationSink for LogSink {
    fn render(&mut self, graph: &Graph) {
        self.renders += 1;
        let budget = RenderBudget::for_node_count(graph.nodes.len());
        let (center, radius) = graph.bounding_sphere();
        tracing::info!(
            "Render #{}: {} nodes, {} edges (edges shown: {}, full detail: {})",
            self.renders,
            graph.nodes.len(),
            graph.edges.len(),
            budget.show_edges,
            budget.full_detail
        );
        tracing::debug!(
            "Scene bounds: center=({:.2}, {:.2}, {:.2}) radius={:.2}",
            center.x,
            center.y,
            center.z,
            radius
        );
    }

    fn selection_changed(&mut self, node_id: &str, selected: bool) {
        tracing::info!("Node {} {}", node_id, if selected { "selected" } else { "deselected" });
    }

    fn cleared(&mut self) {
        tracing::info!("Scene cleared");
    }
}
