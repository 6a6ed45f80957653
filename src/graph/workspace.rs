//! The mutable aggregate every UI, network and collaboration event goes through.
//!
//! A [`Workspace`] wires [`GraphModel`], [`LayoutEngine`] and
//! [`SelectionState`] together. All mutations are synchronous; async loads
//! are split into [`Workspace::begin_load`] and [`Workspace::complete_load`]
//! so only the response to the most recent request is applied.

use std::collections::HashMap;

use crate::error::AppError;
use crate::models::{Graph, Position};
use crate::presentation::PresentationSink;

use super::filter::{self, FilterPredicate};
use super::layout::{LayoutEngine, LayoutKind};
use super::model::{sanitize, GraphModel, LoadReport};
use super::selection::{SelectionState, Toggle};

/// Identifies one load request. Only the newest ticket can complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Outcome of completing a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The graph is now current.
    Applied(LoadReport),
    /// A newer request was started; the response was discarded.
    Stale,
}

/// Graph state, layout and selection behind a single owner.
pub struct Workspace {
    model: GraphModel,
    layout: LayoutEngine,
    selection: SelectionState,
    generation: u64,
    /// Layout last applied since the current graph was loaded.
    active_layout: Option<LayoutKind>,
    sink: Option<Box<dyn PresentationSink>>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(LayoutEngine::default())
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("model", &self.model)
            .field("selection", &self.selection)
            .field("generation", &self.generation)
            .field("active_layout", &self.active_layout)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl Workspace {
    pub fn new(layout: LayoutEngine) -> Self {
        Self {
            model: GraphModel::new(),
            layout,
            selection: SelectionState::new(),
            generation: 0,
            active_layout: None,
            sink: None,
        }
    }

    /// Attach a renderer that is notified after each mutation.
    pub fn with_sink(mut self, sink: Box<dyn PresentationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn current_graph(&self) -> Option<&Graph> {
        self.model.current_graph()
    }

    pub fn original_graph(&self) -> Option<&Graph> {
        self.model.original_graph()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Start a load request. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Finish a load request.
    ///
    /// Stale tickets and failed results leave the workspace untouched.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Graph, AppError>,
    ) -> Result<LoadStatus, AppError> {
        if !self.is_current(ticket) {
            tracing::warn!(
                "Discarding response for load #{} (latest is #{})",
                ticket.0,
                self.generation
            );
            return Ok(LoadStatus::Stale);
        }

        let graph = result.map_err(|e| {
            tracing::error!("Load #{} failed: {}", ticket.0, e);
            e
        })?;
        Ok(LoadStatus::Applied(self.install(graph)))
    }

    /// Load a graph that is already in hand.
    pub fn load(&mut self, graph: Graph) -> LoadReport {
        self.begin_load();
        self.install(graph)
    }

    fn install(&mut self, mut graph: Graph) -> LoadReport {
        let mut report = sanitize(&mut graph);
        self.layout.ensure_positions(&mut graph);

        report.replaced_snapshot = self.model.load(graph);
        self.selection.clear();
        self.active_layout = None;

        tracing::info!(
            "Loaded graph: {} nodes, {} edges (baseline replaced: {})",
            report.nodes,
            report.edges,
            report.replaced_snapshot
        );
        self.render();
        report
    }

    // ------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------

    /// Filter the original snapshot and make the result current.
    ///
    /// Surviving nodes keep their current positions and selection.
    pub fn apply_filter(&mut self, predicate: &FilterPredicate) -> Result<&Graph, AppError> {
        let original = self.model.original_graph().ok_or(AppError::EmptyGraph)?;
        let mut filtered = filter::filter(original, predicate)?;
        self.place(&mut filtered);
        self.selection.retain(|id| filtered.contains_node(id));

        self.model.apply_filtered(filtered);
        self.render();
        self.model.current_graph().ok_or(AppError::EmptyGraph)
    }

    /// Restore the original snapshot as the current graph.
    ///
    /// If a layout was applied to a filtered view, it is re-run over the
    /// restored graph so hidden nodes don't land on laid-out ones.
    pub fn reset_filters(&mut self) -> Result<&Graph, AppError> {
        let mut restored = self
            .model
            .original_graph()
            .cloned()
            .ok_or(AppError::EmptyGraph)?;
        self.place(&mut restored);

        self.model.apply_filtered(restored);
        tracing::info!("Filters reset");
        self.render();
        self.model.current_graph().ok_or(AppError::EmptyGraph)
    }

    /// Position a graph that is about to replace the current view.
    ///
    /// Nodes already shown keep their positions. When the new view brings back
    /// hidden nodes after a layout, the layout is re-run over the whole view.
    fn place(&mut self, graph: &mut Graph) {
        let widens = self.model.current_graph().map_or(true, |current| {
            graph.nodes.iter().any(|n| !current.contains_node(&n.id))
        });
        match self.active_layout {
            Some(kind) if widens => {
                tracing::debug!("Re-running {} layout over {} nodes", kind, graph.nodes.len());
                self.layout.apply(graph, kind);
            }
            _ => self.carry_positions(graph),
        }
    }

    /// Copy positions of nodes that are currently shown onto `graph`.
    fn carry_positions(&self, graph: &mut Graph) {
        let Some(current) = self.model.current_graph() else {
            return;
        };
        let positions: HashMap<&str, Position> = current
            .nodes
            .iter()
            .filter_map(|n| n.position.map(|p| (n.id.as_str(), p)))
            .collect();

        for node in &mut graph.nodes {
            if let Some(&position) = positions.get(node.id.as_str()) {
                node.position = Some(position);
            }
        }
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Re-lay out the current graph. Returns whether any position changed.
    pub fn apply_layout(&mut self, kind: LayoutKind) -> Result<bool, AppError> {
        let graph = self.model.current_graph_mut().ok_or(AppError::EmptyGraph)?;
        let changed = self.layout.apply(graph, kind);
        if changed {
            self.active_layout = Some(kind);
            tracing::info!("Applied {} layout", kind);
            self.render();
        } else {
            tracing::info!("Layout {} left positions unchanged", kind);
        }
        Ok(changed)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Toggle selection of a node in the current graph.
    pub fn toggle_selection(&mut self, node_id: &str) -> Result<Toggle, AppError> {
        let graph = self.model.current_graph().ok_or(AppError::EmptyGraph)?;
        if !graph.contains_node(node_id) {
            return Err(AppError::NodeNotFound(node_id.to_string()));
        }

        let toggle = self.selection.toggle(node_id);
        if let Some(sink) = self.sink.as_mut() {
            sink.selection_changed(node_id, toggle.selected);
        }
        Ok(toggle)
    }

    pub fn clear_selection(&mut self) {
        for id in self.selection.selected() {
            if let Some(sink) = self.sink.as_mut() {
                sink.selection_changed(id, false);
            }
        }
        self.selection.clear();
    }

    /// Empty the view. The original snapshot is kept for filter resets.
    pub fn clear(&mut self) {
        self.model.clear();
        self.selection.clear();
        if let Some(sink) = self.sink.as_mut() {
            sink.cleared();
        }
    }

    fn render(&mut self) {
        if let (Some(sink), Some(graph)) = (self.sink.as_mut(), self.model.current_graph()) {
            sink.render(graph);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, Node};
    use std::sync::{Arc, Mutex};

    fn chain() -> Graph {
        Graph::new(
            vec![Node::new("A"), Node::new("B"), Node::new("C")],
            vec![Edge::new("A", "B"), Edge::new("B", "C")],
        )
    }

    #[derive(Default)]
    struct Recorded {
        renders: Vec<usize>,
        selections: Vec<(String, bool)>,
        clears: usize,
    }

    struct RecordingSink(Arc<Mutex<Recorded>>);

    impl PresentationSink for RecordingSink {
        fn render(&mut self, graph: &Graph) {
            self.0.lock().unwrap().renders.push(graph.nodes.len());
        }
        fn selection_changed(&mut self, node_id: &str, selected: bool) {
            self.0
                .lock()
                .unwrap()
                .selections
                .push((node_id.to_string(), selected));
        }
        fn cleared(&mut self) {
            self.0.lock().unwrap().clears += 1;
        }
    }

    #[test]
    fn test_load_assigns_positions_and_snapshot() {
        let mut ws = Workspace::default();
        let report = ws.load(chain());

        assert!(report.replaced_snapshot);
        let current = ws.current_graph().unwrap();
        assert!(current.nodes.iter().all(|n| n.has_position()));
        assert_eq!(ws.original_graph(), ws.current_graph());
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut ws = Workspace::default();
        let first = ws.begin_load();
        let second = ws.begin_load();

        let status = ws.complete_load(second, Ok(chain())).unwrap();
        assert!(matches!(status, LoadStatus::Applied(_)));

        let big = Graph::new((0..10).map(|i| Node::new(format!("n{i}"))).collect(), vec![]);
        assert_eq!(ws.complete_load(first, Ok(big)).unwrap(), LoadStatus::Stale);
        assert_eq!(ws.current_graph().unwrap().nodes.len(), 3);
    }

    #[test]
    fn test_failed_load_keeps_previous_graph() {
        let mut ws = Workspace::default();
        ws.load(chain());
        let before = ws.current_graph().cloned();

        let ticket = ws.begin_load();
        let err = ws
            .complete_load(ticket, Err(AppError::LoadFailure("boom".into())))
            .unwrap_err();

        assert_eq!(err.code(), "LOAD_FAILURE");
        assert_eq!(ws.current_graph().cloned(), before);
    }

    #[test]
    fn test_filter_without_graph() {
        let mut ws = Workspace::default();
        let err = ws.apply_filter(&FilterPredicate::unrestricted()).unwrap_err();
        assert!(matches!(err, AppError::EmptyGraph));
        assert!(matches!(
            ws.apply_layout(LayoutKind::Circular),
            Err(AppError::EmptyGraph)
        ));
    }

    #[test]
    fn test_invalid_filter_keeps_current_graph() {
        let mut ws = Workspace::default();
        ws.load(chain());
        assert!(ws.apply_filter(&FilterPredicate::connections(5, 1)).is_err());
        assert_eq!(ws.current_graph().unwrap().nodes.len(), 3);
    }

    #[test]
    fn test_filters_are_not_cumulative() {
        let mut ws = Workspace::default();
        ws.load(chain());

        let narrowed = ws.apply_filter(&FilterPredicate::connections(2, 2)).unwrap();
        assert_eq!(narrowed.nodes.len(), 1);

        // A wider filter sees the whole original graph again.
        let widened = ws.apply_filter(&FilterPredicate::connections(1, 2)).unwrap();
        assert_eq!(widened.nodes.len(), 3);
        assert_eq!(widened.edges.len(), 2);
        assert_eq!(ws.original_graph().unwrap().nodes.len(), 3);
    }

    #[test]
    fn test_filter_keeps_laid_out_positions() {
        let mut ws = Workspace::new(LayoutEngine::new(Some(3)));
        ws.load(chain());
        ws.apply_layout(LayoutKind::Random).unwrap();
        let b_position = ws.current_graph().unwrap().node("B").unwrap().position;

        let filtered = ws.apply_filter(&FilterPredicate::connections(2, 2)).unwrap();
        assert_eq!(filtered.node("B").unwrap().position, b_position);

        // The snapshot keeps its load-time positions.
        assert_ne!(ws.original_graph().unwrap().node("B").unwrap().position, b_position);
    }

    #[test]
    fn test_reset_restores_all_nodes() {
        let mut ws = Workspace::default();
        ws.load(chain());
        ws.apply_filter(&FilterPredicate::connections(2, 2)).unwrap();

        let restored = ws.reset_filters().unwrap();
        assert_eq!(restored.nodes.len(), 3);
        assert!(!restored.metadata.filtered);
    }

    #[test]
    fn test_reset_after_layout_on_filtered_view() {
        let mut ws = Workspace::default();
        ws.load(chain());
        ws.apply_filter(&FilterPredicate::connections(1, 1)).unwrap();
        ws.apply_layout(LayoutKind::Circular).unwrap();

        let restored = ws.reset_filters().unwrap();
        let positions: Vec<Position> = restored
            .nodes
            .iter()
            .map(|n| n.position.unwrap())
            .collect();
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert!(a.distance(b) > 1e-6, "{a:?} overlaps {b:?}");
            }
        }
        assert!(positions[0].distance(&Position::new(5.0, 0.0, 0.0)) < 1e-9);
    }

    #[test]
    fn test_reset_without_layout_keeps_positions() {
        let mut ws = Workspace::default();
        ws.load(chain());
        let loaded = ws.current_graph().cloned();
        ws.apply_filter(&FilterPredicate::connections(2, 2)).unwrap();

        assert_eq!(ws.reset_filters().unwrap().nodes, loaded.unwrap().nodes);
    }

    #[test]
    fn test_selection_toggle_and_prune_on_filter() {
        let mut ws = Workspace::default();
        ws.load(chain());

        assert!(ws.toggle_selection("A").unwrap().selected);
        assert!(ws.toggle_selection("B").unwrap().selected);
        assert!(matches!(
            ws.toggle_selection("Z"),
            Err(AppError::NodeNotFound(_))
        ));

        ws.apply_filter(&FilterPredicate::connections(2, 2)).unwrap();
        assert_eq!(ws.selection().selected(), vec!["B"]);
    }

    #[test]
    fn test_reload_clears_selection() {
        let mut ws = Workspace::default();
        ws.load(chain());
        ws.toggle_selection("A").unwrap();
        ws.load(chain());
        assert!(ws.selection().is_empty());
    }

    #[test]
    fn test_force_layout_reports_no_change() {
        let mut ws = Workspace::default();
        ws.load(chain());
        let before = ws.current_graph().cloned();
        assert!(!ws.apply_layout(LayoutKind::Force).unwrap());
        assert_eq!(ws.current_graph().cloned(), before);
    }

    #[test]
    fn test_sink_notifications() {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let mut ws = Workspace::default().with_sink(Box::new(RecordingSink(recorded.clone())));

        ws.load(chain());
        ws.apply_filter(&FilterPredicate::connections(2, 2)).unwrap();
        ws.toggle_selection("B").unwrap();
        ws.clear_selection();
        ws.clear();

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.renders, vec![3, 1]);
        assert_eq!(
            recorded.selections,
            vec![("B".to_string(), true), ("B".to_string(), false)]
        );
        assert_eq!(recorded.clears, 1);
    }

    #[test]
    fn test_clear_keeps_baseline_for_filters() {
        let mut ws = Workspace::default();
        ws.load(chain());
        ws.clear();
        assert!(ws.current_graph().is_none());
        assert_eq!(ws.reset_filters().unwrap().nodes.len(), 3);
    }
}
