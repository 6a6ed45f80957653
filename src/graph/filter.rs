//! Attribute filtering over the original graph snapshot.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Graph, GraphMetadata};

/// Constraints a node must satisfy to survive a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPredicate {
    /// Minimum number of incident edges (inclusive).
    #[serde(default)]
    pub min_connections: usize,
    /// Maximum number of incident edges (inclusive).
    #[serde(default = "unbounded")]
    pub max_connections: usize,
    /// Exact node type to keep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Case-insensitive substring of the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

fn unbounded() -> usize {
    usize::MAX
}

impl Default for FilterPredicate {
    fn default() -> Self {
        Self::unrestricted()
    }
}

impl FilterPredicate {
    /// A predicate every node satisfies.
    pub fn unrestricted() -> Self {
        Self {
            min_connections: 0,
            max_connections: usize::MAX,
            node_type: None,
            search_term: None,
        }
    }

    /// Connection-count range only.
    pub fn connections(min: usize, max: usize) -> Self {
        Self {
            min_connections: min,
            max_connections: max,
            ..Self::unrestricted()
        }
    }

    pub fn with_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Reject inverted bounds.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.min_connections > self.max_connections {
            return Err(AppError::InvalidPredicate(format!(
                "min_connections ({}) is greater than max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }
        Ok(())
    }

    fn type_constraint(&self) -> Option<&str> {
        self.node_type.as_deref().filter(|t| !t.is_empty())
    }

    fn search_constraint(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }
}

/// Number of incident edges per node id. Self-loops count twice.
pub fn connection_counts(graph: &Graph) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::with_capacity(graph.nodes.len());
    for edge in &graph.edges {
        *counts.entry(edge.source.as_str()).or_default() += 1;
        *counts.entry(edge.target.as_str()).or_default() += 1;
    }
    counts
}

/// Filter `original` down to the nodes matching `predicate` and the edges
/// between them. Relative order is preserved and `original` is not modified.
pub fn filter(original: &Graph, predicate: &FilterPredicate) -> Result<Graph, AppError> {
    predicate.validate()?;

    let counts = connection_counts(original);
    let node_type = predicate.type_constraint();
    let search = predicate.search_constraint();

    let nodes: Vec<_> = original
        .nodes
        .iter()
        .filter(|node| {
            let connections = counts.get(node.id.as_str()).copied().unwrap_or(0);
            let in_range = connections >= predicate.min_connections
                && connections <= predicate.max_connections;
            let type_ok = node_type.map_or(true, |t| node.kind() == Some(t));
            let search_ok = search.as_deref().map_or(true, |term| {
                node.display_label().to_lowercase().contains(term)
            });
            in_range && type_ok && search_ok
        })
        .cloned()
        .collect();

    let survivors: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges: Vec<_> = original
        .edges
        .iter()
        .filter(|e| survivors.contains(e.source.as_str()) && survivors.contains(e.target.as_str()))
        .cloned()
        .collect();

    let metadata = GraphMetadata {
        node_count: Some(nodes.len()),
        edge_count: Some(edges.len()),
        filtered: true,
        original_node_count: Some(original.nodes.len()),
        original_edge_count: Some(original.edges.len()),
        ..original.metadata.clone()
    };

    tracing::info!(
        "Filter: {} -> {} nodes, {} -> {} edges",
        original.nodes.len(),
        nodes.len(),
        original.edges.len(),
        edges.len()
    );

    Ok(Graph {
        nodes,
        edges,
        metadata,
    })
}
