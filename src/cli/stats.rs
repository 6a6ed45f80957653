//! Stats subcommand.

use std::collections::BTreeMap;

use clap::Parser;
use color_eyre::Result;
use serde::Serialize;

use super::{graph_service, report, GraphInput, Output};
use crate::context::Context;
use crate::graph::connection_counts;
use crate::models::{Graph, Position};
use crate::presentation::RenderBudget;

/// Print node/edge counts, types and connection distribution.
#[derive(Parser)]
pub struct StatsCommand {
    #[command(flatten)]
    pub input: GraphInput,
}

#[derive(Debug, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub node_types: Vec<String>,
    pub dropped_edges: usize,
    /// Connection count → number of nodes with it.
    pub connections: BTreeMap<usize, usize>,
    pub max_connections: usize,
    pub center: Position,
    pub radius: f64,
    pub show_edges: bool,
    pub full_detail: bool,
}

impl GraphStats {
    pub fn of(graph: &Graph) -> Self {
        let counts = connection_counts(graph);
        let mut connections = BTreeMap::new();
        for node in &graph.nodes {
            let count = counts.get(node.id.as_str()).copied().unwrap_or(0);
            *connections.entry(count).or_insert(0) += 1;
        }
        let (center, radius) = graph.bounding_sphere();
        let budget = RenderBudget::for_node_count(graph.nodes.len());

        Self {
            nodes: graph.nodes.len(),
            edges: graph.edges.len(),
            node_types: graph.node_types(),
            dropped_edges: graph.metadata.dropped_edges.unwrap_or(0),
            max_connections: connections.keys().next_back().copied().unwrap_or(0),
            connections,
            center,
            radius,
            show_edges: budget.show_edges,
            full_detail: budget.full_detail,
        }
    }
}

impl StatsCommand {
    pub async fn run(self, ctx: &Context, output: &Output) -> Result<()> {
        let service = graph_service(ctx);
        report(&self.input.load(&service).await?);

        match service.current().await {
            Some(graph) => output.json(&GraphStats::of(&graph)),
            None => Err(color_eyre::eyre::eyre!("No graph loaded")),
        }
    }
}
