//! Filter subcommand.

use clap::Parser;
use color_eyre::Result;

use super::{graph_service, report, GraphInput, Output};
use crate::context::Context;
use crate::graph::FilterPredicate;

/// Filter a graph by connection count, node type and label.
#[derive(Parser)]
pub struct FilterCommand {
    #[command(flatten)]
    pub input: GraphInput,

    /// Minimum connections per node.
    #[arg(long, default_value_t = 0)]
    pub min: usize,

    /// Maximum connections per node. Defaults to `filter.max_connections`.
    #[arg(long)]
    pub max: Option<usize>,

    /// Keep only nodes of this type.
    #[arg(long = "type", value_name = "TYPE")]
    pub node_type: Option<String>,

    /// Keep only nodes whose label contains this text (case-insensitive).
    #[arg(long)]
    pub search: Option<String>,
}

impl FilterCommand {
    pub fn predicate(&self, default_max: usize) -> FilterPredicate {
        let mut predicate =
            FilterPredicate::connections(self.min, self.max.unwrap_or(default_max));
        if let Some(node_type) = &self.node_type {
            predicate = predicate.with_node_type(node_type.clone());
        }
        if let Some(term) = &self.search {
            predicate = predicate.with_search(term.clone());
        }
        predicate
    }

    pub async fn run(self, ctx: &Context, output: &Output) -> Result<()> {
        let service = graph_service(ctx);
        report(&self.input.load(&service).await?);

        let predicate = self.predicate(ctx.config.filter.max_connections);
        let filtered = service.filter(&predicate).await?;
        tracing::info!(
            "Filter kept {} of {} nodes",
            filtered.nodes.len(),
            filtered.metadata.original_node_count.unwrap_or_default()
        );
        output.graph(&filtered)
    }
}
