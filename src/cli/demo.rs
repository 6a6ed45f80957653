//! Demo subcommand.

use clap::Parser;
use color_eyre::Result;

use super::{graph_service, parse_layout, report, Output};
use crate::context::Context;
use crate::graph::LayoutKind;
use crate::import::synthetic;

/// Load the demo social graph, or generate a synthetic infrastructure graph.
#[derive(Parser)]
pub struct DemoCommand {
    /// Generate a synthetic graph with this many nodes instead.
    #[arg(long, value_name = "NODES")]
    pub synthetic: Option<usize>,

    /// Seed for the synthetic generator. Defaults to the layout seed, then random.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Layout to apply after loading.
    #[arg(short, long, value_parser = parse_layout)]
    pub layout: Option<LayoutKind>,
}

impl DemoCommand {
    pub async fn run(self, ctx: &Context, output: &Output) -> Result<()> {
        let service = graph_service(ctx);

        match self.synthetic {
            Some(nodes) => {
                let seed = self
                    .seed
                    .or(ctx.config.layout.seed)
                    .unwrap_or_else(rand::random);
                tracing::info!("Generating synthetic graph: {} nodes, seed {}", nodes, seed);
                let loaded = ctx.workspace.lock().await.load(synthetic(nodes, seed));
                tracing::info!("{} nodes, {} edges", loaded.nodes, loaded.edges);
            }
            None => report(&service.load_demo().await?),
        }

        if let Some(kind) = self.layout {
            service.apply_layout(kind).await?;
        }
        if let Some(graph) = service.current().await {
            output.graph(&graph)?;
        }
        Ok(())
    }
}
