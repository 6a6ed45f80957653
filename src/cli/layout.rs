//! Layout subcommand.

use clap::Parser;
use color_eyre::Result;

use super::{graph_service, parse_layout, report, GraphInput, Output};
use crate::context::Context;
use crate::graph::LayoutKind;

/// Apply a layout to a graph and print the positioned graph.
#[derive(Parser)]
pub struct LayoutCommand {
    /// circular, sphere, random or force.
    #[arg(value_parser = parse_layout)]
    pub kind: LayoutKind,

    #[command(flatten)]
    pub input: GraphInput,
}

impl LayoutCommand {
    pub async fn run(self, ctx: &Context, output: &Output) -> Result<()> {
        let service = graph_service(ctx);
        report(&self.input.load(&service).await?);

        if !service.apply_layout(self.kind).await? {
            tracing::info!("{} layout keeps the existing positions", self.kind);
        }
        if let Some(graph) = service.current().await {
            output.graph(&graph)?;
        }
        Ok(())
    }
}
