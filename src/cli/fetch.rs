//! Fetch and list subcommands.

use clap::Parser;
use color_eyre::Result;

use super::{graph_service, parse_layout, report, Output};
use crate::context::Context;
use crate::graph::LayoutKind;

/// Load a stored graph by id and print it.
#[derive(Parser)]
pub struct FetchCommand {
    /// Graph id.
    pub id: String,

    /// Re-lay out after loading.
    #[arg(short, long, value_parser = parse_layout)]
    pub layout: Option<LayoutKind>,
}

impl FetchCommand {
    pub async fn run(self, ctx: &Context, output: &Output) -> Result<()> {
        let service = graph_service(ctx);
        report(&service.load_by_id(&self.id).await?);

        if let Some(kind) = self.layout {
            service.apply_layout(kind).await?;
        }
        if let Some(graph) = service.current().await {
            output.graph(&graph)?;
        }
        Ok(())
    }
}

/// List stored graphs.
#[derive(Parser)]
pub struct ListCommand {}

impl ListCommand {
    pub async fn run(self, ctx: &Context, output: &Output) -> Result<()> {
        let graphs = graph_service(ctx).list().await?;
        tracing::info!("{} stored graphs", graphs.len());
        output.json(&serde_json::json!({ "graphs": graphs }))
    }
}
