//! Import subcommand.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;

use super::{graph_service, parse_layout, report, Output};
use crate::context::Context;
use crate::graph::LayoutKind;
use crate::import::{CsvColumns, ImportFormat};

/// Import a CSV edge list or a JSON graph and print the result.
#[derive(Parser)]
pub struct ImportCommand {
    /// File to import.
    pub input: PathBuf,

    /// Input format. Guessed from the extension when omitted.
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<ImportFormat>,

    /// CSV column holding edge sources.
    #[arg(long, default_value = "source")]
    pub source_col: String,

    /// CSV column holding edge targets.
    #[arg(long, default_value = "target")]
    pub target_col: String,

    /// Layout to apply (circular, sphere, random, force).
    #[arg(short, long, value_parser = parse_layout)]
    pub layout: Option<LayoutKind>,
}

impl ImportCommand {
    pub async fn run(self, ctx: &Context, output: &Output) -> Result<()> {
        let service = graph_service(ctx);
        let columns = CsvColumns {
            source: self.source_col,
            target: self.target_col,
        };

        let status = service
            .import_file(&self.input, self.format, &columns, self.layout)
            .await?;
        report(&status);

        if let Some(graph) = service.current().await {
            output.graph(&graph)?;
        }
        Ok(())
    }
}
