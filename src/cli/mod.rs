//! CLI module for graphsphere.
//!
//! Subcommands:
//! - `import`: Import a CSV or JSON file
//! - `fetch`: Load a stored graph from the API
//! - `list`: List stored graphs
//! - `demo`: Load the demo graph or generate a synthetic one
//! - `layout`: Re-lay out a graph
//! - `filter`: Filter a graph by connections, type and label
//! - `stats`: Summarise a graph

mod demo;
mod fetch;
mod filter;
mod import;
mod layout;
mod output;
mod stats;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;
use crate::di::FromRef;
use crate::graph::{LayoutKind, LoadStatus};
use crate::import::CsvColumns;
use crate::services::GraphService;
use crate::source::LocalGraphSource;

pub use demo::DemoCommand;
pub use fetch::{FetchCommand, ListCommand};
pub use filter::FilterCommand;
pub use import::ImportCommand;
pub use layout::LayoutCommand;
pub use output::Output;
pub use stats::StatsCommand;

/// graphsphere - 3D graph exploration client
#[derive(Parser)]
#[command(name = "graphsphere")]
#[command(about = "Load, lay out and filter graphs for 3D exploration")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read graphs from this directory instead of the graph API
    #[arg(long, global = true, value_name = "DIR")]
    pub local: Option<PathBuf>,

    /// Write JSON here instead of stdout (a directory gets a timestamped export)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a CSV edge list or JSON graph
    Import(ImportCommand),

    /// Load a stored graph by id
    Fetch(FetchCommand),

    /// List stored graphs
    List(ListCommand),

    /// Load the demo graph
    Demo(DemoCommand),

    /// Apply a layout to a graph
    Layout(LayoutCommand),

    /// Filter a graph
    Filter(FilterCommand),

    /// Print graph statistics
    Stats(StatsCommand),
}

/// Which graph a command works on.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct GraphInput {
    /// CSV or JSON file to import
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Stored graph id
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// The demo graph
    #[arg(long)]
    pub demo: bool,
}

impl GraphInput {
    /// Load the selected graph into the workspace.
    pub async fn load(&self, service: &GraphService) -> Result<LoadStatus> {
        let status = match (&self.file, &self.id) {
            (Some(path), _) => {
                service
                    .import_file(path, None, &CsvColumns::default(), None)
                    .await?
            }
            (None, Some(id)) => service.load_by_id(id).await?,
            (None, None) => service.load_demo().await?,
        };
        Ok(status)
    }
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;
        let ctx = self.context(config)?;
        let output = Output::new(self.output.clone());

        match self.command {
            Command::Import(cmd) => cmd.run(&ctx, &output).await,
            Command::Fetch(cmd) => cmd.run(&ctx, &output).await,
            Command::List(cmd) => cmd.run(&ctx, &output).await,
            Command::Demo(cmd) => cmd.run(&ctx, &output).await,
            Command::Layout(cmd) => cmd.run(&ctx, &output).await,
            Command::Filter(cmd) => cmd.run(&ctx, &output).await,
            Command::Stats(cmd) => cmd.run(&ctx, &output).await,
        }
    }

    fn context(&self, config: Config) -> Result<Context> {
        match &self.local {
            Some(dir) => {
                tracing::debug!("Using local graphs in {}", dir.display());
                let source = LocalGraphSource::new(dir).with_seed(config.layout.seed);
                Ok(Context::new(source, config))
            }
            None => {
                tracing::debug!("Using graph API at {}", config.api.base_url);
                Ok(Context::from_config(config)?)
            }
        }
    }
}

/// Service for a command.
fn graph_service(ctx: &Context) -> GraphService {
    GraphService::from_ref(ctx)
}

/// Log the outcome of a load.
fn report(status: &LoadStatus) {
    if let LoadStatus::Applied(report) = status {
        tracing::info!(
            "{} nodes, {} edges ({} duplicate nodes ignored, {} dangling edges dropped)",
            report.nodes,
            report.edges,
            report.duplicate_nodes,
            report.dropped_edges
        );
    }
}

/// Shared `--layout` parsing.
fn parse_layout(value: &str) -> std::result::Result<LayoutKind, String> {
    value.parse::<LayoutKind>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ImportFormat;

    #[test]
    fn test_parse_filter_command() {
        let app = App::try_parse_from([
            "graphsphere",
            "filter",
            "--demo",
            "--min",
            "2",
            "--type",
            "person",
            "-v",
        ])
        .unwrap();

        assert!(app.verbose);
        match app.command {
            Command::Filter(cmd) => {
                assert!(cmd.input.demo);
                assert_eq!(cmd.min, 2);
                assert_eq!(cmd.max, None);
                assert_eq!(cmd.node_type.as_deref(), Some("person"));
            }
            _ => panic!("expected filter"),
        }
    }

    #[test]
    fn test_graph_input_is_exclusive() {
        assert!(App::try_parse_from(["graphsphere", "stats", "--demo", "--id", "g1"]).is_err());
        assert!(App::try_parse_from(["graphsphere", "stats"]).is_err());
    }

    #[test]
    fn test_layout_names() {
        let app =
            App::try_parse_from(["graphsphere", "layout", "spring", "--demo"]).unwrap();
        match app.command {
            Command::Layout(cmd) => assert_eq!(cmd.kind, LayoutKind::Force),
            _ => panic!("expected layout"),
        }
        assert!(App::try_parse_from(["graphsphere", "layout", "grid", "--demo"]).is_err());
    }

    #[test]
    fn test_import_options() {
        let app = App::try_parse_from([
            "graphsphere",
            "import",
            "edges.txt",
            "--format",
            "CSV",
            "--source-col",
            "from",
            "--layout",
            "sphere",
        ])
        .unwrap();
        match app.command {
            Command::Import(cmd) => {
                assert_eq!(cmd.format, Some(ImportFormat::Csv));
                assert_eq!(cmd.source_col, "from");
                assert_eq!(cmd.target_col, "target");
                assert_eq!(cmd.layout, Some(LayoutKind::Sphere));
            }
            _ => panic!("expected import"),
        }
    }
}
