//! Where graphs come from.
//!
//! - [`HttpGraphSource`] - the graph API backend
//! - [`LocalGraphSource`] - files in a directory, parsed in-process

mod http;
mod local;

pub use http::HttpGraphSource;
pub use local::LocalGraphSource;

use async_trait::async_trait;

use crate::error::AppError;
use crate::graph::LayoutKind;
use crate::import::CsvColumns;
use crate::models::{Graph, GraphSummary};

/// Loads and imports graphs.
///
/// Every method either yields a complete graph or fails; nothing is applied
/// to a workspace here.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Fetch a stored graph by id.
    async fn fetch(&self, graph_id: &str) -> Result<Graph, AppError>;

    /// Import an edge-list CSV, laid out with `layout`.
    async fn import_csv(
        &self,
        content: &str,
        columns: &CsvColumns,
        layout: LayoutKind,
    ) -> Result<Graph, AppError>;

    /// Import a JSON graph, laid out with `layout`.
    async fn import_json(&self, content: &str, layout: LayoutKind) -> Result<Graph, AppError>;

    /// The demo graph.
    async fn demo(&self) -> Result<Graph, AppError>;

    /// Stored graphs.
    async fn list(&self) -> Result<Vec<GraphSummary>, AppError>;
}
