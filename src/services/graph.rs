//! Graph service: source → workspace orchestration.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::context::{AppSource, AppWorkspace, Context};
use crate::di::FromContext;
use crate::error::AppError;
use crate::export::export_json;
use crate::graph::{FilterPredicate, LayoutKind, LoadStatus};
use crate::import::{CsvColumns, ImportFormat};
use crate::models::{Graph, GraphSummary};

/// Loads graphs from the configured source into the shared workspace.
///
/// The workspace lock is held only to take a load ticket and to apply the
/// result, never while a source request is in flight. If another load starts
/// in the meantime, the older response comes back as [`LoadStatus::Stale`].
#[derive(FromContext, Clone)]
pub struct GraphService {
    workspace: AppWorkspace,
    source: AppSource,
    config: Arc<Config>,
}

impl GraphService {
    async fn load_with<F>(&self, request: F) -> Result<LoadStatus, AppError>
    where
        F: Future<Output = Result<Graph, AppError>>,
    {
        let ticket = self.workspace.lock().await.begin_load();
        let result = request.await;
        self.workspace.lock().await.complete_load(ticket, result)
    }

    fn layout_or_default(&self, layout: Option<LayoutKind>) -> LayoutKind {
        layout.unwrap_or(self.config.layout.default)
    }

    /// Fetch a stored graph by id.
    pub async fn load_by_id(&self, graph_id: &str) -> Result<LoadStatus, AppError> {
        tracing::info!("Loading graph {}", graph_id);
        self.load_with(self.source.fetch(graph_id)).await
    }

    /// Import CSV text.
    pub async fn import_csv(
        &self,
        content: &str,
        columns: &CsvColumns,
        layout: Option<LayoutKind>,
    ) -> Result<LoadStatus, AppError> {
        let layout = self.layout_or_default(layout);
        self.load_with(self.source.import_csv(content, columns, layout))
            .await
    }

    /// Import JSON text.
    pub async fn import_json(
        &self,
        content: &str,
        layout: Option<LayoutKind>,
    ) -> Result<LoadStatus, AppError> {
        let layout = self.layout_or_default(layout);
        self.load_with(self.source.import_json(content, layout)).await
    }

    /// Import a file, guessing the format from its extension unless given.
    pub async fn import_file(
        &self,
        path: &Path,
        format: Option<ImportFormat>,
        columns: &CsvColumns,
        layout: Option<LayoutKind>,
    ) -> Result<LoadStatus, AppError> {
        let format = format
            .or_else(|| ImportFormat::from_path(path))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Cannot tell the format of {}; pass --format",
                    path.display()
                ))
            })?;
        let content = tokio::fs::read_to_string(path).await?;
        tracing::info!("Importing {} as {:?}", path.display(), format);

        match format {
            ImportFormat::Csv => self.import_csv(&content, columns, layout).await,
            ImportFormat::Json => self.import_json(&content, layout).await,
        }
    }

    /// Load the demo graph.
    pub async fn load_demo(&self) -> Result<LoadStatus, AppError> {
        self.load_with(self.source.demo()).await
    }

    /// Stored graphs.
    pub async fn list(&self) -> Result<Vec<GraphSummary>, AppError> {
        self.source.list().await
    }

    /// Filter the original snapshot; returns the new current graph.
    pub async fn filter(&self, predicate: &FilterPredicate) -> Result<Graph, AppError> {
        let mut ws = self.workspace.lock().await;
        ws.apply_filter(predicate).cloned()
    }

    pub async fn reset_filters(&self) -> Result<Graph, AppError> {
        let mut ws = self.workspace.lock().await;
        ws.reset_filters().cloned()
    }

    /// Re-lay out the current graph. Returns whether positions changed.
    pub async fn apply_layout(&self, kind: LayoutKind) -> Result<bool, AppError> {
        self.workspace.lock().await.apply_layout(kind)
    }

    pub async fn current(&self) -> Option<Graph> {
        self.workspace.lock().await.current_graph().cloned()
    }

    /// JSON export of the current graph.
    pub async fn export(&self) -> Result<String, AppError> {
        let ws = self.workspace.lock().await;
        let graph = ws.current_graph().ok_or(AppError::EmptyGraph)?;
        export_json(graph)
    }
}
