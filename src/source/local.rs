//! Graphs read from a local directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::GraphSource;
use crate::error::AppError;
use crate::graph::{LayoutEngine, LayoutKind};
use crate::import::{self, CsvColumns};
use crate::models::{Graph, GraphSummary};

/// [`GraphSource`] over `<dir>/<id>.json` files.
///
/// Imports are parsed in-process and laid out with a local engine, so the
/// result matches what the API would return for the same input.
#[derive(Debug, Clone)]
pub struct LocalGraphSource {
    dir: PathBuf,
    seed: Option<u64>,
}

impl LocalGraphSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            seed: None,
        }
    }

    /// Seed random layouts applied on import.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// File holding `graph_id`. Ids must name a file directly inside the directory.
    fn path_for(&self, graph_id: &str) -> Result<PathBuf, AppError> {
        let plain = !graph_id.is_empty()
            && graph_id != "."
            && graph_id != ".."
            && !graph_id.contains(&['/', '\\'][..])
            && Path::new(graph_id).components().count() == 1;
        if !plain {
            return Err(AppError::Validation(format!("Invalid graph id '{graph_id}'")));
        }
        Ok(self.dir.join(format!("{graph_id}.json")))
    }

    fn laid_out(&self, mut graph: Graph, layout: LayoutKind) -> Graph {
        LayoutEngine::new(self.seed).apply(&mut graph, layout);
        graph
    }
}

#[async_trait]
impl GraphSource for LocalGraphSource {
    async fn fetch(&self, graph_id: &str) -> Result<Graph, AppError> {
        let path = self.path_for(graph_id)?;
        tracing::debug!("Reading {}", path.display());
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            AppError::LoadFailure(format!("Graph not found: {} ({})", graph_id, e))
        })?;

        // Files may be exported graphs or raw import documents.
        match serde_json::from_str::<Graph>(&content) {
            Ok(graph) if !graph.is_empty() => Ok(graph),
            _ => import::parse_json(&content),
        }
    }

    async fn import_csv(
        &self,
        content: &str,
        columns: &CsvColumns,
        layout: LayoutKind,
    ) -> Result<Graph, AppError> {
        let graph = import::parse_csv(content, columns)?;
        Ok(self.laid_out(graph, layout))
    }

    async fn import_json(&self, content: &str, layout: LayoutKind) -> Result<Graph, AppError> {
        let graph = import::parse_json(content)?;
        Ok(self.laid_out(graph, layout))
    }

    async fn demo(&self) -> Result<Graph, AppError> {
        Ok(import::social_demo())
    }

    async fn list(&self) -> Result<Vec<GraphSummary>, AppError> {
        let mut summaries = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.fetch(id).await {
                Ok(graph) => summaries.push(GraphSummary {
                    id: id.to_string(),
                    metadata: graph.metadata,
                }),
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }
}
