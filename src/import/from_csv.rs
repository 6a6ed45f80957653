//! Edge-list CSV import.

use std::collections::HashSet;

use serde_json::Value as JsonValue;

use crate::error::AppError;
use crate::models::{Edge, Graph, Node, Properties};

/// Which columns hold the edge endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvColumns {
    pub source: String,
    pub target: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            source: "source".to_string(),
            target: "target".to_string(),
        }
    }
}

/// Parse an edge list with a header row.
///
/// Every row is one edge; nodes are created the first time an id appears.
/// Rows with an empty endpoint are skipped. Columns other than the two
/// endpoint columns become edge properties.
pub fn parse_csv(content: &str, columns: &CsvColumns) -> Result<Graph, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AppError::Validation(format!("CSV is missing column '{name}'")))
    };
    let source_idx = column(&columns.source)?;
    let target_idx = column(&columns.target)?;

    let mut nodes = Vec::new();
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        let source = record.get(source_idx).unwrap_or_default();
        let target = record.get(target_idx).unwrap_or_default();
        if source.is_empty() || target.is_empty() {
            skipped += 1;
            continue;
        }

        for id in [source, target] {
            if seen.insert(id.to_string()) {
                nodes.push(Node::new(id));
            }
        }

        let properties: Properties = headers
            .iter()
            .zip(record.iter())
            .enumerate()
            .filter(|(idx, _)| *idx != source_idx && *idx != target_idx)
            .map(|(_, (key, value))| (key.to_string(), JsonValue::String(value.to_string())))
            .collect();

        edges.push(Edge {
            source: source.to_string(),
            target: target.to_string(),
            properties,
        });
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} CSV rows without both endpoints", skipped);
    }

    let mut graph = Graph::new(nodes, edges);
    graph.metadata.format = Some("csv".to_string());
    Ok(graph)
}
