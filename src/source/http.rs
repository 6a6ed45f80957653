//! Graph API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use super::GraphSource;
use crate::config::ApiConfig;
use crate::error::AppError;
use crate::graph::LayoutKind;
use crate::import::CsvColumns;
use crate::models::{Graph, GraphSummary};

/// [`GraphSource`] backed by the graph API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGraphSource {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct GraphList {
    #[serde(default)]
    graphs: Vec<GraphSummary>,
}

impl HttpGraphSource {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::Validation(format!("Invalid API base URL '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "Invalid API base URL '{}'",
                config.base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    /// Base URL extended with percent-encoded path segments.
    fn url(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Validation(format!("Invalid API base URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, segments: &[&str]) -> Result<JsonValue, AppError> {
        let url = self.url(segments)?;
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        read_envelope(response).await
    }

    async fn post(&self, segments: &[&str], body: &JsonValue) -> Result<JsonValue, AppError> {
        let url = self.url(segments)?;
        tracing::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        read_envelope(response).await
    }
}

async fn read_envelope(response: reqwest::Response) -> Result<JsonValue, AppError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    parse_envelope(status, &body)
}

/// Decode a response body, turning `{"error": ...}` payloads into failures.
fn parse_envelope(status: u16, body: &str) -> Result<JsonValue, AppError> {
    let value: JsonValue = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) if status >= 400 => {
            return Err(AppError::LoadFailure(format!("HTTP {status}")));
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(error) = value.get("error") {
        let message = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(AppError::LoadFailure(message));
    }
    if status >= 400 {
        return Err(AppError::LoadFailure(format!("HTTP {status}")));
    }
    Ok(value)
}

/// Import and demo responses wrap the graph in `graph_data`; fetch returns it bare.
fn graph_from_envelope(mut value: JsonValue) -> Result<Graph, AppError> {
    let graph_id = value
        .get("graph_id")
        .and_then(JsonValue::as_str)
        .map(str::to_string);
    let data = if value.get("graph_data").is_some() {
        value["graph_data"].take()
    } else {
        value
    };

    let mut graph: Graph = serde_json::from_value(data)?;
    if let Some(id) = graph_id {
        tracing::debug!("Server stored graph as {}", id);
        graph.metadata.extra.insert("graph_id".to_string(), id.into());
    }
    Ok(graph)
}

#[async_trait]
impl GraphSource for HttpGraphSource {
    async fn fetch(&self, graph_id: &str) -> Result<Graph, AppError> {
        graph_from_envelope(self.get(&["graph", graph_id]).await?)
    }

    async fn import_csv(
        &self,
        content: &str,
        columns: &CsvColumns,
        layout: LayoutKind,
    ) -> Result<Graph, AppError> {
        let body = json!({
            "csv_content": content,
            "source_col": columns.source,
            "target_col": columns.target,
            "layout": layout.as_str(),
        });
        graph_from_envelope(self.post(&["graph", "import", "csv"], &body).await?)
    }

    async fn import_json(&self, content: &str, layout: LayoutKind) -> Result<Graph, AppError> {
        let body = json!({
            "json_content": content,
            "layout": layout.as_str(),
        });
        graph_from_envelope(self.post(&["graph", "import", "json"], &body).await?)
    }

    async fn demo(&self) -> Result<Graph, AppError> {
        graph_from_envelope(self.get(&["graph", "demo"]).await?)
    }

    async fn list(&self) -> Result<Vec<GraphSummary>, AppError> {
        let list: GraphList = serde_json::from_value(self.get(&["graph", "list"]).await?)?;
        Ok(list.graphs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_payload_is_load_failure() {
        let err = parse_envelope(404, r#"{"error": "Graph not found"}"#).unwrap_err();
        match err {
            AppError::LoadFailure(msg) => assert_eq!(msg, "Graph not found"),
            other => panic!("unexpected error: {other}"),
        }

        // Even with a 200 status.
        assert!(matches!(
            parse_envelope(200, r#"{"error": {"detail": 1}}"#),
            Err(AppError::LoadFailure(_))
        ));
    }

    #[test]
    fn test_non_json_error_body() {
        let err = parse_envelope(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, AppError::LoadFailure(ref m) if m == "HTTP 502"));

        assert!(matches!(
            parse_envelope(200, "not json"),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_graph_data_is_unwrapped() {
        let value = parse_envelope(
            200,
            r#"{
                "success": true,
                "graph_id": "graph_1",
                "graph_data": {
                    "nodes": [{"id": "a", "label": "a", "properties": {}}],
                    "edges": [],
                    "metadata": {"node_count": 1, "edge_count": 0, "format": "csv"}
                }
            }"#,
        )
        .unwrap();
        let graph = graph_from_envelope(value).unwrap();

        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.metadata.format.as_deref(), Some("csv"));
        assert_eq!(graph.metadata.extra["graph_id"], "graph_1");
    }

    #[test]
    fn test_bare_graph() {
        let value = parse_envelope(200, r#"{"nodes": [{"id": "x"}], "edges": []}"#).unwrap();
        let graph = graph_from_envelope(value).unwrap();
        assert_eq!(graph.nodes[0].display_label(), "x");
    }

    #[test]
    fn test_graph_list_shape() {
        let value = parse_envelope(
            200,
            r#"{"graphs": [{"id": "g1", "metadata": {"node_count": 8}}]}"#,
        )
        .unwrap();
        let list: GraphList = serde_json::from_value(value).unwrap();
        assert_eq!(list.graphs[0].id, "g1");
        assert_eq!(list.graphs[0].metadata.node_count, Some(8));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let source = HttpGraphSource::new(&ApiConfig {
            base_url: "http://localhost:5000/api/".into(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            source.url(&["graph", "demo"]).unwrap().as_str(),
            "http://localhost:5000/api/graph/demo"
        );
    }

    #[test]
    fn test_graph_id_is_one_path_segment() {
        let source = HttpGraphSource::new(&ApiConfig {
            base_url: "http://localhost:5000/api".into(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            source.url(&["graph", "a/b?c#d"]).unwrap().as_str(),
            "http://localhost:5000/api/graph/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpGraphSource::new(&ApiConfig {
            base_url: "not a url".into(),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
