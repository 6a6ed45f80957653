//! Integration tests against a running graph API backend.
//!
//! Run with: `cargo test --features integration --test http_integration`
//! Set `GRAPHSPHERE_API__BASE_URL` to point somewhere other than the default.

#![cfg(feature = "integration")]

use graphsphere::config::Config;
use graphsphere::context::Context;
use graphsphere::graph::{LayoutKind, LoadStatus};
use graphsphere::import::CsvColumns;
use graphsphere::services::GraphService;
use graphsphere::source::{GraphSource, HttpGraphSource};
use graphsphere::FromRef;
use serial_test::serial;

fn api_config() -> Config {
    Config::load().expect("Failed to load configuration")
}

fn create_source() -> HttpGraphSource {
    HttpGraphSource::new(&api_config().api).expect("Failed to build HTTP client")
}

// Imports create server-side state; keep them ordered.
#[serial]
mod api_tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_graph() {
        let graph = create_source().demo().await.expect("Demo failed");
        assert_eq!(graph.nodes.len(), 8);
        assert_eq!(graph.edges.len(), 10);
    }

    #[tokio::test]
    async fn test_import_csv_then_fetch() {
        let source = create_source();
        let graph = source
            .import_csv(
                "source,target\nA,B\nB,C\n",
                &CsvColumns::default(),
                LayoutKind::Circular,
            )
            .await
            .expect("Import failed");
        assert_eq!(graph.nodes.len(), 3);

        let id = graph.metadata.extra["graph_id"]
            .as_str()
            .expect("Import response has no graph_id")
            .to_string();
        let fetched = source.fetch(&id).await.expect("Fetch failed");
        assert_eq!(fetched.nodes.len(), 3);

        let list = source.list().await.expect("List failed");
        assert!(list.iter().any(|s| s.id == id));
    }

    #[tokio::test]
    async fn test_unknown_graph_is_load_failure() {
        let err = create_source()
            .fetch("does-not-exist")
            .await
            .expect_err("Fetch should fail");
        assert_eq!(err.code(), "LOAD_FAILURE");
    }

    #[tokio::test]
    async fn test_service_loads_demo() {
        let ctx = Context::from_config(api_config()).expect("Failed to build context");
        let service = GraphService::from_ref(&ctx);

        let status = service.load_demo().await.expect("Load failed");
        assert!(matches!(status, LoadStatus::Applied(_)));
        assert!(service
            .current()
            .await
            .expect("No graph loaded")
            .nodes
            .iter()
            .all(|n| n.has_position()));
    }
}
