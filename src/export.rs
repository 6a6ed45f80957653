//! Graph export.

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::Graph;

/// Pretty-printed JSON for `graph`, in the same shape the API serves.
pub fn export_json(graph: &Graph) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(graph)?)
}

/// `graph_export_<unix millis>.json`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("graph_export_{}.json", now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::social_demo;
    use chrono::TimeZone;

    #[test]
    fn test_export_reads_back() {
        let graph = social_demo();
        let text = export_json(&graph).unwrap();
        assert!(text.contains('\n'));

        let back: Graph = serde_json::from_str(&text).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn test_file_name() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(export_file_name(now), "graph_export_1700000000123.json");
    }
}
