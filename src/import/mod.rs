//! Turning raw CSV / JSON text into a [`Graph`](crate::models::Graph).
//!
//! These parsers normalise the shapes the graph API accepts, so a file can be
//! imported locally exactly as the backend would import it.

mod demo;
mod from_csv;
mod from_json;

pub use demo::{social_demo, synthetic, DEMO_NODE_TYPES};
pub use from_csv::{parse_csv, CsvColumns};
pub use from_json::parse_json;

use std::path::Path;

/// Input format of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    /// Guess from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "csv" => Some(ImportFormat::Csv),
            "json" => Some(ImportFormat::Json),
            _ => None,
        }
    }
}
