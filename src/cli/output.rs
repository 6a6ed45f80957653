//! Where command results go.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use color_eyre::Result;
use serde::Serialize;

use crate::export::{export_file_name, export_json};
use crate::models::Graph;

/// JSON sink for command results: stdout, a file, or a timestamped file in a directory.
#[derive(Debug, Clone, Default)]
pub struct Output {
    path: Option<PathBuf>,
}

impl Output {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Write a graph in export format.
    pub fn graph(&self, graph: &Graph) -> Result<()> {
        self.write(&export_json(graph)?)
    }

    /// Write any serialisable value as pretty JSON.
    pub fn json<T: Serialize>(&self, value: &T) -> Result<()> {
        self.write(&serde_json::to_string_pretty(value)?)
    }

    fn write(&self, text: &str) -> Result<()> {
        match &self.path {
            Some(path) => {
                let target = resolve_target(path);
                std::fs::write(&target, format!("{text}\n"))?;
                tracing::info!("Wrote {}", target.display());
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{text}")?;
            }
        }
        Ok(())
    }
}

fn resolve_target(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(export_file_name(Utc::now()))
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::social_demo;

    #[test]
    fn test_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        Output::new(Some(path.clone())).graph(&social_demo()).unwrap();

        let back: Graph = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back.nodes.len(), 8);
    }

    #[test]
    fn test_directory_gets_export_name() {
        let dir = tempfile::tempdir().unwrap();
        Output::new(Some(dir.path().to_path_buf()))
            .json(&serde_json::json!({"ok": true}))
            .unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("graph_export_") && names[0].ends_with(".json"));
    }
}
