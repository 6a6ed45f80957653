//! Application context providing the dependency injection root.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::di::Context as ContextDerive;
use crate::error::AppError;
use crate::graph::{LayoutEngine, Workspace};
use crate::presentation::LogSink;
use crate::source::{GraphSource, HttpGraphSource};

/// Shared workspace. Lock only around synchronous steps, never across an await on a source.
pub type AppWorkspace = Arc<Mutex<Workspace>>;

/// Shared graph source.
pub type AppSource = Arc<dyn GraphSource>;

/// Root application context for dependency injection.
///
/// `#[derive(Context)]` makes every field resolvable through `FromRef`, so
/// services can declare what they need and be built with `from_ref`.
#[derive(ContextDerive, Clone)]
pub struct Context {
    /// The single graph workspace.
    pub workspace: AppWorkspace,
    /// Where graphs are loaded from.
    pub source: AppSource,
    /// Application configuration.
    pub config: Arc<Config>,
}

impl Context {
    /// Creates a context around `source`, with a fresh workspace seeded from `config`.
    pub fn new(source: impl GraphSource + 'static, config: Config) -> Self {
        let workspace =
            Workspace::new(LayoutEngine::new(config.layout.seed)).with_sink(Box::new(LogSink::new()));
        Self {
            workspace: Arc::new(Mutex::new(workspace)),
            source: Arc::new(source),
            config: Arc::new(config),
        }
    }

    /// Creates a context that talks to the configured graph API.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let source = HttpGraphSource::new(&config.api)?;
        Ok(Self::new(source, config))
    }
}
