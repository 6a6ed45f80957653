//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults
//! 2. User config: `~/.config/graphsphere/config.toml` (XDG) or platform config dir
//! 3. Project config: `.graphsphere.toml`
//! 4. Environment variables: `GRAPHSPHERE_*` (nested keys split on `__`)
//!
//! # Example
//!
//! ```toml
//! [api]
//! base_url = "http://127.0.0.1:5000/api"
//! timeout_secs = 30
//!
//! [layout]
//! default = "sphere"
//! seed = 42
//!
//! [filter]
//! max_connections = 20
//!
//! [collab]
//! user_name = "alice"
//! ```
//!
//! `GRAPHSPHERE_LAYOUT__SEED=7` overrides `layout.seed`.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::graph::LayoutKind;

/// Project-level config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".graphsphere.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "GRAPHSPHERE_";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub collab: CollabConfig,
}

/// Graph API backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Layout defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Layout applied when none is requested.
    #[serde(default)]
    pub default: LayoutKind,
    /// Seed for random layouts. Unset means a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Filter defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Upper connection bound used when a filter request doesn't give one.
    pub max_connections: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
        }
    }
}

/// Collaboration identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollabConfig {
    /// Display name announced to peers. Derived from the user id when unset.
    #[serde(default)]
    pub user_name: Option<String>,
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::user_config_path(), Path::new(PROJECT_CONFIG_FILE))
    }

    /// Load config from explicit user and project files (missing files are skipped).
    pub fn load_from(user_config: &Path, project_config: &Path) -> Result<Self, ConfigError> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(user_config))
            .merge(Toml::file(project_config))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// User config path: ~/.config/graphsphere/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("graphsphere").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("graphsphere").join("config.toml"))
            .unwrap_or_default()
    }
}
