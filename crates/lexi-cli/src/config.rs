//! Layered configuration: defaults, then `lexigraph.toml`, then environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lexi_core::ServiceConfig;
use lexi_graph::GraphConfig;
use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "lexigraph.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3040,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub graph: GraphConfig,
    pub service: ServiceConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from `path`, or from `lexigraph.toml` when present.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `NEO4J_*` and `LEXI_*` overrides read through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(uri) = var("NEO4J_URI") {
            self.graph.uri = uri;
        }
        if let Some(user) = var("NEO4J_USER") {
            self.graph.user = user;
        }
        if let Some(password) = var("NEO4J_PASSWORD") {
            self.graph.password = password;
        }
        match var("LEXI_QUERY_TIMEOUT_MS").map(|v| v.trim().parse::<u64>()) {
            Some(Ok(ms)) => self.graph.query_timeout_ms = ms,
            Some(Err(_)) => tracing::warn!("Ignoring non-numeric LEXI_QUERY_TIMEOUT_MS"),
            None => {}
        }
    }
}
