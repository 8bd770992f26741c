use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::Deserialize;
use anyhow::{Context, Result};
use shared::protocol::{DEFAULT_DEBOUNCE_MS, DEFAULT_DOMAIN_SUFFIX};
use crate::view::ladder::{self, Ladder, Rung};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    /// JSON document holding the etx, hosts and services tables
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_domain_suffix")]
    pub domain_suffix: String,
    #[serde(default = "ladder::default_rungs")]
    pub ladder: Vec<Rung>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_domain_suffix() -> String {
    DEFAULT_DOMAIN_SUFFIX.to_string()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_listen() -> String {
    "[::]:8054".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            domain_suffix: default_domain_suffix(),
            ladder: ladder::default_rungs(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ViewConfig {
    pub fn ladder(&self) -> Result<Ladder> {
        Ladder::new(self.ladder.clone()).context("Invalid quality ladder")
    }
}

impl FilterConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.view.ladder()?;
        Ok(config)
    }
}
