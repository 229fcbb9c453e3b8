use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{DataError, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub cache: CacheConfig,
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where cached artifacts live and how long they stay fresh.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub ttl_minutes: i64,
    pub data_path: PathBuf,
}

impl CacheConfig {
    /// Freshness window. Values too large for a `chrono::Duration` saturate;
    /// [`parse_config`] rejects them up front.
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.ttl_minutes).unwrap_or(chrono::Duration::MAX)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClusterConfig {
    pub url: String,
    pub index_name: String,
    pub type_name: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClusterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_pages_dir")]
    pub pages_dir: PathBuf,
    #[serde(default = "default_website_dir")]
    pub website_dir: PathBuf,
    #[serde(default = "default_template")]
    pub template: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            pages_dir: default_pages_dir(),
            website_dir: default_website_dir(),
            template: default_template(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_pages_dir() -> PathBuf {
    PathBuf::from("pages")
}
fn default_website_dir() -> PathBuf {
    PathBuf::from("website")
}
fn default_template() -> PathBuf {
    PathBuf::from("website/view.html")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DataError::Config(format!(
            "failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)
        .map_err(|e| DataError::Config(format!("failed to parse config file: {}", e)))?;

    // Validate cache
    if config.cache.ttl_minutes < 0 {
        return Err(DataError::Config(
            "cache.ttl_minutes must be >= 0".to_string(),
        ));
    }
    if chrono::Duration::try_minutes(config.cache.ttl_minutes).is_none() {
        return Err(DataError::Config(format!(
            "cache.ttl_minutes is too large: {}",
            config.cache.ttl_minutes
        )));
    }
    if config.cache.data_path.as_os_str().is_empty() {
        return Err(DataError::Config(
            "cache.data_path must not be empty".to_string(),
        ));
    }

    // Validate cluster
    if !(config.cluster.url.starts_with("http://") || config.cluster.url.starts_with("https://"))
    {
        return Err(DataError::Config(format!(
            "cluster.url must be an http(s) URL, got '{}'",
            config.cluster.url
        )));
    }
    if config.cluster.index_name.trim().is_empty() {
        return Err(DataError::Config(
            "cluster.index_name must not be empty".to_string(),
        ));
    }
    if config.cluster.type_name.trim().is_empty() {
        return Err(DataError::Config(
            "cluster.type_name must not be empty".to_string(),
        ));
    }
    if config.cluster.timeout_secs == 0 {
        return Err(DataError::Config(
            "cluster.timeout_secs must be > 0".to_string(),
        ));
    }

    Ok(config)
}
