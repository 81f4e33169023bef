//! Configuration file management.

use std::path::{Path, PathBuf};

use royalty_collector::CollectorConfig;
use royalty_splitter::SplitterConfig;
use serde::{Deserialize, Serialize};

/// Complete tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Pull-mode engine used by `simulate`.
    #[serde(default)]
    pub splitter: Option<SplitterConfig>,
    /// Push-mode engine used by `simulate`.
    #[serde(default)]
    pub collector: Option<CollectorConfig>,
    /// Batch planning settings.
    #[serde(default)]
    pub batching: BatchingConfig,
    /// Advanced settings.
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

/// Batch planning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchingConfig {
    /// Owners per batch request.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

/// Advanced configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedConfig {
    /// Log level: "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_chunk_size() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ToolConfig {
    /// Load configuration from `path`, or from the default location.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = path.map_or_else(Self::config_path, Path::to_path_buf);
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration text.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("ROYALTY_DATA_DIR") {
            return PathBuf::from(dir).join("config.toml");
        }
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".royalty"))
            .unwrap_or_else(|_| PathBuf::from("/tmp/royalty"))
            .join("config.toml")
    }
}
