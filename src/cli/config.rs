//! Configuration file
//!
//! ```json
//! {
//!   "dataset_path": "./data/sales.json",
//!   "http": { "host": "0.0.0.0", "port": 3000, "cors_origins": [] },
//!   "engine": { "snapshot_reads": false, "max_page_size": 1000 },
//!   "logging": { "level": "info" }
//! }
//! ```
//!
//! One of `dataset_path` or `database_url` is required. When
//! `database_url` is set (`postgres://...`), rows are read from its
//! `"Sales"` table and `dataset_path` is ignored.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;
use crate::http_server::HttpServerConfig;
use crate::observability;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON array of sales records
    #[serde(default)]
    pub dataset_path: String,

    /// PostgreSQL connection URL; takes precedence over `dataset_path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level or filter directive (default "info"); `RUST_LOG` overrides
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        match self.database_url() {
            Some(url) if url.trim().is_empty() => {
                return Err(CliError::config_error("database_url must not be empty"));
            }
            Some(_) => {}
            None if self.dataset_path.trim().is_empty() => {
                return Err(CliError::config_error(
                    "one of dataset_path or database_url is required",
                ));
            }
            None => {}
        }

        self.engine.validate().map_err(CliError::config_error)?;

        observability::env_filter(&self.logging.level)
            .map_err(|e| CliError::config_error(e.to_string()))?;

        Ok(())
    }

    /// Get dataset file as Path
    pub fn dataset_path(&self) -> &Path {
        Path::new(&self.dataset_path)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }
}
