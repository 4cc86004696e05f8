//! Engine configuration

use serde::{Deserialize, Serialize};

/// Query engine settings, the `engine` section of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Run the windowed and aggregate reads against one store snapshot
    #[serde(default)]
    pub snapshot_reads: bool,

    /// Largest page size a request may ask for
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

fn default_max_page_size() -> u64 {
    1000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snapshot_reads: false,
            max_page_size: default_max_page_size(),
        }
    }
}

impl EngineConfig {
    pub fn with_snapshot_reads(mut self, enabled: bool) -> Self {
        self.snapshot_reads = enabled;
        self
    }

    pub fn with_max_page_size(mut self, max_page_size: u64) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Returns an error message if the settings cannot serve queries
    pub fn validate(&self) -> Result<(), String> {
        if self.max_page_size == 0 {
            return Err("engine.max_page_size must be > 0".to_string());
        }
        Ok(())
    }
}
