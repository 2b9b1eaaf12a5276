//! Node configuration.

use crate::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Network (main, test, regtest).
    #[serde(default = "default_network")]
    pub network: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_network() -> String {
    "main".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            log_level: default_log_level(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from file and CLI args.
    ///
    /// A missing file yields the defaults; a present but malformed one is an
    /// error.
    pub fn load(config_path: &Path, args: &Args) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path).with_context(|| {
                format!("Failed to read config file {}", config_path.display())
            })?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Self::default()
        };

        // Only override if explicitly provided via CLI
        if let Some(ref network) = args.network {
            config.network = network.clone();
        }
        if let Some(ref log_level) = args.log_level {
            config.log_level = log_level.clone();
        }

        Ok(config)
    }
}
