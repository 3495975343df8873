use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{GmailError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub drain: DrainConfig,
}

/// Knobs for the category drain loop.
///
/// The category list itself is deliberately absent: the tool drains a fixed
/// set of tabs and nothing here (or on the command line) can change that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrainConfig {
    /// Maximum message ids requested per query and deleted per batch call.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Fixed pause between batches. A crude client-side throttle, not an
    /// adaptive rate control.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            throttle_ms: default_throttle_ms(),
        }
    }
}

impl DrainConfig {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

fn default_batch_size() -> u32 {
    100
}

fn default_throttle_ms() -> u64 {
    500
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self> {
        // If file doesn't exist, return default config with warning
        if !path.exists() {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GmailError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| GmailError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    GmailError::ConfigError(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| GmailError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        tokio::fs::write(path, content)
            .await
            .map_err(|e| GmailError::ConfigError(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.drain.batch_size == 0 {
            return Err(GmailError::ConfigError(
                "drain.batch_size must be at least 1".to_string(),
            ));
        }
        // messages.list caps maxResults at 500
        if self.drain.batch_size > 500 {
            return Err(GmailError::ConfigError(
                "drain.batch_size cannot exceed 500 (Gmail messages.list caps maxResults there)"
                    .to_string(),
            ));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
