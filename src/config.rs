use std::path::Path;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;
use crate::puzzle::WinCondition;

/// Longest settle delay accepted from a config file.
pub const MAX_SETTLE_DELAY_MS: u64 = 10_000;

/// Engine configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pause after an accepted move before input is accepted again.
    pub settle_delay_ms: u64,
    pub win_condition: WinCondition,
    /// Fixed seed for reproducible shuffles; drawn from the OS when unset.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            settle_delay_ms: 10,
            win_condition: WinCondition::Ordered,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settle_delay_ms > MAX_SETTLE_DELAY_MS {
            return Err(ConfigError::Validation(format!(
                "settle_delay_ms must be <= {MAX_SETTLE_DELAY_MS}"
            )));
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
