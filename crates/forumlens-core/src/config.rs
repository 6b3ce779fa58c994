//! Client configuration (YAML)
//!
//! Replaces the hardcoded server path, snapshot path and import-time env
//! loading with one explicit config struct the composition root loads
//! once. Lives at `~/.config/forumlens/config.yaml` (platform config dir)
//! unless an explicit path is given; a missing default file yields the
//! documented defaults.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::mcp::LaunchRegistry;

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration for the tool client and demo driver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Path of the tool server script to spawn
    pub server_script: PathBuf,

    /// Where the server should write DOM snapshots
    pub snapshot_path: PathBuf,

    /// Per-call deadline in seconds; absent means wait indefinitely
    pub call_timeout_secs: Option<u64>,

    /// How long to let a page load after navigation before snapshotting
    /// or extracting from it
    pub navigate_settle_secs: u64,

    /// Extra script-suffix -> interpreter-command entries, merged over the
    /// built-in registry (`js` -> node, `py` -> python)
    pub launch_overrides: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_script: PathBuf::from("./chrome-devtools-mcp/build/src/index.js"),
            snapshot_path: PathBuf::from("./shot.json"),
            call_timeout_secs: None,
            navigate_settle_secs: 5,
            launch_overrides: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// The user-level config file path (`<config dir>/forumlens/config.yaml`)
    pub fn user_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        config_dir.join("forumlens").join("config.yaml")
    }

    /// Load from an explicit file; the file must exist and parse
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load the user-level config, falling back to defaults when absent
    pub fn load_user() -> ConfigResult<Self> {
        let path = Self::user_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save to an explicit file, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// The configured per-call deadline
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_secs.map(Duration::from_secs)
    }

    /// The configured post-navigation settle delay
    pub fn navigate_settle(&self) -> Duration {
        Duration::from_secs(self.navigate_settle_secs)
    }

    /// The built-in launch registry with this config's overrides applied
    pub fn launch_registry(&self) -> LaunchRegistry {
        let mut registry = LaunchRegistry::default();
        for (suffix, command) in &self.launch_overrides {
            registry.register(suffix.clone(), command.clone());
        }
        registry
    }
}
