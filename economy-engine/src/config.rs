//! Configuration for the economy engine

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for the JSON stores
    pub data_dir: PathBuf,

    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Checkpoint configuration
    pub checkpoint: CheckpointConfig,

    /// Leaderboard configuration
    pub leaderboard: LeaderboardConfig,

    /// Legacy file locations probed once at startup
    pub legacy: LegacyFilesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/economy"),
            service_name: "economy-engine".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            checkpoint: CheckpointConfig::default(),
            leaderboard: LeaderboardConfig::default(),
            legacy: LegacyFilesConfig::default(),
        }
    }
}

/// Checkpoint (autosave) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    /// Flush period in seconds
    pub interval_secs: u64,

    /// Enable the periodic checkpointer
    pub enabled: bool,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300, // 5 minutes
            enabled: true,
        }
    }
}

/// Leaderboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Staleness window for the cached ranking, in seconds
    ///
    /// 0 disables the cache: every read ranks a fresh snapshot.
    pub cache_ttl_secs: u64,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self { cache_ttl_secs: 0 }
    }
}

/// Locations of the previous release's flat JSON files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyFilesConfig {
    /// Legacy user data file
    pub user_data: PathBuf,

    /// Legacy server data file
    pub server_data: PathBuf,
}

impl Default for LegacyFilesConfig {
    fn default() -> Self {
        Self {
            user_data: PathBuf::from("economy_userdata.json"),
            server_data: PathBuf::from("economy_serverdata.json"),
        }
    }
}

impl Config {
    /// Path of the user data store
    pub fn user_data_path(&self) -> PathBuf {
        self.data_dir.join("userdata.json")
    }

    /// Path of the server data store
    pub fn server_data_path(&self) -> PathBuf {
        self.data_dir.join("serverdata.json")
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(data_dir) = std::env::var("ECONOMY_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(secs) = std::env::var("ECONOMY_CHECKPOINT_SECS") {
            config.checkpoint.interval_secs = secs
                .parse()
                .map_err(|_| crate::Error::Config(format!("Invalid checkpoint period: {}", secs)))?;
        }

        if let Ok(secs) = std::env::var("ECONOMY_LEADERBOARD_TTL_SECS") {
            config.leaderboard.cache_ttl_secs = secs
                .parse()
                .map_err(|_| crate::Error::Config(format!("Invalid cache TTL: {}", secs)))?;
        }

        Ok(config)
    }
}
