//! # Server Configuration
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults (this file)                                                │
//! │  2. TOML file: $PHARMA_CONFIG, else ./pharma.toml (optional)            │
//! │  3. Environment: PHARMA__<SECTION>__<KEY>                               │
//! │       PHARMA__SERVER__PORT=8080                                         │
//! │       PHARMA__STORAGE__DATA_DIR=/var/lib/pharmaease                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example `pharma.toml`
//! ```toml
//! [server]
//! port = 9002
//!
//! [storage]
//! data_dir = "./data"
//!
//! [pharmacy]
//! name = "Al-Shifa Pharmacy"
//!
//! [inventory]
//! default_low_stock_threshold = 10
//! expiry_warning_days = 30
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use pharma_core::reorder::MAX_PLANNING_DAYS;
use pharma_core::{HeuristicAdvisor, InventoryPolicy, DEFAULT_LOW_STOCK_THRESHOLD, EXPIRY_WARNING_DAYS};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "PHARMA_CONFIG";

/// Config file looked up in the working directory when
/// [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "pharma.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub pharmacy: PharmacySettings,
    pub inventory: InventorySettings,
    pub reorder: ReorderSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: "0.0.0.0".to_string(),
            port: 9002,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Unset means the platform data directory.
    pub data_dir: Option<PathBuf>,
    pub pretty: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_dir: None,
            pretty: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PharmacySettings {
    pub name: String,
    /// ISO 4217 code of the currency the cents are in.
    pub currency_code: String,
}

impl Default for PharmacySettings {
    fn default() -> Self {
        PharmacySettings {
            name: "PharmaEase".to_string(),
            currency_code: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySettings {
    pub default_low_stock_threshold: i64,
    pub expiry_warning_days: i64,
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            default_low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            expiry_warning_days: EXPIRY_WARNING_DAYS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderSettings {
    pub lookback_days: i64,
    pub cover_days: i64,
}

impl Default for ReorderSettings {
    fn default() -> Self {
        let advisor = HeuristicAdvisor::default();
        ReorderSettings {
            lookback_days: advisor.lookback_days,
            cover_days: advisor.cover_days,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = config_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if path.exists() {
            info!(?path, "Loading config from file");
        } else {
            debug!(?path, "Config file not found, using defaults and environment");
        }

        let config: ServerConfig = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("PHARMA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inventory.default_low_stock_threshold < 0 {
            return Err(ConfigError::Invalid(
                "inventory.default_low_stock_threshold must be non-negative".into(),
            ));
        }
        if !(0..=MAX_PLANNING_DAYS).contains(&self.inventory.expiry_warning_days) {
            return Err(ConfigError::Invalid(format!(
                "inventory.expiry_warning_days must be between 0 and {}",
                MAX_PLANNING_DAYS
            )));
        }
        let days = 1..=MAX_PLANNING_DAYS;
        if !days.contains(&self.reorder.lookback_days) || !days.contains(&self.reorder.cover_days) {
            return Err(ConfigError::Invalid(format!(
                "reorder.lookback_days and reorder.cover_days must be between 1 and {}",
                MAX_PLANNING_DAYS
            )));
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.bind_addr, self.server.port)
            .parse()
            .map_err(|_| {
                ConfigError::Invalid(format!(
                    "server.bind_addr '{}' is not an IP address",
                    self.server.bind_addr
                ))
            })
    }

    /// Configured data directory, else the platform data directory, else
    /// `./data`.
    ///
    /// ## Platform Paths
    /// - **Linux**: `~/.local/share/pharmaease`
    /// - **macOS**: `~/Library/Application Support/com.pharmaease.pharmaease`
    /// - **Windows**: `%APPDATA%\pharmaease\pharmaease\data`
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.data_dir {
            return dir.clone();
        }
        ProjectDirs::from("com", "pharmaease", "pharmaease")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"))
    }

    pub fn inventory_policy(&self) -> InventoryPolicy {
        InventoryPolicy {
            default_low_stock_threshold: self.inventory.default_low_stock_threshold,
            expiry_warning_days: self.inventory.expiry_warning_days,
        }
    }

    pub fn advisor(&self) -> HeuristicAdvisor {
        HeuristicAdvisor {
            lookback_days: self.reorder.lookback_days,
            cover_days: self.reorder.cover_days,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 9002);
        assert!(config.storage.pretty);
        assert_eq!(config.inventory_policy(), InventoryPolicy::default());
        assert_eq!(config.advisor(), HeuristicAdvisor::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pharma.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8088

[storage]
data_dir = "/srv/pharma"
pretty = false

[inventory]
default_low_stock_threshold = 4
"#,
        )
        .unwrap();

        let config = ServerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.data_dir(), PathBuf::from("/srv/pharma"));
        assert!(!config.storage.pretty);
        assert_eq!(config.inventory.default_low_stock_threshold, 4);
        assert_eq!(config.inventory.expiry_warning_days, 30);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.reorder.cover_days, 30);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = ServerConfig::default();
        config.reorder.lookback_days = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.reorder.cover_days = i64::MAX;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.inventory.expiry_warning_days = i64::MAX;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.server.bind_addr = "not an ip".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
