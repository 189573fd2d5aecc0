//! # Configuration
//!
//! Shop settings loaded at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     OHANA_VALET_PRICE=5500                                             │
//! │     OHANA_REMOTE=false                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/lavanderia/config.toml (Linux)                           │
//! │     ~/Library/Application Support/ar.ohana.lavanderia/config.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     $5.000 per valet, shop open 8 to 20                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Ohana Lavandería"
//!
//! [pricing]
//! valet_price_cents = 500000
//!
//! [storage]
//! database_path = "/var/lib/ohana/ohana.db"
//! local_store_path = "/var/lib/ohana/local-store.json"
//! remote_enabled = true
//!
//! [dashboard]
//! opening_hour = 8
//! closing_hour = 20
//! frequent_clients = 5
//! ```

use directories::ProjectDirs;
use ohana_core::dashboard::DashboardOptions;
use ohana_core::{
    Money, DEFAULT_CLOSING_HOUR, DEFAULT_FREQUENT_CLIENTS, DEFAULT_OPENING_HOUR, DEFAULT_VALET_PRICE,
    MAX_AMOUNT_CENTS,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Config loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("ar", "ohana", "lavanderia")
}

/// Platform data directory, or the working directory when there is none.
fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

// =============================================================================
// Sections
// =============================================================================

/// The shop itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,
}

fn default_store_name() -> String {
    "Ohana Lavandería".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
        }
    }
}

/// Prices that are not part of the dry-cleaning catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Price of one valet, in centavos.
    #[serde(default = "default_valet_price_cents")]
    pub valet_price_cents: i64,
}

fn default_valet_price_cents() -> i64 {
    DEFAULT_VALET_PRICE.cents()
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            valet_price_cents: default_valet_price_cents(),
        }
    }
}

/// Where data lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// JSON document used when SQLite is off or failing.
    #[serde(default = "default_local_store_path")]
    pub local_store_path: PathBuf,

    /// `false` runs on the local store alone.
    #[serde(default = "default_true")]
    pub remote_enabled: bool,
}

fn default_database_path() -> PathBuf {
    data_dir().join("ohana.db")
}

fn default_local_store_path() -> PathBuf {
    data_dir().join("local-store.json")
}

fn default_true() -> bool {
    true
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: default_database_path(),
            local_store_path: default_local_store_path(),
            remote_enabled: true,
        }
    }
}

/// Dashboard tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSettings {
    #[serde(default = "default_opening_hour")]
    pub opening_hour: u32,

    #[serde(default = "default_closing_hour")]
    pub closing_hour: u32,

    /// How many customers the frequent-client list shows.
    #[serde(default = "default_frequent_clients")]
    pub frequent_clients: usize,
}

fn default_opening_hour() -> u32 {
    DEFAULT_OPENING_HOUR
}

fn default_closing_hour() -> u32 {
    DEFAULT_CLOSING_HOUR
}

fn default_frequent_clients() -> usize {
    DEFAULT_FREQUENT_CLIENTS
}

impl Default for DashboardSettings {
    fn default() -> Self {
        DashboardSettings {
            opening_hour: default_opening_hour(),
            closing_hour: default_closing_hour(),
            frequent_clients: default_frequent_clients(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub dashboard: DashboardSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=MAX_AMOUNT_CENTS).contains(&self.pricing.valet_price_cents) {
            return Err(ConfigError::Invalid(format!(
                "pricing.valet_price_cents must be between 1 and {}",
                MAX_AMOUNT_CENTS
            )));
        }

        let hours = &self.dashboard;
        if hours.opening_hour > 23 || hours.closing_hour > 23 {
            return Err(ConfigError::Invalid(format!(
                "dashboard hours must be between 0 and 23, got {} to {}",
                hours.opening_hour, hours.closing_hour
            )));
        }
        if hours.opening_hour > hours.closing_hour {
            return Err(ConfigError::Invalid(format!(
                "dashboard.opening_hour ({}) is after closing_hour ({})",
                hours.opening_hour, hours.closing_hour
            )));
        }

        if hours.frequent_clients == 0 {
            return Err(ConfigError::Invalid(
                "dashboard.frequent_clients must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Applies `OHANA_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("OHANA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("OHANA_LOCAL_STORE") {
            debug!(path = %path, "Overriding local store path from environment");
            self.storage.local_store_path = PathBuf::from(path);
        }

        if let Some(remote) = lookup("OHANA_REMOTE") {
            match parse_flag(&remote) {
                Some(enabled) => self.storage.remote_enabled = enabled,
                None => warn!(value = %remote, "Unknown OHANA_REMOTE value in environment"),
            }
        }

        // Whole pesos, as written on the price board
        if let Some(price) = lookup("OHANA_VALET_PRICE") {
            match price.trim().parse::<i64>().ok().and_then(|pesos| pesos.checked_mul(100)) {
                Some(cents) => self.pricing.valet_price_cents = cents,
                None => warn!(value = %price, "Invalid OHANA_VALET_PRICE in environment"),
            }
        }

        if let Some(name) = lookup("OHANA_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(limit) = lookup("OHANA_FREQUENT_CLIENTS") {
            if let Ok(n) = limit.trim().parse::<usize>() {
                self.dashboard.frequent_clients = n;
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn valet_price(&self) -> Money {
        Money::from_cents(self.pricing.valet_price_cents)
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            opening_hour: self.dashboard.opening_hour,
            closing_hour: self.dashboard.closing_hour,
            frequent_clients: self.dashboard.frequent_clients,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
