//! # State Module
//!
//! Everything a command needs, opened once per invocation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  AppConfig::load(--config)                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  AppState                                                        │  │
//! │  │                                                                  │  │
//! │  │  config ─────► valet price, dashboard hours, paths               │  │
//! │  │                                                                  │  │
//! │  │  store ──────► FallbackStore                                     │  │
//! │  │                  primary:  Option<Database>  (None when disabled │  │
//! │  │                                              or unreachable)     │  │
//! │  │                  fallback: LocalStore        (always present)    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Session, ticket counter, inventory and users always live in the       │
//! │  local store.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;

pub use config::{
    AppConfig, ConfigError, ConfigResult, DashboardSettings, PricingSettings, StorageSettings,
    StoreSettings,
};

use ohana_core::auth::authorize;
use ohana_core::{Permission, SessionUser};
use ohana_db::{AppStore, Database, DbConfig, FallbackStore, LocalStore};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::CliResult;

/// Configuration plus the open store stack.
#[derive(Debug)]
pub struct AppState {
    config: AppConfig,
    config_path: Option<PathBuf>,
    store: AppStore,
}

impl AppState {
    /// Opens the stores described by `config`.
    ///
    /// A relational store that cannot be opened is logged and skipped, so
    /// the counter keeps working on the local store alone.
    pub async fn open(config: AppConfig, config_path: Option<PathBuf>) -> CliResult<Self> {
        let local = LocalStore::open(&config.storage.local_store_path);

        let remote = if config.storage.remote_enabled {
            let db_config = DbConfig::new(&config.storage.database_path);
            match Database::new(db_config).await {
                Ok(db) => Some(db),
                Err(err) => {
                    warn!(
                        path = %config.storage.database_path.display(),
                        error = %err,
                        "Relational store unavailable, running on the local store"
                    );
                    None
                }
            }
        } else {
            info!("Relational store disabled in config");
            None
        };

        Ok(AppState::new(config, config_path, FallbackStore::new(remote, local)))
    }

    /// Wraps an already-open store.
    pub fn new(config: AppConfig, config_path: Option<PathBuf>, store: AppStore) -> Self {
        AppState {
            config,
            config_path,
            store,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The file the config was (or would be) read from.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config_path.clone().or_else(AppConfig::default_config_path)
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    /// The local store, which owns session, counter, inventory and users.
    pub fn local(&self) -> &LocalStore {
        self.store.fallback()
    }

    /// The logged-in user, if they hold `permission`.
    pub fn require(&self, permission: Permission) -> CliResult<SessionUser> {
        let session = self.local().current_user()?;
        let user = authorize(session.as_ref(), permission)?;
        Ok(user.clone())
    }
}
