//! # Config Commands

use serde::Serialize;
use std::path::PathBuf;

use crate::error::{CliError, CliResult, ErrorCode};
use crate::state::{AppConfig, ConfigError};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigWritten {
    pub path: PathBuf,
    pub config: AppConfig,
}

/// Writes the default configuration to `path` (or the platform default).
pub fn init(path: Option<PathBuf>, force: bool) -> CliResult<ConfigWritten> {
    let path = path
        .or_else(AppConfig::default_config_path)
        .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

    if path.exists() && !force {
        return Err(CliError::new(
            ErrorCode::ConfigError,
            format!("{} already exists, use --force to overwrite", path.display()),
        ));
    }

    let config = AppConfig::default();
    let path = config.save(Some(path))?;
    Ok(ConfigWritten { path, config })
}
