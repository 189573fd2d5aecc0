//! # Status Command
//!
//! Where data lives, whether SQLite answers, and who is logged in.

use ohana_core::ticket_number::format_ticket_number;
use ohana_core::SessionUser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

use crate::error::CliResult;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub store_name: String,
    pub config_path: Option<PathBuf>,
    pub database_path: PathBuf,
    pub local_store_path: PathBuf,
    pub remote_enabled: bool,
    /// `None` when SQLite is disabled or could not be opened.
    pub remote: Option<RemoteStatus>,
    pub current_user: Option<SessionUser>,
    pub last_ticket_number: Option<String>,
    pub valet_price: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStatus {
    pub healthy: bool,
    pub migrations_total: usize,
    pub migrations_applied: usize,
}

pub async fn report(state: &AppState) -> CliResult<StatusReport> {
    let config = state.config();

    let remote = match state.store().primary() {
        Some(db) => {
            let healthy = db.health_check().await;
            let (total, applied) = db.migration_status().await.unwrap_or_else(|e| {
                warn!(error = %e, "Could not read migration status");
                (0, 0)
            });
            Some(RemoteStatus {
                healthy,
                migrations_total: total,
                migrations_applied: applied,
            })
        }
        None => None,
    };

    let last = state.local().last_ticket_number()?;

    Ok(StatusReport {
        store_name: config.store.name.clone(),
        config_path: state.config_path(),
        database_path: config.storage.database_path.clone(),
        local_store_path: state.local().path().to_path_buf(),
        remote_enabled: config.storage.remote_enabled,
        remote,
        current_user: state.local().current_user()?,
        last_ticket_number: (last > 0).then(|| format_ticket_number(last)),
        valet_price: config.valet_price().to_string(),
    })
}
