//! # Session Commands

use ohana_core::SessionUser;
use tracing::debug;

use crate::error::CliResult;
use crate::state::AppState;

pub fn login(state: &AppState, username: &str, password: &str) -> CliResult<SessionUser> {
    debug!(username = %username, "login command");
    Ok(state.local().login(username, password)?)
}

/// Closing a session when none is open is not an error.
pub fn logout(state: &AppState) -> CliResult<Option<SessionUser>> {
    let previous = state.local().current_user()?;
    state.local().logout()?;
    Ok(previous)
}

pub fn whoami(state: &AppState) -> CliResult<Option<SessionUser>> {
    Ok(state.local().current_user()?)
}
