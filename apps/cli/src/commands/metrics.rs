//! # Report Commands
//!
//! Both reports are computed from a single store: the relational one when
//! it answers, otherwise the local one.

use chrono::NaiveDate;
use ohana_core::dashboard::Dashboard;
use ohana_core::metrics::Metrics;
use ohana_core::{Permission, TimeFrame};
use tracing::debug;

use crate::error::CliResult;
use crate::state::AppState;

pub async fn report(state: &AppState, timeframe: TimeFrame, date: NaiveDate) -> CliResult<Metrics> {
    state.require(Permission::MetricsView)?;
    debug!(%timeframe, %date, "metrics command");
    Ok(state.store().metrics(timeframe, date).await?)
}

pub async fn dashboard(state: &AppState, timeframe: TimeFrame, date: NaiveDate) -> CliResult<Dashboard> {
    state.require(Permission::MetricsView)?;
    debug!(%timeframe, %date, "dashboard command");

    let options = state.config().dashboard_options();
    Ok(state.store().dashboard(timeframe, date, options).await?)
}
