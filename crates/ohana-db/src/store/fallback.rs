//! # Fallback Store
//!
//! Relational store first, local store when that fails.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FallbackStore::save_ticket(t)                                         │
//! │                                                                         │
//! │  primary configured?                                                    │
//! │     ├── no  ──────────────────────────────► local.save_ticket(t)        │
//! │     └── yes ──► sqlite.save_ticket(t)                                   │
//! │                    ├── Ok  ──► done                                     │
//! │                    └── Err ──► warn! ─────► local.save_ticket(t)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reports fall back as a unit: if any query of a report fails on the
//! relational side, the whole report is rebuilt from the local store,
//! never stitched from both.
//!
//! Nothing written locally during an outage is copied back to the
//! relational store.

use chrono::NaiveDate;
use ohana_core::dashboard::{Dashboard, DashboardOptions};
use ohana_core::metrics::{Metrics, PeriodSummary};
use ohana_core::{ClientVisits, DateRange, Expense, Ticket, TimeFrame};
use tracing::warn;

use super::{load_dashboard, load_metrics, ExpenseStore, TicketStore};
use crate::error::DbResult;

/// Runs `$call` against the primary store, then against the fallback if
/// the primary is absent or errors.
macro_rules! with_fallback {
    ($self:ident, $op:literal, |$store:ident| $call:expr) => {{
        if let Some($store) = $self.primary.as_ref() {
            match $call.await {
                Ok(value) => return Ok(value),
                Err(err) => warn!(
                    operation = $op,
                    error = %err,
                    unavailable = err.is_unavailable(),
                    "Relational store failed, using local store"
                ),
            }
        }
        let $store = &$self.fallback;
        $call.await
    }};
}

/// Chains a primary store to a fallback.
#[derive(Debug)]
pub struct FallbackStore<P, F> {
    primary: Option<P>,
    fallback: F,
}

impl<P, F> FallbackStore<P, F>
where
    P: TicketStore + ExpenseStore,
    F: TicketStore + ExpenseStore,
{
    /// `primary: None` sends every call straight to `fallback`.
    pub fn new(primary: Option<P>, fallback: F) -> Self {
        FallbackStore { primary, fallback }
    }

    /// A store with no relational side.
    pub fn local_only(fallback: F) -> Self {
        FallbackStore::new(None, fallback)
    }

    pub fn primary(&self) -> Option<&P> {
        self.primary.as_ref()
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    /// Report for the window of `timeframe` around `date`.
    pub async fn metrics(&self, timeframe: TimeFrame, date: NaiveDate) -> DbResult<Metrics> {
        with_fallback!(self, "metrics", |store| load_metrics(store, timeframe, date))
    }

    /// Dashboard snapshot for the window of `timeframe` around `date`.
    pub async fn dashboard(
        &self,
        timeframe: TimeFrame,
        date: NaiveDate,
        options: DashboardOptions,
    ) -> DbResult<Dashboard> {
        with_fallback!(self, "dashboard", |store| load_dashboard(store, timeframe, date, options))
    }
}

impl<P, F> TicketStore for FallbackStore<P, F>
where
    P: TicketStore + ExpenseStore,
    F: TicketStore + ExpenseStore,
{
    const BACKEND: &'static str = "fallback";

    async fn save_ticket(&self, ticket: &Ticket) -> DbResult<()> {
        with_fallback!(self, "save_ticket", |store| store.save_ticket(ticket))
    }

    async fn list_tickets(&self) -> DbResult<Vec<Ticket>> {
        with_fallback!(self, "list_tickets", |store| store.list_tickets())
    }

    async fn tickets_between(&self, range: DateRange) -> DbResult<Vec<Ticket>> {
        with_fallback!(self, "tickets_between", |store| store.tickets_between(range))
    }

    async fn period_summary(&self, range: DateRange) -> DbResult<PeriodSummary> {
        with_fallback!(self, "period_summary", |store| store.period_summary(range))
    }

    async fn client_visits(&self, phone: &str) -> DbResult<ClientVisits> {
        with_fallback!(self, "client_visits", |store| store.client_visits(phone))
    }
}

impl<P, F> ExpenseStore for FallbackStore<P, F>
where
    P: TicketStore + ExpenseStore,
    F: TicketStore + ExpenseStore,
{
    async fn save_expense(&self, expense: &Expense) -> DbResult<()> {
        with_fallback!(self, "save_expense", |store| store.save_expense(expense))
    }

    async fn list_expenses(&self) -> DbResult<Vec<Expense>> {
        with_fallback!(self, "list_expenses", |store| store.list_expenses())
    }

    async fn expenses_between(&self, range: DateRange) -> DbResult<Vec<Expense>> {
        with_fallback!(self, "expenses_between", |store| store.expenses_between(range))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
