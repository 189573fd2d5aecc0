//! # Store Traits
//!
//! The operations both stores answer, so callers never care which one
//! did.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                TicketStore + ExpenseStore                               │
//! │                                                                         │
//! │   Database (SQLite)      LocalStore (JSON)      FallbackStore<P, F>     │
//! │   SQL aggregates         fold in memory         P first, F on error     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`load_metrics`] and [`load_dashboard`] run against any one store, so a
//! report is always computed from a single source.

mod fallback;

pub use fallback::FallbackStore;

use chrono::NaiveDate;
use ohana_core::dashboard::{Dashboard, DashboardOptions};
use ohana_core::metrics::{Metrics, PeriodSummary};
use ohana_core::{ClientVisits, DateRange, Expense, Ticket, TimeFrame};
use tracing::debug;

use crate::error::DbResult;
use crate::local::LocalStore;
use crate::pool::Database;

/// Ticket persistence and the queries the reports need.
#[allow(async_fn_in_trait)]
pub trait TicketStore {
    /// Short name used in logs.
    const BACKEND: &'static str;

    async fn save_ticket(&self, ticket: &Ticket) -> DbResult<()>;

    /// Every ticket, newest first.
    async fn list_tickets(&self) -> DbResult<Vec<Ticket>>;

    /// Tickets inside `range`, newest first.
    async fn tickets_between(&self, range: DateRange) -> DbResult<Vec<Ticket>>;

    /// Valet, sales and payment totals for `range`.
    async fn period_summary(&self, range: DateRange) -> DbResult<PeriodSummary>;

    /// Visit count and last visit for a phone.
    async fn client_visits(&self, phone: &str) -> DbResult<ClientVisits>;
}

/// Expense persistence.
#[allow(async_fn_in_trait)]
pub trait ExpenseStore {
    async fn save_expense(&self, expense: &Expense) -> DbResult<()>;

    /// Every expense, newest first.
    async fn list_expenses(&self) -> DbResult<Vec<Expense>>;

    /// Expenses inside `range`, newest first.
    async fn expenses_between(&self, range: DateRange) -> DbResult<Vec<Expense>>;
}

// =============================================================================
// Relational Store
// =============================================================================

impl TicketStore for Database {
    const BACKEND: &'static str = "sqlite";

    async fn save_ticket(&self, ticket: &Ticket) -> DbResult<()> {
        self.tickets().insert(ticket).await
    }

    async fn list_tickets(&self) -> DbResult<Vec<Ticket>> {
        self.tickets().list().await
    }

    async fn tickets_between(&self, range: DateRange) -> DbResult<Vec<Ticket>> {
        self.tickets().between(range).await
    }

    async fn period_summary(&self, range: DateRange) -> DbResult<PeriodSummary> {
        self.metrics().period_summary(range).await
    }

    async fn client_visits(&self, phone: &str) -> DbResult<ClientVisits> {
        self.metrics().client_visits(phone).await
    }
}

impl ExpenseStore for Database {
    async fn save_expense(&self, expense: &Expense) -> DbResult<()> {
        self.expenses().insert(expense).await
    }

    async fn list_expenses(&self) -> DbResult<Vec<Expense>> {
        self.expenses().list().await
    }

    async fn expenses_between(&self, range: DateRange) -> DbResult<Vec<Expense>> {
        self.expenses().between(range).await
    }
}

// =============================================================================
// Local Store
// =============================================================================

impl TicketStore for LocalStore {
    const BACKEND: &'static str = "local";

    async fn save_ticket(&self, ticket: &Ticket) -> DbResult<()> {
        self.append_ticket(ticket)
    }

    async fn list_tickets(&self) -> DbResult<Vec<Ticket>> {
        self.tickets()
    }

    async fn tickets_between(&self, range: DateRange) -> DbResult<Vec<Ticket>> {
        self.tickets_in(range)
    }

    async fn period_summary(&self, range: DateRange) -> DbResult<PeriodSummary> {
        self.summary_in(range)
    }

    async fn client_visits(&self, phone: &str) -> DbResult<ClientVisits> {
        self.visits_of(phone)
    }
}

impl ExpenseStore for LocalStore {
    async fn save_expense(&self, expense: &Expense) -> DbResult<()> {
        self.append_expense(expense)
    }

    async fn list_expenses(&self) -> DbResult<Vec<Expense>> {
        self.expenses()
    }

    async fn expenses_between(&self, range: DateRange) -> DbResult<Vec<Expense>> {
        self.expenses_in(range)
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Builds the report for the window of `timeframe` around `date`.
pub async fn load_metrics<S: TicketStore>(store: &S, timeframe: TimeFrame, date: NaiveDate) -> DbResult<Metrics> {
    let range = timeframe.range(date);
    debug!(backend = S::BACKEND, %timeframe, %date, "Loading metrics");

    let summary = store.period_summary(range).await?;
    let tickets = store.tickets_between(range).await?;
    Ok(Metrics::build(timeframe, date, summary, &tickets))
}

/// Builds the dashboard snapshot: the report, the window before it,
/// expenses and frequent clients.
pub async fn load_dashboard<S: TicketStore + ExpenseStore>(
    store: &S,
    timeframe: TimeFrame,
    date: NaiveDate,
    options: DashboardOptions,
) -> DbResult<Dashboard> {
    let metrics = load_metrics(store, timeframe, date).await?;

    let previous_range = timeframe.range(timeframe.previous_reference(date));
    let previous = store.period_summary(previous_range).await?;

    let all_tickets = store.list_tickets().await?;
    let expenses = store.expenses_between(metrics.range()).await?;

    Ok(Dashboard::build(date, metrics, previous, &all_tickets, &expenses, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::tests::{at, temp_store, ticket};
    use crate::pool::DbConfig;
    use ohana_core::{ExpenseDraft, Money};

    async fn fill<S: TicketStore + ExpenseStore>(store: &S) {
        for (number, name, phone, created_at) in [
            ("00000001", "Ana", "1144441234", at(14, 10)),
            ("00000002", "Ana María", "1144441234", at(15, 9)),
            ("00000003", "Ana", "1155550000", at(15, 17)),
            ("00000004", "Ana", "1166660000", at(21, 11)),
        ] {
            let mut t = ticket(number, phone, created_at);
            t.customer_name = name.to_string();
            store.save_ticket(&t).await.unwrap();
        }
        let expense = ExpenseDraft {
            description: "Jabón".to_string(),
            amount_cents: Money::from_pesos(2_000).cents(),
        }
        .into_expense(at(15, 8))
        .unwrap();
        store.save_expense(&expense).await.unwrap();
    }

    #[tokio::test]
    async fn test_both_stores_agree() {
        let (_dir, local) = temp_store();
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        fill(&local).await;
        fill(&db).await;

        let date = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        for timeframe in [TimeFrame::Daily, TimeFrame::Weekly, TimeFrame::Monthly] {
            let from_local = load_metrics(&local, timeframe, date).await.unwrap();
            let from_db = load_metrics(&db, timeframe, date).await.unwrap();
            assert_eq!(from_local, from_db, "{timeframe}");
        }

        assert_eq!(
            local.client_visits("1144441234").await.unwrap(),
            db.client_visits("1144441234").await.unwrap()
        );
        let listed = db.list_tickets().await.unwrap();
        assert_eq!(local.list_tickets().await.unwrap(), listed);
        let names: Vec<_> = listed
            .iter()
            .filter(|t| t.customer_phone == "1144441234")
            .map(|t| t.customer_name.as_str())
            .collect();
        assert_eq!(names, ["Ana María", "Ana"]);

        let options = DashboardOptions::default();
        let from_local = load_dashboard(&local, TimeFrame::Weekly, date, options).await.unwrap();
        let from_db = load_dashboard(&db, TimeFrame::Weekly, date, options).await.unwrap();
        assert_eq!(from_local.frequent_clients, from_db.frequent_clients);
        assert_eq!(from_db.frequent_clients[0].name, "Ana María");
    }

    #[tokio::test]
    async fn test_daily_dashboard() {
        let (_dir, local) = temp_store();
        fill(&local).await;

        let date = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let dashboard = load_dashboard(&local, TimeFrame::Daily, date, DashboardOptions::default())
            .await
            .unwrap();

        assert_eq!(dashboard.metrics.summary().total_sales, Money::from_pesos(10_000));
        assert_eq!(dashboard.previous.total_sales, Money::from_pesos(5_000));
        assert_eq!(dashboard.trend.revenue, 100);
        assert_eq!(dashboard.total_expenses, Money::from_pesos(2_000));
        assert_eq!(dashboard.net_revenue, Money::from_pesos(8_000));
        assert_eq!(dashboard.frequent_clients[0].phone, "1144441234");
    }
}
