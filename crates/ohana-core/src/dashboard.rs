//! # Dashboard Snapshot
//!
//! Combines a period report with the comparison period, expenses, the
//! hourly revenue curve and the frequent-client list.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Dashboard (timeframe, date)                                            │
//! │  ├── metrics            current period (Daily / Weekly / Monthly)       │
//! │  ├── previous           summary of the period before                    │
//! │  ├── trend              % change revenue / valets / cash / digital      │
//! │  ├── expenses           expenses dated inside the period                │
//! │  ├── net_revenue        total_sales - total_expenses                    │
//! │  ├── revenue_by_hour    shop hours, daily view only                     │
//! │  └── frequent_clients   top N by visits across all tickets              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::metrics::{Metrics, PeriodSummary, TrendComparison};
use crate::money::Money;
use crate::period::{DateRange, TimeFrame};
use crate::types::{Expense, Ticket};
use crate::{DEFAULT_CLOSING_HOUR, DEFAULT_FREQUENT_CLIENTS, DEFAULT_OPENING_HOUR};

/// Knobs the shop can tune in its config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub opening_hour: u32,
    pub closing_hour: u32,
    pub frequent_clients: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        DashboardOptions {
            opening_hour: DEFAULT_OPENING_HOUR,
            closing_hour: DEFAULT_CLOSING_HOUR,
            frequent_clients: DEFAULT_FREQUENT_CLIENTS,
        }
    }
}

/// Revenue for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HourlyRevenue {
    pub hour: u32,
    pub sales: Money,
    pub tickets: i64,
}

/// A returning customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FrequentClient {
    /// Name on the customer's most recent ticket.
    pub name: String,
    pub phone: String,
    pub visits: i64,
    pub total_spent: Money,
    #[ts(as = "String")]
    pub last_visit: NaiveDateTime,
}

/// Buckets ticket totals by hour for `opening..=closing`.
///
/// Tickets outside shop hours are left out rather than clamped.
pub fn revenue_by_hour<'a, I: IntoIterator<Item = &'a Ticket>>(
    tickets: I,
    opening_hour: u32,
    closing_hour: u32,
) -> Vec<HourlyRevenue> {
    let mut buckets: Vec<HourlyRevenue> = (opening_hour..=closing_hour)
        .map(|hour| HourlyRevenue {
            hour,
            sales: Money::zero(),
            tickets: 0,
        })
        .collect();

    for ticket in tickets {
        let hour = ticket.created_at.hour();
        if let Some(bucket) = buckets.iter_mut().find(|b| b.hour == hour) {
            bucket.sales += ticket.total();
            bucket.tickets += 1;
        }
    }

    buckets
}

/// Groups tickets by phone and returns the `limit` most frequent clients.
///
/// Ranked by visits, then most recent visit.
pub fn frequent_clients(tickets: &[Ticket], limit: usize) -> Vec<FrequentClient> {
    let mut by_phone: HashMap<&str, FrequentClient> = HashMap::new();

    for ticket in tickets {
        let entry = by_phone
            .entry(ticket.customer_phone.as_str())
            .or_insert_with(|| FrequentClient {
                name: ticket.customer_name.clone(),
                phone: ticket.customer_phone.clone(),
                visits: 0,
                total_spent: Money::zero(),
                last_visit: ticket.created_at,
            });

        entry.visits += 1;
        entry.total_spent += ticket.total();
        if ticket.created_at >= entry.last_visit {
            entry.last_visit = ticket.created_at;
            entry.name = ticket.customer_name.clone();
        }
    }

    let mut clients: Vec<FrequentClient> = by_phone.into_values().collect();
    clients.sort_by(|a, b| {
        b.visits
            .cmp(&a.visits)
            .then_with(|| b.last_visit.cmp(&a.last_visit))
            .then_with(|| a.phone.cmp(&b.phone))
    });
    clients.truncate(limit);
    clients
}

/// Expenses dated inside `range`, newest first.
pub fn expenses_in(expenses: &[Expense], range: DateRange) -> Vec<Expense> {
    let mut selected: Vec<Expense> = expenses
        .iter()
        .filter(|e| range.contains(e.date))
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.date.cmp(&a.date));
    selected
}

/// Everything the dashboard screen shows for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub timeframe: TimeFrame,
    #[ts(as = "String")]
    pub reference_date: NaiveDate,
    pub metrics: Metrics,
    pub previous: PeriodSummary,
    pub trend: TrendComparison,
    pub expenses: Vec<Expense>,
    pub total_expenses: Money,
    pub net_revenue: Money,
    pub revenue_by_hour: Vec<HourlyRevenue>,
    pub frequent_clients: Vec<FrequentClient>,
}

impl Dashboard {
    /// Assembles the snapshot.
    ///
    /// ## Arguments
    /// * `metrics` - report for the current period
    /// * `previous` - summary of the period before
    /// * `all_tickets` - every known ticket (frequent clients look across all time)
    /// * `expenses` - any expenses; only those inside the period count
    pub fn build(
        reference_date: NaiveDate,
        metrics: Metrics,
        previous: PeriodSummary,
        all_tickets: &[Ticket],
        expenses: &[Expense],
        options: DashboardOptions,
    ) -> Self {
        let timeframe = metrics.timeframe();
        let range = metrics.range();
        let trend = TrendComparison::between(metrics.summary(), &previous);

        let expenses = expenses_in(expenses, range);
        let total_expenses: Money = expenses.iter().map(|e| e.amount()).sum();
        let net_revenue = metrics.summary().total_sales - total_expenses;

        let revenue_by_hour = if timeframe == TimeFrame::Daily {
            revenue_by_hour(
                all_tickets.iter().filter(|t| range.contains(t.created_at)),
                options.opening_hour,
                options.closing_hour,
            )
        } else {
            Vec::new()
        };

        Dashboard {
            timeframe,
            reference_date,
            metrics,
            previous,
            trend,
            expenses,
            total_expenses,
            net_revenue,
            revenue_by_hour,
            frequent_clients: frequent_clients(all_tickets, options.frequent_clients),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
