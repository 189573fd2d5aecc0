//! # Metrics Aggregation
//!
//! Reduces a ticket list into the numbers the dashboard shows.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Aggregation Pipeline                                │
//! │                                                                         │
//! │  tickets ──filter(range)──► in-range tickets                            │
//! │                                  │                                      │
//! │            ┌─────────────────────┼──────────────────────┐               │
//! │            ▼                     ▼                      ▼               │
//! │     PeriodSummary        DryCleaningRollup[]     breakdown buckets      │
//! │     • total_valets       • grouped by name       • Weekly: 7 days       │
//! │     • total_sales        • Σ quantity            • Monthly: weeks       │
//! │     • payment_breakdown  • Σ price × quantity      from the 1st         │
//! │            │                                                            │
//! │            ▼                                                            │
//! │     TrendComparison (vs previous period)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The summary can also come straight from SQL (see `ohana-db`); the
//! `build` constructors accept it from either source.
//!
//! ## Invariants
//! - `payment_breakdown.total() == total_sales`
//! - daily slots of a week sum to the weekly summary
//! - week buckets of a month sum to the monthly summary

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::period::{day_range, month_range, month_weeks, week_days, week_range, DateRange, TimeFrame};
use crate::types::{PaymentMethod, Ticket};

// =============================================================================
// Payment Breakdown
// =============================================================================

/// Revenue split across the four payment rails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdown {
    pub cash: Money,
    pub debit: Money,
    pub mercadopago: Money,
    pub cuentadni: Money,
}

impl PaymentBreakdown {
    /// Adds `amount` to the bucket for `method`.
    pub fn add(&mut self, method: PaymentMethod, amount: Money) {
        match method {
            PaymentMethod::Cash => self.cash += amount,
            PaymentMethod::Debit => self.debit += amount,
            PaymentMethod::Mercadopago => self.mercadopago += amount,
            PaymentMethod::Cuentadni => self.cuentadni += amount,
        }
    }

    /// Reads the bucket for `method`.
    pub fn get(&self, method: PaymentMethod) -> Money {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Debit => self.debit,
            PaymentMethod::Mercadopago => self.mercadopago,
            PaymentMethod::Cuentadni => self.cuentadni,
        }
    }

    /// Sum of every rail.
    pub fn total(&self) -> Money {
        PaymentMethod::ALL.iter().map(|&m| self.get(m)).sum()
    }

    /// Every rail except cash (debit + mercadopago + cuentadni).
    pub fn digital(&self) -> Money {
        PaymentMethod::ALL
            .iter()
            .filter(|m| m.is_digital())
            .map(|&m| self.get(m))
            .sum()
    }
}

// =============================================================================
// Period Summary
// =============================================================================

/// Totals for one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub total_valets: i64,
    pub total_sales: Money,
    pub payment_breakdown: PaymentBreakdown,
}

impl PeriodSummary {
    /// Folds tickets into totals. Callers filter by range first.
    pub fn from_tickets<'a, I: IntoIterator<Item = &'a Ticket>>(tickets: I) -> Self {
        tickets.into_iter().fold(PeriodSummary::default(), |mut acc, t| {
            acc.total_valets += t.valet_quantity;
            acc.total_sales += t.total();
            acc.payment_breakdown.add(t.payment_method, t.total());
            acc
        })
    }
}

// =============================================================================
// Dry-Cleaning Rollup
// =============================================================================

/// Dry-cleaning lines grouped by service name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DryCleaningRollup {
    pub name: String,
    pub quantity: i64,
    pub sales: Money,
}

/// Groups every dry-cleaning line by name, summing quantity and
/// price × quantity. Order follows first appearance.
pub fn rollup_dry_cleaning<'a, I: IntoIterator<Item = &'a Ticket>>(tickets: I) -> Vec<DryCleaningRollup> {
    let mut rollup: Vec<DryCleaningRollup> = Vec::new();

    for item in tickets.into_iter().flat_map(|t| t.dry_cleaning_items.iter()) {
        match rollup.iter_mut().find(|r| r.name == item.name) {
            Some(existing) => {
                existing.quantity += item.quantity;
                existing.sales += item.line_total();
            }
            None => rollup.push(DryCleaningRollup {
                name: item.name.clone(),
                quantity: item.quantity,
                sales: item.line_total(),
            }),
        }
    }

    rollup
}

// =============================================================================
// Breakdown Entries
// =============================================================================

/// One day inside a weekly report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyBreakdownEntry {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub sales: Money,
    pub valets: i64,
}

/// One week bucket inside a monthly report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyBreakdownEntry {
    pub week_number: u32,
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
    pub sales: Money,
    pub valets: i64,
}

fn sum_in<'a>(tickets: &'a [Ticket], range: DateRange) -> impl Iterator<Item = &'a Ticket> {
    tickets.iter().filter(move |t| range.contains(t.created_at))
}

fn tickets_in(tickets: &[Ticket], range: DateRange) -> Vec<Ticket> {
    sum_in(tickets, range).cloned().collect()
}

// =============================================================================
// Daily / Weekly / Monthly Metrics
// =============================================================================

/// Metrics for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetrics {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub range: DateRange,
    pub summary: PeriodSummary,
    pub dry_cleaning_items: Vec<DryCleaningRollup>,
}

impl DailyMetrics {
    /// Assembles from a precomputed summary and the tickets of the window.
    pub fn build(date: NaiveDate, summary: PeriodSummary, tickets: &[Ticket]) -> Self {
        let range = day_range(date);
        DailyMetrics {
            date,
            range,
            summary,
            dry_cleaning_items: rollup_dry_cleaning(sum_in(tickets, range)),
        }
    }

    /// Computes everything from an unfiltered ticket list.
    pub fn compute(date: NaiveDate, tickets: &[Ticket]) -> Self {
        let in_range = tickets_in(tickets, day_range(date));
        Self::build(date, PeriodSummary::from_tickets(&in_range), &in_range)
    }
}

/// Metrics for a Sunday-start week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMetrics {
    #[ts(as = "String")]
    pub week_start: NaiveDate,
    pub range: DateRange,
    pub summary: PeriodSummary,
    pub dry_cleaning_items: Vec<DryCleaningRollup>,
    /// Seven slots, Sunday first.
    pub daily_breakdown: Vec<DailyBreakdownEntry>,
}

impl WeeklyMetrics {
    /// Assembles from a precomputed summary and the tickets of the window.
    pub fn build(date: NaiveDate, summary: PeriodSummary, tickets: &[Ticket]) -> Self {
        let range = week_range(date);
        let daily_breakdown = week_days(date)
            .into_iter()
            .map(|day| {
                let slot = PeriodSummary::from_tickets(sum_in(tickets, day_range(day)));
                DailyBreakdownEntry {
                    date: day,
                    sales: slot.total_sales,
                    valets: slot.total_valets,
                }
            })
            .collect();

        WeeklyMetrics {
            week_start: range.first_day(),
            range,
            summary,
            dry_cleaning_items: rollup_dry_cleaning(sum_in(tickets, range)),
            daily_breakdown,
        }
    }

    /// Computes everything from an unfiltered ticket list.
    pub fn compute(date: NaiveDate, tickets: &[Ticket]) -> Self {
        let in_range = tickets_in(tickets, week_range(date));
        Self::build(date, PeriodSummary::from_tickets(&in_range), &in_range)
    }
}

/// Metrics for a calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyMetrics {
    #[ts(as = "String")]
    pub month_start: NaiveDate,
    pub range: DateRange,
    pub summary: PeriodSummary,
    pub dry_cleaning_items: Vec<DryCleaningRollup>,
    /// Week buckets counted from the 1st.
    pub weekly_breakdown: Vec<WeeklyBreakdownEntry>,
}

impl MonthlyMetrics {
    /// Assembles from a precomputed summary and the tickets of the window.
    pub fn build(date: NaiveDate, summary: PeriodSummary, tickets: &[Ticket]) -> Self {
        let range = month_range(date);
        let weekly_breakdown = month_weeks(date)
            .into_iter()
            .map(|week| {
                let slot = PeriodSummary::from_tickets(sum_in(tickets, week.range()));
                WeeklyBreakdownEntry {
                    week_number: week.week_number,
                    start: week.start,
                    end: week.end,
                    sales: slot.total_sales,
                    valets: slot.total_valets,
                }
            })
            .collect();

        MonthlyMetrics {
            month_start: range.first_day(),
            range,
            summary,
            dry_cleaning_items: rollup_dry_cleaning(sum_in(tickets, range)),
            weekly_breakdown,
        }
    }

    /// Computes everything from an unfiltered ticket list.
    pub fn compute(date: NaiveDate, tickets: &[Ticket]) -> Self {
        let in_range = tickets_in(tickets, month_range(date));
        Self::build(date, PeriodSummary::from_tickets(&in_range), &in_range)
    }
}

/// Any of the three reports, tagged by timeframe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "timeframe", rename_all = "lowercase")]
pub enum Metrics {
    Daily(DailyMetrics),
    Weekly(WeeklyMetrics),
    Monthly(MonthlyMetrics),
}

impl Metrics {
    /// Assembles the report for `timeframe` from a summary plus tickets.
    pub fn build(timeframe: TimeFrame, date: NaiveDate, summary: PeriodSummary, tickets: &[Ticket]) -> Self {
        match timeframe {
            TimeFrame::Daily => Metrics::Daily(DailyMetrics::build(date, summary, tickets)),
            TimeFrame::Weekly => Metrics::Weekly(WeeklyMetrics::build(date, summary, tickets)),
            TimeFrame::Monthly => Metrics::Monthly(MonthlyMetrics::build(date, summary, tickets)),
        }
    }

    /// Computes the report for `timeframe` from an unfiltered ticket list.
    pub fn compute(timeframe: TimeFrame, date: NaiveDate, tickets: &[Ticket]) -> Self {
        match timeframe {
            TimeFrame::Daily => Metrics::Daily(DailyMetrics::compute(date, tickets)),
            TimeFrame::Weekly => Metrics::Weekly(WeeklyMetrics::compute(date, tickets)),
            TimeFrame::Monthly => Metrics::Monthly(MonthlyMetrics::compute(date, tickets)),
        }
    }

    pub fn timeframe(&self) -> TimeFrame {
        match self {
            Metrics::Daily(_) => TimeFrame::Daily,
            Metrics::Weekly(_) => TimeFrame::Weekly,
            Metrics::Monthly(_) => TimeFrame::Monthly,
        }
    }

    pub fn range(&self) -> DateRange {
        match self {
            Metrics::Daily(m) => m.range,
            Metrics::Weekly(m) => m.range,
            Metrics::Monthly(m) => m.range,
        }
    }

    pub fn summary(&self) -> &PeriodSummary {
        match self {
            Metrics::Daily(m) => &m.summary,
            Metrics::Weekly(m) => &m.summary,
            Metrics::Monthly(m) => &m.summary,
        }
    }

    pub fn dry_cleaning_items(&self) -> &[DryCleaningRollup] {
        match self {
            Metrics::Daily(m) => &m.dry_cleaning_items,
            Metrics::Weekly(m) => &m.dry_cleaning_items,
            Metrics::Monthly(m) => &m.dry_cleaning_items,
        }
    }
}

// =============================================================================
// Trend Comparison
// =============================================================================

/// Whole-percent change from `previous` to `current`.
///
/// ## Rules
/// - `previous == 0` and `current > 0` → `100`
/// - `previous == 0` otherwise → `0`
/// - else `round((current - previous) / previous × 100)`, halves rounded up
///
/// ## Example
/// ```rust
/// use ohana_core::metrics::percent_change;
///
/// assert_eq!(percent_change(150, 100), 50);
/// assert_eq!(percent_change(50, 100), -50);
/// assert_eq!(percent_change(10, 0), 100);
/// assert_eq!(percent_change(0, 0), 0);
/// ```
pub fn percent_change(current: i64, previous: i64) -> i64 {
    if previous == 0 {
        return if current > 0 { 100 } else { 0 };
    }

    let mut numerator = (i128::from(current) - i128::from(previous)) * 100;
    let mut denominator = i128::from(previous);
    if denominator < 0 {
        numerator = -numerator;
        denominator = -denominator;
    }

    // floor(n / d + 1/2) == floor((2n + d) / 2d)
    (2 * numerator + denominator).div_euclid(2 * denominator) as i64
}

/// Period-over-period change of the headline numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TrendComparison {
    pub revenue: i64,
    pub valets: i64,
    pub cash: i64,
    pub digital: i64,
}

impl TrendComparison {
    pub fn between(current: &PeriodSummary, previous: &PeriodSummary) -> Self {
        TrendComparison {
            revenue: percent_change(current.total_sales.cents(), previous.total_sales.cents()),
            valets: percent_change(current.total_valets, previous.total_valets),
            cash: percent_change(
                current.payment_breakdown.cash.cents(),
                previous.payment_breakdown.cash.cents(),
            ),
            digital: percent_change(
                current.payment_breakdown.digital().cents(),
                previous.payment_breakdown.digital().cents(),
            ),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DryCleaningItem, LaundryOptions};
    use chrono::NaiveDateTime;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 30, 0)
            .unwrap()
    }

    fn ticket(
        created_at: NaiveDateTime,
        valets: i64,
        method: PaymentMethod,
        items: Vec<DryCleaningItem>,
    ) -> Ticket {
        let items_total: Money = items.iter().map(|i| i.line_total()).sum();
        let total = Money::from_pesos(5_000) * valets + items_total;
        Ticket {
            id: format!("t-{}", created_at),
            ticket_number: "00000001".to_string(),
            customer_name: "Cliente".to_string(),
            customer_phone: "2211234567".to_string(),
            valet_quantity: valets,
            laundry_options: LaundryOptions::default(),
            payment_method: method,
            dry_cleaning_items: items,
            total_cents: total.cents(),
            created_at,
        }
    }

    fn sample() -> Vec<Ticket> {
        vec![
            // Wed 2024-05-15
            ticket(at(2024, 5, 15, 9), 2, PaymentMethod::Cash, vec![]),
            ticket(
                at(2024, 5, 15, 12),
                1,
                PaymentMethod::Mercadopago,
                vec![DryCleaningItem::new("Traje", Money::from_pesos(29_000), 1)],
            ),
            ticket(
                at(2024, 5, 15, 18),
                0,
                PaymentMethod::Debit,
                vec![
                    DryCleaningItem::new("Traje", Money::from_pesos(30_000), 2),
                    DryCleaningItem::new("Corbata", Money::from_pesos(7_000), 1),
                ],
            ),
            // Sun 2024-05-12 (same week) and Sat 2024-05-18 (same week)
            ticket(at(2024, 5, 12, 10), 3, PaymentMethod::Cuentadni, vec![]),
            ticket(at(2024, 5, 18, 19), 1, PaymentMethod::Cash, vec![]),
            // Previous week, same month
            ticket(at(2024, 5, 3, 10), 4, PaymentMethod::Cash, vec![]),
            // Previous month
            ticket(at(2024, 4, 30, 23), 5, PaymentMethod::Debit, vec![]),
        ]
    }

    #[test]
    fn test_daily_totals_and_breakdown() {
        let daily = DailyMetrics::compute(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(), &sample());

        assert_eq!(daily.summary.total_valets, 3);
        // 2×5000 + (5000 + 29000) + (2×30000 + 7000)
        assert_eq!(daily.summary.total_sales, Money::from_pesos(111_000));
        assert_eq!(daily.summary.payment_breakdown.cash, Money::from_pesos(10_000));
        assert_eq!(daily.summary.payment_breakdown.mercadopago, Money::from_pesos(34_000));
        assert_eq!(daily.summary.payment_breakdown.debit, Money::from_pesos(67_000));
        assert_eq!(
            daily.summary.payment_breakdown.total(),
            daily.summary.total_sales
        );
        assert_eq!(daily.summary.payment_breakdown.digital(), Money::from_pesos(101_000));
    }

    #[test]
    fn test_dry_cleaning_rollup_by_name() {
        let daily = DailyMetrics::compute(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(), &sample());

        assert_eq!(
            daily.dry_cleaning_items,
            vec![
                DryCleaningRollup {
                    name: "Traje".to_string(),
                    quantity: 3,
                    sales: Money::from_pesos(89_000),
                },
                DryCleaningRollup {
                    name: "Corbata".to_string(),
                    quantity: 1,
                    sales: Money::from_pesos(7_000),
                },
            ]
        );
    }

    #[test]
    fn test_weekly_slots_sum_to_total() {
        let weekly = WeeklyMetrics::compute(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(), &sample());

        assert_eq!(weekly.week_start, NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
        assert_eq!(weekly.daily_breakdown.len(), 7);
        assert_eq!(weekly.summary.total_valets, 7);

        let slot_sales: Money = weekly.daily_breakdown.iter().map(|d| d.sales).sum();
        let slot_valets: i64 = weekly.daily_breakdown.iter().map(|d| d.valets).sum();
        assert_eq!(slot_sales, weekly.summary.total_sales);
        assert_eq!(slot_valets, weekly.summary.total_valets);

        // Sunday slot holds the 12th
        assert_eq!(weekly.daily_breakdown[0].valets, 3);
        // Saturday slot holds the 18th
        assert_eq!(weekly.daily_breakdown[6].valets, 1);
    }

    #[test]
    fn test_monthly_buckets_sum_to_total() {
        let monthly = MonthlyMetrics::compute(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), &sample());

        assert_eq!(monthly.weekly_breakdown.len(), 5);
        assert_eq!(monthly.summary.total_valets, 11);

        let bucket_sales: Money = monthly.weekly_breakdown.iter().map(|w| w.sales).sum();
        let bucket_valets: i64 = monthly.weekly_breakdown.iter().map(|w| w.valets).sum();
        assert_eq!(bucket_sales, monthly.summary.total_sales);
        assert_eq!(bucket_valets, monthly.summary.total_valets);

        // May 3 lands in week 1 (1st to Saturday 4th)
        assert_eq!(monthly.weekly_breakdown[0].valets, 4);
    }

    #[test]
    fn test_build_uses_supplied_summary() {
        let tickets = sample();
        let date = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let summary = PeriodSummary {
            total_valets: 99,
            ..PeriodSummary::default()
        };
        let metrics = Metrics::build(TimeFrame::Daily, date, summary, &tickets);

        assert_eq!(metrics.summary().total_valets, 99);
        assert_eq!(metrics.dry_cleaning_items().len(), 2);
        assert_eq!(metrics.timeframe(), TimeFrame::Daily);
    }

    #[test]
    fn test_empty_period() {
        let daily = DailyMetrics::compute(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(), &sample());
        assert_eq!(daily.summary, PeriodSummary::default());
        assert!(daily.dry_cleaning_items.is_empty());
    }

    #[test]
    fn test_percent_change_rules() {
        assert_eq!(percent_change(0, 0), 0);
        assert_eq!(percent_change(5, 0), 100);
        assert_eq!(percent_change(100, 100), 0);
        assert_eq!(percent_change(150, 100), 50);
        assert_eq!(percent_change(0, 100), -100);
        // halves round up, like the dashboard always did
        assert_eq!(percent_change(1, 8), -87);
        assert_eq!(percent_change(3, 2), 50);
        assert_eq!(percent_change(201, 200), 1);
        assert_eq!(percent_change(1, 3), -67);
    }

    #[test]
    fn test_trend_between_periods() {
        let tickets = sample();
        let current = DailyMetrics::compute(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(), &tickets);
        let previous = DailyMetrics::compute(NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(), &tickets);

        let trend = TrendComparison::between(&current.summary, &previous.summary);
        assert_eq!(trend.revenue, 100);
        assert_eq!(trend.valets, 100);
        assert_eq!(trend.cash, 100);
        assert_eq!(trend.digital, 100);

        let flat = TrendComparison::between(&previous.summary, &previous.summary);
        assert_eq!(flat, TrendComparison::default());
    }

    #[test]
    fn test_metrics_serialize_with_timeframe_tag() {
        let metrics = Metrics::compute(
            TimeFrame::Weekly,
            NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
            &sample(),
        );
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["timeframe"], "weekly");
        assert_eq!(json["dailyBreakdown"].as_array().unwrap().len(), 7);
    }
}
