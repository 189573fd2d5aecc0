//! # Metrics Repository
//!
//! Aggregates computed inside SQLite, so the dashboard does not have to
//! pull every ticket of a month just to add them up.
//!
//! ```text
//! period_summary(range)
//!   SELECT SUM(valet_quantity), SUM(total_cents),
//!          SUM(total_cents) per payment_method
//!   FROM tickets WHERE date IN [start, end)
//!
//! client_visits(phone)
//!   SELECT COUNT(*), MAX(date) FROM tickets JOIN customers WHERE phone = ?
//! ```

use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use ohana_core::metrics::{PaymentBreakdown, PeriodSummary};
use ohana_core::{ClientVisits, DateRange, Money};

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    total_valets: i64,
    total_sales: i64,
    cash: i64,
    debit: i64,
    mercadopago: i64,
    cuentadni: i64,
}

impl From<SummaryRow> for PeriodSummary {
    fn from(row: SummaryRow) -> Self {
        PeriodSummary {
            total_valets: row.total_valets,
            total_sales: Money::from_cents(row.total_sales),
            payment_breakdown: PaymentBreakdown {
                cash: Money::from_cents(row.cash),
                debit: Money::from_cents(row.debit),
                mercadopago: Money::from_cents(row.mercadopago),
                cuentadni: Money::from_cents(row.cuentadni),
            },
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VisitsRow {
    visit_count: i64,
    last_visit: Option<NaiveDateTime>,
}

/// Repository for aggregate queries.
#[derive(Debug, Clone)]
pub struct MetricsRepository {
    pool: SqlitePool,
}

impl MetricsRepository {
    /// Creates a new MetricsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MetricsRepository { pool }
    }

    /// Valets, sales and per-method totals for `range`.
    pub async fn period_summary(&self, range: DateRange) -> DbResult<PeriodSummary> {
        debug!(start = %range.start, end = %range.end, "Aggregating period");

        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT
                COALESCE(SUM(valet_quantity), 0) AS total_valets,
                COALESCE(SUM(total_cents), 0) AS total_sales,
                COALESCE(SUM(CASE WHEN payment_method = 'cash' THEN total_cents END), 0) AS cash,
                COALESCE(SUM(CASE WHEN payment_method = 'debit' THEN total_cents END), 0) AS debit,
                COALESCE(SUM(CASE WHEN payment_method = 'mercadopago' THEN total_cents END), 0) AS mercadopago,
                COALESCE(SUM(CASE WHEN payment_method = 'cuentadni' THEN total_cents END), 0) AS cuentadni
            FROM tickets
            WHERE date >= ?1 AND date < ?2
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// How many tickets a phone has, and when the last one was issued.
    pub async fn client_visits(&self, phone: &str) -> DbResult<ClientVisits> {
        let row = sqlx::query_as::<_, VisitsRow>(
            r#"
            SELECT COUNT(t.id) AS visit_count, MAX(t.date) AS last_visit
            FROM tickets t
            JOIN customers c ON c.id = t.customer_id
            WHERE c.phone = ?1
            "#,
        )
        .bind(phone.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(ClientVisits {
            last_visit: row.last_visit,
            visit_count: row.visit_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use ohana_core::period::{day_range, week_range};
    use ohana_core::{LaundryOptions, PaymentMethod, Ticket};
    use uuid::Uuid;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    fn ticket(phone: &str, method: PaymentMethod, valets: i64, created_at: NaiveDateTime) -> Ticket {
        Ticket {
            id: Uuid::new_v4().to_string(),
            ticket_number: "00000001".to_string(),
            customer_name: "Cliente".to_string(),
            customer_phone: phone.to_string(),
            valet_quantity: valets,
            laundry_options: LaundryOptions::default(),
            payment_method: method,
            dry_cleaning_items: vec![],
            total_cents: Money::from_pesos(5_000).cents() * valets,
            created_at,
        }
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tickets = [
            ticket("1111111111", PaymentMethod::Cash, 1, at(15, 9)),
            ticket("1111111111", PaymentMethod::Debit, 2, at(15, 12)),
            ticket("2222222222", PaymentMethod::Cuentadni, 1, at(15, 19)),
            ticket("2222222222", PaymentMethod::Cash, 3, at(13, 10)),
        ];
        for t in &tickets {
            db.tickets().insert(t).await.unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_period_summary_matches_local_fold() {
        let db = seeded().await;
        let day = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();

        let summary = db.metrics().period_summary(day_range(day)).await.unwrap();
        let tickets = db.tickets().between(day_range(day)).await.unwrap();

        assert_eq!(summary, PeriodSummary::from_tickets(&tickets));
        assert_eq!(summary.total_valets, 4);
        assert_eq!(summary.total_sales, Money::from_pesos(20_000));
        assert_eq!(summary.payment_breakdown.cash, Money::from_pesos(5_000));
        assert_eq!(summary.payment_breakdown.total(), summary.total_sales);

        let week = db.metrics().period_summary(week_range(day)).await.unwrap();
        assert_eq!(week.total_valets, 7);
    }

    #[tokio::test]
    async fn test_empty_period_is_zero() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let summary = db.metrics().period_summary(day_range(day)).await.unwrap();
        assert_eq!(summary, PeriodSummary::default());
    }

    #[tokio::test]
    async fn test_client_visits() {
        let db = seeded().await;

        let visits = db.metrics().client_visits("2222222222").await.unwrap();
        assert_eq!(visits.visit_count, 2);
        assert_eq!(visits.last_visit, Some(at(15, 19)));

        let none = db.metrics().client_visits("9999999999").await.unwrap();
        assert_eq!(none, ClientVisits::default());
    }
}
