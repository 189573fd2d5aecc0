//! # Ticket Repository
//!
//! Tickets are spread over four tables; this repository writes and reads
//! them as one unit.
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert(ticket)                         one transaction                 │
//! │                                                                         │
//! │  1. customers          find by phone (refresh name), or create          │
//! │  2. tickets            one row, with the name as written                │
//! │  3. ticket_laundry_options   one row per enabled option                 │
//! │  4. dry_cleaning_items       one row per line                           │
//! │  5. COMMIT (any failure rolls everything back)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::customer;
use ohana_core::{DateRange, DryCleaningItem, LaundryOption, LaundryOptions, PaymentMethod, Ticket};

const TICKET_COLUMNS: &str = r#"
    SELECT
        t.id,
        t.ticket_number,
        COALESCE(t.customer_name, c.name) AS customer_name,
        c.phone AS customer_phone,
        t.valet_quantity,
        t.payment_method,
        t.total_cents,
        t.date
    FROM tickets t
    JOIN customers c ON c.id = t.customer_id
"#;

const RANGE_FILTER: &str = "WHERE t.date >= ?1 AND t.date < ?2";

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: String,
    ticket_number: String,
    customer_name: String,
    customer_phone: String,
    valet_quantity: i64,
    payment_method: PaymentMethod,
    total_cents: i64,
    date: NaiveDateTime,
}

#[derive(Debug, sqlx::FromRow)]
struct OptionRow {
    ticket_id: String,
    option_type: LaundryOption,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    ticket_id: String,
    name: String,
    price_cents: i64,
    quantity: i64,
}

/// Repository for ticket database operations.
#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: SqlitePool,
}

impl TicketRepository {
    /// Creates a new TicketRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TicketRepository { pool }
    }

    /// Saves a ticket with its customer, options and dry-cleaning lines.
    pub async fn insert(&self, ticket: &Ticket) -> DbResult<()> {
        debug!(id = %ticket.id, ticket_number = %ticket.ticket_number, "Inserting ticket");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let customer_id = customer::find_or_create(
            &mut tx,
            &ticket.customer_name,
            &ticket.customer_phone,
            ticket.created_at,
        )
        .await?;

        sqlx::query(
            r#"
            INSERT INTO tickets (
                id, customer_id, customer_name, ticket_number,
                valet_quantity, payment_method, total_cents, date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&ticket.id)
        .bind(&customer_id)
        .bind(&ticket.customer_name)
        .bind(&ticket.ticket_number)
        .bind(ticket.valet_quantity)
        .bind(ticket.payment_method)
        .bind(ticket.total_cents)
        .bind(ticket.created_at)
        .execute(&mut *tx)
        .await?;

        for option in ticket.laundry_options.enabled() {
            sqlx::query("INSERT INTO ticket_laundry_options (ticket_id, option_type) VALUES (?1, ?2)")
                .bind(&ticket.id)
                .bind(option)
                .execute(&mut *tx)
                .await?;
        }

        for item in &ticket.dry_cleaning_items {
            sqlx::query(
                r#"
                INSERT INTO dry_cleaning_items (id, ticket_id, name, price_cents, quantity)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&ticket.id)
            .bind(&item.name)
            .bind(item.price_cents)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            ticket_number = %ticket.ticket_number,
            total_cents = ticket.total_cents,
            "Ticket saved"
        );
        Ok(())
    }

    /// Every ticket, newest first.
    pub async fn list(&self) -> DbResult<Vec<Ticket>> {
        self.load(None).await
    }

    /// Tickets dated inside `range`, newest first.
    pub async fn between(&self, range: DateRange) -> DbResult<Vec<Ticket>> {
        self.load(Some(range)).await
    }

    /// Counts tickets (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn load(&self, range: Option<DateRange>) -> DbResult<Vec<Ticket>> {
        let filter = if range.is_some() { RANGE_FILTER } else { "" };

        let ticket_sql = format!("{TICKET_COLUMNS} {filter} ORDER BY t.date DESC, t.ticket_number DESC");
        let option_sql = format!(
            "SELECT o.ticket_id, o.option_type FROM ticket_laundry_options o \
             JOIN tickets t ON t.id = o.ticket_id {filter}"
        );
        let item_sql = format!(
            "SELECT i.ticket_id, i.name, i.price_cents, i.quantity FROM dry_cleaning_items i \
             JOIN tickets t ON t.id = i.ticket_id {filter} ORDER BY i.rowid"
        );

        let mut tickets_query = sqlx::query_as::<_, TicketRow>(&ticket_sql);
        let mut options_query = sqlx::query_as::<_, OptionRow>(&option_sql);
        let mut items_query = sqlx::query_as::<_, ItemRow>(&item_sql);
        if let Some(range) = range {
            tickets_query = tickets_query.bind(range.start).bind(range.end);
            options_query = options_query.bind(range.start).bind(range.end);
            items_query = items_query.bind(range.start).bind(range.end);
        }

        let rows = tickets_query.fetch_all(&self.pool).await?;
        let option_rows = options_query.fetch_all(&self.pool).await?;
        let item_rows = items_query.fetch_all(&self.pool).await?;

        debug!(tickets = rows.len(), ranged = range.is_some(), "Loaded tickets");

        let mut options: HashMap<String, LaundryOptions> = HashMap::new();
        for row in option_rows {
            options.entry(row.ticket_id).or_default().set(row.option_type, true);
        }

        let mut items: HashMap<String, Vec<DryCleaningItem>> = HashMap::new();
        for row in item_rows {
            items.entry(row.ticket_id).or_default().push(DryCleaningItem {
                name: row.name,
                price_cents: row.price_cents,
                quantity: row.quantity,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| Ticket {
                laundry_options: options.remove(&row.id).unwrap_or_default(),
                dry_cleaning_items: items.remove(&row.id).unwrap_or_default(),
                id: row.id,
                ticket_number: row.ticket_number,
                customer_name: row.customer_name,
                customer_phone: row.customer_phone,
                valet_quantity: row.valet_quantity,
                payment_method: row.payment_method,
                total_cents: row.total_cents,
                created_at: row.date,
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use ohana_core::period::day_range;
    use ohana_core::Money;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn ticket(number: &str, phone: &str, created_at: NaiveDateTime) -> Ticket {
        Ticket {
            id: Uuid::new_v4().to_string(),
            ticket_number: number.to_string(),
            customer_name: "Ana".to_string(),
            customer_phone: phone.to_string(),
            valet_quantity: 2,
            laundry_options: LaundryOptions::from_enabled([
                LaundryOption::SeparateByColor,
                LaundryOption::NoFragrance,
            ]),
            payment_method: PaymentMethod::Mercadopago,
            dry_cleaning_items: vec![
                DryCleaningItem::new("Traje", Money::from_pesos(29_000), 1),
                DryCleaningItem::new("Corbata", Money::from_pesos(7_000), 2),
            ],
            total_cents: Money::from_pesos(53_000).cents(),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_insert_round_trips_children() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let saved = ticket("00000001", "1144441234", at(15, 10));
        db.tickets().insert(&saved).await.unwrap();

        let loaded = db.tickets().list().await.unwrap();
        assert_eq!(loaded, vec![saved]);
    }

    #[tokio::test]
    async fn test_between_filters_and_orders() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.tickets();
        repo.insert(&ticket("00000001", "1144441234", at(14, 10))).await.unwrap();
        repo.insert(&ticket("00000002", "1144441234", at(15, 9))).await.unwrap();
        repo.insert(&ticket("00000003", "1155550000", at(15, 18))).await.unwrap();
        repo.insert(&ticket("00000004", "1155550000", at(16, 0))).await.unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let today = repo.between(day_range(day)).await.unwrap();
        let numbers: Vec<&str> = today.iter().map(|t| t.ticket_number.as_str()).collect();
        assert_eq!(numbers, vec!["00000003", "00000002"]);
        assert!(today.iter().all(|t| t.dry_cleaning_items.len() == 2));

        assert_eq!(repo.count().await.unwrap(), 4);
        assert_eq!(db.customers().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let first = ticket("00000001", "1144441234", at(15, 10));
        db.tickets().insert(&first).await.unwrap();

        // Same id on a new phone: the customer insert must not survive
        let mut clash = ticket("00000002", "1177770000", at(15, 11));
        clash.id = first.id.clone();
        let err = db.tickets().insert(&clash).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(db.tickets().count().await.unwrap(), 1);
        assert_eq!(db.customers().count().await.unwrap(), 1);
    }
}
