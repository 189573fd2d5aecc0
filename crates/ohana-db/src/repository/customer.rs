//! # Customer Repository
//!
//! Customers are keyed by phone: the first ticket for a phone creates the
//! row, later tickets reuse it and keep its name current. Tickets carry
//! their own copy of the name.

use chrono::NaiveDateTime;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;

/// A customer row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub created_at: NaiveDateTime,
}

/// Repository for customer lookups.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Looks a customer up by exact phone.
    pub async fn find_by_phone(&self, phone: &str) -> DbResult<Option<Customer>> {
        let mut conn = self.pool.acquire().await?;
        find_by_phone(&mut conn, phone).await
    }

    /// Counts customers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

async fn find_by_phone(conn: &mut SqliteConnection, phone: &str) -> DbResult<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(
        "SELECT id, name, phone, created_at FROM customers WHERE phone = ?1",
    )
    .bind(phone)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(customer)
}

/// Returns the id of the customer with `phone`, inserting one if needed.
///
/// An existing row takes `name` when it differs.
///
/// Runs on the caller's connection so ticket saves can keep it inside
/// their transaction.
pub(crate) async fn find_or_create(
    conn: &mut SqliteConnection,
    name: &str,
    phone: &str,
    now: NaiveDateTime,
) -> DbResult<String> {
    if let Some(existing) = find_by_phone(conn, phone).await? {
        if existing.name != name {
            debug!(id = %existing.id, "Refreshing customer name");
            sqlx::query("UPDATE customers SET name = ?1 WHERE id = ?2")
                .bind(name)
                .bind(&existing.id)
                .execute(&mut *conn)
                .await?;
        }
        return Ok(existing.id);
    }

    let id = Uuid::new_v4().to_string();
    debug!(id = %id, phone = %phone, "Creating customer");

    sqlx::query("INSERT INTO customers (id, name, phone, created_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(&id)
        .bind(name)
        .bind(phone)
        .bind(now)
        .execute(&mut *conn)
        .await?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_find_or_create_reuses_phone() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let first = find_or_create(&mut conn, "Ana", "1144441234", now()).await.unwrap();
        let second = find_or_create(&mut conn, "Ana María", "1144441234", now()).await.unwrap();
        drop(conn);

        assert_eq!(first, second);
        assert_eq!(db.customers().count().await.unwrap(), 1);

        let stored = db.customers().find_by_phone("1144441234").await.unwrap().unwrap();
        assert_eq!(stored.name, "Ana María");
        assert!(db.customers().find_by_phone("0000").await.unwrap().is_none());
    }
}
