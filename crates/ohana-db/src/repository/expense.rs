//! # Expense Repository

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use ohana_core::{DateRange, Expense};

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Inserts an expense.
    pub async fn insert(&self, expense: &Expense) -> DbResult<()> {
        sqlx::query("INSERT INTO expenses (id, description, amount_cents, date) VALUES (?1, ?2, ?3, ?4)")
            .bind(&expense.id)
            .bind(&expense.description)
            .bind(expense.amount_cents)
            .bind(expense.date)
            .execute(&self.pool)
            .await?;

        info!(id = %expense.id, amount_cents = expense.amount_cents, "Expense saved");
        Ok(())
    }

    /// Every expense, newest first.
    pub async fn list(&self) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            "SELECT id, description, amount_cents, date FROM expenses ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = expenses.len(), "Loaded expenses");
        Ok(expenses)
    }

    /// Expenses dated inside `range`, newest first.
    pub async fn between(&self, range: DateRange) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, description, amount_cents, date
            FROM expenses
            WHERE date >= ?1 AND date < ?2
            ORDER BY date DESC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = expenses.len(), "Loaded expenses in range");
        Ok(expenses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use ohana_core::period::month_range;
    use ohana_core::ExpenseDraft;

    #[tokio::test]
    async fn test_insert_and_filter() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.expenses();

        for (description, month) in [("Jabón", 4), ("Luz", 5), ("Alquiler", 5)] {
            let date = NaiveDate::from_ymd_opt(2024, month, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
                + chrono::Duration::minutes(description.len() as i64);
            let expense = ExpenseDraft {
                description: description.to_string(),
                amount_cents: 100_000,
            }
            .into_expense(date)
            .unwrap();
            repo.insert(&expense).await.unwrap();
        }

        assert_eq!(repo.list().await.unwrap().len(), 3);

        let may = month_range(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let in_may = repo.between(may).await.unwrap();
        let names: Vec<&str> = in_may.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["Alquiler", "Luz"]);
    }
}
