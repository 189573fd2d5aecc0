//! # Expense Commands

use chrono::{NaiveDate, NaiveDateTime};
use ohana_core::{Expense, ExpenseDraft, Money, Permission, TimeFrame};
use ohana_db::ExpenseStore;
use tracing::info;

use crate::error::CliResult;
use crate::state::AppState;

pub async fn add(state: &AppState, description: String, amount: Money, now: NaiveDateTime) -> CliResult<Expense> {
    state.require(Permission::MetricsView)?;

    let expense = ExpenseDraft {
        description,
        amount_cents: amount.cents(),
    }
    .into_expense(now)?;
    state.store().save_expense(&expense).await?;

    info!(id = %expense.id, amount = %expense.amount(), "Expense recorded");
    Ok(expense)
}

/// Every expense, or those in the `timeframe` window around `date`.
pub async fn list(
    state: &AppState,
    timeframe: TimeFrame,
    date: Option<NaiveDate>,
    limit: Option<usize>,
) -> CliResult<Vec<Expense>> {
    state.require(Permission::MetricsView)?;

    let mut expenses = match date {
        Some(date) => state.store().expenses_between(timeframe.range(date)).await?,
        None => state.store().list_expenses().await?,
    };
    if let Some(limit) = limit {
        expenses.truncate(limit);
    }
    Ok(expenses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{local_state, login, may15};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_add_and_list() {
        let (_dir, state) = local_state();
        login(&state, "admin1");

        add(&state, "Jabón".to_string(), Money::from_pesos(18_000), may15(9)).await.unwrap();
        let next_day = may15(9) + chrono::Duration::days(1);
        add(&state, "Luz".to_string(), Money::from_pesos(42_000), next_day).await.unwrap();

        let today = list(&state, TimeFrame::Daily, Some(may15(0).date()), None).await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].description, "Jabón");

        let week = list(&state, TimeFrame::Weekly, Some(may15(0).date()), None).await.unwrap();
        assert_eq!(week.len(), 2);
        assert_eq!(week[0].description, "Luz");
    }

    #[tokio::test]
    async fn test_rejects_zero_and_staff() {
        let (_dir, state) = local_state();
        login(&state, "admin1");
        let err = add(&state, "Nada".to_string(), Money::zero(), may15(9)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        login(&state, "staff1");
        let err = list(&state, TimeFrame::Daily, None, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }
}
