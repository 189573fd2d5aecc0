//! # Inventory Commands
//!
//! Supplies are only kept in the local store.

use chrono::NaiveDateTime;
use ohana_core::{InventoryItem, InventoryItemInput, Permission};
use ohana_db::DbError;

use crate::cli::{InventoryAddArgs, InventoryUpdateArgs};
use crate::error::CliResult;
use crate::state::AppState;

pub fn list(state: &AppState, now: NaiveDateTime) -> CliResult<Vec<InventoryItem>> {
    state.require(Permission::InventoryView)?;
    Ok(state.local().inventory(now)?)
}

/// Lines at or below their restock threshold.
pub fn low(state: &AppState, now: NaiveDateTime) -> CliResult<Vec<InventoryItem>> {
    state.require(Permission::InventoryView)?;
    Ok(state.local().low_stock(now)?)
}

pub fn add(state: &AppState, args: InventoryAddArgs, now: NaiveDateTime) -> CliResult<InventoryItem> {
    state.require(Permission::InventoryEdit)?;

    let input = InventoryItemInput {
        name: args.name,
        quantity: args.quantity,
        min_quantity: args.min,
        unit: args.unit,
    };
    Ok(state.local().add_inventory_item(input, now)?)
}

/// Changes only the fields given on the command line.
pub fn update(state: &AppState, args: InventoryUpdateArgs, now: NaiveDateTime) -> CliResult<InventoryItem> {
    state.require(Permission::InventoryEdit)?;

    let current = state
        .local()
        .inventory(now)?
        .into_iter()
        .find(|item| item.id == args.id)
        .ok_or_else(|| DbError::not_found("InventoryItem", &args.id))?;

    let input = InventoryItemInput {
        name: args.name.unwrap_or(current.name),
        quantity: args.quantity.unwrap_or(current.quantity),
        min_quantity: args.min.unwrap_or(current.min_quantity),
        unit: args.unit.unwrap_or(current.unit),
    };
    Ok(state.local().update_inventory_item(&args.id, input, now)?)
}

pub fn delete(state: &AppState, id: &str, now: NaiveDateTime) -> CliResult<Vec<InventoryItem>> {
    state.require(Permission::InventoryEdit)?;
    state.local().delete_inventory_item(id, now)?;
    Ok(state.local().inventory(now)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{local_state, login, may15};
    use crate::error::ErrorCode;

    fn patch(id: &str) -> InventoryUpdateArgs {
        InventoryUpdateArgs {
            id: id.to_string(),
            name: None,
            quantity: None,
            min: None,
            unit: None,
        }
    }

    #[test]
    fn test_staff_can_look_but_not_touch() {
        let (_dir, state) = local_state();
        login(&state, "staff1");

        let err = list(&state, may15(9)).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        state
            .local()
            .update_permissions("staff1", vec![Permission::InventoryView])
            .unwrap();
        assert_eq!(list(&state, may15(9)).unwrap().len(), 10);

        let err = delete(&state, "1", may15(9)).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_partial_update() {
        let (_dir, state) = local_state();
        login(&state, "admin1");

        let mut change = patch("1");
        change.quantity = Some(1.5);
        let updated = update(&state, change, may15(10)).unwrap();
        assert_eq!(updated.name, "Skip");
        assert_eq!(updated.quantity, 1.5);
        assert_eq!(updated.min_quantity, 2.0);
        assert_eq!(updated.last_updated, may15(10));

        let names: Vec<String> = low(&state, may15(10)).unwrap().into_iter().map(|i| i.name).collect();
        assert!(names.contains(&"Skip".to_string()));
        assert!(names.contains(&"Quita sangre".to_string()));

        let err = update(&state, patch("missing"), may15(10)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_add_and_delete() {
        let (_dir, state) = local_state();
        login(&state, "admin1");

        let args = InventoryAddArgs {
            name: "Suavizante".to_string(),
            quantity: 4.0,
            min: 1.0,
            unit: "L".to_string(),
        };
        let item = add(&state, args, may15(9)).unwrap();
        assert_eq!(list(&state, may15(9)).unwrap().len(), 11);

        let remaining = delete(&state, &item.id, may15(9)).unwrap();
        assert_eq!(remaining.len(), 10);

        let bad = InventoryAddArgs {
            name: "Cloro".to_string(),
            quantity: -1.0,
            min: 1.0,
            unit: "L".to_string(),
        };
        assert_eq!(add(&state, bad, may15(9)).unwrap_err().code, ErrorCode::ValidationError);
    }
}
