//! Inventory CRUD over `laundryInventory`.
//!
//! The first read of an empty store seeds the default stock list.

use chrono::NaiveDateTime;
use ohana_core::inventory::{default_inventory, low_stock, InventoryItem, InventoryItemInput};
use tracing::info;

use super::{keys, LocalStore};
use crate::error::{DbError, DbResult};

impl LocalStore {
    /// Every stock line, in insertion order.
    pub fn inventory(&self, now: NaiveDateTime) -> DbResult<Vec<InventoryItem>> {
        if let Some(items) = self.get(keys::INVENTORY)? {
            return Ok(items);
        }
        self.update(
            keys::INVENTORY,
            || Ok(default_inventory(now)),
            |items: &mut Vec<InventoryItem>| Ok(items.clone()),
        )
    }

    /// Adds a stock line.
    pub fn add_inventory_item(&self, input: InventoryItemInput, now: NaiveDateTime) -> DbResult<InventoryItem> {
        let item = input.into_item(now)?;
        self.update(
            keys::INVENTORY,
            || Ok(default_inventory(now)),
            |items: &mut Vec<InventoryItem>| {
                items.push(item.clone());
                Ok(())
            },
        )?;

        info!(id = %item.id, name = %item.name, "Inventory item added");
        Ok(item)
    }

    /// Replaces the editable fields of the line with `id`.
    pub fn update_inventory_item(
        &self,
        id: &str,
        input: InventoryItemInput,
        now: NaiveDateTime,
    ) -> DbResult<InventoryItem> {
        input.validate()?;
        let updated = self.update(
            keys::INVENTORY,
            || Ok(default_inventory(now)),
            |items: &mut Vec<InventoryItem>| {
                let item = items
                    .iter_mut()
                    .find(|i| i.id == id)
                    .ok_or_else(|| DbError::not_found("InventoryItem", id))?;
                item.apply(input, now);
                Ok(item.clone())
            },
        )?;

        info!(id = %id, quantity = updated.quantity, "Inventory item updated");
        Ok(updated)
    }

    /// Removes the line with `id`.
    pub fn delete_inventory_item(&self, id: &str, now: NaiveDateTime) -> DbResult<()> {
        self.update(
            keys::INVENTORY,
            || Ok(default_inventory(now)),
            |items: &mut Vec<InventoryItem>| {
                let before = items.len();
                items.retain(|i| i.id != id);
                if items.len() == before {
                    return Err(DbError::not_found("InventoryItem", id));
                }
                Ok(())
            },
        )?;

        info!(id = %id, "Inventory item deleted");
        Ok(())
    }

    /// Lines at or below their reorder threshold.
    pub fn low_stock(&self, now: NaiveDateTime) -> DbResult<Vec<InventoryItem>> {
        Ok(low_stock(&self.inventory(now)?))
    }
}
