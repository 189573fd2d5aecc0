//! # Inventory
//!
//! Consumables the shop runs on (detergent, bags, stain removers). Stock is
//! counted in the item's own unit, so quantities are fractional.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::validation::{validate_item_name, validate_required, validate_stock_level, ValidationResult};

/// A stock line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    /// Reorder threshold.
    pub min_quantity: f64,
    /// `kg`, `L`, `unidades`...
    pub unit: String,
    #[ts(as = "String")]
    pub last_updated: NaiveDateTime,
}

impl InventoryItem {
    /// At or below the reorder threshold.
    #[inline]
    pub fn is_low(&self) -> bool {
        self.quantity <= self.min_quantity
    }

    /// Overwrites the editable fields and stamps the update time.
    pub fn apply(&mut self, input: InventoryItemInput, now: NaiveDateTime) {
        self.name = input.name.trim().to_string();
        self.quantity = input.quantity;
        self.min_quantity = input.min_quantity;
        self.unit = input.unit.trim().to_string();
        self.last_updated = now;
    }
}

/// Editable fields of a stock line, as entered by the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemInput {
    pub name: String,
    pub quantity: f64,
    pub min_quantity: f64,
    pub unit: String,
}

impl InventoryItemInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_item_name(&self.name)?;
        validate_stock_level("quantity", self.quantity)?;
        validate_stock_level("min_quantity", self.min_quantity)?;
        validate_required("unit", &self.unit)?;
        Ok(())
    }

    /// Validates and creates a new stock line with a fresh id.
    pub fn into_item(self, now: NaiveDateTime) -> ValidationResult<InventoryItem> {
        self.validate()?;
        Ok(InventoryItem {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            quantity: self.quantity,
            min_quantity: self.min_quantity,
            unit: self.unit.trim().to_string(),
            last_updated: now,
        })
    }
}

/// `(name, quantity, min_quantity, unit)` of the stock a new shop starts with.
const DEFAULT_STOCK: [(&str, f64, f64, &str); 10] = [
    ("Skip", 10.0, 2.0, "kg"),
    ("Vinagre", 5.0, 1.0, "L"),
    ("Bolsas camiseta", 100.0, 20.0, "unidades"),
    ("Bolsas acolchado", 50.0, 10.0, "unidades"),
    ("Perfumina", 3.0, 1.0, "L"),
    ("Desengrasante", 2.0, 1.0, "L"),
    ("Bactericida", 2.0, 1.0, "L"),
    ("Bolitas", 20.0, 5.0, "unidades"),
    ("Quita sangre", 1.0, 1.0, "L"),
    ("Quitamanchas", 2.0, 1.0, "L"),
];

/// The seed list written the first time inventory is read.
///
/// Ids are the 1-based position so the seed is stable across terminals.
pub fn default_inventory(now: NaiveDateTime) -> Vec<InventoryItem> {
    DEFAULT_STOCK
        .iter()
        .enumerate()
        .map(|(i, (name, quantity, min_quantity, unit))| InventoryItem {
            id: (i + 1).to_string(),
            name: name.to_string(),
            quantity: *quantity,
            min_quantity: *min_quantity,
            unit: unit.to_string(),
            last_updated: now,
        })
        .collect()
}

/// Items at or below their threshold.
pub fn low_stock(items: &[InventoryItem]) -> Vec<InventoryItem> {
    items.iter().filter(|i| i.is_low()).cloned().collect()
}
