//! # Dry-Cleaning Price List
//!
//! The services the counter offers, with the price range quoted to
//! customers. Prices are whole pesos.
//!
//! ## Price Types
//! ```text
//! Fixed      one price                        Corbata        $7.000
//! Range      from..to depending on garment    Traje          $29.000 - $34.000
//! PerUnit    price per m²                     Alfombra x mt2 $18.000 / m²
//! FromPrice  starting price, quoted in shop   Vestido novia  desde $40.000
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::DryCleaningItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    Fixed,
    Range,
    PerUnit,
    FromPrice,
}

/// One entry of the price list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DryCleaningService {
    pub name: &'static str,
    /// Lower bound in pesos, when the service has a range.
    pub from_pesos: Option<i64>,
    /// Upper bound (or the only price) in pesos.
    pub to_pesos: i64,
    pub price_type: PriceType,
    pub unit: Option<&'static str>,
}

impl DryCleaningService {
    const fn fixed(name: &'static str, pesos: i64) -> Self {
        DryCleaningService {
            name,
            from_pesos: None,
            to_pesos: pesos,
            price_type: PriceType::Fixed,
            unit: None,
        }
    }

    const fn range(name: &'static str, from: i64, to: i64) -> Self {
        DryCleaningService {
            name,
            from_pesos: Some(from),
            to_pesos: to,
            price_type: if from == to { PriceType::Fixed } else { PriceType::Range },
            unit: None,
        }
    }

    const fn per_m2(name: &'static str, pesos: i64) -> Self {
        DryCleaningService {
            name,
            from_pesos: None,
            to_pesos: pesos,
            price_type: PriceType::PerUnit,
            unit: Some("m²"),
        }
    }

    const fn from_price(name: &'static str, pesos: i64) -> Self {
        DryCleaningService {
            name,
            from_pesos: None,
            to_pesos: pesos,
            price_type: PriceType::FromPrice,
            unit: None,
        }
    }

    /// Price charged when the operator does not override it: the lower
    /// bound of a range, otherwise the listed price.
    pub fn base_price(&self) -> Money {
        Money::from_pesos(self.from_pesos.unwrap_or(self.to_pesos))
    }

    /// Highest price the service can be quoted at.
    pub fn max_price(&self) -> Money {
        Money::from_pesos(self.to_pesos)
    }

    /// Human-readable quote: `$29.000 - $34.000`, `$18.000 / m²`, `desde $40.000`.
    pub fn quote(&self) -> String {
        match self.price_type {
            PriceType::Fixed => self.max_price().to_string(),
            PriceType::Range => format!("{} - {}", self.base_price(), self.max_price()),
            PriceType::PerUnit => format!("{} / {}", self.max_price(), self.unit.unwrap_or("u")),
            PriceType::FromPrice => format!("desde {}", self.max_price()),
        }
    }
}

const SERVICES: &[DryCleaningService] = &[
    DryCleaningService::fixed("Lavado (valet)", 5_000),
    DryCleaningService::fixed("Secado", 4_000),
    DryCleaningService::fixed("Lavado a mano (por 3 prendas)", 5_000),
    DryCleaningService::fixed("Lavado de zapatillas (por par)", 10_000),
    DryCleaningService::fixed("Lavado de mantas, cortinas y colchas (doble secado)", 8_000),
    DryCleaningService::range("Ambo común / Ambo lino", 19_000, 22_000),
    DryCleaningService::range("Blusa / Buzo", 8_600, 9_800),
    DryCleaningService::range("Traje", 29_000, 34_000),
    DryCleaningService::range("Saco", 12_000, 14_000),
    DryCleaningService::range("Sacón", 13_000, 13_000),
    DryCleaningService::range("Pantalón vestir / lino", 8_000, 9_200),
    DryCleaningService::range("Pantalón Sky", 14_000, 14_000),
    DryCleaningService::range("Campera Sky", 18_000, 18_000),
    DryCleaningService::range("Pollera", 9_000, 14_400),
    DryCleaningService::range("Pollera tableada", 11_000, 16_000),
    DryCleaningService::range("Pullover", 9_600, 13_000),
    DryCleaningService::range("Saco de lana", 10_600, 15_600),
    DryCleaningService::range("Camisa / Remera", 8_000, 9_200),
    DryCleaningService::range("Corbata", 7_000, 7_000),
    DryCleaningService::range("Chaleco / Chaqueta", 10_000, 13_000),
    DryCleaningService::range("Campera", 13_000, 13_000),
    DryCleaningService::range("Camperón", 14_600, 14_600),
    DryCleaningService::range("Campera desmontable", 15_600, 18_000),
    DryCleaningService::range("Campera inflable /plumas", 14_600, 14_600),
    DryCleaningService::range("Tapado / Sobretodo", 14_600, 16_400),
    DryCleaningService::range("Camperón inflable o plumas / Tapado", 16_400, 18_000),
    DryCleaningService::range("Piloto simple", 14_000, 19_000),
    DryCleaningService::range("Piloto desmontable", 18_000, 18_000),
    DryCleaningService::range("Vestido común", 14_000, 19_000),
    DryCleaningService::from_price("Vestido de fiesta desde", 22_000),
    DryCleaningService::from_price("Vestido de 15 años desde", 34_000),
    DryCleaningService::from_price("Vestido de novia desde", 40_000),
    DryCleaningService::range("Frazada", 14_000, 18_000),
    DryCleaningService::range("Acolchado", 16_000, 20_000),
    DryCleaningService::range("Acolchado de plumas", 16_000, 22_000),
    DryCleaningService::range("Funda de colchón", 19_000, 28_000),
    DryCleaningService::per_m2("Cortina liviana x mt2", 7_600),
    DryCleaningService::per_m2("Cortina pesada xmt2", 8_400),
    DryCleaningService::per_m2("Cortina forrada x mt2", 9_200),
    DryCleaningService::per_m2("Alfombra x mt2", 18_000),
    DryCleaningService::range("Funda de acolchado", 14_000, 19_000),
    DryCleaningService::range("Almohada / almohada plumas", 12_000, 16_000),
];

/// The full price list, in counter order.
pub fn services() -> &'static [DryCleaningService] {
    SERVICES
}

/// Case-insensitive lookup by exact name.
pub fn find_service(name: &str) -> Option<&'static DryCleaningService> {
    let wanted = name.trim().to_lowercase();
    SERVICES.iter().find(|s| s.name.to_lowercase() == wanted)
}

/// Builds a ticket line at the service's base price.
pub fn suggested_item(name: &str, quantity: i64) -> Option<DryCleaningItem> {
    find_service(name).map(|s| DryCleaningItem::new(s.name, s.base_price(), quantity))
}
