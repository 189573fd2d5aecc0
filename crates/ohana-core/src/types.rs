//! # Domain Types
//!
//! Core domain types used throughout the laundry POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌─────────────────┐   ┌─────────────────┐  │
//! │  │       Ticket         │   │ DryCleaningItem │   │    Expense      │  │
//! │  │  ──────────────────  │   │  ─────────────  │   │  ─────────────  │  │
//! │  │  id (UUID)           │◄──│  name           │   │  id (UUID)      │  │
//! │  │  ticket_number       │   │  price_cents    │   │  description    │  │
//! │  │  customer_name/phone │   │  quantity       │   │  amount_cents   │  │
//! │  │  valet_quantity      │   └─────────────────┘   │  date           │  │
//! │  │  laundry_options ────┼──► LaundryOptions      └─────────────────┘  │
//! │  │  payment_method ─────┼──► PaymentMethod                            │
//! │  │  total_cents         │    cash│debit│mercadopago│cuentadni         │
//! │  │  created_at          │                                             │
//! │  └──────────────────────┘                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Tickets carry:
//! - `id`: UUID v4, used for storage relations
//! - `ticket_number`: 8-digit counter printed on the receipt

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{
    validate_customer_name, validate_item_name, validate_phone, validate_amount,
    validate_quantity, validate_required, validate_valet_quantity, ValidationResult,
};

// =============================================================================
// Payment Method
// =============================================================================

/// The payment rails the shop accepts.
///
/// ## Digital vs Cash
/// Dashboard trends split revenue into cash and "digital"; every rail except
/// cash counts as digital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Efectivo.
    Cash,
    /// Debit card.
    Debit,
    /// MercadoPago wallet.
    Mercadopago,
    /// Cuenta DNI (Banco Provincia).
    Cuentadni,
}

impl PaymentMethod {
    /// Every method, in breakdown order.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Debit,
        PaymentMethod::Mercadopago,
        PaymentMethod::Cuentadni,
    ];

    /// Wire/storage name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Mercadopago => "mercadopago",
            PaymentMethod::Cuentadni => "cuentadni",
        }
    }

    /// True for every rail except cash.
    pub const fn is_digital(&self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "efectivo" => Ok(PaymentMethod::Cash),
            "debit" | "debito" | "débito" => Ok(PaymentMethod::Debit),
            "mercadopago" => Ok(PaymentMethod::Mercadopago),
            "cuentadni" => Ok(PaymentMethod::Cuentadni),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: PaymentMethod::ALL
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Laundry Options
// =============================================================================

/// A single wash-care preference.
///
/// Stored one row per enabled option in `ticket_laundry_options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "camelCase"))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum LaundryOption {
    SeparateByColor,
    DelicateDry,
    StainRemoval,
    Bleach,
    NoFragrance,
    NoDry,
}

impl LaundryOption {
    /// Every option, in the order the ticket form lists them.
    pub const ALL: [LaundryOption; 6] = [
        LaundryOption::SeparateByColor,
        LaundryOption::DelicateDry,
        LaundryOption::StainRemoval,
        LaundryOption::Bleach,
        LaundryOption::NoFragrance,
        LaundryOption::NoDry,
    ];
}

impl FromStr for LaundryOption {
    type Err = ValidationError;

    /// Accepts camelCase, snake_case or kebab-case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "separatebycolor" => Ok(LaundryOption::SeparateByColor),
            "delicatedry" => Ok(LaundryOption::DelicateDry),
            "stainremoval" => Ok(LaundryOption::StainRemoval),
            "bleach" => Ok(LaundryOption::Bleach),
            "nofragrance" => Ok(LaundryOption::NoFragrance),
            "nodry" => Ok(LaundryOption::NoDry),
            _ => Err(ValidationError::NotAllowed {
                field: "laundry_option".to_string(),
                allowed: vec![
                    "separate-by-color".to_string(),
                    "delicate-dry".to_string(),
                    "stain-removal".to_string(),
                    "bleach".to_string(),
                    "no-fragrance".to_string(),
                    "no-dry".to_string(),
                ],
            }),
        }
    }
}

/// The six independent wash-care flags on a ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LaundryOptions {
    pub separate_by_color: bool,
    pub delicate_dry: bool,
    pub stain_removal: bool,
    pub bleach: bool,
    pub no_fragrance: bool,
    pub no_dry: bool,
}

impl LaundryOptions {
    /// Builds the flag set from the options that are switched on.
    pub fn from_enabled<I: IntoIterator<Item = LaundryOption>>(options: I) -> Self {
        let mut flags = LaundryOptions::default();
        for option in options {
            flags.set(option, true);
        }
        flags
    }

    /// Reads one flag.
    pub fn is_enabled(&self, option: LaundryOption) -> bool {
        match option {
            LaundryOption::SeparateByColor => self.separate_by_color,
            LaundryOption::DelicateDry => self.delicate_dry,
            LaundryOption::StainRemoval => self.stain_removal,
            LaundryOption::Bleach => self.bleach,
            LaundryOption::NoFragrance => self.no_fragrance,
            LaundryOption::NoDry => self.no_dry,
        }
    }

    /// Writes one flag.
    pub fn set(&mut self, option: LaundryOption, enabled: bool) {
        let slot = match option {
            LaundryOption::SeparateByColor => &mut self.separate_by_color,
            LaundryOption::DelicateDry => &mut self.delicate_dry,
            LaundryOption::StainRemoval => &mut self.stain_removal,
            LaundryOption::Bleach => &mut self.bleach,
            LaundryOption::NoFragrance => &mut self.no_fragrance,
            LaundryOption::NoDry => &mut self.no_dry,
        };
        *slot = enabled;
    }

    /// The options that are switched on, in form order.
    pub fn enabled(&self) -> Vec<LaundryOption> {
        LaundryOption::ALL
            .into_iter()
            .filter(|option| self.is_enabled(*option))
            .collect()
    }
}

// =============================================================================
// Dry-Cleaning Item
// =============================================================================

/// A dry-cleaning line on a ticket ("Traje", "Pollera", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DryCleaningItem {
    /// Service name as printed on the receipt.
    pub name: String,

    /// Unit price in centavos.
    pub price_cents: i64,

    /// Number of garments (or m² for per-unit services).
    pub quantity: i64,
}

impl DryCleaningItem {
    /// Creates an item.
    pub fn new(name: impl Into<String>, price: Money, quantity: i64) -> Self {
        DryCleaningItem {
            name: name.into(),
            price_cents: price.cents(),
            quantity,
        }
    }

    /// Unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price().multiply_quantity(self.quantity)
    }

    /// Checks the line before it is attached to a ticket.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_item_name(&self.name)?;
        validate_amount("price", self.price())?;
        validate_quantity(self.quantity)?;
        Ok(())
    }
}

// =============================================================================
// Ticket
// =============================================================================

/// A wash ticket as issued at the counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Zero-padded receipt number (`00000042`).
    pub ticket_number: String,

    pub customer_name: String,

    pub customer_phone: String,

    /// Wash-and-fold loads.
    pub valet_quantity: i64,

    pub laundry_options: LaundryOptions,

    pub payment_method: PaymentMethod,

    #[serde(default)]
    pub dry_cleaning_items: Vec<DryCleaningItem>,

    /// Total charged, in centavos.
    pub total_cents: i64,

    /// Shop-local wall clock time the ticket was issued.
    #[ts(as = "String")]
    pub created_at: NaiveDateTime,
}

impl Ticket {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// Counter input for a new ticket, before it has a number or a timestamp.
///
/// ## Lifecycle
/// ```text
/// TicketDraft ──validate()──► compute_total(valet_price)
///      │
///      └──into_ticket(number, valet_price, now)──► Ticket
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TicketDraft {
    pub customer_name: String,
    pub customer_phone: String,
    pub valet_quantity: i64,
    pub laundry_options: LaundryOptions,
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub dry_cleaning_items: Vec<DryCleaningItem>,
}

impl TicketDraft {
    /// Checks every field.
    ///
    /// ## Rules
    /// - customer name required
    /// - phone carries at least 8 digits
    /// - valets between 0 and 999
    /// - a payment method is chosen
    /// - something is being sold (valets or dry-cleaning lines)
    /// - each dry-cleaning line is valid
    pub fn validate(&self) -> ValidationResult<()> {
        validate_customer_name(&self.customer_name)?;
        validate_phone(&self.customer_phone)?;
        validate_valet_quantity(self.valet_quantity)?;

        if self.payment_method.is_none() {
            return Err(ValidationError::Required {
                field: "payment_method".to_string(),
            });
        }

        if self.valet_quantity == 0 && self.dry_cleaning_items.is_empty() {
            return Err(ValidationError::Required {
                field: "valets or dry_cleaning_items".to_string(),
            });
        }

        for item in &self.dry_cleaning_items {
            item.validate()?;
        }

        Ok(())
    }

    /// valets × valet price + Σ dry-cleaning lines.
    ///
    /// Fails with `OutOfRange` instead of overflowing.
    pub fn compute_total(&self, valet_price: Money) -> ValidationResult<Money> {
        let out_of_range = || ValidationError::OutOfRange {
            field: "total".to_string(),
            min: 0,
            max: i64::MAX,
        };

        let mut total = valet_price
            .checked_multiply_quantity(self.valet_quantity)
            .ok_or_else(out_of_range)?;
        for item in &self.dry_cleaning_items {
            total = item
                .price()
                .checked_multiply_quantity(item.quantity)
                .and_then(|line| total.checked_add(line))
                .ok_or_else(out_of_range)?;
        }
        Ok(total)
    }

    /// Validates and turns the draft into a ticket.
    pub fn into_ticket(
        self,
        ticket_number: String,
        valet_price: Money,
        created_at: NaiveDateTime,
    ) -> CoreResult<Ticket> {
        self.validate()?;
        crate::ticket_number::parse_ticket_number(&ticket_number)?;

        let total = self.compute_total(valet_price)?;
        let payment_method = self.payment_method.ok_or_else(|| ValidationError::Required {
            field: "payment_method".to_string(),
        })?;

        Ok(Ticket {
            id: Uuid::new_v4().to_string(),
            ticket_number,
            customer_name: self.customer_name.trim().to_string(),
            customer_phone: self.customer_phone.trim().to_string(),
            valet_quantity: self.valet_quantity,
            laundry_options: self.laundry_options,
            payment_method,
            dry_cleaning_items: self.dry_cleaning_items,
            total_cents: total.cents(),
            created_at,
        })
    }
}

/// How often a customer has come in, looked up by phone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClientVisits {
    #[ts(as = "Option<String>")]
    pub last_visit: Option<NaiveDateTime>,
    pub visit_count: i64,
}

impl ClientVisits {
    /// Computes visits from a ticket list (local store path).
    pub fn from_tickets<'a, I: IntoIterator<Item = &'a Ticket>>(tickets: I, phone: &str) -> Self {
        let phone = phone.trim();
        tickets
            .into_iter()
            .filter(|t| t.customer_phone == phone)
            .fold(ClientVisits::default(), |acc, t| ClientVisits {
                last_visit: acc.last_visit.max(Some(t.created_at)),
                visit_count: acc.visit_count + 1,
            })
    }
}

// =============================================================================
// Expense
// =============================================================================

/// Money going out: supplies, rent, repairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount_cents: i64,
    #[ts(as = "String")]
    pub date: NaiveDateTime,
}

impl Expense {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// Input for a new expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub description: String,
    pub amount_cents: i64,
}

impl ExpenseDraft {
    /// Validates and stamps the expense.
    ///
    /// ## Rules
    /// - description required
    /// - amount strictly positive
    pub fn into_expense(self, date: NaiveDateTime) -> CoreResult<Expense> {
        validate_required("description", &self.description)?;
        validate_amount("amount", Money::from_cents(self.amount_cents))?;

        Ok(Expense {
            id: Uuid::new_v4().to_string(),
            description: self.description.trim().to_string(),
            amount_cents: self.amount_cents,
            date,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn draft() -> TicketDraft {
        TicketDraft {
            customer_name: "María Gómez".to_string(),
            customer_phone: "2214567890".to_string(),
            valet_quantity: 2,
            laundry_options: LaundryOptions::from_enabled([LaundryOption::Bleach]),
            payment_method: Some(PaymentMethod::Cash),
            dry_cleaning_items: vec![DryCleaningItem::new("Traje", Money::from_pesos(29_000), 1)],
        }
    }

    #[test]
    fn test_payment_method_round_trips_through_str() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), method);
        }
        assert_eq!("Efectivo".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_method_serializes_lowercase() {
        let json = serde_json::to_string(&PaymentMethod::Mercadopago).unwrap();
        assert_eq!(json, "\"mercadopago\"");
        assert!(PaymentMethod::Cuentadni.is_digital());
        assert!(!PaymentMethod::Cash.is_digital());
    }

    #[test]
    fn test_laundry_option_parsing_accepts_cli_spellings() {
        assert_eq!(
            "separate-by-color".parse::<LaundryOption>().unwrap(),
            LaundryOption::SeparateByColor
        );
        assert_eq!("noDry".parse::<LaundryOption>().unwrap(), LaundryOption::NoDry);
        assert_eq!("no_fragrance".parse::<LaundryOption>().unwrap(), LaundryOption::NoFragrance);
        assert!("starch".parse::<LaundryOption>().is_err());
    }

    #[test]
    fn test_laundry_options_enabled_matches_flags() {
        let flags = LaundryOptions::from_enabled([LaundryOption::NoDry, LaundryOption::DelicateDry]);
        assert!(flags.delicate_dry);
        assert!(flags.no_dry);
        assert!(!flags.bleach);
        assert_eq!(
            flags.enabled(),
            vec![LaundryOption::DelicateDry, LaundryOption::NoDry]
        );
    }

    #[test]
    fn test_compute_total_adds_valets_and_items() {
        let total = draft().compute_total(Money::from_pesos(5_000)).unwrap();
        assert_eq!(total, Money::from_pesos(39_000));
    }

    #[test]
    fn test_huge_prices_are_rejected_not_overflowed() {
        let mut d = draft();
        d.dry_cleaning_items = vec![DryCleaningItem::new("Alfombra", Money::from_pesos(100_000_000_000_000), 999)];
        assert!(matches!(d.validate(), Err(ValidationError::OutOfRange { .. })));
        assert!(d
            .clone()
            .into_ticket("00000001".to_string(), Money::from_pesos(5_000), at(4, 10))
            .is_err());

        // A valid draft still cannot overflow through an absurd valet price
        let d = draft();
        assert!(d.validate().is_ok());
        assert!(matches!(
            d.compute_total(Money::from_cents(i64::MAX)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_into_ticket_trims_and_totals() {
        let mut d = draft();
        d.customer_name = "  María Gómez ".to_string();
        let ticket = d
            .into_ticket("00000007".to_string(), Money::from_pesos(5_000), at(4, 10))
            .unwrap();

        assert_eq!(ticket.customer_name, "María Gómez");
        assert_eq!(ticket.total(), Money::from_pesos(39_000));
        assert_eq!(ticket.ticket_number, "00000007");
        assert!(Uuid::parse_str(&ticket.id).is_ok());
    }

    #[test]
    fn test_draft_requires_payment_method() {
        let mut d = draft();
        d.payment_method = None;
        assert!(matches!(
            d.validate(),
            Err(ValidationError::Required { ref field }) if field == "payment_method"
        ));
    }

    #[test]
    fn test_draft_requires_something_to_sell() {
        let mut d = draft();
        d.valet_quantity = 0;
        d.dry_cleaning_items.clear();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_draft_rejects_short_phone() {
        let mut d = draft();
        d.customer_phone = "221-45".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_into_ticket_rejects_bad_number() {
        let result = draft().into_ticket("42".to_string(), Money::from_pesos(5_000), at(4, 10));
        assert!(result.is_err());
    }

    #[test]
    fn test_client_visits_counts_by_phone() {
        let first = draft()
            .into_ticket("00000001".to_string(), Money::from_pesos(5_000), at(1, 9))
            .unwrap();
        let second = draft()
            .into_ticket("00000002".to_string(), Money::from_pesos(5_000), at(9, 17))
            .unwrap();
        let mut other = draft();
        other.customer_phone = "1155554444".to_string();
        let third = other
            .into_ticket("00000003".to_string(), Money::from_pesos(5_000), at(20, 12))
            .unwrap();

        let visits = ClientVisits::from_tickets([&first, &second, &third], "2214567890");
        assert_eq!(visits.visit_count, 2);
        assert_eq!(visits.last_visit, Some(at(9, 17)));

        let nobody = ClientVisits::from_tickets([&first], "0000000000");
        assert_eq!(nobody, ClientVisits::default());
    }

    #[test]
    fn test_expense_draft_validation() {
        let ok = ExpenseDraft {
            description: " Jabón ".to_string(),
            amount_cents: 120_000,
        }
        .into_expense(at(2, 11))
        .unwrap();
        assert_eq!(ok.description, "Jabón");
        assert_eq!(ok.amount(), Money::from_pesos(1_200));

        let zero = ExpenseDraft {
            description: "Luz".to_string(),
            amount_cents: 0,
        };
        assert!(zero.into_expense(at(2, 11)).is_err());

        let blank = ExpenseDraft {
            description: "   ".to_string(),
            amount_cents: 100,
        };
        assert!(blank.into_expense(at(2, 11)).is_err());
    }
}
