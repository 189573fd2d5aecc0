//! # ohana-core: Pure Business Logic for the Laundry POS
//!
//! Everything that decides *what* a ticket costs, *which* window a ticket
//! falls into, and *who* may do what lives here as plain functions over
//! plain data. Storage is somebody else's job.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ohana Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     ohana CLI (apps/cli)                        │   │
//! │  │   ticket create ──► metrics daily ──► dashboard ──► inventory  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ohana-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  types   │ │  period  │ │ metrics  │ │ auth / catalog   │  │   │
//! │  │   │  Ticket  │ │ DateRange│ │ Daily    │ │ Permission, User │  │   │
//! │  │   │  Expense │ │ weeks    │ │ Weekly   │ │ price list       │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ohana-db (Storage Layer)                         │   │
//! │  │        SQLite store, local JSON store, fallback between them    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Tickets and expenses
//! - [`inventory`] - Stock lines and the default stock list
//! - [`money`] - Integer peso/centavo arithmetic
//! - [`period`] - Day / Sunday-start week / month windows
//! - [`metrics`] - Aggregation, rollups and trend comparison
//! - [`dashboard`] - Period snapshot with expenses and frequent clients
//! - [`auth`] - Roles, permissions, users
//! - [`catalog`] - Dry-cleaning price list
//! - [`search`] - Pickup search over tickets
//! - [`ticket_number`] - 8-digit ticket numbering
//! - [`validation`] - Input rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use ohana_core::money::Money;
//! use ohana_core::metrics::percent_change;
//!
//! let valet = Money::from_pesos(5_000);
//! assert_eq!((valet * 3).to_string(), "$15.000");
//!
//! // Baseline of zero with growth counts as +100%
//! assert_eq!(percent_change(1_500, 0), 100);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod inventory;
pub mod metrics;
pub mod money;
pub mod period;
pub mod search;
pub mod ticket_number;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::{Permission, Role, SessionUser, User};
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::{InventoryItem, InventoryItemInput};
pub use money::Money;
pub use period::{DateRange, TimeFrame};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Price of one valet (wash-and-fold load) when nothing else is configured.
pub const DEFAULT_VALET_PRICE: Money = Money::from_pesos(5_000);

/// Minimum number of digits a customer phone must carry.
pub const MIN_PHONE_DIGITS: usize = 8;

/// Upper bound for any single quantity on a ticket.
///
/// ## Business Reason
/// Catches typos like 1000 instead of 10 at the counter.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Upper bound for a single price or expense, in centavos ($100.000.000).
///
/// Keeps `price × MAX_ITEM_QUANTITY` far inside `i64`.
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000;

/// Shop opening hour used for the hourly revenue chart.
pub const DEFAULT_OPENING_HOUR: u32 = 8;

/// Shop closing hour (inclusive) used for the hourly revenue chart.
pub const DEFAULT_CLOSING_HOUR: u32 = 20;

/// How many clients the dashboard lists as "frequent".
pub const DEFAULT_FREQUENT_CLIENTS: usize = 5;
