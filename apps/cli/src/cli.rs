//! # Command Line
//!
//! Argument definitions for the `ohana` binary.
//!
//! ```text
//! ohana [--config PATH] [--local-only] <COMMAND>
//!
//!   login | logout | whoami
//!   ticket    create | list | search | visits
//!   expense   add | list
//!   metrics   daily | weekly | monthly
//!   dashboard
//!   inventory list | low | add | update | delete
//!   users     list | add | grant
//!   catalog
//!   status
//!   config    show | init
//! ```

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use ohana_core::search::SearchField;
use ohana_core::{LaundryOption, Money, PaymentMethod, Permission, Role, TimeFrame, ValidationError};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Parser)]
#[command(name = "ohana")]
#[command(author, version, about = "Ohana laundry counter")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "OHANA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip the SQLite store for this run
    #[arg(long, global = true)]
    pub local_only: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open a session
    Login {
        username: String,

        #[arg(short, long, env = "OHANA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Close the session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Create and look up tickets
    Ticket {
        #[command(subcommand)]
        action: TicketAction,
    },
    /// Record and list expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },
    /// Sales report for a day, week or month
    Metrics {
        #[command(subcommand)]
        period: MetricsPeriod,
    },
    /// Report, trend, expenses and frequent clients in one snapshot
    Dashboard(DashboardArgs),
    /// Supplies on hand
    Inventory {
        #[command(subcommand)]
        action: InventoryAction,
    },
    /// Accounts and permissions
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Dry-cleaning price list
    Catalog {
        /// Only services whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Store health, paths and session
    Status,
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

// =============================================================================
// Tickets
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum TicketAction {
    /// Create a ticket and take the next number
    Create(TicketCreateArgs),
    /// List tickets, optionally for one period
    List(PeriodArgs),
    /// Search tickets for pickup
    Search {
        term: String,

        /// any | number | name | phone
        #[arg(short, long, default_value = "any")]
        field: SearchField,
    },
    /// Visit count and last visit for a phone
    Visits { phone: String },
}

#[derive(Debug, Args)]
pub struct TicketCreateArgs {
    /// Customer name
    #[arg(short, long)]
    pub name: String,

    /// Customer phone
    #[arg(short, long)]
    pub phone: String,

    /// Number of valets
    #[arg(short, long, default_value_t = 0)]
    pub valets: i64,

    /// cash | debit | mercadopago | cuentadni
    #[arg(long)]
    pub payment: Option<PaymentMethod>,

    /// Wash option, repeatable (separate-by-color, delicate-dry, stain-removal,
    /// bleach, no-fragrance, no-dry)
    #[arg(short, long = "option")]
    pub options: Vec<LaundryOption>,

    /// Dry-cleaning line as NAME[:QTY[:PRICE]], repeatable; PRICE in pesos
    /// defaults to the catalog price
    #[arg(short, long = "item")]
    pub items: Vec<ItemSpec>,
}

/// A dry-cleaning line as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub name: String,
    pub quantity: i64,
    /// `None` takes the catalog price.
    pub price: Option<Money>,
}

impl FromStr for ItemSpec {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "item".to_string(),
            reason: reason.to_string(),
        };

        let mut parts = s.splitn(3, ':');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(invalid("expected NAME[:QTY[:PRICE]]"));
        }

        let quantity = match parts.next() {
            Some(q) => q.trim().parse().map_err(|_| invalid("quantity is not a number"))?,
            None => 1,
        };

        let price = parts
            .next()
            .map(|p| parse_amount(p).map_err(|e| invalid(e.as_str())))
            .transpose()?;

        Ok(ItemSpec {
            name: name.to_string(),
            quantity,
            price,
        })
    }
}

// =============================================================================
// Expenses
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum ExpenseAction {
    /// Record an expense
    Add {
        #[arg(short, long)]
        description: String,

        /// Amount in pesos: 1500, 1.500 or 1500,50
        #[arg(short, long, value_parser = parse_amount)]
        amount: Money,
    },
    /// List expenses, optionally for one period
    List(PeriodArgs),
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum MetricsPeriod {
    /// One day, with the dry-cleaning rollup
    Daily(DateArg),
    /// Sunday to Saturday, broken down by day
    Weekly(DateArg),
    /// Calendar month, broken down by week
    Monthly(DateArg),
}

impl MetricsPeriod {
    pub fn timeframe(&self) -> TimeFrame {
        match self {
            MetricsPeriod::Daily(_) => TimeFrame::Daily,
            MetricsPeriod::Weekly(_) => TimeFrame::Weekly,
            MetricsPeriod::Monthly(_) => TimeFrame::Monthly,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            MetricsPeriod::Daily(d) | MetricsPeriod::Weekly(d) | MetricsPeriod::Monthly(d) => d.date,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct DateArg {
    /// Any day inside the period (YYYY-MM-DD); today when omitted
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Args)]
pub struct DashboardArgs {
    /// daily | weekly | monthly
    #[arg(short, long, default_value = "daily")]
    pub timeframe: TimeFrame,

    /// Any day inside the period (YYYY-MM-DD); today when omitted
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Args)]
pub struct PeriodArgs {
    /// Only the period around this day (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Size of the period when --date is given
    #[arg(short, long, default_value = "daily")]
    pub timeframe: TimeFrame,

    /// At most this many rows, newest first
    #[arg(short, long)]
    pub limit: Option<usize>,
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum InventoryAction {
    /// Every stock line
    List,
    /// Lines at or below their minimum
    Low,
    /// Add a stock line
    Add(InventoryAddArgs),
    /// Change fields of a stock line
    Update(InventoryUpdateArgs),
    /// Remove a stock line
    Delete { id: String },
}

#[derive(Debug, Clone, Args)]
pub struct InventoryAddArgs {
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub quantity: f64,

    /// Restock threshold
    #[arg(short, long)]
    pub min: f64,

    /// kg, L, unidades...
    #[arg(short, long)]
    pub unit: String,
}

#[derive(Debug, Clone, Args)]
pub struct InventoryUpdateArgs {
    pub id: String,

    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub quantity: Option<f64>,

    #[arg(short, long)]
    pub min: Option<f64>,

    #[arg(short, long)]
    pub unit: Option<String>,
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum UserAction {
    /// Every account with its permissions
    List,
    /// Create an account
    Add {
        username: String,

        #[arg(short, long)]
        password: String,

        /// admin | staff
        #[arg(short, long, default_value = "staff")]
        role: Role,

        /// Permission, repeatable; the role's defaults when omitted
        #[arg(long = "permission")]
        permissions: Vec<Permission>,
    },
    /// Replace an account's permissions
    Grant {
        username: String,

        /// tickets.view, tickets.create, metrics.view, inventory.edit, ...
        permissions: Vec<Permission>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a config file with the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// =============================================================================
// Value Parsers
// =============================================================================

/// Parses pesos as the shop writes them.
///
/// `.` groups thousands when a `,` decimal part follows or when it is
/// followed by exactly three digits; otherwise it is the decimal point.
pub fn parse_amount(input: &str) -> Result<Money, String> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let (whole, fraction) = if let Some((whole, fraction)) = cleaned.split_once(',') {
        (whole.replace('.', ""), fraction.to_string())
    } else if let Some((whole, fraction)) = cleaned.rsplit_once('.') {
        if fraction.len() == 3 {
            (cleaned.replace('.', ""), String::new())
        } else {
            (whole.replace('.', ""), fraction.to_string())
        }
    } else {
        (cleaned.clone(), String::new())
    };

    let invalid = || format!("'{}' is not an amount in pesos", input);

    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() || fraction.len() > 2 || !digits(&whole) || !digits(&fraction) {
        return Err(invalid());
    }
    let pesos: i64 = whole.parse().map_err(|_| invalid())?;
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };

    pesos
        .checked_mul(100)
        .and_then(|c| c.checked_add(cents))
        .map(Money::from_cents)
        .ok_or_else(invalid)
}
