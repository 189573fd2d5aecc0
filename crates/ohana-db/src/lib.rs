//! # ohana-db: Storage Layer for the Ohana Laundry POS
//!
//! Two stores that answer the same questions, and the adapter that
//! prefers one over the other.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ohana Data Flow                                  │
//! │                                                                         │
//! │  ohana ticket create / metrics / dashboard                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     ohana-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   FallbackStore<Database, LocalStore>                           │   │
//! │  │        │                         │                              │   │
//! │  │        ▼                         ▼                              │   │
//! │  │   ┌───────────────┐        ┌──────────────────────┐            │   │
//! │  │   │   Database    │        │     LocalStore       │            │   │
//! │  │   │   (pool.rs)   │        │    (local/*.rs)      │            │   │
//! │  │   │ repositories  │        │ tickets, expenses    │            │   │
//! │  │   │ migrations    │        │ counter, inventory,  │            │   │
//! │  │   │               │        │ users, session       │            │   │
//! │  │   └───────┬───────┘        └──────────┬───────────┘            │   │
//! │  └───────────┼───────────────────────────┼────────────────────────┘   │
//! │              ▼                           ▼                            │
//! │        ohana.db (SQLite)          local-store.json                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SQL for customers, tickets, expenses, aggregates
//! - [`local`] - JSON document store, ticket counter, inventory, users
//! - [`store`] - Store traits, report loaders and the fallback adapter
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ohana_db::{Database, DbConfig, FallbackStore, LocalStore};
//!
//! let local = LocalStore::open("local-store.json");
//! let remote = Database::new(DbConfig::new("ohana.db")).await.ok();
//! let store = FallbackStore::new(remote, local);
//!
//! let today = store.metrics(TimeFrame::Daily, date).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod local;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use local::LocalStore;
pub use pool::{Database, DbConfig};
pub use store::{load_dashboard, load_metrics, ExpenseStore, FallbackStore, TicketStore};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::metrics::MetricsRepository;
pub use repository::ticket::TicketRepository;

/// The store stack the application runs on.
pub type AppStore = FallbackStore<Database, LocalStore>;
