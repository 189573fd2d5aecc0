//! # Repository Module
//!
//! Relational-store repositories. Each holds a pool handle and owns the SQL
//! for its tables.
//!
//! ```text
//!  Database
//!  ├── customers()  CustomerRepository   find by phone
//!  ├── tickets()    TicketRepository     insert (transactional), list, between
//!  ├── expenses()   ExpenseRepository    insert, list, between
//!  └── metrics()    MetricsRepository    period_summary, client_visits
//! ```

pub mod customer;
pub mod expense;
pub mod metrics;
pub mod ticket;
