//! # Command Handlers
//!
//! One module per command group. Handlers take the [`AppState`] and typed
//! arguments, check the session's permission first, and return a value
//! that the dispatcher prints as JSON.
//!
//! ## Permission Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ticket create ──────────────────────── tickets.create                  │
//! │  ticket list / visits ───────────────── tickets.view                    │
//! │  ticket search ──────────────────────── orders.view                     │
//! │  metrics / dashboard / expense ──────── metrics.view                    │
//! │  inventory list / low ───────────────── inventory.view                  │
//! │  inventory add / update / delete ────── inventory.edit                  │
//! │  users ──────────────────────────────── users.manage                    │
//! │  login / logout / whoami / catalog / status / config ── none            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`AppState`]: crate::state::AppState

pub mod catalog;
pub mod config;
pub mod expense;
pub mod inventory;
pub mod metrics;
pub mod session;
pub mod status;
pub mod ticket;
pub mod user;
