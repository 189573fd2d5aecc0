//! # Ohana CLI Library
//!
//! Counter tool for the Ohana laundry POS. `main.rs` only parses
//! arguments and prints; everything else lives here so it can be tested.
//!
//! ## Module Organization
//! ```text
//! ohana_cli/
//! ├── lib.rs          ◄─── You are here (tracing setup & dispatch)
//! ├── cli.rs          ◄─── clap argument tree
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState: config + store stack + session checks
//! │   └── config.rs   ◄─── AppConfig: toml file + OHANA_* overrides
//! ├── commands/
//! │   ├── session.rs  ◄─── login / logout / whoami
//! │   ├── ticket.rs   ◄─── create / list / search / visits
//! │   ├── expense.rs  ◄─── add / list
//! │   ├── metrics.rs  ◄─── metrics / dashboard
//! │   ├── inventory.rs◄─── supplies
//! │   ├── user.rs     ◄─── accounts & permissions
//! │   ├── catalog.rs  ◄─── dry-cleaning price list
//! │   ├── status.rs   ◄─── health & paths
//! │   └── config.rs   ◄─── config init
//! └── error.rs        ◄─── CliError printed on failure
//! ```
//!
//! ## Run Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging ──── stderr, RUST_LOG or info,ohana=debug       │
//! │  2. Load Config ─────────── defaults ► config.toml ► OHANA_* ► validate│
//! │  3. Open Stores ─────────── SQLite (optional) + local JSON              │
//! │  4. Dispatch ────────────── permission check ► handler                  │
//! │  5. Print ───────────────── pretty JSON on stdout                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ConfigAction, ExpenseAction, InventoryAction, TicketAction, UserAction};
use error::CliResult;
use state::{AppConfig, AppState};

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout stays machine-readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=ohana=trace` - Show trace for ohana crates only
/// - Default: INFO, DEBUG for ohana crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ohana=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads config, opens the stores and runs one command.
pub async fn run(cli: Cli) -> CliResult<Value> {
    let mut config = AppConfig::load(cli.config.clone())?;
    if cli.local_only {
        config.storage.remote_enabled = false;
    }

    // Config commands never touch the stores
    if let Command::Config { action } = cli.command {
        return match action {
            ConfigAction::Show => to_json(&config),
            ConfigAction::Init { force } => to_json(&commands::config::init(cli.config, force)?),
        };
    }

    let state = AppState::open(config, cli.config).await?;
    let now = Local::now().naive_local();
    debug!(remote = state.store().primary().is_some(), "Stores ready");

    dispatch(&state, cli.command, now).await
}

/// Runs one command against an open state, with `now` as the clock.
pub async fn dispatch(state: &AppState, command: Command, now: NaiveDateTime) -> CliResult<Value> {
    let today = now.date();

    match command {
        Command::Login { username, password } => {
            to_json(&commands::session::login(state, &username, &password)?)
        }
        Command::Logout => to_json(&commands::session::logout(state)?),
        Command::Whoami => to_json(&commands::session::whoami(state)?),

        Command::Ticket { action } => match action {
            TicketAction::Create(args) => to_json(&commands::ticket::create(state, args, now).await?),
            TicketAction::List(p) => {
                to_json(&commands::ticket::list(state, p.timeframe, p.date, p.limit).await?)
            }
            TicketAction::Search { term, field } => {
                to_json(&commands::ticket::search(state, &term, field).await?)
            }
            TicketAction::Visits { phone } => to_json(&commands::ticket::visits(state, &phone).await?),
        },

        Command::Expense { action } => match action {
            ExpenseAction::Add { description, amount } => {
                to_json(&commands::expense::add(state, description, amount, now).await?)
            }
            ExpenseAction::List(p) => {
                to_json(&commands::expense::list(state, p.timeframe, p.date, p.limit).await?)
            }
        },

        Command::Metrics { period } => {
            let date = period.date().unwrap_or(today);
            to_json(&commands::metrics::report(state, period.timeframe(), date).await?)
        }
        Command::Dashboard(args) => {
            let date = args.date.unwrap_or(today);
            to_json(&commands::metrics::dashboard(state, args.timeframe, date).await?)
        }

        Command::Inventory { action } => match action {
            InventoryAction::List => to_json(&commands::inventory::list(state, now)?),
            InventoryAction::Low => to_json(&commands::inventory::low(state, now)?),
            InventoryAction::Add(args) => to_json(&commands::inventory::add(state, args, now)?),
            InventoryAction::Update(args) => to_json(&commands::inventory::update(state, args, now)?),
            InventoryAction::Delete { id } => to_json(&commands::inventory::delete(state, &id, now)?),
        },

        Command::Users { action } => match action {
            UserAction::List => to_json(&commands::user::list(state)?),
            UserAction::Add {
                username,
                password,
                role,
                permissions,
            } => to_json(&commands::user::add(state, &username, &password, role, permissions)?),
            UserAction::Grant { username, permissions } => {
                to_json(&commands::user::grant(state, &username, permissions)?)
            }
        },

        Command::Catalog { search } => to_json(&commands::catalog::list(search.as_deref())),
        Command::Status => to_json(&commands::status::report(state).await?),
        Command::Config { action } => match action {
            ConfigAction::Show => to_json(state.config()),
            ConfigAction::Init { force } => {
                to_json(&commands::config::init(state.config_path(), force)?)
            }
        },
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<Value> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{local_state, may15};
    use crate::error::ErrorCode;
    use clap::Parser;

    async fn ohana(state: &AppState, args: &[&str]) -> CliResult<Value> {
        let cli = Cli::try_parse_from(std::iter::once("ohana").chain(args.iter().copied())).unwrap();
        dispatch(state, cli.command, may15(10)).await
    }

    #[tokio::test]
    async fn test_counter_session() {
        let (_dir, state) = local_state();

        let err = ohana(&state, &["ticket", "list"]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);

        let session = ohana(&state, &["login", "admin1", "--password", "admin1"]).await.unwrap();
        assert_eq!(session["username"], "admin1");

        let ticket = ohana(
            &state,
            &["ticket", "create", "-n", "María", "-p", "1144441234", "-v", "1", "--payment", "debit", "-i", "Saco"],
        )
        .await
        .unwrap();
        assert_eq!(ticket["ticketNumber"], "00000001");
        assert_eq!(ticket["paymentMethod"], "debit");

        ohana(&state, &["expense", "add", "-d", "Jabón", "-a", "2.000"]).await.unwrap();

        let metrics = ohana(&state, &["metrics", "daily"]).await.unwrap();
        assert_eq!(metrics["timeframe"], "daily");

        let dashboard = ohana(&state, &["dashboard"]).await.unwrap();
        assert_eq!(dashboard["totalExpenses"], 200_000);
        assert_eq!(dashboard["frequentClients"][0]["phone"], "1144441234");

        let found = ohana(&state, &["ticket", "search", "maría"]).await.unwrap();
        assert_eq!(found.as_array().unwrap().len(), 1);

        let low = ohana(&state, &["inventory", "low"]).await.unwrap();
        assert_eq!(low[0]["name"], "Quita sangre");

        let logout = ohana(&state, &["logout"]).await.unwrap();
        assert_eq!(logout["username"], "admin1");
        assert!(ohana(&state, &["whoami"]).await.unwrap().is_null());
    }

    #[tokio::test]
    async fn test_catalog_needs_no_session() {
        let (_dir, state) = local_state();
        let catalog = ohana(&state, &["catalog", "--search", "alfombra"]).await.unwrap();
        assert!(!catalog.as_array().unwrap().is_empty());

        let status = ohana(&state, &["status"]).await.unwrap();
        assert_eq!(status["remoteEnabled"], false);
        assert!(status["remote"].is_null());
    }
}
