//! # Demo Data Generator
//!
//! Fills a relational store with a month of plausible tickets and expenses
//! so the dashboard has something to show during development.
//!
//! ## Usage
//! ```bash
//! # 30 days ending today (default)
//! cargo run -p ohana-db --bin seed
//!
//! # Custom span and database
//! cargo run -p ohana-db --bin seed -- --days 90 --db ./data/ohana.db
//! ```
//!
//! Tickets are deterministic: the same `--days` always yields the same
//! customers, amounts and payment mix.

use chrono::{Days, Local, NaiveDate, NaiveTime};
use ohana_core::catalog::services;
use ohana_core::ticket_number::format_ticket_number;
use ohana_core::{
    DryCleaningItem, ExpenseDraft, LaundryOption, LaundryOptions, PaymentMethod, TicketDraft,
    DEFAULT_VALET_PRICE,
};
use ohana_db::{Database, DbConfig, ExpenseStore, TicketStore};
use std::env;

const CUSTOMERS: &[(&str, &str)] = &[
    ("María Gómez", "11 4444-1234"),
    ("Jorge Pérez", "11 5555-0001"),
    ("Lucía Paz", "11 4444-9876"),
    ("Carlos Díaz", "221 555-4433"),
    ("Sofía Romero", "11 6666-2020"),
    ("Martín Suárez", "11 7777-3131"),
    ("Valentina Ríos", "11 3030-4040"),
];

const EXPENSES: &[(&str, i64)] = &[
    ("Jabón en polvo", 18_000),
    ("Suavizante", 9_500),
    ("Bolsas", 6_000),
    ("Luz", 42_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut days: u64 = 30;
    let mut db_path = "./ohana_dev.db".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(30);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Ohana Demo Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Days of history to generate (default: 30)");
                println!("  -d, --db <PATH>    Database file path (default: ./ohana_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Ohana Demo Data Generator");
    println!("=========================");
    println!("Database: {}", db_path);
    println!("Days:     {}", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let existing = db.tickets().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} tickets", existing);
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let today = Local::now().date_naive();
    let first = today - Days::new(days.saturating_sub(1));

    let mut counter: u64 = 0;
    let start = std::time::Instant::now();

    for offset in 0..days {
        let date = first + Days::new(offset);
        for slot in 0..tickets_for_day(date, offset) {
            counter += 1;
            let draft = demo_draft(counter as usize);
            let created_at = date.and_time(opening_time(slot));
            let ticket = draft.into_ticket(format_ticket_number(counter), DEFAULT_VALET_PRICE, created_at)?;
            db.save_ticket(&ticket).await?;
        }

        if offset % 7 == 0 {
            let (description, pesos) = EXPENSES[(offset as usize / 7) % EXPENSES.len()];
            let expense = ExpenseDraft {
                description: description.to_string(),
                amount_cents: pesos * 100,
            }
            .into_expense(date.and_time(opening_time(0)))?;
            db.save_expense(&expense).await?;
        }
    }

    println!();
    println!("✓ Generated {} tickets in {:?}", counter, start.elapsed());
    println!("  Last ticket number: {}", format_ticket_number(counter));
    Ok(())
}

/// Busier on Saturdays, quiet on Sundays.
fn tickets_for_day(date: NaiveDate, offset: u64) -> u64 {
    use chrono::{Datelike, Weekday};
    match date.weekday() {
        Weekday::Sun => 1,
        Weekday::Sat => 8,
        _ => 3 + offset % 3,
    }
}

fn opening_time(slot: u64) -> NaiveTime {
    let hour = 8 + (slot * 2 % 12) as u32;
    NaiveTime::from_hms_opt(hour, (slot * 7 % 60) as u32, 0).unwrap_or(NaiveTime::MIN)
}

fn demo_draft(seed: usize) -> TicketDraft {
    let (name, phone) = CUSTOMERS[seed % CUSTOMERS.len()];
    let method = PaymentMethod::ALL[seed % PaymentMethod::ALL.len()];

    let mut dry_cleaning_items = Vec::new();
    if seed % 3 == 0 {
        // skip the valet entries at the head of the list
        let catalog = &services()[5..];
        let service = &catalog[seed % catalog.len()];
        let quantity = 1 + (seed % 2) as i64;
        dry_cleaning_items.push(DryCleaningItem::new(service.name, service.base_price(), quantity));
    }

    let options = LaundryOption::ALL
        .iter()
        .copied()
        .filter(|o| (seed + *o as usize) % 4 == 0);

    let mut valet_quantity = (seed % 4) as i64;
    if valet_quantity == 0 && dry_cleaning_items.is_empty() {
        valet_quantity = 1;
    }

    TicketDraft {
        customer_name: name.to_string(),
        customer_phone: phone.to_string(),
        valet_quantity,
        laundry_options: LaundryOptions::from_enabled(options),
        payment_method: Some(method),
        dry_cleaning_items,
    }
}
