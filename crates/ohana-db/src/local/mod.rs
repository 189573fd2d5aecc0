//! # Local JSON Store
//!
//! The store every terminal always has: one JSON document on disk, a flat
//! object of fixed string keys. It backs the relational store when that is
//! down, and is the only home of the ticket counter, the inventory and the
//! user list.
//!
//! ## File Layout
//! ```text
//! local-store.json
//! {
//!   "laundryTickets":    [Ticket, ...],
//!   "laundryExpenses":   [Expense, ...],
//!   "laundryInventory":  [InventoryItem, ...],
//!   "laundry_users":     [User, ...],
//!   "lastTicketNumber":  "42",
//!   "currentUser":       SessionUser
//! }
//! ```
//!
//! ## Write Path
//! ```text
//! lock ──► read whole file ──► mutate one key ──► write local-store.json.tmp
//!                                                        │
//!                                                        ▼
//!                                    rename over local-store.json ──► unlock
//! ```
//! A crash mid-write leaves the previous file intact. A missing file reads
//! as an empty object.

pub mod counter;
pub mod inventory;
pub mod users;

use ohana_core::metrics::PeriodSummary;
use ohana_core::{ClientVisits, DateRange, Expense, Ticket};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Keys of the local document.
pub mod keys {
    pub const TICKETS: &str = "laundryTickets";
    pub const EXPENSES: &str = "laundryExpenses";
    pub const INVENTORY: &str = "laundryInventory";
    pub const USERS: &str = "laundry_users";
    pub const LAST_TICKET_NUMBER: &str = "lastTicketNumber";
    pub const CURRENT_USER: &str = "currentUser";
}

/// Handle on the local JSON document.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalStore {
    /// Points the store at `path`. Nothing is read or created until the
    /// first access.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        LocalStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads one key. `None` when the key (or the whole file) is absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        let _guard = self.guard();
        let mut doc = self.read_document()?;
        match doc.remove(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Overwrites one key.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        let _guard = self.guard();
        let mut doc = self.read_document()?;
        doc.insert(key.to_string(), serde_json::to_value(value)?);
        self.write_document(&doc)
    }

    /// Deletes one key. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> DbResult<()> {
        let _guard = self.guard();
        let mut doc = self.read_document()?;
        if doc.remove(key).is_some() {
            self.write_document(&doc)?;
        }
        Ok(())
    }

    /// Read-modify-write of one key under the store lock.
    ///
    /// `init` supplies the value when the key is absent; it is persisted
    /// even if `f` fails, so seeding happens once.
    pub fn update<T, R, I, F>(&self, key: &str, init: I, f: F) -> DbResult<R>
    where
        T: DeserializeOwned + Serialize,
        I: FnOnce() -> DbResult<T>,
        F: FnOnce(&mut T) -> DbResult<R>,
    {
        let _guard = self.guard();
        let mut doc = self.read_document()?;

        let mut value: T = match doc.remove(key) {
            Some(raw) => serde_json::from_value(raw)?,
            None => {
                let seeded = init()?;
                doc.insert(key.to_string(), serde_json::to_value(&seeded)?);
                self.write_document(&doc)?;
                doc.remove(key);
                seeded
            }
        };

        let result = f(&mut value)?;
        doc.insert(key.to_string(), serde_json::to_value(&value)?);
        self.write_document(&doc)?;
        Ok(result)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The guarded value is (), a panic while held leaves nothing torn
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_document(&self) -> DbResult<Map<String, Value>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            other => Err(DbError::Serialization(format!(
                "local store root must be an object, found {}",
                json_kind(&other)
            ))),
        }
    }

    fn write_document(&self, doc: &Map<String, Value>) -> DbResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let text = serde_json::to_string_pretty(doc)?;
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), keys = doc.len(), "Local store written");
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Tickets & Expenses
// =============================================================================

impl LocalStore {
    /// Appends a ticket.
    pub fn append_ticket(&self, ticket: &Ticket) -> DbResult<()> {
        self.update(keys::TICKETS, || Ok(Vec::new()), |tickets: &mut Vec<Ticket>| {
            tickets.push(ticket.clone());
            Ok(())
        })?;
        info!(ticket_number = %ticket.ticket_number, "Ticket saved locally");
        Ok(())
    }

    /// Every ticket, newest first.
    pub fn tickets(&self) -> DbResult<Vec<Ticket>> {
        let mut tickets: Vec<Ticket> = self.get(keys::TICKETS)?.unwrap_or_default();
        tickets.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.ticket_number.cmp(&a.ticket_number))
        });
        Ok(tickets)
    }

    /// Tickets inside `range`, newest first.
    pub fn tickets_in(&self, range: DateRange) -> DbResult<Vec<Ticket>> {
        let mut tickets = self.tickets()?;
        tickets.retain(|t| range.contains(t.created_at));
        Ok(tickets)
    }

    /// Folds the tickets inside `range` into totals.
    pub fn summary_in(&self, range: DateRange) -> DbResult<PeriodSummary> {
        Ok(PeriodSummary::from_tickets(&self.tickets_in(range)?))
    }

    /// Visit count and last visit for `phone`.
    pub fn visits_of(&self, phone: &str) -> DbResult<ClientVisits> {
        Ok(ClientVisits::from_tickets(&self.tickets()?, phone))
    }

    /// Appends an expense.
    pub fn append_expense(&self, expense: &Expense) -> DbResult<()> {
        self.update(keys::EXPENSES, || Ok(Vec::new()), |expenses: &mut Vec<Expense>| {
            expenses.push(expense.clone());
            Ok(())
        })?;
        info!(id = %expense.id, "Expense saved locally");
        Ok(())
    }

    /// Every expense, newest first.
    pub fn expenses(&self) -> DbResult<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self.get(keys::EXPENSES)?.unwrap_or_default();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    /// Expenses inside `range`, newest first.
    pub fn expenses_in(&self, range: DateRange) -> DbResult<Vec<Expense>> {
        let mut expenses = self.expenses()?;
        expenses.retain(|e| range.contains(e.date));
        Ok(expenses)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use ohana_core::period::day_range;
    use ohana_core::{LaundryOptions, Money, PaymentMethod};
    use tempfile::TempDir;

    pub(crate) fn temp_store() -> (TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("data").join("local-store.json"));
        (dir, store)
    }

    pub(crate) fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    pub(crate) fn ticket(number: &str, phone: &str, created_at: NaiveDateTime) -> Ticket {
        Ticket {
            id: format!("t-{number}"),
            ticket_number: number.to_string(),
            customer_name: "Ana".to_string(),
            customer_phone: phone.to_string(),
            valet_quantity: 1,
            laundry_options: LaundryOptions::default(),
            payment_method: PaymentMethod::Cash,
            dry_cleaning_items: vec![],
            total_cents: Money::from_pesos(5_000).cents(),
            created_at,
        }
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (_dir, store) = temp_store();
        assert!(store.get::<Vec<Ticket>>(keys::TICKETS).unwrap().is_none());
        assert!(store.tickets().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_get_remove() {
        let (_dir, store) = temp_store();
        store.set("greeting", &"hola").unwrap();
        assert_eq!(store.get::<String>("greeting").unwrap().as_deref(), Some("hola"));

        store.remove("greeting").unwrap();
        assert!(store.get::<String>("greeting").unwrap().is_none());
        store.remove("greeting").unwrap();
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let (_dir, store) = temp_store();
        store.append_ticket(&ticket("00000001", "1144441234", at(15, 10))).unwrap();

        let tmp = store.path().with_file_name("local-store.json.tmp");
        assert!(store.path().exists());
        assert!(!tmp.exists());

        let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[keys::TICKETS][0]["ticketNumber"], "00000001");
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "[1, 2]").unwrap();
        assert!(matches!(store.tickets(), Err(DbError::Serialization(_))));
    }

    #[test]
    fn test_tickets_range_and_summary() {
        let (_dir, store) = temp_store();
        store.append_ticket(&ticket("00000001", "1144441234", at(14, 10))).unwrap();
        store.append_ticket(&ticket("00000002", "1144441234", at(15, 10))).unwrap();
        store.append_ticket(&ticket("00000003", "1155550000", at(15, 12))).unwrap();

        let day = day_range(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
        let today = store.tickets_in(day).unwrap();
        assert_eq!(today.len(), 2);
        assert_eq!(today[0].ticket_number, "00000003");

        let summary = store.summary_in(day).unwrap();
        assert_eq!(summary.total_sales, Money::from_pesos(10_000));
        assert_eq!(summary.total_valets, 2);

        let visits = store.visits_of("1144441234").unwrap();
        assert_eq!(visits.visit_count, 2);
        assert_eq!(visits.last_visit, Some(at(15, 10)));
    }
}
