//! Per-terminal ticket counter, kept under `lastTicketNumber`.
//!
//! The value is stored as a decimal string (`"42"`); a bare number is
//! accepted on read.

use ohana_core::ticket_number::{format_ticket_number, next_counter};
use serde_json::Value;
use tracing::debug;

use super::{keys, LocalStore};
use crate::error::{DbError, DbResult};

fn parse_counter(value: &Value) -> DbResult<u64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Number(n) => n.as_u64(),
        Value::Null => Some(0),
        _ => None,
    };
    parsed.ok_or_else(|| {
        DbError::Serialization(format!(
            "{} is not a ticket counter: {value}",
            keys::LAST_TICKET_NUMBER
        ))
    })
}

impl LocalStore {
    /// Last number handed out, 0 when none has been.
    pub fn last_ticket_number(&self) -> DbResult<u64> {
        match self.get::<Value>(keys::LAST_TICKET_NUMBER)? {
            Some(value) => parse_counter(&value),
            None => Ok(0),
        }
    }

    /// Advances the counter and returns the new number, zero-padded.
    pub fn next_ticket_number(&self) -> DbResult<String> {
        let next = self.update(
            keys::LAST_TICKET_NUMBER,
            || Ok(Value::String("0".to_string())),
            |stored: &mut Value| {
                let next = next_counter(parse_counter(stored)?)?;
                *stored = Value::String(next.to_string());
                Ok(next)
            },
        )?;

        debug!(counter = next, "Ticket number issued");
        Ok(format_ticket_number(next))
    }
}
