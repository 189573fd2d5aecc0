//! Pickup search: find the ticket a customer is coming back for.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Ticket;

/// Which ticket field the term is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    /// Number, name or phone.
    #[default]
    Any,
    TicketNumber,
    Name,
    Phone,
}

impl SearchField {
    fn matches(&self, ticket: &Ticket, needle: &str) -> bool {
        let hit = |value: &str| value.to_lowercase().contains(needle);
        match self {
            SearchField::Any => {
                hit(&ticket.ticket_number) || hit(&ticket.customer_name) || hit(&ticket.customer_phone)
            }
            SearchField::TicketNumber => hit(&ticket.ticket_number),
            SearchField::Name => hit(&ticket.customer_name),
            SearchField::Phone => hit(&ticket.customer_phone),
        }
    }
}

impl FromStr for SearchField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "any" => Ok(SearchField::Any),
            "ticketnumber" | "number" => Ok(SearchField::TicketNumber),
            "name" => Ok(SearchField::Name),
            "phone" => Ok(SearchField::Phone),
            _ => Err(ValidationError::NotAllowed {
                field: "search field".to_string(),
                allowed: vec![
                    "any".to_string(),
                    "number".to_string(),
                    "name".to_string(),
                    "phone".to_string(),
                ],
            }),
        }
    }
}

/// Case-insensitive substring search, newest ticket first.
///
/// A blank term matches nothing.
pub fn search_tickets(tickets: &[Ticket], term: &str, field: SearchField) -> Vec<Ticket> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut found: Vec<Ticket> = tickets
        .iter()
        .filter(|t| field.matches(t, &needle))
        .cloned()
        .collect();
    found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    found
}
