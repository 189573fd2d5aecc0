//! # Ticket Numbers
//!
//! Receipt numbers are a per-terminal counter rendered as 8 zero-padded
//! digits. The counter itself lives in the local store (`lastTicketNumber`);
//! this module only formats and parses.

use crate::error::{CoreError, CoreResult};

/// Width of a printed ticket number.
pub const TICKET_NUMBER_WIDTH: usize = 8;

/// Largest counter value that still fits in 8 digits.
pub const MAX_TICKET_NUMBER: u64 = 99_999_999;

/// Formats a counter value: `42` → `00000042`.
///
/// ## Example
/// ```rust
/// use ohana_core::ticket_number::format_ticket_number;
///
/// assert_eq!(format_ticket_number(1), "00000001");
/// ```
pub fn format_ticket_number(counter: u64) -> String {
    format!("{:0width$}", counter, width = TICKET_NUMBER_WIDTH)
}

/// Parses a printed ticket number back to its counter value.
///
/// Anything that is not exactly 8 ASCII digits is rejected.
pub fn parse_ticket_number(number: &str) -> CoreResult<u64> {
    if number.len() != TICKET_NUMBER_WIDTH || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::InvalidTicketNumber(number.to_string()));
    }

    number
        .parse::<u64>()
        .map_err(|_| CoreError::InvalidTicketNumber(number.to_string()))
}

/// Returns the counter value that follows `last`, or an error once the
/// 8-digit space is used up.
pub fn next_counter(last: u64) -> CoreResult<u64> {
    let next = last + 1;
    if next > MAX_TICKET_NUMBER {
        return Err(CoreError::InvalidTicketNumber(next.to_string()));
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_eight_digits() {
        assert_eq!(format_ticket_number(0), "00000000");
        assert_eq!(format_ticket_number(42), "00000042");
        assert_eq!(format_ticket_number(MAX_TICKET_NUMBER), "99999999");
    }

    #[test]
    fn test_parse_round_trip() {
        assert_eq!(parse_ticket_number("00000042").unwrap(), 42);
        assert!(parse_ticket_number("42").is_err());
        assert!(parse_ticket_number("0000004a").is_err());
        assert!(parse_ticket_number("000000420").is_err());
    }

    #[test]
    fn test_next_counter_is_strictly_increasing() {
        let mut last = 0;
        let mut previous = String::new();
        for _ in 0..25 {
            last = next_counter(last).unwrap();
            let formatted = format_ticket_number(last);
            assert_eq!(formatted.len(), TICKET_NUMBER_WIDTH);
            assert!(formatted > previous);
            previous = formatted;
        }
        assert_eq!(previous, "00000025");
    }

    #[test]
    fn test_next_counter_overflow() {
        assert!(next_counter(MAX_TICKET_NUMBER).is_err());
    }
}
