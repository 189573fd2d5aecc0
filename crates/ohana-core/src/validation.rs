//! # Validation Module
//!
//! Input validation for tickets, expenses, inventory and users.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  ├── Types and required flags                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Business rules (phone digits, positive amounts, ...)              │
//! │  └── Runs before either store is touched                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE phone on customers                                         │
//! │                                                                         │
//! │  The local JSON fallback has no constraints of its own, so layer 2     │
//! │  is the only guard on that path.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT_CENTS, MAX_ITEM_QUANTITY, MIN_PHONE_DIGITS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Rejects empty or whitespace-only strings.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a customer name.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_required("customer_name", name)?;

    if name.trim().chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "customer_name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a customer phone number.
///
/// ## Rules
/// - At least 8 digits (separators like `-`, spaces, `+` are allowed but
///   do not count)
/// - Only digits and those separators
///
/// ## Example
/// ```rust
/// use ohana_core::validation::validate_phone;
///
/// assert!(validate_phone("221 456-7890").is_ok());
/// assert!(validate_phone("4567").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < MIN_PHONE_DIGITS {
        return Err(ValidationError::TooShort {
            field: "phone".to_string(),
            min: MIN_PHONE_DIGITS,
        });
    }

    Ok(())
}

/// Validates a dry-cleaning item or inventory item name.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_required("name", name)?;

    if name.trim().chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a login username.
///
/// ## Rules
/// - 3 to 32 characters
/// - Letters, digits, `.`, `_`, `-`
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.len() < 3 {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: 3,
        });
    }

    if username.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 32,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, dots, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates a new password.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < 6 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a garment quantity (1..=999).
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a valet count (0..=999; zero when only dry cleaning is sold).
pub fn validate_valet_quantity(quantity: i64) -> ValidationResult<()> {
    if !(0..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "valet_quantity".to_string(),
            min: 0,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Rejects zero, negative and implausibly large amounts.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(())
}

/// Validates an inventory stock level (finite, not negative).
pub fn validate_stock_level(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a number".to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("2214567890").is_ok());
        assert!(validate_phone("+54 221 456-7890").is_ok());
        assert!(validate_phone("12345678").is_ok());

        assert!(matches!(
            validate_phone("1234567"),
            Err(ValidationError::TooShort { min: 8, .. })
        ));
        assert!(matches!(
            validate_phone("221-abc-7890"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_phone("   "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("Juan Pérez").is_ok());
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("admin1").is_ok());
        assert!(validate_username("ana.staff").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("with space").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secreto").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("abc").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_valet_quantity_allows_zero() {
        assert!(validate_valet_quantity(0).is_ok());
        assert!(validate_valet_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("amount", Money::from_cents(1)).is_ok());
        assert!(validate_amount("amount", Money::from_cents(MAX_AMOUNT_CENTS)).is_ok());
        assert!(validate_amount("amount", Money::zero()).is_err());
        assert!(validate_amount("amount", Money::from_cents(-5)).is_err());
        assert!(matches!(
            validate_amount("price", Money::from_cents(MAX_AMOUNT_CENTS + 1)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_stock_level() {
        assert!(validate_stock_level("quantity", 2.5).is_ok());
        assert!(validate_stock_level("quantity", 0.0).is_ok());
        assert!(validate_stock_level("quantity", -0.5).is_err());
        assert!(validate_stock_level("quantity", f64::NAN).is_err());
    }
}
