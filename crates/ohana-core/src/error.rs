//! # Error Types
//!
//! Domain-specific error types for ohana-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ohana-core errors (this file)                                         │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ohana-db errors (separate crate)                                      │
//! │  └── DbError          - SQLite / local store failures                  │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CliError → stdout        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::auth::Permission;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Ticket number is not an 8-digit string.
    #[error("Invalid ticket number: {0}")]
    InvalidTicketNumber(String),

    /// Inventory item cannot be found.
    #[error("Inventory item not found: {0}")]
    InventoryItemNotFound(String),

    /// User cannot be found.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Username or password did not match.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Nobody is logged in.
    #[error("No active session, log in first")]
    NotAuthenticated,

    /// The current user lacks a permission.
    ///
    /// ## User Workflow
    /// ```text
    /// staff1 runs `ohana metrics daily`
    ///      │
    ///      ▼
    /// requires Permission::MetricsView
    ///      │
    ///      ▼
    /// PermissionDenied { username: "staff1", permission: "metrics.view" }
    /// ```
    #[error("User {username} lacks permission {permission}")]
    PermissionDenied {
        username: String,
        permission: Permission,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These fire before anything is written, whichever store ends up
/// receiving the record.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., duplicate username).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_message() {
        let err = CoreError::PermissionDenied {
            username: "staff1".to_string(),
            permission: Permission::MetricsView,
        };
        assert_eq!(
            err.to_string(),
            "User staff1 lacks permission metrics.view"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "description".to_string(),
        };
        assert_eq!(err.to_string(), "description is required");

        let err = ValidationError::TooShort {
            field: "phone".to_string(),
            min: 8,
        };
        assert_eq!(err.to_string(), "phone must be at least 8 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "amount".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
