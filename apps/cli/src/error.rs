//! # CLI Error Type
//!
//! Unified error type for every `ohana` subcommand.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Ohana                                  │
//! │                                                                         │
//! │  $ ohana metrics daily                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Handler                                                 │  │
//! │  │  CliResult<T>                                                    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  No session? ────── CoreError::NotAuthenticated ───┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Store Error? ───── DbError::LocalStore("...") ── CliError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ── JSON on stdout ────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: {"code": "UNAUTHENTICATED", "message": "No active session..."}│
//! │  exit status 1                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use ohana_core::{CoreError, ValidationError};
use ohana_db::DbError;
use serde::Serialize;

use crate::state::ConfigError;

/// Error printed when a command fails.
///
/// ## Serialization
/// ```json
/// {
///   "code": "PERMISSION_DENIED",
///   "message": "User staff1 lacks permission metrics.view"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Ticket, inventory line or user not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Both stores failed
    DatabaseError,

    /// The session lacks a permission
    PermissionDenied,

    /// Nobody is logged in, or the login was rejected
    Unauthenticated,

    /// config.toml or an OHANA_* variable is wrong
    ConfigError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Process exit status for the code.
    pub const fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::ValidationError | ErrorCode::NotFound => 2,
            ErrorCode::PermissionDenied | ErrorCode::Unauthenticated => 3,
            ErrorCode::ConfigError => 4,
            ErrorCode::DatabaseError | ErrorCode::Internal => 1,
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }
}

pub type CliResult<T> = Result<T, CliError>;

/// Converts storage errors to CLI errors.
impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CliError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => CliError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::Core(e) => e.into(),
            DbError::ConnectionFailed(_) => {
                CliError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                CliError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::PoolExhausted => {
                CliError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                CliError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::LocalStore(e) => {
                tracing::error!("Local store failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Local store could not be read or written")
            }
            DbError::Serialization(e) => {
                tracing::error!("Stored data is malformed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Stored data is malformed")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal storage error: {}", e);
                CliError::internal("Storage operation failed")
            }
        }
    }
}

/// Converts core errors to CLI errors.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InventoryItemNotFound(id) => CliError::not_found("InventoryItem", &id),
            CoreError::UserNotFound(username) => CliError::not_found("User", &username),
            CoreError::InvalidTicketNumber(number) => {
                CliError::validation(format!("Invalid ticket number: {}", number))
            }
            e @ (CoreError::InvalidCredentials | CoreError::NotAuthenticated) => {
                CliError::new(ErrorCode::Unauthenticated, e.to_string())
            }
            e @ CoreError::PermissionDenied { .. } => {
                CliError::new(ErrorCode::PermissionDenied, e.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Failed to render output: {}", err);
        CliError::internal("Failed to render output")
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;
    use ohana_core::Permission;

    #[test]
    fn test_codes_serialize_screaming_snake() {
        let err = CliError::new(ErrorCode::PermissionDenied, "no");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "PERMISSION_DENIED");
        assert_eq!(json["message"], "no");

        let json = serde_json::to_value(ErrorCode::ValidationError).unwrap();
        assert_eq!(json, "VALIDATION_ERROR");
    }

    #[test]
    fn test_core_errors_keep_their_meaning() {
        let err: CliError = CoreError::NotAuthenticated.into();
        assert_eq!(err.code, ErrorCode::Unauthenticated);

        let err: CliError = CoreError::PermissionDenied {
            username: "staff1".to_string(),
            permission: Permission::MetricsView,
        }
        .into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert!(err.message.contains("metrics.view"));

        let err: CliError = DbError::Core(CoreError::UserNotFound("ghost".to_string())).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err: CliError = DbError::QueryFailed("no such table: tickets".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("tickets"));

        let err: CliError = DbError::not_found("InventoryItem", "42").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "InventoryItem not found: 42");
    }

    #[test]
    fn test_config_errors() {
        let err: CliError = ConfigError::Invalid("bad hours".to_string()).into();
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert_eq!(err.code.exit_code(), 4);
    }
}
