//! Error types for the todo domain layer.
//!
//! This module defines a small hierarchy of error types:
//!
//! - [`PaginationError`] - Rejected connection arguments (client input)
//! - [`StorageError`] - Database/repository errors
//! - [`ConnectionError`] - Everything a connection resolution can fail with
//! - [`DomainError`] - Business rule violations outside pagination
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Pagination Errors
// =============================================================================

/// Connection arguments that were rejected before any storage call.
///
/// Every variant is a client input error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Both `first` and `last` were supplied.
    #[error("Ambiguous window: `first` and `last` cannot be used together")]
    AmbiguousWindow,

    /// `first` or `last` is above the field's configured maximum.
    #[error("`{argument}` must not exceed {max}, got {requested}")]
    LimitExceeded {
        /// Argument name (`first` or `last`).
        argument: &'static str,
        /// Value sent by the client.
        requested: i32,
        /// Configured maximum for this field.
        max: u32,
    },

    /// `first` or `last` is negative.
    #[error("`{argument}` must not be negative, got {requested}")]
    NegativeLimit {
        /// Argument name (`first` or `last`).
        argument: &'static str,
        /// Value sent by the client.
        requested: i32,
    },

    /// `after` or `before` does not decode as the resource identifier.
    #[error("Malformed cursor in `{argument}`: {value}")]
    MalformedCursor {
        /// Argument name (`after` or `before`).
        argument: &'static str,
        /// Raw cursor value.
        value: String,
    },
}

impl PaginationError {
    /// Short, stable label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AmbiguousWindow => "ambiguous_window",
            Self::LimitExceeded { .. } => "limit_exceeded",
            Self::NegativeLimit { .. } => "negative_limit",
            Self::MalformedCursor { .. } => "malformed_cursor",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Database and repository errors.
///
/// These errors originate from storage operations like queries,
/// transactions, and data serialization.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to establish database connection.
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// SQL query execution failed.
    #[error("Query execution error: {0}")]
    QueryError(String),

    /// Database constraint was violated (unique, foreign key, etc.).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database migration failed.
    #[error("Migration error: {0}")]
    MigrationError(String),

    /// Data serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// =============================================================================
// Connection Errors
// =============================================================================

/// Failure of a whole connection resolution.
///
/// A resolution never returns a partial connection: either every step
/// succeeded or one of these is returned.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Arguments were rejected before any storage call.
    #[error("Invalid connection arguments: {0}")]
    Validation(#[from] PaginationError),

    /// The page fetch or the count failed.
    #[error("Storage error: {0}")]
    Adapter(#[from] StorageError),
}

impl ConnectionError {
    /// Whether the error was caused by the client's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// =============================================================================
// Domain Errors
// =============================================================================

/// Business rule violations for mutations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Input failed validation.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Referenced user does not exist.
    #[error("User not found: {0}")]
    UserNotFound(uuid::Uuid),

    /// Referenced todo does not exist.
    #[error("Todo not found: {0}")]
    TodoNotFound(uuid::Uuid),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for argument validation.
pub type PaginationResult<T> = Result<T, PaginationError>;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for connection resolution.
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
