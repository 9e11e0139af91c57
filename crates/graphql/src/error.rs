//! Mapping of domain errors onto GraphQL error classes.
//!
//! Clients branch on `extensions.code`: `BAD_USER_INPUT` means the request
//! can be fixed and retried, `INTERNAL_SERVER_ERROR` means it cannot.
//! Storage details are logged, never sent to the client.

use async_graphql::{Error, ErrorExtensions};
use tracing::error;

use todo_core::error::{ConnectionError, DomainError, StorageError};

/// Extension code for client input errors.
pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";
/// Extension code for server-side failures.
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

fn with_code(message: impl Into<String>, code: &'static str) -> Error {
    Error::new(message).extend_with(|_, ext| ext.set("code", code))
}

pub(crate) fn bad_input(message: impl Into<String>) -> Error {
    with_code(message, BAD_USER_INPUT)
}

pub(crate) fn internal(err: &dyn std::error::Error) -> Error {
    error!(error = %err, "❌ Request failed");
    with_code("Internal server error", INTERNAL_SERVER_ERROR)
}

/// Map a failed connection resolution.
pub fn connection_error(err: ConnectionError) -> Error {
    match err {
        ConnectionError::Validation(e) => bad_input(e.to_string()),
        ConnectionError::Adapter(e) => internal(&e),
    }
}

/// Map a storage error from a single-record read or a write.
pub fn storage_error(err: StorageError) -> Error {
    match err {
        StorageError::ConstraintViolation(msg) => bad_input(msg),
        other => internal(&other),
    }
}

/// Map a mutation error.
pub fn domain_error(err: DomainError) -> Error {
    match err {
        DomainError::Storage(e) => storage_error(e),
        other => bad_input(other.to_string()),
    }
}
