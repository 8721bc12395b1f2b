//! Console error types.

use thiserror::Error;

use crate::models::{EntityKind, RecordId};

/// Errors raised by console operations.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The submitted email/password pair did not match.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An operation that needs a signed-in user was attempted without one.
    #[error("Not signed in")]
    NotAuthenticated,

    /// A form failed validation.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// No record with the given identity exists in the store.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: RecordId },

    /// The editor was submitted while closed.
    #[error("No form is open")]
    EditorClosed,

    /// A string did not name a known enum value.
    #[error("Invalid {what}: {value}")]
    InvalidValue { what: &'static str, value: String },

    /// Writing an export artifact failed.
    #[error("Export failed: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing an export artifact failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConsoleError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ConsoleError::Validation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_value(what: &'static str, value: &str) -> Self {
        ConsoleError::InvalidValue {
            what,
            value: value.to_string(),
        }
    }
}

/// Result type for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
