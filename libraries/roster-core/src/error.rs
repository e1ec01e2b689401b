/// Core error types for Roster
use crate::types::UserId;
use thiserror::Error;

/// Result type alias using `RosterError`
pub type Result<T> = std::result::Result<T, RosterError>;

/// Core error type for Roster
#[derive(Error, Debug)]
pub enum RosterError {
    /// A required field was missing or blank
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No row matched the requested id
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Query or connection failure in the backing store
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RosterError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Whether this error means "no such user"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }
}
