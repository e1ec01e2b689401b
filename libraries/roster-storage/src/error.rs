/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// The server or database could not be reached
    #[error("Database connection error ({target}): {source}")]
    Connection {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    /// A step needed a connection that is not open
    #[error("No open {0} connection")]
    NotConnected(&'static str),

    /// The shared connection was closed during shutdown
    #[error("Database connection is closed")]
    ConnectionClosed,

    /// Database name that cannot be safely spliced into DDL
    #[error("Invalid database identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A value the store produced does not fit the domain type
    #[error("Query error: {0}")]
    Query(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a connection error for the given target
    pub fn connection(target: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Connection {
            target: target.into(),
            source,
        }
    }
}

impl From<StorageError> for roster_core::RosterError {
    fn from(err: StorageError) -> Self {
        roster_core::RosterError::storage(err.to_string())
    }
}
