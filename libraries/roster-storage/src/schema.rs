//! Schema DDL and the fixed seed set

use crate::error::{Result, StorageError};

/// Longest identifier MySQL accepts
const MAX_IDENTIFIER_LEN: usize = 64;

/// `users` table definition. Idempotent.
pub const CREATE_USERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(100) NOT NULL UNIQUE,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// A sample row inserted at bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedUser {
    pub name: &'static str,
    pub email: &'static str,
}

/// Rows inserted once per email, however many times bootstrap runs
pub const SEED_USERS: [SeedUser; 3] = [
    SeedUser {
        name: "John Doe",
        email: "john@example.com",
    },
    SeedUser {
        name: "Jane Smith",
        email: "jane@example.com",
    },
    SeedUser {
        name: "Bob Johnson",
        email: "bob@example.com",
    },
];

/// Check that `name` is a plain unquoted MySQL identifier.
///
/// `CREATE DATABASE` cannot take bind parameters, so the configured name is
/// spliced into the statement and must be restricted to `[A-Za-z0-9_$]`.
pub fn validate_database_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= MAX_IDENTIFIER_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidIdentifier(name.to_string()))
    }
}

/// `CREATE DATABASE IF NOT EXISTS` for a validated name
pub fn create_database_statement(name: &str) -> Result<String> {
    validate_database_name(name)?;
    Ok(format!("CREATE DATABASE IF NOT EXISTS `{name}`"))
}
