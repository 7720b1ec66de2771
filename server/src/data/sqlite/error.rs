//! SQLite error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl SqliteError {
    /// Map unique-constraint violations to `Conflict`, pass everything else through
    pub fn from_write(e: sqlx::Error, what: &str) -> Self {
        match e.as_database_error() {
            Some(db) if db.is_unique_violation() => Self::Conflict(format!("{what} already exists")),
            _ => Self::Database(e),
        }
    }
}
