use thiserror::Error;

#[derive(Error, Debug)]
pub enum PennyError {
    /// Malformed or constraint-violating input: unknown enum value,
    /// non-positive amount, self-transfer, mismatched category type.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A referenced id does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation is invalid for the entity's current state.
    #[error("Invalid state: {0}")]
    State(String),

    /// Duplicate unique key: account name collision, reminder already logged.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, PennyError>;
