//! Storage error types.

use parana_commerce::CommerceError;
use thiserror::Error;

/// Errors raised by the SQLite layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database.
    #[error("Failed to open database: {0}")]
    Open(String),

    /// Failed to execute a statement or query.
    #[error("Query execution failed: {0}")]
    Query(String),

    /// A stored value could not be mapped back into a domain type.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Query(e.to_string())
    }
}

impl From<StoreError> for CommerceError {
    fn from(e: StoreError) -> Self {
        CommerceError::Storage(e.to_string())
    }
}
