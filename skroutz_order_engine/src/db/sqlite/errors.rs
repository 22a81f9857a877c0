use thiserror::Error;

use crate::db::traits::{CatalogError, OrderStoreError, WebhookLogError};

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Cannot process duplicate order with unique id {0}")]
    DuplicateUniqueId(String),
    #[error("Stored record could not be decoded: {0}")]
    InvalidRecord(String),
}

impl From<SqliteDatabaseError> for OrderStoreError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::DuplicateUniqueId(uid) => OrderStoreError::DuplicateUniqueId(uid),
            other => OrderStoreError::DatabaseError(other.to_string()),
        }
    }
}

impl From<SqliteDatabaseError> for CatalogError {
    fn from(e: SqliteDatabaseError) -> Self {
        CatalogError::DatabaseError(e.to_string())
    }
}

impl From<SqliteDatabaseError> for WebhookLogError {
    fn from(e: SqliteDatabaseError) -> Self {
        WebhookLogError::DatabaseError(e.to_string())
    }
}

/// True when the error is a UNIQUE-constraint violation on the given table.
pub(crate) fn is_unique_violation(e: &sqlx::Error, table: &str) -> bool {
    match e {
        sqlx::Error::Database(db) => {
            let message = db.message();
            message.contains("UNIQUE constraint failed") && message.contains(table)
        },
        _ => false,
    }
}
