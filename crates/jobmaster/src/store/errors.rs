use sea_orm::DbErr;
use thiserror::Error;

/// Errors raised while reading or writing the local store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// A record could not be stored as given.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl StoreError {
    pub(crate) fn empty_key(kind: &str) -> Self {
        Self::InvalidInput {
            message: format!("{kind} record has an empty external key"),
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
