use coursehub_core::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was hit; carries the offending column.
    #[error("duplicate value for {0}")]
    UniqueViolation(&'static str),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::internal(err)
    }
}
