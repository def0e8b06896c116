//! # Index Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Index maintenance errors
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    #[error("Invalid index kind: {0} (expected \"text\" or \"number\")")]
    InvalidKind(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
