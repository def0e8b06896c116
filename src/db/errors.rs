//! # Database Errors
//!
//! Unified error surface for the facade. Substrate, query, and index
//! failures pass through unchanged.

use thiserror::Error;

use crate::index::IndexError;
use crate::query::QueryError;
use crate::store::StoreError;

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Database operation errors
#[derive(Debug, Clone, Error)]
pub enum DbError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Database is closed")]
    Closed,

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
