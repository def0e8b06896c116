//! # Store Errors

use thiserror::Error;

/// Result type for substrate operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Ordered key-value substrate errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Corrupt record at offset {offset}: {reason}")]
    Corruption { offset: u64, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid collection name: {0}")]
    InvalidName(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Wrap an I/O failure with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io(format!("{}: {}", context.into(), source))
    }

    /// Create a corruption error pinned to a log offset
    pub fn corruption(offset: u64, reason: impl Into<String>) -> Self {
        Self::Corruption {
            offset,
            reason: reason.into(),
        }
    }
}
