//! # Query Errors

use thiserror::Error;

/// Result type for query evaluation
pub type QueryResult<T> = Result<T, QueryError>;

/// Query evaluation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Invalid query shape: {0}")]
    InvalidShape(String),
}

impl QueryError {
    /// `$or` carried something other than an array of sub-queries.
    pub fn or_expects_array() -> Self {
        Self::InvalidShape("$or expects an array of sub-queries".to_string())
    }

    /// A field predicate carried an array instead of an operator object.
    pub fn predicate_is_array(field: &str) -> Self {
        Self::InvalidShape(format!(
            "predicate for field '{}' must not be an array",
            field
        ))
    }
}
