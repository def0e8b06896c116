//! Index definitions
//!
//! A definition names the indexed field and the kind deciding the
//! comparison semantics of the posting-collection keys. Definitions are
//! what the metadata artifact persists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::IndexError;

/// Comparison semantics of an index's posting keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Lexicographically ordered string values
    Text,
    /// Numerically ordered values
    Number,
}

impl IndexKind {
    /// Returns the canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Text => "text",
            IndexKind::Number => "number",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IndexKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, IndexError> {
        if s.eq_ignore_ascii_case("text") {
            Ok(IndexKind::Text)
        } else if s.eq_ignore_ascii_case("number") {
            Ok(IndexKind::Number)
        } else {
            Err(IndexError::InvalidKind(s.to_string()))
        }
    }
}

/// A persisted index definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    /// Top-level document field projected into the index
    pub field: String,
    /// Posting-key comparison semantics
    pub kind: IndexKind,
}
