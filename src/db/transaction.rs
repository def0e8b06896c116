//! Transaction coordinator
//!
//! A transaction batches inserts so index maintenance runs once instead
//! of per insert. The body receives an `Inserter`: a write-only view of
//! the primary collection with no way to reach the Index Manager, so
//! "no rebuilds inside a transaction" is enforced by the interface shape
//! rather than a runtime flag.
//!
//! Document writes themselves are not transactional. A failing body
//! leaves already-written documents in place and skips the rebuild;
//! durability is the substrate's job, this layer only defers index cost.

use serde_json::Value;

use crate::store::{Key, KvStore};

use super::errors::DbResult;

/// Write-only view of the primary collection handed to a transaction body.
pub struct Inserter<'a, S: KvStore> {
    primary: &'a mut S,
}

impl<'a, S: KvStore> Inserter<'a, S> {
    pub(crate) fn new(primary: &'a mut S) -> Self {
        Self { primary }
    }

    /// Upserts a document without touching any index.
    pub fn insert(&mut self, key: impl Into<Key>, document: Value) -> DbResult<()> {
        self.primary.put(&key.into(), &document)?;
        Ok(())
    }
}
