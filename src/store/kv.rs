//! Substrate seams: the ordered key-value store and its provider
//!
//! The document store core never talks to files or memory directly; it
//! goes through `KvStore` for one collection and `StoreProvider` to open
//! collections by name (the primary collection, plus one posting
//! collection per index). Implementations must provide forward iteration
//! in key order and seek-to-key, which is everything prefix search needs.

use serde_json::Value;

use super::errors::StoreResult;
use super::key::Key;

/// One ordered key-value collection.
///
/// Writes are upserts. Deletes of missing keys are no-ops. Scans yield
/// entries in ascending key order.
pub trait KvStore {
    /// Point lookup.
    fn get(&self, key: &Key) -> StoreResult<Option<Value>>;

    /// Upsert.
    fn put(&mut self, key: &Key, value: &Value) -> StoreResult<()>;

    /// Remove a key.
    fn delete(&mut self, key: &Key) -> StoreResult<()>;

    /// Forward scan over the whole collection in key order.
    fn scan(&self) -> StoreResult<Box<dyn Iterator<Item = (Key, Value)> + '_>>;

    /// Forward scan starting at the first key >= `start`.
    fn scan_from(&self, start: &Key) -> StoreResult<Box<dyn Iterator<Item = (Key, Value)> + '_>>;

    /// Point lookups for many keys, preserving request order.
    fn get_many(&self, keys: &[Key]) -> StoreResult<Vec<Option<Value>>> {
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            out.push(self.get(key)?);
        }
        Ok(out)
    }

    /// Flush buffered writes to stable storage.
    fn sync(&mut self) -> StoreResult<()> {
        Ok(())
    }
}

/// Opens named collections.
///
/// Handles are transient: index builds and searches open a posting
/// collection, use it, and release it within the call.
pub trait StoreProvider {
    /// The collection type this provider opens.
    type Store: KvStore;

    /// Open (or create) the named collection.
    fn open(&self, name: &str) -> StoreResult<Self::Store>;
}
