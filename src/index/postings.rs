//! Posting store adapter
//!
//! A thin protocol over one ordered collection per index: each entry maps
//! an indexed field value to the ordered list of primary keys whose
//! document carries that value. Lists are deduplicated by membership
//! check on append; first-appearance order is preserved and never
//! reordered. A lookup miss reads as an empty list and is never surfaced.

use serde_json::Value;

use crate::store::{Key, KvStore, StoreError, StoreResult};

/// Posting lists for one index, backed by an ordered collection.
pub struct Postings<S: KvStore> {
    store: S,
}

impl<S: KvStore> Postings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Posting list for one indexed value.
    pub fn list(&self, value: &Key) -> StoreResult<Vec<Key>> {
        match self.store.get(value)? {
            Some(raw) => decode_list(value, &raw),
            None => Ok(Vec::new()),
        }
    }

    /// Appends `primary` to the list under `value` unless already a
    /// member, persisting the updated list. Returns whether it changed.
    pub fn append(&mut self, value: &Key, primary: &Key) -> StoreResult<bool> {
        let mut list = self.list(value)?;
        if list.contains(primary) {
            return Ok(false);
        }
        list.push(primary.clone());
        self.store.put(value, &encode_list(&list))?;
        Ok(true)
    }

    /// Primary keys under every entry whose key carries `prefix`,
    /// concatenated in entry-key order.
    ///
    /// Seeks to the first key >= the prefix and walks forward until a key
    /// no longer matches; lexicographic key order guarantees nothing past
    /// that point can match.
    pub fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<Key>> {
        let mut keys = Vec::new();
        for (entry, raw) in self.store.scan_from(&Key::from(prefix))? {
            match entry.as_str() {
                Some(s) if s.starts_with(prefix) => keys.extend(decode_list(&entry, &raw)?),
                _ => break,
            }
        }
        Ok(keys)
    }

    /// Flush the underlying collection before the handle is released.
    pub fn sync(&mut self) -> StoreResult<()> {
        self.store.sync()
    }
}

fn encode_list(list: &[Key]) -> Value {
    Value::Array(list.iter().map(Key::to_json).collect())
}

fn decode_list(entry: &Key, raw: &Value) -> StoreResult<Vec<Key>> {
    let Some(items) = raw.as_array() else {
        return Err(StoreError::Serialization(format!(
            "posting list under '{}' is not an array",
            entry
        )));
    };
    items
        .iter()
        .map(|item| {
            Key::from_json(item).ok_or_else(|| {
                StoreError::Serialization(format!(
                    "posting list under '{}' holds a non-key entry",
                    entry
                ))
            })
        })
        .collect()
}
