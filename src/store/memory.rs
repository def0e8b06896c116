//! In-memory substrate
//!
//! Collections are shared across opens through the provider, so a posting
//! collection written during an index build is the same collection a later
//! search opens. Scans snapshot under the read lock; the snapshot is the
//! single-pass sequence the facade filters lazily.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::key::Key;
use super::kv::{KvStore, StoreProvider};

type SharedTree = Arc<RwLock<BTreeMap<Key, Value>>>;

/// One in-memory ordered collection.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tree: SharedTree,
}

impl MemoryStore {
    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, BTreeMap<Key, Value>>> {
        self.tree
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, BTreeMap<Key, Value>>> {
        self.tree
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &Key) -> StoreResult<Option<Value>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn put(&mut self, key: &Key, value: &Value) -> StoreResult<()> {
        self.write()?.insert(key.clone(), value.clone());
        Ok(())
    }

    fn delete(&mut self, key: &Key) -> StoreResult<()> {
        self.write()?.remove(key);
        Ok(())
    }

    fn scan(&self) -> StoreResult<Box<dyn Iterator<Item = (Key, Value)> + '_>> {
        let snapshot: Vec<(Key, Value)> = self
            .read()?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Box::new(snapshot.into_iter()))
    }

    fn scan_from(&self, start: &Key) -> StoreResult<Box<dyn Iterator<Item = (Key, Value)> + '_>> {
        let snapshot: Vec<(Key, Value)> = self
            .read()?
            .range(start.clone()..)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Box::new(snapshot.into_iter()))
    }
}

/// Opens in-memory collections by name, creating them on first open.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    collections: Arc<RwLock<HashMap<String, SharedTree>>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreProvider for MemoryProvider {
    type Store = MemoryStore;

    fn open(&self, name: &str) -> StoreResult<MemoryStore> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        let tree = collections.entry(name.to_string()).or_default().clone();
        Ok(MemoryStore { tree })
    }
}
