//! Document store facade
//!
//! `Database` owns the primary collection handle and the metadata; every
//! other component is reached through it. Mutating operations take
//! `&mut self`, which is the crate's whole concurrency story: the caller
//! serializes access, the borrow checker enforces it.
//!
//! Unguarded inserts trigger a full rebuild of every registered index.
//! `transaction` defers that cost to one rebuild per index at commit.

use std::path::PathBuf;

use serde_json::Value;

use crate::index::IndexManager;
use crate::observability::Logger;
use crate::query;
use crate::search::{SearchEngine, SearchQuery};
use crate::store::{
    DiskProvider, Key, KvStore, MemoryProvider, StoreProvider,
};

use super::errors::{DbError, DbResult};
use super::metadata::{FileMetadataStore, InMemoryMetadataStore, Metadata, MetadataStore};
use super::transaction::Inserter;

/// Name of the primary collection.
pub const PRIMARY_COLLECTION: &str = "primary";

/// File name of the metadata artifact for disk-backed databases.
pub const METADATA_FILE: &str = "metadata.json";

/// An embeddable document store over an ordered key-value substrate.
pub struct Database<P: StoreProvider, M: MetadataStore> {
    provider: P,
    meta_store: M,
    primary: Option<P::Store>,
    metadata: Metadata,
}

impl Database<MemoryProvider, InMemoryMetadataStore> {
    /// A database over in-memory collections. Still needs `open`.
    pub fn in_memory() -> Self {
        Self::new(MemoryProvider::new(), InMemoryMetadataStore::new())
    }
}

impl Database<DiskProvider, FileMetadataStore> {
    /// A database rooted at a directory of log-backed collections.
    pub fn at_path(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let meta_store = FileMetadataStore::new(dir.join(METADATA_FILE));
        Self::new(DiskProvider::new(dir), meta_store)
    }
}

impl<P: StoreProvider, M: MetadataStore> Database<P, M> {
    /// Builds a closed database over the given substrate seams.
    pub fn new(provider: P, meta_store: M) -> Self {
        Self {
            provider,
            meta_store,
            primary: None,
            metadata: Metadata::default(),
        }
    }

    /// Opens the primary collection and loads the metadata artifact,
    /// creating an empty one when none exists. Metadata is flushed even
    /// when unchanged, so the on-disk artifact exists deterministically
    /// after open.
    pub fn open(&mut self) -> DbResult<()> {
        if self.primary.is_none() {
            self.primary = Some(self.provider.open(PRIMARY_COLLECTION)?);
        }
        self.metadata = self.meta_store.load()?.unwrap_or_default();
        self.meta_store.flush(&self.metadata)?;

        Logger::info(
            "DB_OPEN",
            &[("indexes", &self.metadata.indexes.len().to_string())],
        );
        Ok(())
    }

    /// Flushes metadata and releases the primary handle. No operation is
    /// valid afterwards until `open` is called again.
    pub fn close(&mut self) -> DbResult<()> {
        self.meta_store.flush(&self.metadata)?;
        if let Some(mut primary) = self.primary.take() {
            primary.sync()?;
        }
        Logger::info("DB_CLOSE", &[]);
        Ok(())
    }

    /// Whether the primary handle is currently open.
    pub fn is_open(&self) -> bool {
        self.primary.is_some()
    }

    /// The registered index definitions.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn primary(&self) -> DbResult<&P::Store> {
        self.primary.as_ref().ok_or(DbError::Closed)
    }

    /// Upserts a document, then rebuilds every registered index.
    pub fn insert(&mut self, key: impl Into<Key>, document: Value) -> DbResult<()> {
        let key = key.into();
        let primary = self.primary.as_mut().ok_or(DbError::Closed)?;
        primary.put(&key, &document)?;

        let primary = self.primary.as_ref().ok_or(DbError::Closed)?;
        IndexManager::rebuild_all(&self.provider, primary, &self.metadata)?;
        Ok(())
    }

    /// Point lookup; a miss is `NotFound`.
    pub fn get(&self, key: impl Into<Key>) -> DbResult<Value> {
        let key = key.into();
        self.primary()?
            .get(&key)?
            .ok_or_else(|| DbError::NotFound(key.to_string()))
    }

    /// Lazy, single-pass, forward-ordered scan of the primary collection
    /// filtered by the predicate matcher. Each call produces a fresh
    /// sequence; a query-shape error aborts the one being consumed.
    pub fn find(&self, query: Value) -> DbResult<Find<'_>> {
        let scan = self.primary()?.scan()?;
        Ok(Find {
            scan,
            query,
            done: false,
        })
    }

    /// Creates (or idempotently rebuilds) a named index over one
    /// top-level field. `kind` is `"text"` or `"number"`.
    pub fn create_index(&mut self, name: &str, field: &str, kind: &str) -> DbResult<()> {
        let primary = self.primary.as_ref().ok_or(DbError::Closed)?;
        IndexManager::create(
            &self.provider,
            &self.meta_store,
            &mut self.metadata,
            primary,
            name,
            field,
            kind,
        )?;
        Ok(())
    }

    /// Resolves an equality/prefix query against one index's postings,
    /// then resolves the accumulated keys into documents.
    pub fn search(&self, index: &str, query: &SearchQuery) -> DbResult<Vec<Value>> {
        let primary = self.primary()?;
        Ok(SearchEngine::search(&self.provider, primary, index, query)?)
    }

    /// Runs `body` against a write-only view of the primary collection,
    /// deferring index maintenance to a single rebuild per index after
    /// the body returns. A body error skips the rebuild; documents it
    /// already wrote remain.
    pub fn transaction<T, F>(&mut self, body: F) -> DbResult<T>
    where
        F: FnOnce(&mut Inserter<'_, P::Store>) -> DbResult<T>,
    {
        let out = {
            let primary = self.primary.as_mut().ok_or(DbError::Closed)?;
            let mut view = Inserter::new(primary);
            body(&mut view)?
        };

        let primary = self.primary.as_ref().ok_or(DbError::Closed)?;
        IndexManager::rebuild_all(&self.provider, primary, &self.metadata)?;

        Logger::info(
            "TX_COMMIT",
            &[("indexes", &self.metadata.indexes.len().to_string())],
        );
        Ok(out)
    }
}

/// Lazy sequence produced by [`Database::find`].
pub struct Find<'a> {
    scan: Box<dyn Iterator<Item = (Key, Value)> + 'a>,
    query: Value,
    done: bool,
}

impl Iterator for Find<'_> {
    type Item = DbResult<(Key, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let Some((key, document)) = self.scan.next() else {
                self.done = true;
                return None;
            };
            match query::matches(&self.query, &document) {
                Ok(true) => return Some(Ok((key, document))),
                Ok(false) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
