//! # Metadata Persistence
//!
//! One structured artifact per database instance: the index-definition
//! catalog. Read once at open, flushed after every index mutation, on
//! open, and on close. The persistence seam is a trait so tests can keep
//! the artifact in memory while embeddings write a JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::index::IndexDef;
use crate::store::{StoreError, StoreResult};

/// Instance metadata: the index catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Index definitions by index name
    pub indexes: BTreeMap<String, IndexDef>,
}

/// Trait for metadata persistence
pub trait MetadataStore {
    /// Read the artifact; `None` if it has never been written.
    fn load(&self) -> StoreResult<Option<Metadata>>;

    /// Write the full artifact to stable storage.
    fn flush(&self, metadata: &Metadata) -> StoreResult<()>;
}

/// In-memory metadata store for testing and ephemeral embedding
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadataStore {
    slot: Arc<RwLock<Option<Metadata>>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn load(&self) -> StoreResult<Option<Metadata>> {
        let slot = self
            .slot
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        Ok(slot.clone())
    }

    fn flush(&self, metadata: &Metadata) -> StoreResult<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;
        *slot = Some(metadata.clone());
        Ok(())
    }
}

/// File-backed metadata store: one JSON document, replaced atomically.
#[derive(Debug, Clone)]
pub struct FileMetadataStore {
    path: PathBuf,
}

impl FileMetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MetadataStore for FileMetadataStore {
    fn load(&self) -> StoreResult<Option<Metadata>> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::io(
                    format!("failed to read metadata {}", self.path.display()),
                    e,
                ))
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Serialization(format!("bad metadata artifact: {}", e)))
    }

    fn flush(&self, metadata: &Metadata) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::io(
                    format!("failed to create metadata directory {}", parent.display()),
                    e,
                )
            })?;
        }

        let bytes = serde_json::to_vec_pretty(metadata)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        // Write-then-rename so a crash never leaves a torn artifact.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)
            .map_err(|e| StoreError::io(format!("failed to write {}", tmp.display()), e))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StoreError::io(format!("failed to replace {}", self.path.display()), e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexKind;

    fn sample() -> Metadata {
        let mut metadata = Metadata::default();
        metadata.indexes.insert(
            "titles".to_string(),
            IndexDef {
                field: "title".to_string(),
                kind: IndexKind::Text,
            },
        );
        metadata
    }

    #[test]
    fn test_in_memory_roundtrip() {
        let store = InMemoryMetadataStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.flush(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileMetadataStore::new(dir.path().join("metadata.json"));

        assert_eq!(store.load().unwrap(), None);
        store.flush(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_artifact_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        let store = FileMetadataStore::new(&path);
        store.flush(&sample()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "indexes": {"titles": {"field": "title", "kind": "text"}}
            })
        );
    }
}
