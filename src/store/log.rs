//! Durable substrate: append-only log collections
//!
//! Each collection is one log file. Writes append a checksummed record and
//! fsync before returning; opening a collection replays the log into an
//! in-memory ordered table, with the latest record for a key winning and
//! tombstones dropping it. Any checksum failure during replay halts the
//! open with the offending offset.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::key::Key;
use super::kv::{KvStore, StoreProvider};
use super::record::{LogRecord, MIN_RECORD_SIZE};

/// One log-backed ordered collection.
pub struct LogStore {
    path: PathBuf,
    file: File,
    table: BTreeMap<Key, Value>,
}

impl LogStore {
    /// Opens (or creates) the log at `path` and replays it.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let table = Self::replay(&path)?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::io(format!("failed to open log {}", path.display()), e))?;

        Ok(Self { path, file, table })
    }

    /// Returns the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rebuilds the ordered table by scanning the log from the start.
    fn replay(path: &Path) -> StoreResult<BTreeMap<Key, Value>> {
        let mut table = BTreeMap::new();

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(table),
            Err(e) => {
                return Err(StoreError::io(
                    format!("failed to open log {}", path.display()),
                    e,
                ))
            }
        };

        let file_size = file
            .metadata()
            .map_err(|e| StoreError::io("failed to read log metadata", e))?
            .len();

        let mut reader = BufReader::new(file);
        let mut offset = 0u64;

        while offset < file_size {
            let remaining = file_size - offset;
            if remaining < MIN_RECORD_SIZE as u64 {
                return Err(StoreError::corruption(
                    offset,
                    format!(
                        "truncated log: {} bytes remaining, minimum record size is {}",
                        remaining, MIN_RECORD_SIZE
                    ),
                ));
            }

            let mut len_buf = [0u8; 4];
            reader
                .read_exact(&mut len_buf)
                .map_err(|e| StoreError::corruption(offset, format!("failed to read record length: {}", e)))?;
            let record_length = u32::from_le_bytes(len_buf) as u64;

            if record_length < MIN_RECORD_SIZE as u64 || record_length > remaining {
                return Err(StoreError::corruption(
                    offset,
                    format!("invalid record length: {}", record_length),
                ));
            }

            let mut record_buf = vec![0u8; record_length as usize];
            record_buf[0..4].copy_from_slice(&len_buf);
            reader
                .read_exact(&mut record_buf[4..])
                .map_err(|e| StoreError::corruption(offset, format!("failed to read record: {}", e)))?;

            let (record, consumed) = LogRecord::deserialize(&record_buf)
                .map_err(|e| StoreError::corruption(offset, e.to_string()))?;

            if record.is_tombstone {
                table.remove(&record.key);
            } else {
                let value: Value = serde_json::from_slice(&record.payload)
                    .map_err(|e| StoreError::corruption(offset, format!("bad value payload: {}", e)))?;
                table.insert(record.key, value);
            }

            offset += consumed as u64;
        }

        Ok(table)
    }

    fn append(&mut self, record: &LogRecord) -> StoreResult<()> {
        self.file
            .write_all(&record.serialize())
            .map_err(|e| StoreError::io("log append failed", e))?;
        // A write is durable once it returns.
        self.file
            .sync_all()
            .map_err(|e| StoreError::io("log fsync failed", e))?;
        Ok(())
    }
}

impl KvStore for LogStore {
    fn get(&self, key: &Key) -> StoreResult<Option<Value>> {
        Ok(self.table.get(key).cloned())
    }

    fn put(&mut self, key: &Key, value: &Value) -> StoreResult<()> {
        let payload =
            serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.append(&LogRecord::live(key.clone(), payload))?;
        self.table.insert(key.clone(), value.clone());
        Ok(())
    }

    fn delete(&mut self, key: &Key) -> StoreResult<()> {
        if self.table.remove(key).is_some() {
            self.append(&LogRecord::tombstone(key.clone()))?;
        }
        Ok(())
    }

    fn scan(&self) -> StoreResult<Box<dyn Iterator<Item = (Key, Value)> + '_>> {
        Ok(Box::new(
            self.table.iter().map(|(k, v)| (k.clone(), v.clone())),
        ))
    }

    fn scan_from(&self, start: &Key) -> StoreResult<Box<dyn Iterator<Item = (Key, Value)> + '_>> {
        Ok(Box::new(
            self.table
                .range(start.clone()..)
                .map(|(k, v)| (k.clone(), v.clone())),
        ))
    }

    fn sync(&mut self) -> StoreResult<()> {
        self.file
            .sync_all()
            .map_err(|e| StoreError::io("log fsync failed", e))
    }
}

/// Opens log-backed collections under a root directory.
///
/// Creates the root on first open. Collection names become file names, so
/// anything that could escape the root is rejected.
#[derive(Debug, Clone)]
pub struct DiskProvider {
    root: PathBuf,
}

impl DiskProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn validate_name(name: &str) -> StoreResult<()> {
        let ok = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if ok {
            Ok(())
        } else {
            Err(StoreError::InvalidName(name.to_string()))
        }
    }
}

impl StoreProvider for DiskProvider {
    type Store = LogStore;

    fn open(&self, name: &str) -> StoreResult<LogStore> {
        Self::validate_name(name)?;
        fs::create_dir_all(&self.root).map_err(|e| {
            StoreError::io(
                format!("failed to create data directory {}", self.root.display()),
                e,
            )
        })?;
        LogStore::open(self.root.join(format!("{}.qlog", name)))
    }
}
