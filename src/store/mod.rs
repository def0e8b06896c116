//! Ordered key-value substrate for quilldb
//!
//! The document store core is written against two seams: `KvStore` (one
//! ordered collection) and `StoreProvider` (collections opened by name).
//! Two substrates ship with the crate:
//!
//! - `MemoryProvider` / `MemoryStore` — ordered in-memory collections,
//!   shared across opens, for tests and ephemeral embedding
//! - `DiskProvider` / `LogStore` — append-only checksummed log files
//!   replayed into an ordered table on open
//!
//! # Invariants Enforced
//!
//! - Scans yield entries in ascending key order
//! - A write is durable once `put` returns (log substrate fsyncs)
//! - Checksum failure during replay halts the open

mod errors;
mod key;
mod kv;
mod log;
mod memory;
mod record;

pub use errors::{StoreError, StoreResult};
pub use key::Key;
pub use kv::{KvStore, StoreProvider};
pub use log::{DiskProvider, LogStore};
pub use memory::{MemoryProvider, MemoryStore};
pub use record::{compute_checksum, LogRecord};
