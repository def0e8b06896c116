//! Database facade for quilldb
//!
//! Owns the primary collection and the metadata artifact, and wires the
//! matcher, index manager, and search engine into one public surface:
//! `open`, `close`, `insert`, `get`, `find`, `create_index`, `search`,
//! `transaction`.

mod database;
mod errors;
pub mod metadata;
mod transaction;

pub use database::{Database, Find, METADATA_FILE, PRIMARY_COLLECTION};
pub use errors::{DbError, DbResult};
pub use metadata::{FileMetadataStore, InMemoryMetadataStore, Metadata, MetadataStore};
pub use transaction::Inserter;
