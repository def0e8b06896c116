//! Search subsystem for quilldb
//!
//! Equality and prefix lookups against one named index, resolved into
//! full documents via the primary collection.

mod engine;

pub use engine::{SearchEngine, SearchQuery};
