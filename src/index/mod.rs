//! Secondary indexes for quilldb
//!
//! An index is a named, persisted mapping from one document field's values
//! to posting lists: ordered, membership-deduplicated sequences of primary
//! keys. Maintenance is a full additive rebuild from a primary-store scan.
//!
//! # Design Principles
//!
//! - Derived state: postings mirror the primary collection, never the
//!   source of truth
//! - Additive: rebuilds append missing postings, they do not clear
//! - Transient handles: posting collections are opened per call

mod def;
mod errors;
mod manager;
mod postings;

pub use def::{IndexDef, IndexKind};
pub use errors::{IndexError, IndexResult};
pub use manager::{posting_collection, rebuild, IndexManager};
pub use postings::Postings;
