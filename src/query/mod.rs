//! Query language for quilldb
//!
//! Queries are JSON expression trees: field predicates
//! (`{"field": {"$eq": …}}`) combined with AND semantics, and the `$or`
//! combinator over sub-queries. The matcher is stateless; the facade
//! composes it with a primary-store scan to implement `find`.

mod errors;
mod matcher;

pub use errors::{QueryError, QueryResult};
pub use matcher::{evaluate, matches, OR};
