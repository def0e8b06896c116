//! Observability subsystem for quilldb
//!
//! Structured JSON logging only. Observability is read-only: no side
//! effects on execution, no async, no background threads, deterministic
//! output.

mod logger;

pub use logger::{Logger, Severity};
