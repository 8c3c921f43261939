//! Persistent state under `.rbak/`.
//!
//! - catalog: SQLite table of snapshot records (number, created, message, parent)
//! - head: plain-text pointer to the snapshot currently checked out
//!
//! Supports:
//! - Inserting a record with a durable, never-reused number
//! - Point lookup, ordered full scan and latest lookup
//! - Reading and overwriting the head pointer

pub mod catalog;
pub mod head;

pub use catalog::{Catalog, Snapshot};
pub use head::HeadFile;
