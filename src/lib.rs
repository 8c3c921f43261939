//! rbak: numbered snapshots of a working directory with lineage tracking.
//!
//! Each `backup` copies the working tree into `.rbak/<number>/` and records
//! the snapshot that was checked out at the time as its parent. `log` groups
//! the resulting forest into parent chains.

pub mod cli;
pub mod commands;
pub mod config;
pub mod copy;
pub mod diff;
pub mod error;
pub mod lineage;
pub mod report;
pub mod snapshot;
pub mod store;
