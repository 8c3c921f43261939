//! One function per CLI command.
//!
//! State-changing commands move the head pointer only as their last step,
//! after the snapshot work succeeded.

use std::path::PathBuf;

use crate::diff::{Differ, Target};
use crate::error::Result;
use crate::lineage::{self, Group};
use crate::snapshot::SnapshotManager;

pub fn backup(manager: &mut SnapshotManager, message: Option<&str>) -> Result<i64> {
    let number = manager.capture(message)?;
    manager.head().write(number)?;
    Ok(number)
}

pub fn checkout(manager: &SnapshotManager, number: i64) -> Result<()> {
    manager.restore(number)?;
    manager.head().write(number)
}

pub fn latest(manager: &SnapshotManager) -> Result<i64> {
    let number = manager.latest_number()?;
    checkout(manager, number)?;
    Ok(number)
}

pub fn status(manager: &SnapshotManager) -> Result<Option<i64>> {
    manager.head().read()
}

pub fn log(manager: &SnapshotManager) -> Result<Vec<Group>> {
    lineage::log(manager.catalog())
}

/// Resolve both sides and hand them to the differ. `to` defaults to the
/// working tree.
pub fn diff(manager: &SnapshotManager, differ: &dyn Differ, from: i64, to: Option<&str>) -> Result<String> {
    let from_dir = manager.resolve(from)?;
    let to_dir: PathBuf = match to.map(Target::parse) {
        None => manager.root().to_path_buf(),
        Some(Target::Snapshot(number)) => manager.resolve(number)?,
        Some(Target::Path(path)) => path,
    };

    differ.compare(&from_dir, &to_dir)
}
