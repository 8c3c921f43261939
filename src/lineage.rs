//! Lineage grouping for `rbak log`.
//!
//! Snapshots are scanned from the highest number down. Each remaining
//! snapshot starts a group; its parent chain is walked against the full
//! store and every ancestor still waiting in the work-list joins that group.
//! A snapshot claimed by an earlier group is never reconsidered, so a chain
//! can be split when a lower branch shares ancestors with a higher one.

use std::collections::{HashSet, VecDeque};

use crate::error::{Error, Result};
use crate::store::{Catalog, Snapshot};

/// Point lookup used to walk parent chains.
pub trait SnapshotLookup {
    fn lookup(&self, number: i64) -> Result<Option<Snapshot>>;
}

impl SnapshotLookup for Catalog {
    fn lookup(&self, number: i64) -> Result<Option<Snapshot>> {
        self.get(number)
    }
}

impl SnapshotLookup for [Snapshot] {
    fn lookup(&self, number: i64) -> Result<Option<Snapshot>> {
        Ok(self.iter().find(|s| s.number == number).cloned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Head of the group first, then its ancestors, descending by number.
    pub snapshots: Vec<Snapshot>,
    /// `(child, parent)` where the parent walk hit a missing record.
    pub broken: Option<(i64, i64)>,
}

impl Group {
    pub fn numbers(&self) -> Vec<i64> {
        self.snapshots.iter().map(|s| s.number).collect()
    }

    pub fn broken_lineage(&self) -> Option<Error> {
        self.broken.map(|(child, parent)| Error::BrokenLineage { child, parent })
    }
}

struct Ancestry {
    numbers: HashSet<i64>,
    broken: Option<(i64, i64)>,
}

/// Partition `all` (ascending by number) into lineage groups, newest first.
pub fn group<L>(all: Vec<Snapshot>, lookup: &L) -> Result<Vec<Group>>
where
    L: SnapshotLookup + ?Sized,
{
    let mut work: VecDeque<Snapshot> = all.into_iter().rev().collect();
    let mut groups = Vec::new();

    while let Some(head) = work.pop_front() {
        let ancestry = ancestors(&head, lookup)?;
        if let Some((child, parent)) = ancestry.broken {
            tracing::debug!("snapshot {child} references missing parent {parent}");
        }

        let (found, rest): (VecDeque<Snapshot>, VecDeque<Snapshot>) = work
            .into_iter()
            .partition(|s| ancestry.numbers.contains(&s.number));

        let mut snapshots = Vec::with_capacity(found.len() + 1);
        snapshots.push(head);
        snapshots.extend(found);

        groups.push(Group {
            snapshots,
            broken: ancestry.broken,
        });
        work = rest;
    }

    Ok(groups)
}

/// Load every snapshot from the catalog and group it.
pub fn log(catalog: &Catalog) -> Result<Vec<Group>> {
    group(catalog.all()?, catalog)
}

fn ancestors<L>(snapshot: &Snapshot, lookup: &L) -> Result<Ancestry>
where
    L: SnapshotLookup + ?Sized,
{
    let mut numbers = HashSet::new();
    let mut child = snapshot.number;
    let mut next = snapshot.parent;

    while let Some(parent) = next {
        // parents are always older; anything else would loop
        if parent >= child {
            return Ok(Ancestry {
                numbers,
                broken: Some((child, parent)),
            });
        }

        let Some(record) = lookup.lookup(parent)? else {
            return Ok(Ancestry {
                numbers,
                broken: Some((child, parent)),
            });
        };

        numbers.insert(record.number);
        child = record.number;
        next = record.parent;
    }

    Ok(Ancestry { numbers, broken: None })
}
