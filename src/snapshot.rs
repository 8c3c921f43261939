//! Capture and restore of snapshot directories.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::copy::{self, IgnoreSet};
use crate::error::{Error, Result};
use crate::store::{Catalog, HeadFile};

pub struct SnapshotManager {
    catalog: Catalog,
    head: HeadFile,
    root: PathBuf,
    storage: PathBuf,
    ignore: IgnoreSet,
}

impl SnapshotManager {
    pub fn new(catalog: Catalog, head: HeadFile, config: &Config) -> Self {
        SnapshotManager {
            catalog,
            head,
            root: config.root.clone(),
            storage: config.storage_dir(),
            ignore: config.ignore_set(),
        }
    }

    /// Create the storage root if needed and open the catalog and head pointer.
    pub fn open(config: &Config) -> Result<Self> {
        let storage = config.storage_dir();
        fs::create_dir_all(&storage).map_err(|e| Error::io(&storage, e))?;

        let catalog = Catalog::open(&config.catalog_path())?;
        let head = HeadFile::new(config.head_path());
        Ok(SnapshotManager::new(catalog, head, config))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn head(&self) -> &HeadFile {
        &self.head
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshot_dir(&self, number: i64) -> PathBuf {
        self.storage.join(number.to_string())
    }

    /// The snapshot directory for `number`, if it exists on disk.
    pub fn resolve(&self, number: i64) -> Result<PathBuf> {
        let dir = self.snapshot_dir(number);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(Error::NotFound(number))
        }
    }

    /// Record a new snapshot whose parent is the current head, then copy the
    /// working tree into its directory. Does not move the head.
    ///
    /// A failed copy leaves the record in place and returns `PartialCapture`.
    pub fn capture(&mut self, message: Option<&str>) -> Result<i64> {
        let mut parent = self.head.read()?;
        if let Some(head) = parent {
            if self.catalog.get(head)?.is_none() {
                tracing::warn!("head points at unknown snapshot {head}, capturing as a root");
                parent = None;
            }
        }

        let entries = copy::list_entries(&self.root, &self.ignore).map_err(|e| Error::io(&self.root, e))?;

        let number = self.catalog.insert(now(), message, parent)?;
        tracing::debug!(
            "recorded snapshot {number} (parent {parent:?}), copying {} entries",
            entries.len()
        );

        let dir = self.snapshot_dir(number);
        let stats = copy::copy_entries(&entries, &dir).map_err(|source| Error::PartialCapture { number, source })?;
        tracing::info!(
            "captured snapshot {number}: {} files, {} dirs, {} bytes",
            stats.files,
            stats.dirs,
            stats.bytes
        );

        Ok(number)
    }

    /// Copy a snapshot's directory back over the working tree. Does not move
    /// the head. Files not present in the snapshot are left untouched.
    pub fn restore(&self, number: i64) -> Result<()> {
        let dir = self.resolve(number)?;
        let stats = copy::copy_tree(&dir, &self.root, &IgnoreSet::empty()).map_err(|e| Error::io(&dir, e))?;
        tracing::info!("restored snapshot {number}: {} files", stats.files);
        Ok(())
    }

    pub fn latest_number(&self) -> Result<i64> {
        self.catalog
            .latest()?
            .map(|snapshot| snapshot.number)
            .ok_or(Error::EmptyCatalog)
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
