//! Error taxonomy for every rbak command.
//!
//! Nothing here is retried: all operations are local filesystem or catalog
//! work, so each error surfaces to the command layer as a user-visible message.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The catalog could not be opened, read or written.
    #[error("catalog unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    /// No record or snapshot directory exists for this number.
    #[error("snapshot {0} not found")]
    NotFound(i64),

    /// `latest` was asked for on a catalog with no snapshots.
    #[error("no snapshots yet, run 'rbak backup' first")]
    EmptyCatalog,

    /// A parent reference points at a record that does not exist.
    #[error("snapshot {child} references missing parent {parent}")]
    BrokenLineage { child: i64, parent: i64 },

    /// The record was inserted but the tree copy failed. The record is kept.
    #[error("snapshot {number} was recorded but copying the working tree failed: {source}")]
    PartialCapture {
        number: i64,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("diff failed: {0}")]
    Diff(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
