//! The `HEAD` pointer file: the number of the snapshot currently checked out.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct HeadFile {
    path: PathBuf,
}

impl HeadFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HeadFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when never written. Unparseable or non-positive content also
    /// reads as unset, with a warning.
    pub fn read(&self) -> Result<Option<i64>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        match content.trim().parse::<i64>() {
            Ok(number) if number > 0 => Ok(Some(number)),
            _ => {
                tracing::warn!(
                    "ignoring invalid head pointer {:?} in {}",
                    content.trim(),
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    /// Overwrite the pointer. Written to a sibling file first, then renamed.
    pub fn write(&self, number: i64) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, number.to_string()).map_err(|e| Error::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| Error::io(&self.path, e))?;
        tracing::debug!("head -> {number}");
        Ok(())
    }
}
