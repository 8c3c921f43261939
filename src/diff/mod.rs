//! Comparison of two trees for `rbak diff`.
//!
//! The command only resolves snapshot numbers to directories; the comparison
//! itself is done by a `Differ`:
//! - `ExternalDiff` shells out to a configured diff program
//! - `TreeDiff` compares in process

pub mod external;
pub mod tree;

use std::path::{Path, PathBuf};

use crate::config::{Config, DiffTool};
use crate::error::Result;

pub use external::ExternalDiff;
pub use tree::TreeDiff;

pub trait Differ {
    /// Textual report of the differences between two paths. Empty when equal.
    fn compare(&self, from: &Path, to: &Path) -> Result<String>;
}

/// The differ selected by configuration.
pub fn from_config(config: &Config) -> Box<dyn Differ> {
    match config.diff.tool {
        DiffTool::External => Box::new(ExternalDiff::new(config.diff.command.clone(), config.ignore_set())),
        DiffTool::Builtin => Box::new(TreeDiff::new(config.ignore_set())),
    }
}

/// Second `diff` argument: a snapshot number or a literal path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Snapshot(i64),
    Path(PathBuf),
}

impl Target {
    pub fn parse(arg: &str) -> Self {
        match arg.parse::<i64>() {
            Ok(number) => Target::Snapshot(number),
            Err(_) => Target::Path(PathBuf::from(arg)),
        }
    }
}
