use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::copy::IgnoreSet;
use crate::error::{Error, Result};

/// Hidden storage root at the top of the working tree.
pub const STORAGE_DIR: &str = ".rbak";
pub const CATALOG_FILE: &str = "backups.db";
pub const HEAD_FILE: &str = "HEAD";
pub const CONFIG_FILE: &str = "config.toml";

/// Version-control metadata directories never captured.
const VCS_DIRS: [&str; 3] = [".git", ".hg", ".svn"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffTool {
    External,
    Builtin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffConfig {
    pub tool: DiffTool,
    pub command: Vec<String>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        DiffConfig {
            tool: DiffTool::External,
            command: vec!["diff".to_string(), "-ru".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Working tree being snapshotted.
    pub root: PathBuf,
    /// Extra top-level names to skip on capture, on top of the fixed set.
    pub ignore: Vec<String>,
    pub diff: DiffConfig,
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    ignore: Option<Vec<String>>,
    diff: Option<FileDiffConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileDiffConfig {
    tool: Option<DiffTool>,
    command: Option<Vec<String>>,
}

impl Config {
    /// Defaults only, no config files consulted.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Config {
            root: root.into(),
            ignore: Vec::new(),
            diff: DiffConfig::default(),
        }
    }

    /// Defaults overlaid with the user config, then the tree's `.rbak/config.toml`.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let mut config = Config::for_root(root);

        if let Some(user_file) = user_config_path() {
            config.apply_file(&user_file)?;
        }
        let tree_file = config.storage_dir().join(CONFIG_FILE);
        config.apply_file(&tree_file)?;

        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(Error::io(path, e)),
        };

        let file: FileConfig = toml::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded config from {}", path.display());
        self.apply(file);
        Ok(())
    }

    fn apply(&mut self, file: FileConfig) {
        if let Some(ignore) = file.ignore {
            self.ignore = ignore;
        }
        if let Some(diff) = file.diff {
            if let Some(tool) = diff.tool {
                self.diff.tool = tool;
            }
            if let Some(command) = diff.command.filter(|c| !c.is_empty()) {
                self.diff.command = command;
            }
        }
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.root.join(STORAGE_DIR)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.storage_dir().join(CATALOG_FILE)
    }

    pub fn head_path(&self) -> PathBuf {
        self.storage_dir().join(HEAD_FILE)
    }

    pub fn snapshot_dir(&self, number: i64) -> PathBuf {
        self.storage_dir().join(number.to_string())
    }

    /// Names excluded when enumerating the working tree for capture.
    pub fn ignore_set(&self) -> IgnoreSet {
        let mut names: Vec<OsString> = vec![".".into(), "..".into(), STORAGE_DIR.into()];
        names.extend(VCS_DIRS.iter().map(OsString::from));
        names.extend(self.ignore.iter().map(OsString::from));
        IgnoreSet::new(names)
    }
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "rbak").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
