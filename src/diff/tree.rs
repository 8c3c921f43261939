//! In-process tree comparison.
//!
//! Compares two directory trees file by file and reports changes:
//! - Matches entries by path relative to each root
//! - Content is compared byte for byte, symlinks by target
//! - Output mirrors `diff -rq`: `Only in ...` and `Files ... differ`

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::Differ;
use crate::copy::IgnoreSet;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum DiffType {
    Added,
    Removed,
    Modified,
}

#[derive(Debug, Clone)]
pub struct DiffEntry {
    pub path: PathBuf,
    pub diff_type: DiffType,
}

pub struct DiffResult {
    pub entries: Vec<DiffEntry>,
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File,
    Symlink(PathBuf),
}

pub struct TreeDiff {
    ignore: IgnoreSet,
}

impl TreeDiff {
    pub fn new(ignore: IgnoreSet) -> Self {
        TreeDiff { ignore }
    }
}

impl Differ for TreeDiff {
    fn compare(&self, from: &Path, to: &Path) -> Result<String> {
        let result = compare_trees(from, to, &self.ignore)?;
        Ok(render(&result))
    }
}

/// Relative path -> node kind for everything under `root`.
fn index_tree(root: &Path, ignore: &IgnoreSet) -> Result<BTreeMap<PathBuf, Node>> {
    let mut nodes = BTreeMap::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.depth() != 1 || !ignore.contains(e.file_name()));

    for entry in walker {
        let entry = entry.map_err(|e| Error::io(root, e.into()))?;
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path()).to_path_buf();

        let node = if entry.file_type().is_dir() {
            Node::Dir
        } else if entry.file_type().is_symlink() {
            let target = fs::read_link(entry.path()).map_err(|e| Error::io(entry.path(), e))?;
            Node::Symlink(target)
        } else {
            Node::File
        };
        nodes.insert(rel, node);
    }

    Ok(nodes)
}

fn same_content(a: &Path, b: &Path) -> Result<bool> {
    let meta_a = fs::metadata(a).map_err(|e| Error::io(a, e))?;
    let meta_b = fs::metadata(b).map_err(|e| Error::io(b, e))?;
    if meta_a.len() != meta_b.len() {
        return Ok(false);
    }

    let bytes_a = fs::read(a).map_err(|e| Error::io(a, e))?;
    let bytes_b = fs::read(b).map_err(|e| Error::io(b, e))?;
    Ok(bytes_a == bytes_b)
}

/// Compare two trees and produce diff entries sorted by relative path
pub fn compare_trees(from: &Path, to: &Path, ignore: &IgnoreSet) -> Result<DiffResult> {
    let from_map = index_tree(from, ignore)?;
    let to_map = index_tree(to, ignore)?;

    let mut entries = Vec::new();

    for (path, from_node) in &from_map {
        match to_map.get(path) {
            None => {
                // a removed directory is reported once, not per child
                if !has_reported_ancestor(&entries, path, &DiffType::Removed) {
                    entries.push(DiffEntry {
                        path: path.clone(),
                        diff_type: DiffType::Removed,
                    });
                }
            }
            Some(to_node) => {
                let modified = match (from_node, to_node) {
                    (Node::Dir, Node::Dir) => false,
                    (Node::File, Node::File) => !same_content(&from.join(path), &to.join(path))?,
                    (a, b) => a != b,
                };
                if modified {
                    entries.push(DiffEntry {
                        path: path.clone(),
                        diff_type: DiffType::Modified,
                    });
                }
            }
        }
    }

    for path in to_map.keys() {
        if !from_map.contains_key(path) && !has_reported_ancestor(&entries, path, &DiffType::Added) {
            entries.push(DiffEntry {
                path: path.clone(),
                diff_type: DiffType::Added,
            });
        }
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(DiffResult {
        entries,
        from: from.to_path_buf(),
        to: to.to_path_buf(),
    })
}

fn has_reported_ancestor(entries: &[DiffEntry], path: &Path, diff_type: &DiffType) -> bool {
    entries
        .iter()
        .any(|e| &e.diff_type == diff_type && path.starts_with(&e.path) && path != e.path)
}

pub fn render(result: &DiffResult) -> String {
    let mut output = String::new();

    for entry in &result.entries {
        let line = match entry.diff_type {
            DiffType::Removed => only_in(&result.from, &entry.path),
            DiffType::Added => only_in(&result.to, &entry.path),
            DiffType::Modified => format!(
                "Files {} and {} differ",
                result.from.join(&entry.path).display(),
                result.to.join(&entry.path).display()
            ),
        };
        output.push_str(&line);
        output.push('\n');
    }

    output
}

fn only_in(root: &Path, rel: &Path) -> String {
    let dir = match rel.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => root.join(parent),
        _ => root.to_path_buf(),
    };
    let name = rel.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    format!("Only in {}: {}", dir.display(), name)
}
