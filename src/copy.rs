//! Recursive tree copy used by capture and restore.
//!
//! Copies every top-level entry of a source directory (minus an ignore set)
//! into a destination, preserving names and structure. Existing files at the
//! same relative path are overwritten, replacing a directory with a file (or
//! the reverse) when the type changed; anything else in the destination is
//! left alone.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Top-level names skipped when enumerating a tree.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    names: Vec<OsString>,
}

impl IgnoreSet {
    pub fn new(names: Vec<OsString>) -> Self {
        IgnoreSet { names }
    }

    pub fn empty() -> Self {
        IgnoreSet::default()
    }

    pub fn contains(&self, name: &OsStr) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &OsStr> {
        self.names.iter().map(OsString::as_os_str)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub files: u64,
    pub dirs: u64,
    pub symlinks: u64,
    pub bytes: u64,
}

/// Top-level entries of `dir` that are not ignored, sorted by name.
pub fn list_entries(dir: &Path, ignore: &IgnoreSet) -> io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if ignore.contains(&entry.file_name()) {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

/// Copy each path in `entries` (recursively) into `dest`.
pub fn copy_entries(entries: &[PathBuf], dest: &Path) -> io::Result<CopyStats> {
    let mut stats = CopyStats::default();
    fs::create_dir_all(dest)?;

    for entry in entries {
        let Some(parent) = entry.parent() else { continue };

        // a symlinked top-level entry is copied as a link, never walked into
        let walker = WalkDir::new(entry).follow_links(false).follow_root_links(false);

        for item in walker {
            let item = item.map_err(io::Error::from)?;
            let rel = item
                .path()
                .strip_prefix(parent)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let target = dest.join(rel);
            let file_type = item.file_type();
            let existing = fs::symlink_metadata(&target).ok().map(|m| m.file_type());

            if file_type.is_dir() {
                if existing.is_some_and(|t| !t.is_dir()) {
                    fs::remove_file(&target)?;
                }
                fs::create_dir_all(&target)?;
                stats.dirs += 1;
            } else {
                match existing {
                    Some(t) if t.is_dir() => fs::remove_dir_all(&target)?,
                    // fs::copy would write through a symlink left at the target
                    Some(t) if t.is_symlink() || file_type.is_symlink() => fs::remove_file(&target)?,
                    _ => {}
                }

                if file_type.is_symlink() {
                    copy_symlink(item.path(), &target)?;
                    stats.symlinks += 1;
                } else {
                    stats.bytes += fs::copy(item.path(), &target)?;
                    stats.files += 1;
                }
            }
        }
    }

    Ok(stats)
}

/// Copy the contents of `src` into `dest`, skipping ignored top-level names.
pub fn copy_tree(src: &Path, dest: &Path, ignore: &IgnoreSet) -> io::Result<CopyStats> {
    let entries = list_entries(src, ignore)?;
    copy_entries(&entries, dest)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, target: &Path) -> io::Result<()> {
    let link = fs::read_link(src)?;
    std::os::unix::fs::symlink(link, target)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, target: &Path) -> io::Result<()> {
    // no portable symlink creation, copy what it points at instead
    if fs::metadata(src)?.is_dir() {
        tracing::warn!("skipping directory symlink {}", src.display());
        return Ok(());
    }
    fs::copy(src, target).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn copies_nested_structure() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(&src.path().join("a.txt"), "alpha");
        write(&src.path().join("dir/b.txt"), "beta");
        write(&src.path().join("dir/deeper/c.txt"), "gamma");

        let stats = copy_tree(src.path(), dest.path(), &IgnoreSet::empty()).unwrap();

        assert_eq!(fs::read_to_string(dest.path().join("a.txt")).unwrap(), "alpha");
        assert_eq!(fs::read_to_string(dest.path().join("dir/b.txt")).unwrap(), "beta");
        assert_eq!(fs::read_to_string(dest.path().join("dir/deeper/c.txt")).unwrap(), "gamma");
        assert_eq!(stats.files, 3);
        assert_eq!(stats.dirs, 2);
        assert_eq!(stats.bytes, 14);
    }

    #[test]
    fn ignored_top_level_names_are_skipped() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(&src.path().join(".rbak/HEAD"), "1");
        write(&src.path().join(".git/config"), "");
        write(&src.path().join("keep.txt"), "k");
        write(&src.path().join("nested/.git"), "gitdir: elsewhere");

        let ignore = IgnoreSet::new(vec![".rbak".into(), ".git".into()]);
        copy_tree(src.path(), dest.path(), &ignore).unwrap();

        assert!(!dest.path().join(".rbak").exists());
        assert!(!dest.path().join(".git").exists());
        assert!(dest.path().join("keep.txt").exists());
        // only top-level names are matched
        assert!(dest.path().join("nested/.git").exists());
    }

    #[test]
    fn overwrites_same_path_and_leaves_unrelated_files() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(&src.path().join("shared.txt"), "from snapshot");
        write(&dest.path().join("shared.txt"), "local edit");
        write(&dest.path().join("untracked.txt"), "still here");

        copy_tree(src.path(), dest.path(), &IgnoreSet::empty()).unwrap();

        assert_eq!(fs::read_to_string(dest.path().join("shared.txt")).unwrap(), "from snapshot");
        assert_eq!(fs::read_to_string(dest.path().join("untracked.txt")).unwrap(), "still here");
    }

    #[test]
    fn list_entries_is_sorted_and_filtered() {
        let src = TempDir::new().unwrap();
        write(&src.path().join("b"), "");
        write(&src.path().join("a"), "");
        write(&src.path().join(".rbak/x"), "");

        let ignore = IgnoreSet::new(vec![".rbak".into()]);
        let names: Vec<_> = list_entries(src.path(), &ignore)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_recreated_not_followed() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(&src.path().join("real.txt"), "target");
        std::os::unix::fs::symlink("real.txt", src.path().join("link.txt")).unwrap();

        let stats = copy_tree(src.path(), dest.path(), &IgnoreSet::empty()).unwrap();

        let link = dest.path().join("link.txt");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("real.txt"));
        assert_eq!(stats.symlinks, 1);
    }

    #[cfg(unix)]
    #[test]
    fn relative_directory_symlink_is_copied_as_link() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(&src.path().join("real/f.txt"), "inside");
        std::os::unix::fs::symlink("real", src.path().join("linkdir")).unwrap();

        let stats = copy_tree(src.path(), dest.path(), &IgnoreSet::empty()).unwrap();

        let link = dest.path().join("linkdir");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("real"));
        assert_eq!(fs::read_to_string(dest.path().join("real/f.txt")).unwrap(), "inside");
        assert_eq!(stats.symlinks, 1);
        assert_eq!(stats.files, 1);
    }

    #[cfg(unix)]
    #[test]
    fn absolute_directory_symlink_leaves_target_intact() {
        let outside = TempDir::new().unwrap();
        write(&outside.path().join("f.txt"), "precious");

        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), src.path().join("linkdir")).unwrap();

        let stats = copy_tree(src.path(), dest.path(), &IgnoreSet::empty()).unwrap();

        assert_eq!(fs::read_to_string(outside.path().join("f.txt")).unwrap(), "precious");
        assert_eq!(fs::read_link(dest.path().join("linkdir")).unwrap(), outside.path());
        assert_eq!(stats, CopyStats { files: 0, dirs: 0, symlinks: 1, bytes: 0 });

        // copying back over a tree that already has the link replaces it
        copy_tree(dest.path(), src.path(), &IgnoreSet::empty()).unwrap();
        assert_eq!(fs::read_to_string(outside.path().join("f.txt")).unwrap(), "precious");
        assert_eq!(fs::read_link(src.path().join("linkdir")).unwrap(), outside.path());
    }

    #[test]
    fn directory_replaces_file_at_same_path() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(&src.path().join("a/x.txt"), "from snapshot");
        write(&dest.path().join("a"), "now a file");

        copy_tree(src.path(), dest.path(), &IgnoreSet::empty()).unwrap();

        assert!(dest.path().join("a").is_dir());
        assert_eq!(fs::read_to_string(dest.path().join("a/x.txt")).unwrap(), "from snapshot");
    }

    #[test]
    fn file_replaces_directory_at_same_path() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(&src.path().join("a"), "from snapshot");
        write(&dest.path().join("a/nested/y.txt"), "now a dir");

        copy_tree(src.path(), dest.path(), &IgnoreSet::empty()).unwrap();

        assert!(dest.path().join("a").is_file());
        assert_eq!(fs::read_to_string(dest.path().join("a")).unwrap(), "from snapshot");
    }
}
