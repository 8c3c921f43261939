use std::path::Path;
use std::process::Command;

use super::Differ;
use crate::copy::IgnoreSet;
use crate::error::{Error, Result};

/// Runs an external diff program, `diff -ru` by default.
///
/// Every ignore-set name is passed as `-x <name>` so the storage root and VCS
/// metadata don't show up when comparing against the live tree.
pub struct ExternalDiff {
    command: Vec<String>,
    ignore: IgnoreSet,
}

impl ExternalDiff {
    pub fn new(command: Vec<String>, ignore: IgnoreSet) -> Self {
        ExternalDiff { command, ignore }
    }

    fn build(&self, from: &Path, to: &Path) -> Result<Command> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| Error::Diff("no diff command configured".to_string()))?;

        let mut cmd = Command::new(program);
        cmd.args(args);
        for name in self.ignore.names().filter(|n| *n != "." && *n != "..") {
            cmd.arg("-x").arg(name);
        }
        cmd.arg(from).arg(to);
        Ok(cmd)
    }
}

impl Differ for ExternalDiff {
    fn compare(&self, from: &Path, to: &Path) -> Result<String> {
        let mut cmd = self.build(from, to)?;
        tracing::debug!("running {cmd:?}");

        let output = cmd
            .output()
            .map_err(|e| Error::Diff(format!("could not run '{}': {e}", self.command.join(" "))))?;

        // diff exits 1 when the inputs differ, only >1 is trouble
        match output.status.code() {
            Some(0) | Some(1) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            _ => Err(Error::Diff(String::from_utf8_lossy(&output.stderr).trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn ignore_names_become_exclude_flags() {
        let ignore = IgnoreSet::new(vec![".".into(), "..".into(), ".rbak".into(), ".git".into()]);
        let differ = ExternalDiff::new(vec!["diff".to_string(), "-ru".to_string()], ignore);
        let cmd = differ.build(Path::new("a"), Path::new("b")).unwrap();

        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(cmd.get_program(), "diff");
        assert_eq!(args, vec!["-ru", "-x", ".rbak", "-x", ".git", "a", "b"]);
    }

    #[test]
    fn empty_command_is_an_error() {
        let differ = ExternalDiff::new(Vec::new(), IgnoreSet::empty());
        let err = differ.compare(Path::new("a"), Path::new("b")).unwrap_err();
        assert!(matches!(err, Error::Diff(_)));
    }

    #[test]
    fn missing_program_is_an_error() {
        let differ = ExternalDiff::new(vec!["rbak-no-such-diff-tool".to_string()], IgnoreSet::empty());
        let err = differ.compare(Path::new("a"), Path::new("b")).unwrap_err();
        assert!(matches!(err, Error::Diff(_)));
    }
}
