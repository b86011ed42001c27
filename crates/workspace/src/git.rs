//! Version control access through the system `git` binary.

use crate::error::{Error, Result};
use relbump_engine::Commit;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const FIELD_SEPARATOR: char = '\x1f';
const RECORD_SEPARATOR: char = '\x1e';

/// Something that lists the commits of a range.
pub trait CommitSource {
    /// Commits reachable from `base` but not from `start`, oldest first.
    ///
    /// Without a `start`, every commit reachable from `base` is listed.
    ///
    /// # Errors
    ///
    /// Returns an error if the commits cannot be read.
    fn commits_between(&self, start: Option<&str>, base: &str) -> Result<Vec<Commit>>;
}

/// A git repository on disk.
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    /// Open the repository at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn command(&self, args: &[&str]) -> Result<std::process::Output> {
        debug!(args = ?args, "Running git");
        Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| Error::git(format!("Failed to run git {}: {e}", args.join(" "))))
    }

    pub(crate) fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.command(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::git(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// The full hash of `HEAD`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository has no commits.
    pub fn head(&self) -> Result<String> {
        self.resolve_ref("HEAD")
    }

    /// The full commit hash a ref points to.
    ///
    /// # Errors
    ///
    /// Returns an error if the ref does not name a commit.
    pub fn resolve_ref(&self, reference: &str) -> Result<String> {
        let spec = format!("{reference}^{{commit}}");
        Ok(self.run(&["rev-parse", "--verify", &spec])?.trim().to_string())
    }

    /// The most recent tag reachable from `base` matching one of `patterns`.
    ///
    /// Returns `None` when no tag matches.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be run.
    pub fn latest_tag(&self, patterns: &[&str], base: &str) -> Result<Option<String>> {
        let mut args = vec!["describe", "--tags", "--abbrev=0"];
        for pattern in patterns {
            args.push("--match");
            args.push(pattern);
        }
        args.push(base);

        let output = self.command(&args)?;
        if !output.status.success() {
            debug!(
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "No matching tag"
            );
            return Ok(None);
        }
        let tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!tag.is_empty()).then_some(tag))
    }

    /// Create a lightweight tag pointing at `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag already exists, the name is invalid, or
    /// `target` does not name a commit.
    pub fn create_tag(&self, name: &str, target: &str) -> Result<()> {
        let commit = self.resolve_ref(target)?;
        self.run(&["tag", name, &commit])?;
        debug!(tag = name, target, "Created tag");
        Ok(())
    }
}

impl CommitSource for Git {
    fn commits_between(&self, start: Option<&str>, base: &str) -> Result<Vec<Commit>> {
        let range = start.map_or_else(|| base.to_string(), |start| format!("{start}..{base}"));
        let format = "--format=%H%x1f%s%x1f%b%x1e";
        let stdout = self.run(&["log", "--reverse", format, &range])?;
        let commits = parse_log(&stdout);
        debug!(range = %range, count = commits.len(), "Listed commits");
        Ok(commits)
    }
}

/// Parse `git log` output written with unit and record separators.
fn parse_log(stdout: &str) -> Vec<Commit> {
    stdout
        .split(RECORD_SEPARATOR)
        .map(|record| record.trim_start_matches(['\n', '\r']))
        .filter(|record| !record.trim().is_empty())
        .filter_map(|record| {
            let mut fields = record.splitn(3, FIELD_SEPARATOR);
            let hash = fields.next()?.trim();
            let subject = fields.next()?.trim();
            let body = fields.next().unwrap_or_default().trim();
            Some(Commit::new(hash, subject, body))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_git_repo(path: &Path) {
        for args in [
            vec!["init", "--initial-branch=main"],
            vec!["config", "user.name", "Test User"],
            vec!["config", "user.email", "test@example.com"],
            vec!["config", "tag.gpgSign", "false"],
        ] {
            Command::new("git")
                .args(&args)
                .current_dir(path)
                .output()
                .unwrap();
        }
    }

    fn create_commit(path: &Path, file: &str, message: &str) -> String {
        fs::write(path.join(file), message).unwrap();
        Command::new("git")
            .args(["add", "."])
            .current_dir(path)
            .output()
            .unwrap();
        Command::new("git")
            .args(["commit", "--no-gpg-sign", "-m", message])
            .current_dir(path)
            .output()
            .unwrap();
        let output = Command::new("git")
            .args(["rev-parse", "HEAD"])
            .current_dir(path)
            .output()
            .unwrap();
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    #[test]
    fn test_parse_log() {
        let stdout = "aaa\x1ffeat(foo): x\x1fbody line\n\x1e\nbbb\x1ffix: y\x1f\x1e\n";
        let commits = parse_log(stdout);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0], Commit::new("aaa", "feat(foo): x", "body line"));
        assert_eq!(commits[1], Commit::new("bbb", "fix: y", ""));
        assert!(parse_log("").is_empty());
    }

    #[test]
    fn test_commits_between_range() {
        let temp = TempDir::new().unwrap();
        init_git_repo(temp.path());
        let first = create_commit(temp.path(), "a.txt", "chore: initial");
        let second = create_commit(temp.path(), "b.txt", "feat(foo): add x");
        let third = create_commit(temp.path(), "c.txt", "fix(bar): y\n\nLonger body.");

        let git = Git::new(temp.path());
        let commits = git.commits_between(Some(&first), "HEAD").unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, second);
        assert_eq!(commits[0].subject, "feat(foo): add x");
        assert_eq!(commits[1].hash, third);
        assert_eq!(commits[1].body, "Longer body.");

        let all = git.commits_between(None, "HEAD").unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(git.head().unwrap(), third);
    }

    #[test]
    fn test_tags() {
        let temp = TempDir::new().unwrap();
        init_git_repo(temp.path());
        create_commit(temp.path(), "a.txt", "chore: initial");

        let git = Git::new(temp.path());
        assert_eq!(git.latest_tag(&["v*"], "HEAD").unwrap(), None);

        git.create_tag("v1.0.0", "HEAD").unwrap();
        create_commit(temp.path(), "b.txt", "fix: y");
        assert_eq!(
            git.latest_tag(&["v*", "release-*"], "HEAD").unwrap(),
            Some("v1.0.0".to_string())
        );
        assert!(git.create_tag("v1.0.0", "HEAD").is_err());
    }

    #[test]
    fn test_create_tag_at_target() {
        let temp = TempDir::new().unwrap();
        init_git_repo(temp.path());
        let first = create_commit(temp.path(), "a.txt", "chore: initial");
        create_commit(temp.path(), "b.txt", "fix: y");

        let git = Git::new(temp.path());
        git.create_tag("release-2024.07.01", "HEAD~1").unwrap();
        assert_eq!(git.resolve_ref("release-2024.07.01").unwrap(), first);
        assert!(git.create_tag("v1.0.0", "missing-ref").is_err());
    }

    #[test]
    fn test_bad_ref_is_git_error() {
        let temp = TempDir::new().unwrap();
        init_git_repo(temp.path());
        create_commit(temp.path(), "a.txt", "chore: initial");
        let git = Git::new(temp.path());
        let err = git.commits_between(Some("nope"), "HEAD").unwrap_err();
        assert!(matches!(err, Error::Git { .. }));
    }
}
