//! Where manifests are read from.
//!
//! The current module set comes from the working tree, the historical one
//! from a git ref. Both go through [`ManifestSource`] so discovery does not
//! care which one it is looking at.

use crate::error::{Error, Result};
use crate::git::Git;
use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read access to a snapshot of the repository.
pub trait ManifestSource {
    /// Read a file relative to the repository root.
    ///
    /// Returns `None` if the file does not exist in this snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn read(&self, rel_path: &Path) -> Result<Option<String>>;

    /// Expand a workspace member pattern to the directories it matches,
    /// relative to the repository root and sorted.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid pattern.
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>>;

    /// Short description for log messages.
    fn describe(&self) -> String;
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Normalize a member pattern: `./foo/` becomes `foo`.
pub(crate) fn normalize_pattern(pattern: &str) -> &str {
    let pattern = pattern.trim();
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    pattern.trim_end_matches('/')
}

fn compile_pattern(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| {
        Error::config(
            format!("Invalid workspace member pattern '{pattern}': {e}"),
            "Workspace members must be directory paths or glob patterns like packages/*",
            None,
        )
    })
}

/// The working tree under a root directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Read manifests under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ManifestSource for FsSource {
    fn read(&self, rel_path: &Path) -> Result<Option<String>> {
        let path = self.root.join(rel_path);
        if !path.is_file() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| Error::io(e, path, "reading manifest"))
    }

    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = normalize_pattern(pattern);
        let compiled = compile_pattern(pattern)?;
        let full = format!(
            "{}/{}",
            Pattern::escape(&self.root.to_string_lossy()),
            compiled.as_str()
        );

        let entries = glob::glob_with(&full, MATCH_OPTIONS).map_err(|e| {
            Error::config(
                format!("Invalid workspace member pattern '{pattern}': {e}"),
                "Workspace members must be directory paths or glob patterns like packages/*",
                None,
            )
        })?;

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .filter(|path| path.is_dir())
            .filter_map(|path| path.strip_prefix(&self.root).ok().map(Path::to_path_buf))
            .collect();
        dirs.sort();
        debug!(pattern, matches = dirs.len(), "Expanded member pattern");
        Ok(dirs)
    }

    fn describe(&self) -> String {
        format!("working tree at {}", self.root.display())
    }
}

/// The repository as of a git ref, read without checking it out.
#[derive(Debug, Clone)]
pub struct GitRefSource {
    git: Git,
    reference: String,
}

impl GitRefSource {
    /// Read manifests at `reference`.
    ///
    /// # Errors
    ///
    /// Returns a git error if `reference` does not name a commit.
    pub fn new(git: Git, reference: impl Into<String>) -> Result<Self> {
        let reference = reference.into();
        git.resolve_ref(&reference)?;
        Ok(Self { git, reference })
    }

    fn object(&self, rel_path: &Path) -> String {
        let path = rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}:{path}", self.reference)
    }
}

impl ManifestSource for GitRefSource {
    fn read(&self, rel_path: &Path) -> Result<Option<String>> {
        let object = self.object(rel_path);
        let exists = self.git.command(&["cat-file", "-e", &object])?;
        if !exists.status.success() {
            return Ok(None);
        }
        self.git.run(&["show", &object]).map(Some)
    }

    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = normalize_pattern(pattern);
        let compiled = compile_pattern(pattern)?;
        let listing = self
            .git
            .run(&["ls-tree", "-d", "-r", "--name-only", &self.reference])?;

        let mut dirs: Vec<PathBuf> = listing
            .lines()
            .filter(|line| compiled.matches_with(line, MATCH_OPTIONS))
            .map(PathBuf::from)
            .collect();
        dirs.sort();
        debug!(pattern, reference = %self.reference, matches = dirs.len(), "Expanded member pattern");
        Ok(dirs)
    }

    fn describe(&self) -> String {
        format!("git ref {}", self.reference)
    }
}
