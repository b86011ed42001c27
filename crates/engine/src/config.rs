//! Release configuration types.
//!
//! This module defines the Rust representation of the `relbump.toml`
//! configuration file. Every field is optional.

use crate::error::{Error, Result};
use crate::render::RenderContext;
use crate::tags::TagStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default release note file, relative to the repository root.
pub const DEFAULT_RELEASE_NOTES: &str = "Releases.md";

/// How release notes are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotesMode {
    /// Single-package notes for one module, workspace notes otherwise.
    #[default]
    Auto,
    /// A flat commit list under a version heading.
    Single,
    /// One dated section covering every module.
    Workspace,
    /// One file per module, next to its manifest.
    Individual,
}

impl NotesMode {
    /// The render context this mode selects for `module_count` modules.
    #[must_use]
    pub const fn context(self, module_count: usize) -> RenderContext {
        match self {
            Self::Auto if module_count == 1 => RenderContext::SinglePackage,
            Self::Auto | Self::Workspace => RenderContext::Workspace,
            Self::Single => RenderContext::SinglePackage,
            Self::Individual => RenderContext::IndividualPackage,
        }
    }
}

impl fmt::Display for NotesMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Single => write!(f, "single"),
            Self::Workspace => write!(f, "workspace"),
            Self::Individual => write!(f, "individual"),
        }
    }
}

impl FromStr for NotesMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "single" => Ok(Self::Single),
            "workspace" => Ok(Self::Workspace),
            "individual" => Ok(Self::Individual),
            other => Err(Error::config(
                format!("Invalid notes mode: {other}"),
                "Expected one of auto, single, workspace, individual",
            )),
        }
    }
}

/// Complete release configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseConfig {
    /// GitHub repository as `owner/repo`, enabling commit and compare links.
    pub github_repository: Option<String>,
    /// Release note file for single-package and workspace notes.
    pub release_notes: String,
    /// Release note layout.
    pub mode: NotesMode,
    /// Tag each module as `<module>@<version>` instead of one dated tag.
    pub individual_tags: bool,
    /// Commit tags recognized in addition to the built-in ones.
    pub extra_tags: Vec<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            github_repository: None,
            release_notes: DEFAULT_RELEASE_NOTES.to_string(),
            mode: NotesMode::Auto,
            individual_tags: false,
            extra_tags: Vec::new(),
        }
    }
}

impl ReleaseConfig {
    /// Check the configuration for malformed values.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `githubRepository` is not of the
    /// form `owner/repo`, or if the release note path is empty.
    pub fn validate(&self) -> Result<()> {
        if let Some(repo) = &self.github_repository {
            let mut parts = repo.split('/');
            let valid = matches!(
                (parts.next(), parts.next(), parts.next()),
                (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
            );
            if !valid || repo.chars().any(char::is_whitespace) {
                return Err(Error::config(
                    format!("Invalid GitHub repository: {repo}"),
                    "Use the form owner/repo, e.g. denoland/std",
                ));
            }
        }
        if self.release_notes.trim().is_empty() {
            return Err(Error::config(
                "Release note path is empty",
                "Set releaseNotes to a file path such as Releases.md",
            ));
        }
        Ok(())
    }

    /// Check that the notes mode fits a workspace of `module_count` modules.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for `single` mode over more than one
    /// module, which would leave every module but the first without notes.
    pub fn validate_mode(&self, module_count: usize) -> Result<()> {
        if self.mode == NotesMode::Single && module_count > 1 {
            return Err(Error::config(
                format!("Notes mode 'single' cannot describe {module_count} modules"),
                "Use mode 'workspace' or 'individual' for a workspace, or leave it on 'auto'",
            ));
        }
        Ok(())
    }

    /// The configured repository, ignoring empty strings.
    #[must_use]
    pub fn repository(&self) -> Option<&str> {
        self.github_repository.as_deref().filter(|r| !r.is_empty())
    }

    /// The tag strategy for a release over `module_count` modules.
    #[must_use]
    pub const fn tag_strategy(&self, module_count: usize) -> TagStrategy {
        match self.mode.context(module_count) {
            RenderContext::SinglePackage => TagStrategy::SinglePackage,
            _ if self.individual_tags => TagStrategy::Individual,
            _ => TagStrategy::Consolidated,
        }
    }
}
