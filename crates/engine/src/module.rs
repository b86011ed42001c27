//! Input records: commits and workspace modules.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::warn;

/// A commit read from version control.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commit {
    /// Full 40-character hash, or empty when unknown.
    pub hash: String,
    /// First line of the commit message.
    pub subject: String,
    /// Remaining lines of the commit message.
    pub body: String,
}

impl Commit {
    /// Create a new commit record.
    #[must_use]
    pub fn new(hash: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// The first 7 characters of the hash, for display.
    #[must_use]
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

/// A publishable package of the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceModule {
    /// Package name, unique within one resolution.
    pub name: String,
    /// Recorded version (valid semver).
    pub version: String,
    /// Path of the manifest that declares this module.
    pub config_path: PathBuf,
}

impl WorkspaceModule {
    /// Create a new module record.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        config_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            config_path: config_path.into(),
        }
    }
}

/// Look up a module by scope name.
///
/// A scope matches a module whose name equals it, or whose name ends with
/// `/<scope>`, so `foo` resolves to `@scope/foo`. When several modules share
/// the suffix, the first one in `modules` wins and a warning is logged.
#[must_use]
pub fn find_module<'a>(name: &str, modules: &'a [WorkspaceModule]) -> Option<&'a WorkspaceModule> {
    if let Some(exact) = modules.iter().find(|m| m.name == name) {
        return Some(exact);
    }
    let suffix = format!("/{name}");
    let mut matches = modules.iter().filter(|m| m.name.ends_with(&suffix));
    let first = matches.next()?;
    let others: Vec<&str> = matches.map(|m| m.name.as_str()).collect();
    if !others.is_empty() {
        warn!(
            scope = name,
            chosen = %first.name,
            ignored = ?others,
            "Ambiguous module scope, using the first match"
        );
    }
    Some(first)
}

/// Validate a module resolution set.
///
/// # Errors
///
/// Returns a configuration error if a module has an empty or duplicate
/// name, or a version that is not valid semver.
pub fn validate_modules(modules: &[WorkspaceModule]) -> Result<()> {
    let mut seen = HashSet::new();
    for module in modules {
        if module.name.trim().is_empty() {
            return Err(Error::config(
                format!(
                    "Module declared in {} has an empty name",
                    module.config_path.display()
                ),
                "Every package manifest needs a non-empty \"name\" field",
            ));
        }
        if !seen.insert(module.name.as_str()) {
            return Err(Error::config(
                format!("Duplicate module name: {}", module.name),
                "Module names must be unique within the workspace",
            ));
        }
        module
            .version
            .parse::<crate::version::Version>()
            .map_err(|_| {
                Error::config(
                    format!(
                        "Module {} has an invalid version: {}",
                        module.name, module.version
                    ),
                    "Versions must follow semantic versioning (e.g., 1.0.0)",
                )
            })?;
    }
    Ok(())
}
