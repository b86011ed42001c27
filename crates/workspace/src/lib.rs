//! Repository access for relbump.
//!
//! This crate reads what the version engine needs from a repository: the
//! module set from Deno or npm manifests (in the working tree or at a git
//! ref), the commits of a range, and the configuration file. It makes no
//! release decisions itself.

#![warn(missing_docs)]

pub mod config;
pub mod discovery;
pub mod error;
pub mod git;
pub mod source;

pub use config::{CONFIG_FILE, load_config};
pub use discovery::discover_modules;
pub use error::{Error, Result};
pub use git::{CommitSource, Git};
pub use source::{FsSource, GitRefSource, ManifestSource};

use relbump_engine::WorkspaceModule;
use tracing::warn;

/// Discover the modules as of `reference`.
///
/// A snapshot that cannot be read (the ref is missing, or predates the
/// manifests) yields no modules, so every current module counts as new.
#[must_use]
pub fn discover_historical_modules(git: &Git, reference: &str) -> Vec<WorkspaceModule> {
    let result = GitRefSource::new(git.clone(), reference).and_then(|source| discover_modules(&source));
    match result {
        Ok(modules) => modules,
        Err(err) => {
            warn!(
                reference,
                error = %err,
                "Could not read historical modules, treating every module as new"
            );
            Vec::new()
        }
    }
}
