//! Computing the final version of a module.

use crate::aggregate::BumpSummary;
use crate::error::Result;
use crate::module::WorkspaceModule;
use crate::version::{Version, VersionDiff, classify_transition};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Version recorded for a module that has no historical record.
pub const NEW_MODULE_VERSION: &str = "0.0.0";

/// The resolved outcome for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionUpdate {
    /// Version before the release.
    pub from: String,
    /// Version after the release.
    pub to: String,
    /// Kind of the transition.
    pub diff: VersionDiff,
    /// Manifest declaring the module.
    pub path: PathBuf,
    /// The commits that led to this update.
    pub summary: BumpSummary,
}

impl VersionUpdate {
    /// Name of the updated module.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.summary.module
    }

    /// Whether the module did not exist at the start of the range.
    #[must_use]
    pub fn is_new_module(&self) -> bool {
        self.from == NEW_MODULE_VERSION
    }
}

/// Resolve the version update for one module.
///
/// A module without a `previous` record is new and keeps its recorded
/// version. A module whose recorded version differs from `previous` was
/// edited by hand, and that edit wins over the commit-derived severity.
/// Otherwise the summary's severity is applied, as `prerelease` when the
/// current version is a prerelease and downgraded one step for `0.x.y`.
///
/// # Errors
///
/// Returns [`Error::InvalidVersion`](crate::Error::InvalidVersion) if a
/// recorded version is not semver, and
/// [`Error::UnexpectedVersionChange`](crate::Error::UnexpectedVersionChange)
/// when a new or hand-edited module's versions describe no transition, and
/// [`Error::VersionOverflow`](crate::Error::VersionOverflow) when the
/// increment does not fit.
pub fn resolve(
    summary: &BumpSummary,
    current: &WorkspaceModule,
    previous: Option<&WorkspaceModule>,
) -> Result<VersionUpdate> {
    let (from, to, diff) = match previous {
        None => {
            let diff = classify_transition(&current.version, NEW_MODULE_VERSION)?;
            (NEW_MODULE_VERSION.to_string(), current.version.clone(), diff)
        }
        Some(previous) if previous.version != current.version => {
            let diff = classify_transition(&current.version, &previous.version)?;
            (previous.version.clone(), current.version.clone(), diff)
        }
        Some(_) => {
            let version: Version = current.version.parse()?;
            let diff = if version.is_prerelease() {
                VersionDiff::Prerelease
            } else if version.is_initial_development() {
                summary.version.downgraded().into()
            } else {
                summary.version.into()
            };
            let to = version.increment(diff)?.to_string();
            (current.version.clone(), to, diff)
        }
    };

    info!(
        module = %current.name,
        %from,
        %to,
        %diff,
        "Resolved version update"
    );

    Ok(VersionUpdate {
        from,
        to,
        diff,
        path: current.config_path.clone(),
        summary: summary.clone(),
    })
}
