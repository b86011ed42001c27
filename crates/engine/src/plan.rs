//! Planning a whole release run.
//!
//! Chains classification, aggregation and resolution over one commit range.
//! Diagnostics are collected, and a module that fails to resolve is recorded
//! as a failure without stopping the others.

use crate::aggregate::aggregate;
use crate::classify::{CommitClassifier, Diagnostic};
use crate::config::ReleaseConfig;
use crate::error::{Error, Result};
use crate::module::{Commit, WorkspaceModule, validate_modules};
use crate::resolve::{VersionUpdate, resolve};
use crate::version::Version;
use serde::Serialize;
use tracing::{error, info, warn};

/// A module whose version could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleFailure {
    /// Module name.
    pub module: String,
    /// Rendered error message.
    pub message: String,
    /// The underlying error.
    #[serde(skip)]
    pub error: Error,
}

/// Everything a release run decided.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleasePlan {
    /// Resolved updates, sorted by module name.
    pub updates: Vec<VersionUpdate>,
    /// Commits that need manual review.
    pub diagnostics: Vec<Diagnostic>,
    /// Modules that could not be resolved.
    pub failures: Vec<ModuleFailure>,
}

impl ReleasePlan {
    /// Whether nothing is to be released.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Whether any module failed to resolve.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Historical records that can be compared against.
///
/// A record with an empty name or an invalid version is dropped with a
/// warning, so its module counts as new instead of failing the run.
fn usable_history(previous: &[WorkspaceModule]) -> Vec<&WorkspaceModule> {
    previous
        .iter()
        .filter(|module| {
            let usable =
                !module.name.trim().is_empty() && module.version.parse::<Version>().is_ok();
            if !usable {
                warn!(
                    module = %module.name,
                    version = %module.version,
                    "Ignoring unreadable historical module record"
                );
            }
            usable
        })
        .collect()
}

/// Plan a release for `commits` over the `current` module set.
///
/// `previous` is the module set at the start of the range; modules missing
/// from it are treated as new, and so are modules whose historical record
/// is unreadable.
///
/// # Errors
///
/// Returns a configuration error if the current module set has empty or
/// duplicate names or invalid versions, or if the notes mode cannot
/// describe that many modules.
pub fn plan_release(
    commits: &[Commit],
    current: &[WorkspaceModule],
    previous: &[WorkspaceModule],
    config: &ReleaseConfig,
) -> Result<ReleasePlan> {
    validate_modules(current)?;
    config.validate_mode(current.len())?;
    let previous = usable_history(previous);

    let classifier = CommitClassifier::new().with_extra_tags(config.extra_tags.iter().cloned());
    let report = classifier.classify_all(commits, current);
    let summaries = aggregate(&report.intents);

    let mut plan = ReleasePlan {
        diagnostics: report.diagnostics,
        ..ReleasePlan::default()
    };

    for summary in &summaries {
        let Some(module) = current.iter().find(|m| m.name == summary.module) else {
            continue;
        };
        let before = previous.iter().copied().find(|m| m.name == summary.module);
        match resolve(summary, module, before) {
            Ok(update) => plan.updates.push(update),
            Err(err) => {
                error!(module = %module.name, error = %err, "Failed to resolve version");
                plan.failures.push(ModuleFailure {
                    module: module.name.clone(),
                    message: err.to_string(),
                    error: err,
                });
            }
        }
    }

    info!(
        commits = commits.len(),
        updates = plan.updates.len(),
        diagnostics = plan.diagnostics.len(),
        failures = plan.failures.len(),
        "Planned release"
    );
    Ok(plan)
}
