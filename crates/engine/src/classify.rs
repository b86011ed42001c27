//! Commit classification.
//!
//! Turns a commit subject of the form `tag(scope)!: description` into one
//! bump intent per affected module, or a [`Diagnostic`] explaining why it
//! could not.

use crate::module::{Commit, WorkspaceModule, find_module};
use crate::version::BumpKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Tags recognized out of the box.
pub const DEFAULT_TAGS: &[&str] = &[
    "BREAKING",
    "feat",
    "deprecation",
    "fix",
    "perf",
    "docs",
    "style",
    "refactor",
    "test",
    "chore",
    "build",
    "ci",
    "revert",
];

/// Tags that must name the modules they affect in a multi-module workspace.
pub const RANGE_REQUIRED_TAGS: &[&str] = &["BREAKING", "feat", "fix", "perf", "deprecation"];

#[allow(clippy::expect_used)]
static SUBJECT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<tag>[^:()!\s]+)(?:\((?P<scope>[^()]*)\))?(?P<breaking>!)?: (?P<description>.*)$")
        .expect("subject pattern is a valid regex")
});

/// A request to bump one module, derived from one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BumpIntent {
    /// Target module name.
    pub module: String,
    /// Commit tag (`feat`, `fix`, ...).
    pub tag: String,
    /// Requested severity.
    pub version: BumpKind,
    /// The commit this intent came from.
    pub commit: Commit,
}

/// Why a commit could not be turned into bump intents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The subject does not follow the convention, or the tag is unknown.
    UnknownCommit {
        /// The offending commit.
        commit: Commit,
        /// Human readable explanation.
        reason: String,
    },
    /// A range-required tag without a scope in a multi-module workspace.
    MissingRange {
        /// The offending commit.
        commit: Commit,
        /// Human readable explanation.
        reason: String,
    },
    /// The scope names a module that does not exist.
    UnknownRangeCommit {
        /// The offending commit.
        commit: Commit,
        /// Human readable explanation.
        reason: String,
    },
    /// A scope-less commit with a tag that does not affect versions.
    SkippedCommit {
        /// The offending commit.
        commit: Commit,
        /// Human readable explanation.
        reason: String,
    },
}

impl Diagnostic {
    /// The commit this diagnostic is about.
    #[must_use]
    pub const fn commit(&self) -> &Commit {
        match self {
            Self::UnknownCommit { commit, .. }
            | Self::MissingRange { commit, .. }
            | Self::UnknownRangeCommit { commit, .. }
            | Self::SkippedCommit { commit, .. } => commit,
        }
    }

    /// Human readable explanation.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::UnknownCommit { reason, .. }
            | Self::MissingRange { reason, .. }
            | Self::UnknownRangeCommit { reason, .. }
            | Self::SkippedCommit { reason, .. } => reason,
        }
    }

    /// The snake_case discriminant, as used in serialized output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownCommit { .. } => "unknown_commit",
            Self::MissingRange { .. } => "missing_range",
            Self::UnknownRangeCommit { .. } => "unknown_range_commit",
            Self::SkippedCommit { .. } => "skipped_commit",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind(), self.commit().subject, self.reason())
    }
}

/// Outcome of classifying a single commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The commit requests these bumps.
    Intents(Vec<BumpIntent>),
    /// The commit could not be classified.
    Diagnostic(Diagnostic),
}

/// Intents and diagnostics collected over a commit sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationReport {
    /// Intents whose module exists in the resolution set.
    pub intents: Vec<BumpIntent>,
    /// Everything that needs manual review.
    pub diagnostics: Vec<Diagnostic>,
}

/// Classifies commit subjects into bump intents.
#[derive(Debug, Clone, Default)]
pub struct CommitClassifier {
    extra_tags: Vec<String>,
}

impl CommitClassifier {
    /// Create a classifier recognizing [`DEFAULT_TAGS`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognize additional tags; they request `patch` bumps.
    #[must_use]
    pub fn with_extra_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    fn is_known_tag(&self, tag: &str) -> bool {
        DEFAULT_TAGS.contains(&tag) || self.extra_tags.iter().any(|t| t == tag)
    }

    /// Classify one commit against the current module set.
    ///
    /// Scopes are not checked against `modules` here; see
    /// [`check_modules`](Self::check_modules).
    #[must_use]
    pub fn classify(&self, commit: &Commit, modules: &[WorkspaceModule]) -> Classification {
        let Some(captures) = SUBJECT_PATTERN.captures(&commit.subject) else {
            return Classification::Diagnostic(Diagnostic::UnknownCommit {
                commit: commit.clone(),
                reason: "The commit message does not match the pattern `tag(scope): description`"
                    .to_string(),
            });
        };

        let tag = &captures["tag"];
        let severity = if captures.name("breaking").is_some() {
            BumpKind::Major
        } else {
            tag_severity(tag)
        };

        let scope = captures
            .name("scope")
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty());

        let targets: Vec<String> = match scope {
            Some("*") => modules.iter().map(|m| m.name.clone()).collect(),
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None if modules.len() == 1 => vec![modules[0].name.clone()],
            None if RANGE_REQUIRED_TAGS.contains(&tag) => {
                return Classification::Diagnostic(Diagnostic::MissingRange {
                    commit: commit.clone(),
                    reason: format!(
                        "`{tag}` commits must name the modules they affect, e.g. `{tag}(module): ...`"
                    ),
                });
            }
            None => {
                return Classification::Diagnostic(Diagnostic::SkippedCommit {
                    commit: commit.clone(),
                    reason: format!("`{tag}` commit without a module scope"),
                });
            }
        };

        // Unscoped workspace commits were already reported above, whatever their tag
        if !self.is_known_tag(tag) {
            return Classification::Diagnostic(Diagnostic::UnknownCommit {
                commit: commit.clone(),
                reason: format!("Unknown commit tag: {tag}"),
            });
        }

        let intents = targets
            .into_iter()
            .map(|target| {
                let (module, version) = match unstable_target(&target) {
                    Some(stable) => (stable.to_string(), BumpKind::Patch),
                    None => (target, severity),
                };
                BumpIntent {
                    module,
                    tag: tag.to_string(),
                    version,
                    commit: commit.clone(),
                }
            })
            .collect::<Vec<_>>();

        debug!(
            subject = %commit.subject,
            intents = intents.len(),
            "Classified commit"
        );
        Classification::Intents(intents)
    }

    /// Replace intents for unknown modules with diagnostics.
    ///
    /// Intents that resolve are rewritten to carry the full module name, so a
    /// short scope `foo` and `@scope/foo` aggregate together.
    #[must_use]
    pub fn check_modules(
        intents: Vec<BumpIntent>,
        modules: &[WorkspaceModule],
    ) -> (Vec<BumpIntent>, Vec<Diagnostic>) {
        let mut valid = Vec::with_capacity(intents.len());
        let mut diagnostics = Vec::new();
        for mut intent in intents {
            match find_module(&intent.module, modules) {
                Some(module) => {
                    intent.module.clone_from(&module.name);
                    valid.push(intent);
                }
                None => diagnostics.push(Diagnostic::UnknownRangeCommit {
                    reason: format!("The commit is for an unknown module: {}", intent.module),
                    commit: intent.commit,
                }),
            }
        }
        (valid, diagnostics)
    }

    /// Classify a whole commit sequence, checking every intent's module.
    ///
    /// A commit that fails never prevents the others from being classified.
    #[must_use]
    pub fn classify_all(&self, commits: &[Commit], modules: &[WorkspaceModule]) -> ClassificationReport {
        let mut report = ClassificationReport::default();
        for commit in commits {
            match self.classify(commit, modules) {
                Classification::Intents(intents) => {
                    let (valid, diagnostics) = Self::check_modules(intents, modules);
                    report.intents.extend(valid);
                    report.diagnostics.extend(diagnostics);
                }
                Classification::Diagnostic(diagnostic) => report.diagnostics.push(diagnostic),
            }
        }
        report
    }
}

/// Classify one commit with the default tag set.
#[must_use]
pub fn classify(commit: &Commit, modules: &[WorkspaceModule]) -> Classification {
    CommitClassifier::new().classify(commit, modules)
}

/// Fixed severity table for recognized tags.
fn tag_severity(tag: &str) -> BumpKind {
    match tag {
        "BREAKING" => BumpKind::Major,
        "feat" => BumpKind::Minor,
        _ => BumpKind::Patch,
    }
}

/// `unstable/x` and `x/unstable` target module `x`.
fn unstable_target(scope: &str) -> Option<&str> {
    scope
        .strip_prefix("unstable/")
        .or_else(|| scope.strip_suffix("/unstable"))
        .filter(|s| !s.is_empty())
}
