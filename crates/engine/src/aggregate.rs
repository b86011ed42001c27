//! Grouping of bump intents into one summary per module.

use crate::classify::BumpIntent;
use crate::module::Commit;
use crate::version::BumpKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag order used when listing a module's commits.
///
/// Tags missing from this table sort after all of these.
pub const TAG_PRIORITY: &[&str] = &[
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
];

/// A commit together with the tag it was classified under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedCommit {
    /// Commit tag.
    pub tag: String,
    /// The commit.
    pub commit: Commit,
}

/// Aggregated bump request for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BumpSummary {
    /// Module name.
    pub module: String,
    /// Highest severity requested by any intent.
    pub version: BumpKind,
    /// Commits ordered by [`TAG_PRIORITY`].
    pub commits: Vec<TaggedCommit>,
}

fn tag_rank(tag: &str) -> usize {
    TAG_PRIORITY
        .iter()
        .position(|t| *t == tag)
        .unwrap_or(TAG_PRIORITY.len())
}

/// Group intents by module.
///
/// Summaries come back sorted by module name. Within a module, commits are
/// stably sorted by tag priority, so commits sharing a tag keep their input
/// order.
#[must_use]
pub fn aggregate(intents: &[BumpIntent]) -> Vec<BumpSummary> {
    let mut groups: BTreeMap<&str, (BumpKind, Vec<TaggedCommit>)> = BTreeMap::new();
    for intent in intents {
        let entry = groups
            .entry(intent.module.as_str())
            .or_insert((intent.version, Vec::new()));
        entry.0 = entry.0.max(intent.version);
        entry.1.push(TaggedCommit {
            tag: intent.tag.clone(),
            commit: intent.commit.clone(),
        });
    }

    groups
        .into_iter()
        .map(|(module, (version, mut commits))| {
            commits.sort_by_key(|c| tag_rank(&c.tag));
            BumpSummary {
                module: module.to_string(),
                version,
                commits,
            }
        })
        .collect()
}
