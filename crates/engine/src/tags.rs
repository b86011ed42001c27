//! Git tag names for a release.

use crate::resolve::VersionUpdate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which tags a release creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStrategy {
    /// `v<version>` for the only module.
    SinglePackage,
    /// One `release-<date>` tag for the whole batch.
    Consolidated,
    /// `<module>@<version>` per updated module.
    Individual,
}

/// Tag for a single-package release: `v1.2.3`.
#[must_use]
pub fn single_package_tag(version: &str) -> String {
    format!("v{version}")
}

/// Tag for one workspace module: `@scope/foo@1.2.3`.
#[must_use]
pub fn individual_tag(module: &str, version: &str) -> String {
    format!("{module}@{version}")
}

/// Date stamp used in workspace release titles: `2024.07.01`.
#[must_use]
pub fn release_title(date: NaiveDate) -> String {
    date.format("%Y.%m.%d").to_string()
}

/// Tag covering a whole workspace release: `release-2024.07.01`.
#[must_use]
pub fn consolidated_tag(date: NaiveDate) -> String {
    format!("release-{}", release_title(date))
}

/// Every tag a release of `updates` needs.
///
/// Empty when there is nothing to release.
#[must_use]
pub fn tags_for(updates: &[VersionUpdate], strategy: TagStrategy, date: NaiveDate) -> Vec<String> {
    if updates.is_empty() {
        return Vec::new();
    }
    match strategy {
        TagStrategy::SinglePackage => updates
            .iter()
            .map(|u| single_package_tag(&u.to))
            .take(1)
            .collect(),
        TagStrategy::Consolidated => vec![consolidated_tag(date)],
        TagStrategy::Individual => updates
            .iter()
            .map(|u| individual_tag(u.module(), &u.to))
            .collect(),
    }
}
