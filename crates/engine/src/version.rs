//! Semantic version arithmetic.
//!
//! This module provides:
//! - Version parsing and formatting
//! - Classification of the transition between two recorded versions
//! - Increments by bump kind, including prerelease counters

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A semantic version following the `SemVer` 2.0.0 specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    /// Major version number.
    pub major: u64,
    /// Minor version number.
    pub minor: u64,
    /// Patch version number.
    pub patch: u64,
    /// Pre-release identifier (e.g., "alpha", "rc.1").
    pub prerelease: Option<String>,
    /// Build metadata (e.g., "20230101", "commit.abc123").
    pub build: Option<String>,
}

impl Version {
    /// Create a new version.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// Create a version with a pre-release identifier.
    #[must_use]
    pub fn with_prerelease(mut self, prerelease: impl Into<String>) -> Self {
        self.prerelease = Some(prerelease.into());
        self
    }

    /// Create a version with build metadata.
    #[must_use]
    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    /// Check if this is a pre-release version.
    #[must_use]
    pub const fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Check if this is the initial development version (0.x.x).
    #[must_use]
    pub const fn is_initial_development(&self) -> bool {
        self.major == 0
    }

    /// Classify the transition from `old` to `self`.
    ///
    /// The first matching rule wins:
    /// 1. `self` carries a prerelease: [`VersionDiff::Prerelease`]
    /// 2. major, then minor, then patch differ: that field
    /// 3. `old` was a prerelease of the same numbers: the most specific
    ///    nonzero field (finalizing `1.2.0-rc.1` into `1.2.0` is a minor)
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedVersionChange`] when none of the rules
    /// applies, which means the pair of versions is inconsistent.
    pub fn diff_from(&self, old: &Self) -> Result<VersionDiff> {
        if self.is_prerelease() {
            return Ok(VersionDiff::Prerelease);
        }
        if self.major != old.major {
            return Ok(VersionDiff::Major);
        }
        if self.minor != old.minor {
            return Ok(VersionDiff::Minor);
        }
        if self.patch != old.patch {
            return Ok(VersionDiff::Patch);
        }
        if old.is_prerelease() {
            if self.patch != 0 {
                return Ok(VersionDiff::Patch);
            }
            if self.minor != 0 {
                return Ok(VersionDiff::Minor);
            }
            if self.major != 0 {
                return Ok(VersionDiff::Major);
            }
        }
        Err(Error::unexpected_version_change(
            old.to_string(),
            self.to_string(),
        ))
    }

    /// Increment this version by the given diff kind.
    ///
    /// Build metadata is always dropped. Incrementing a prerelease version by
    /// `major`, `minor` or `patch` finalizes it when the lower fields are
    /// already zero (`1.0.0-rc.1` + major = `1.0.0`). A `prerelease`
    /// increment bumps the trailing numeric identifier (`rc.1` to `rc.2`),
    /// appends `.0` to a non-numeric one (`beta` to `beta.0`), and starts
    /// `<patch+1>-0` on a release version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionOverflow`] when the field to increment is
    /// already `u64::MAX`.
    pub fn increment(&self, diff: VersionDiff) -> Result<Self> {
        let pre = self.is_prerelease();
        let next = |field: u64| {
            field
                .checked_add(1)
                .ok_or_else(|| Error::version_overflow(self.to_string(), diff))
        };
        let version = match diff {
            VersionDiff::Major => {
                if pre && self.minor == 0 && self.patch == 0 {
                    Self::new(self.major, 0, 0)
                } else {
                    Self::new(next(self.major)?, 0, 0)
                }
            }
            VersionDiff::Minor => {
                if pre && self.patch == 0 {
                    Self::new(self.major, self.minor, 0)
                } else {
                    Self::new(self.major, next(self.minor)?, 0)
                }
            }
            VersionDiff::Patch => {
                if pre {
                    Self::new(self.major, self.minor, self.patch)
                } else {
                    Self::new(self.major, self.minor, next(self.patch)?)
                }
            }
            VersionDiff::Prerelease => match self.prerelease.as_deref() {
                Some(prerelease) => {
                    let bumped = bump_prerelease(prerelease)
                        .ok_or_else(|| Error::version_overflow(self.to_string(), diff))?;
                    Self::new(self.major, self.minor, self.patch).with_prerelease(bumped)
                }
                None => Self::new(self.major, self.minor, next(self.patch)?).with_prerelease("0"),
            },
        };
        Ok(version)
    }
}

/// Bump the trailing numeric identifier of a prerelease string.
///
/// Returns `None` if that identifier is already `u64::MAX`.
fn bump_prerelease(prerelease: &str) -> Option<String> {
    let mut identifiers: Vec<String> = prerelease.split('.').map(str::to_string).collect();
    match identifiers.last().and_then(|last| last.parse::<u64>().ok()) {
        Some(n) => {
            let bumped = n.checked_add(1)?;
            if let Some(last) = identifiers.last_mut() {
                *last = bumped.to_string();
            }
        }
        None => identifiers.push("0".to_string()),
    }
    Some(identifiers.join("."))
}

impl Default for Version {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parsed = semver::Version::parse(s.trim()).map_err(|_| Error::invalid_version(s))?;
        Ok(Self {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease: (!parsed.pre.is_empty()).then(|| parsed.pre.to_string()),
            build: (!parsed.build.is_empty()).then(|| parsed.build.to_string()),
        })
    }
}

impl TryFrom<String> for Version {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(ref pre) = self.prerelease {
            write!(f, "-{pre}")?;
        }
        if let Some(ref build) = self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

/// Classify the transition between two version strings.
///
/// See [`Version::diff_from`] for the rules.
///
/// # Errors
///
/// Returns an error if either string is not valid semver or the transition
/// is not recognized.
pub fn classify_transition(new_version: &str, old_version: &str) -> Result<VersionDiff> {
    let new: Version = new_version.parse()?;
    let old: Version = old_version.parse()?;
    new.diff_from(&old)
}

/// Severity of a bump requested by commits.
///
/// Ordered `patch < minor < major`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    /// Patch version bump (0.0.X).
    Patch,
    /// Minor version bump (0.X.0).
    Minor,
    /// Major version bump (X.0.0).
    Major,
}

impl BumpKind {
    /// Downgrade the severity one step for 0.x.y versions.
    ///
    /// `major` becomes `minor` and `minor` becomes `patch`.
    #[must_use]
    pub const fn downgraded(self) -> Self {
        match self {
            Self::Major => Self::Minor,
            Self::Minor | Self::Patch => Self::Patch,
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patch => write!(f, "patch"),
            Self::Minor => write!(f, "minor"),
            Self::Major => write!(f, "major"),
        }
    }
}

/// The kind of a concrete version transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionDiff {
    /// X.0.0
    Major,
    /// 0.X.0
    Minor,
    /// 0.0.X
    Patch,
    /// Prerelease counter step.
    Prerelease,
}

impl From<BumpKind> for VersionDiff {
    fn from(kind: BumpKind) -> Self {
        match kind {
            BumpKind::Patch => Self::Patch,
            BumpKind::Minor => Self::Minor,
            BumpKind::Major => Self::Major,
        }
    }
}

impl fmt::Display for VersionDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
            Self::Prerelease => write!(f, "prerelease"),
        }
    }
}

impl FromStr for VersionDiff {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            "prerelease" => Ok(Self::Prerelease),
            other => Err(Error::config(
                format!("Invalid version diff: {other}"),
                "Expected one of major, minor, patch, prerelease",
            )),
        }
    }
}
