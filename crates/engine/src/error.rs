//! Error types for the version bump engine.
//!
//! Classification problems are not errors: they are reported as
//! [`Diagnostic`](crate::classify::Diagnostic) values. The variants here are
//! the fatal kinds a caller has to decide about.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning a release.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum Error {
    /// Failed to parse or validate a version string.
    #[error("Invalid version: {version}")]
    #[diagnostic(
        code(relbump::engine::invalid_version),
        help("Version must follow semantic versioning (e.g., 1.0.0, 2.1.0-rc.1)")
    )]
    InvalidVersion {
        /// The invalid version string
        version: String,
    },

    /// A version changed without any recognizable transition between the two values.
    #[error("Unexpected manual version update: {from} -> {to}")]
    #[diagnostic(
        code(relbump::engine::unexpected_version_change),
        help(
            "The recorded versions do not describe a major, minor, patch or prerelease step; check the manifest history"
        )
    )]
    UnexpectedVersionChange {
        /// The historical version
        from: String,
        /// The current version
        to: String,
    },

    /// Incrementing a version would overflow one of its numeric fields.
    #[error("Cannot apply a {diff} increment to {version}: a version field would overflow")]
    #[diagnostic(
        code(relbump::engine::version_overflow),
        help("Set the module's version by hand in its manifest")
    )]
    VersionOverflow {
        /// The version being incremented
        version: String,
        /// The requested increment
        diff: crate::version::VersionDiff,
    },

    /// Configuration or module resolution error.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(relbump::engine::config), help("{help}"))]
    Config {
        /// The error message
        message: String,
        /// Help text for the user
        help: String,
    },
}

impl Error {
    /// Create a new invalid version error.
    #[must_use]
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    /// Create a new unexpected version change error.
    #[must_use]
    pub fn unexpected_version_change(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::UnexpectedVersionChange {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a new version overflow error.
    #[must_use]
    pub fn version_overflow(version: impl Into<String>, diff: crate::version::VersionDiff) -> Self {
        Self::VersionOverflow {
            version: version.into(),
            diff,
        }
    }

    /// Create a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: help.into(),
        }
    }

    /// Whether this error is a configuration problem rather than a logic error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::InvalidVersion { .. })
    }
}
