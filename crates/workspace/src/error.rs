//! Error types for manifest discovery and git access.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for workspace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading the repository.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// I/O error while accessing a file.
    #[error("I/O error during {operation}: {}", path.as_ref().map_or_else(|| "unknown path".to_string(), |p| p.display().to_string()))]
    #[diagnostic(
        code(relbump::workspace::io),
        help("Check that the file exists and is readable")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The path being accessed
        path: Option<PathBuf>,
        /// The operation being performed
        operation: String,
    },

    /// Failed to parse a JSON manifest.
    #[error("Failed to parse JSON manifest: {}", path.display())]
    #[diagnostic(
        code(relbump::workspace::json),
        help("Ensure the manifest is valid JSON (comments are not supported)")
    )]
    Json {
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
        /// The manifest path
        path: PathBuf,
    },

    /// Failed to parse the TOML configuration file.
    #[error("Failed to parse configuration file: {}", path.display())]
    #[diagnostic(
        code(relbump::workspace::toml),
        help("Check the syntax of relbump.toml")
    )]
    Toml {
        /// The underlying parse error
        #[source]
        source: toml::de::Error,
        /// The configuration file path
        path: PathBuf,
    },

    /// Malformed manifest or workspace layout.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(relbump::workspace::config), help("{help}"))]
    Config {
        /// The error message
        message: String,
        /// Help text for the user
        help: String,
        /// The file at fault, if known
        path: Option<PathBuf>,
    },

    /// Git operation error.
    #[error("Git error: {message}")]
    #[diagnostic(
        code(relbump::workspace::git),
        help("Ensure you are in a git repository and the given refs exist")
    )]
    Git {
        /// The error message
        message: String,
    },

    /// Error from the version engine.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] relbump_engine::Error),
}

impl Error {
    /// Create a new I/O error.
    #[must_use]
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
            operation: operation.into(),
        }
    }

    /// Create a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>, help: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            help: help.into(),
            path,
        }
    }

    /// Create a new git error.
    #[must_use]
    pub fn git(message: impl Into<String>) -> Self {
        Self::Git {
            message: message.into(),
        }
    }

    /// Whether this error is a configuration problem.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        match self {
            Self::Config { .. } | Self::Json { .. } | Self::Toml { .. } => true,
            Self::Engine(err) => err.is_config(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = Error::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            "deno.json",
            "reading manifest",
        );
        assert_eq!(err.to_string(), "I/O error during reading manifest: deno.json");
        assert!(!err.is_config());
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("Missing version", "Add a version field", Some("a/deno.json".into()));
        assert!(err.to_string().contains("Missing version"));
        assert!(err.is_config());
    }

    #[test]
    fn test_engine_error_is_transparent() {
        let err: Error = relbump_engine::Error::invalid_version("x").into();
        assert_eq!(err.to_string(), "Invalid version: x");
        assert!(err.is_config());
    }

    #[test]
    fn test_git_error() {
        let err = Error::git("not a repository");
        assert_eq!(err.to_string(), "Git error: not a repository");
    }
}
