//! Command line definition.

use chrono::NaiveDate;
use clap::Parser;
use relbump_engine::NotesMode;
use std::path::PathBuf;

/// Compute version bumps and release notes from conventional commits.
#[derive(Parser, Debug)]
#[command(name = "relbump")]
#[command(about = "Compute version bumps and release notes from conventional commits")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Repository root.
    #[arg(long, help = "Repository root", default_value = ".")]
    pub root: PathBuf,

    /// Start of the commit range (exclusive).
    #[arg(
        long,
        help = "Start of the commit range (default: latest release tag, else the whole history)"
    )]
    pub start: Option<String>,

    /// End of the commit range (inclusive).
    #[arg(long, help = "End of the commit range", default_value = "HEAD")]
    pub base: String,

    /// GitHub repository used for links.
    #[arg(
        long,
        env = "GITHUB_REPOSITORY",
        value_name = "OWNER/REPO",
        help = "GitHub repository used for commit and compare links"
    )]
    pub github_repository: Option<String>,

    /// Release note layout.
    #[arg(long, help = "Release note layout: auto, single, workspace or individual")]
    pub mode: Option<NotesMode>,

    /// Tag modules individually.
    #[arg(long, help = "Tag each module as <module>@<version>")]
    pub individual_tags: bool,

    /// Release date.
    #[arg(long, value_name = "YYYY-MM-DD", help = "Release date (default: today, UTC)")]
    pub date: Option<NaiveDate>,

    /// Compute everything but write nothing.
    #[arg(long, help = "Show what would change without writing files or tags")]
    pub dry_run: bool,

    /// Print the plan as JSON instead of the pull request body.
    #[arg(long, help = "Print the release plan as JSON")]
    pub json: bool,

    /// Create the release tags.
    #[arg(long, help = "Create the release tags at the --base commit")]
    pub tag: bool,

    /// Debug logging.
    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,
}

impl Cli {
    /// Parse arguments from the process command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "relbump",
            "--root",
            "repo",
            "--start",
            "v1.0.0",
            "--mode",
            "individual",
            "--date",
            "2024-07-01",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.root, PathBuf::from("repo"));
        assert_eq!(cli.start.as_deref(), Some("v1.0.0"));
        assert_eq!(cli.base, "HEAD");
        assert_eq!(cli.mode, Some(NotesMode::Individual));
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert!(cli.dry_run);
        assert!(!cli.tag);
    }

    #[test]
    fn test_invalid_mode_is_rejected() {
        assert!(Cli::try_parse_from(["relbump", "--mode", "both"]).is_err());
    }
}
