//! Release note and pull request rendering.
//!
//! Everything here is a pure function of its inputs. Writing the text to
//! disk, prepending to existing notes and formatting is up to the caller.

use crate::classify::Diagnostic;
use crate::module::Commit;
use crate::resolve::VersionUpdate;
use crate::tags::{consolidated_tag, individual_tag, release_title, single_package_tag};
use crate::version::VersionDiff;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static HEADING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^#*\s*(?P<module>\S+) (?:\[(?P<linked>[^\]\s]+)\]\((?P<url>[^)\s]*)\)|(?P<plain>\S+)) \((?P<diff>[a-z]+)\)\s*$",
    )
    .expect("heading pattern is a valid regex")
});

/// Where the rendered notes end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderContext {
    /// The repository is one package.
    SinglePackage,
    /// One shared, dated section for the whole workspace.
    Workspace,
    /// One file per module.
    IndividualPackage,
}

/// Inputs that shape the rendered text besides the updates themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions<'a> {
    /// `owner/repo`, enabling commit and compare links.
    pub github_repository: Option<&'a str>,
    /// Release date.
    pub date: NaiveDate,
    /// Tag of the previous release, used as the left side of compare links.
    pub previous_tag: Option<&'a str>,
    /// Modules are tagged `<module>@<version>`.
    pub individual_tags: bool,
}

impl<'a> RenderOptions<'a> {
    /// Options without any links.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            github_repository: None,
            date,
            previous_tag: None,
            individual_tags: false,
        }
    }

    /// Enable links into `repo`.
    #[must_use]
    pub const fn with_repository(mut self, repo: Option<&'a str>) -> Self {
        self.github_repository = repo;
        self
    }

    /// Set the previous release tag.
    #[must_use]
    pub const fn with_previous_tag(mut self, tag: Option<&'a str>) -> Self {
        self.previous_tag = tag;
        self
    }

    /// Use per-module tags in compare links.
    #[must_use]
    pub const fn with_individual_tags(mut self, enabled: bool) -> Self {
        self.individual_tags = enabled;
        self
    }
}

/// Release notes for one module, rendered in the individual context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNotes {
    /// Module name.
    pub module: String,
    /// Rendered text.
    pub text: String,
}

/// A module heading parsed back from rendered notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleHeading {
    /// Module name.
    pub module: String,
    /// Previous version, when the heading links a per-module comparison.
    pub from: Option<String>,
    /// New version.
    pub to: String,
    /// Kind of the transition.
    pub diff: VersionDiff,
}

/// Render release notes for `updates` in the given context.
///
/// Returns an empty string when there are no updates.
#[must_use]
pub fn render(updates: &[VersionUpdate], context: RenderContext, options: &RenderOptions<'_>) -> String {
    if updates.is_empty() {
        return String::new();
    }
    match context {
        RenderContext::SinglePackage => render_single_package(&updates[0], options),
        RenderContext::Workspace => render_workspace(updates, options),
        RenderContext::IndividualPackage => updates
            .iter()
            .map(|u| render_individual_package(u, options))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Render one set of notes per module for the individual context.
#[must_use]
pub fn render_per_module(updates: &[VersionUpdate], options: &RenderOptions<'_>) -> Vec<ModuleNotes> {
    updates
        .iter()
        .map(|u| ModuleNotes {
            module: u.module().to_string(),
            text: render_individual_package(u, options),
        })
        .collect()
}

fn compare_url(repo: &str, from_tag: &str, to_tag: &str) -> String {
    format!("https://github.com/{repo}/compare/{from_tag}...{to_tag}")
}

fn render_single_package(update: &VersionUpdate, options: &RenderOptions<'_>) -> String {
    let title = match (options.github_repository, options.previous_tag) {
        (Some(repo), Some(previous)) => format!(
            "[{}]({})",
            update.to,
            compare_url(repo, previous, &single_package_tag(&update.to))
        ),
        _ => update.to.clone(),
    };
    let mut output = format!("### {title}\n\n");
    push_commit_lines(&mut output, update, options);
    output
}

fn render_workspace(updates: &[VersionUpdate], options: &RenderOptions<'_>) -> String {
    let date = release_title(options.date);
    let title = match (options.github_repository, options.previous_tag) {
        (Some(repo), Some(previous)) => format!(
            "[{date}]({})",
            compare_url(repo, previous, &consolidated_tag(options.date))
        ),
        _ => date,
    };
    let sections = updates
        .iter()
        .map(|u| module_section(u, "####", &u.to, options))
        .collect::<Vec<_>>()
        .join("\n");
    format!("### {title}\n\n{sections}")
}

fn render_individual_package(update: &VersionUpdate, options: &RenderOptions<'_>) -> String {
    let version = match options.github_repository {
        Some(repo) if options.individual_tags && !update.is_new_module() => format!(
            "[{}]({})",
            update.to,
            compare_url(
                repo,
                &individual_tag(update.module(), &update.from),
                &individual_tag(update.module(), &update.to)
            )
        ),
        Some(repo) if !options.individual_tags => match options.previous_tag {
            Some(previous) => format!(
                "[{}]({})",
                update.to,
                compare_url(repo, previous, &consolidated_tag(options.date))
            ),
            None => update.to.clone(),
        },
        _ => update.to.clone(),
    };
    module_section(update, "###", &version, options)
}

fn module_section(update: &VersionUpdate, level: &str, version: &str, options: &RenderOptions<'_>) -> String {
    let mut output = format!("{level} {} {version} ({})\n\n", update.module(), update.diff);
    push_commit_lines(&mut output, update, options);
    output
}

fn push_commit_lines(output: &mut String, update: &VersionUpdate, options: &RenderOptions<'_>) {
    for tagged in &update.summary.commits {
        let _ = writeln!(output, "- {}", commit_line(&tagged.commit, options.github_repository));
    }
}

fn commit_line(commit: &Commit, repo: Option<&str>) -> String {
    match repo {
        Some(repo) if !commit.hash.is_empty() => format!(
            "{} ([{}](https://github.com/{repo}/commit/{}))",
            commit.subject,
            commit.short_hash(),
            commit.hash
        ),
        _ => commit.subject.clone(),
    }
}

/// Parse a rendered module heading such as `#### @std/foo 1.1.0 (minor)`.
///
/// Linked versions (`[1.1.0](...)`) are accepted; when the link compares
/// `<module>@<from>...<module>@<to>`, the previous version is recovered too.
#[must_use]
pub fn parse_module_heading(line: &str) -> Option<ModuleHeading> {
    let caps = HEADING_PATTERN.captures(line.trim_end())?;
    let module = caps["module"].to_string();
    let diff = caps["diff"].parse().ok()?;
    let to = caps
        .name("linked")
        .or_else(|| caps.name("plain"))?
        .as_str()
        .to_string();
    let from = caps.name("url").and_then(|url| {
        let (_, range) = url.as_str().rsplit_once("/compare/")?;
        let (left, _) = range.split_once("...")?;
        left.strip_prefix(&format!("{module}@")).map(str::to_string)
    });
    Some(ModuleHeading {
        module,
        from,
        to,
        diff,
    })
}

/// Place freshly rendered notes above the existing file content.
#[must_use]
pub fn prepend_release_notes(new_notes: &str, existing: &str) -> String {
    if existing.trim().is_empty() {
        new_notes.to_string()
    } else {
        format!("{new_notes}\n{existing}")
    }
}

/// Render the body of the release pull request.
#[must_use]
pub fn pr_body(updates: &[VersionUpdate], diagnostics: &[Diagnostic], options: &RenderOptions<'_>) -> String {
    let mut output = String::new();

    if updates.is_empty() {
        output.push_str("No version updates were detected.\n");
    } else {
        output.push_str("The following updates are detected:\n\n");
        output.push_str("| module | from | to | type |\n");
        output.push_str("|--------|------|----|------|\n");
        for update in updates {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                update.module(),
                update.from,
                update.to,
                update.diff
            );
        }
        output.push_str("\nPlease ensure:\n");
        output.push_str("- [ ] Versions in the manifest files are updated correctly\n");
        output.push_str("- [ ] Release notes are updated correctly\n");
    }

    let sections = [
        (
            "unknown_commit",
            "Unknown commits",
            "The following commits are not recognized. Please handle them manually if necessary:",
        ),
        (
            "missing_range",
            "Missing module scope",
            "The following commits do not name the modules they affect. Please handle them manually if necessary:",
        ),
        (
            "unknown_range_commit",
            "Unknown modules",
            "The following commits name modules that do not exist. Please handle them manually if necessary:",
        ),
        (
            "skipped_commit",
            "Skipped commits",
            "The following commits were not counted towards any module. Please handle them manually if necessary:",
        ),
    ];

    for (kind, title, intro) in sections {
        let matching: Vec<&Diagnostic> = diagnostics.iter().filter(|d| d.kind() == kind).collect();
        if matching.is_empty() {
            continue;
        }
        let _ = write!(output, "\n### {title}\n\n{intro}\n\n");
        for diagnostic in matching {
            let commit = diagnostic.commit();
            match options.github_repository {
                Some(repo) if !commit.hash.is_empty() => {
                    let _ = writeln!(
                        output,
                        "- [{}](https://github.com/{repo}/commit/{}): {}",
                        commit.short_hash(),
                        commit.hash,
                        commit.subject
                    );
                }
                _ => {
                    let _ = writeln!(output, "- {}", commit.subject);
                }
            }
        }
    }

    output
}
