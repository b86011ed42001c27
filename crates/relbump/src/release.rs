//! The release command.
//!
//! Reads the repository, plans the release, and persists the result:
//! release notes, manifest versions and tags.

use crate::cli::Cli;
use chrono::{NaiveDate, Utc};
use miette::{IntoDiagnostic, Result};
use relbump_engine::tags::tags_for;
use relbump_engine::{
    ModuleFailure, ReleaseConfig, ReleasePlan, RenderContext, RenderOptions, VersionUpdate,
    plan_release, pr_body, prepend_release_notes, render, render_per_module, rewrite_references,
    rewrite_version,
};
use relbump_workspace::discovery::MANIFEST_FILES;
use relbump_workspace::{
    CommitSource, FsSource, Git, discover_historical_modules, discover_modules, load_config,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Tag patterns that mark a previous release.
const RELEASE_TAG_PATTERNS: &[&str] = &["v[0-9]*", "release-*"];

/// What a release run produced.
#[derive(Debug)]
pub struct ReleaseOutcome {
    /// Text for stdout: the pull request body, or the JSON plan.
    pub report: String,
    /// Modules that could not be resolved.
    pub failures: Vec<ModuleFailure>,
}

/// Release notes destined for one file.
#[derive(Debug, Clone, Serialize)]
struct NotesFile {
    path: PathBuf,
    text: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    plan: &'a ReleasePlan,
    notes: &'a [NotesFile],
    tags: &'a [String],
    dry_run: bool,
}

/// Merge command line overrides into the file configuration.
fn apply_overrides(mut config: ReleaseConfig, cli: &Cli) -> Result<ReleaseConfig> {
    if let Some(repo) = &cli.github_repository {
        config.github_repository = Some(repo.clone());
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if cli.individual_tags {
        config.individual_tags = true;
    }
    config.validate()?;
    Ok(config)
}

fn notes_files(
    plan: &ReleasePlan,
    context: RenderContext,
    options: &RenderOptions<'_>,
    config: &ReleaseConfig,
) -> Vec<NotesFile> {
    if plan.is_empty() {
        return Vec::new();
    }
    match context {
        RenderContext::IndividualPackage => {
            let file_name = Path::new(&config.release_notes)
                .file_name()
                .map_or_else(|| PathBuf::from(&config.release_notes), PathBuf::from);
            render_per_module(&plan.updates, options)
                .into_iter()
                .zip(&plan.updates)
                .map(|(notes, update)| NotesFile {
                    path: update
                        .path
                        .parent()
                        .map_or_else(|| file_name.clone(), |dir| dir.join(&file_name)),
                    text: notes.text,
                })
                .collect()
        }
        _ => vec![NotesFile {
            path: PathBuf::from(&config.release_notes),
            text: render(&plan.updates, context, options),
        }],
    }
}

fn write_notes(root: &Path, notes: &[NotesFile]) -> Result<()> {
    for file in notes {
        let path = root.join(&file.path);
        let existing = if path.is_file() {
            fs::read_to_string(&path).into_diagnostic()?
        } else {
            String::new()
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }
        fs::write(&path, prepend_release_notes(&file.text, &existing)).into_diagnostic()?;
        info!(path = %file.path.display(), "Updated release notes");
    }
    Ok(())
}

/// Rewrite every module manifest and the root manifests.
///
/// A module's own manifest gets its `"version"` field updated. Every file
/// gets its `<module>@<version>` references updated, since root manifests
/// carry import maps.
fn write_manifests(root: &Path, updates: &[VersionUpdate]) -> Result<()> {
    let files: BTreeSet<PathBuf> = updates
        .iter()
        .map(|u| u.path.clone())
        .chain(MANIFEST_FILES.iter().map(PathBuf::from))
        .collect();

    for file in files {
        let path = root.join(&file);
        if !path.is_file() {
            continue;
        }
        let original = fs::read_to_string(&path).into_diagnostic()?;
        let rewritten = updates.iter().fold(original.clone(), |text, update| {
            if update.from == update.to {
                text
            } else if update.path == file {
                rewrite_version(&text, update.module(), &update.from, &update.to)
            } else {
                rewrite_references(&text, update.module(), &update.from, &update.to)
            }
        });
        if rewritten != original {
            fs::write(&path, rewritten).into_diagnostic()?;
            info!(path = %file.display(), "Updated manifest");
        }
    }
    Ok(())
}

/// Run a release for the repository at `cli.root`.
///
/// # Errors
///
/// Returns an error for configuration problems, git failures, and files
/// that cannot be read or written. Modules that fail to resolve are
/// reported in the outcome instead.
pub fn execute_release(cli: &Cli) -> Result<ReleaseOutcome> {
    let root = cli.root.as_path();
    let config = apply_overrides(load_config(root)?, cli)?;
    let git = Git::new(root);

    let current = discover_modules(&FsSource::new(root))?;

    let start = match &cli.start {
        Some(start) => Some(start.clone()),
        None => git.latest_tag(RELEASE_TAG_PATTERNS, &cli.base)?,
    };
    let previous = match &start {
        Some(start) => discover_historical_modules(&git, start),
        None => {
            warn!("No start ref or release tag found, listing the whole history");
            Vec::new()
        }
    };
    let commits = git.commits_between(start.as_deref(), &cli.base)?;
    let plan = plan_release(&commits, &current, &previous, &config)?;

    let date: NaiveDate = cli.date.unwrap_or_else(|| Utc::now().date_naive());
    let context = config.mode.context(current.len());
    let options = RenderOptions::new(date)
        .with_repository(config.repository())
        .with_previous_tag(start.as_deref())
        .with_individual_tags(config.individual_tags);

    let notes = notes_files(&plan, context, &options, &config);
    let tags = tags_for(&plan.updates, config.tag_strategy(current.len()), date);

    if cli.dry_run {
        info!("Dry run, nothing written");
    } else {
        write_notes(root, &notes)?;
        write_manifests(root, &plan.updates)?;
        if cli.tag {
            for tag in &tags {
                git.create_tag(tag, &cli.base)?;
                info!(tag = %tag, "Created release tag");
            }
        }
    }

    let report = if cli.json {
        serde_json::to_string_pretty(&JsonReport {
            plan: &plan,
            notes: &notes,
            tags: &tags,
            dry_run: cli.dry_run,
        })
        .into_diagnostic()?
    } else {
        pr_body(&plan.updates, &plan.diagnostics, &options)
    };

    Ok(ReleaseOutcome {
        report,
        failures: plan.failures,
    })
}
