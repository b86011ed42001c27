//! Commit classification and version bump engine.
//!
//! This crate turns a range of conventional commits into version updates for
//! the modules of a repository, and renders release notes for them. It
//! performs no I/O: commits and module records come in, plans and text come
//! out.
//!
//! # Architecture
//!
//! - [`version`] - Semver parsing, transition classification and increments
//! - [`classify`] - Commit subjects to per-module bump intents or diagnostics
//! - [`aggregate`] - One summary per module, at the highest requested severity
//! - [`resolve`] - Final `from`/`to`/`diff` per module
//! - [`render`] - Release notes and the release pull request body
//! - [`plan`] - The whole pipeline for one commit range
//! - [`tags`] - Git tag names for a release
//! - [`manifest`] - Version references in manifest text
//!
//! # Example
//!
//! ```rust
//! use relbump_engine::{Commit, ReleaseConfig, WorkspaceModule, plan_release};
//!
//! let modules = vec![
//!     WorkspaceModule::new("@std/bar", "1.0.0", "bar/deno.json"),
//!     WorkspaceModule::new("@std/foo", "1.0.0", "foo/deno.json"),
//! ];
//! let commits = vec![Commit::new("", "feat(foo): add x", "")];
//!
//! let plan = plan_release(&commits, &modules, &modules, &ReleaseConfig::default())?;
//! assert_eq!(plan.updates[0].to, "1.1.0");
//! # Ok::<(), relbump_engine::Error>(())
//! ```

#![warn(missing_docs)]

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod manifest;
pub mod module;
pub mod plan;
pub mod render;
pub mod resolve;
pub mod tags;
pub mod version;

pub use aggregate::{BumpSummary, TaggedCommit, aggregate};
pub use classify::{
    BumpIntent, Classification, ClassificationReport, CommitClassifier, Diagnostic, classify,
};
pub use config::{NotesMode, ReleaseConfig};
pub use error::{Error, Result};
pub use manifest::{rewrite_references, rewrite_version};
pub use module::{Commit, WorkspaceModule, find_module, validate_modules};
pub use plan::{ModuleFailure, ReleasePlan, plan_release};
pub use render::{
    ModuleHeading, ModuleNotes, RenderContext, RenderOptions, parse_module_heading, pr_body,
    prepend_release_notes, render, render_per_module,
};
pub use resolve::{VersionUpdate, resolve};
pub use tags::TagStrategy;
pub use version::{BumpKind, Version, VersionDiff, classify_transition};
