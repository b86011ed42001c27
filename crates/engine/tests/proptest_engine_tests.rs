//! Property-based tests for the version engine.
//!
//! These tests verify the behavioral contracts of the engine:
//! - Transition classification names the field that changed
//! - 0.x and prerelease versions are never bumped by commit severity alone
//! - Aggregation does not depend on intent order
//! - Rendered headings parse back to the values they were rendered from

// Integration tests can use unwrap/expect for cleaner assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::NaiveDate;
use proptest::prelude::*;
use relbump_engine::{
    BumpIntent, BumpKind, BumpSummary, Commit, RenderContext, RenderOptions, VersionDiff,
    VersionUpdate, WorkspaceModule, aggregate, classify_transition, parse_module_heading, render,
    resolve,
};

// =============================================================================
// Strategies for generating test data
// =============================================================================

fn triple_strategy() -> impl Strategy<Value = (u64, u64, u64)> {
    (0..50_u64, 0..50_u64, 0..50_u64)
}

fn bump_kind_strategy() -> impl Strategy<Value = BumpKind> {
    prop_oneof![
        Just(BumpKind::Patch),
        Just(BumpKind::Minor),
        Just(BumpKind::Major),
    ]
}

fn prerelease_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "(alpha|beta|rc)\\.[0-9]{1,3}".prop_map(String::from),
        "[1-9][0-9]{0,2}".prop_map(String::from),
        "(alpha|beta|rc)".prop_map(String::from),
    ]
}

fn intent_strategy() -> impl Strategy<Value = BumpIntent> {
    (
        proptest::sample::select(vec!["@std/foo", "@std/bar", "baz"]),
        proptest::sample::select(vec!["BREAKING", "feat", "fix", "docs", "chore", "ci", "build"]),
        bump_kind_strategy(),
        "[a-z ]{1,12}",
    )
        .prop_map(|(module, tag, version, description)| BumpIntent {
            module: module.to_string(),
            tag: tag.to_string(),
            version,
            commit: Commit::new("", format!("{tag}: {description}"), ""),
        })
}

fn intents_and_permutation() -> impl Strategy<Value = (Vec<BumpIntent>, Vec<BumpIntent>)> {
    proptest::collection::vec(intent_strategy(), 0..30)
        .prop_flat_map(|intents| (Just(intents.clone()), Just(intents).prop_shuffle()))
}

fn module_name_strategy() -> impl Strategy<Value = String> {
    "(@[a-z]{1,6}/)?[a-z][a-z0-9_-]{0,10}".prop_map(String::from)
}

fn version_diff_strategy() -> impl Strategy<Value = VersionDiff> {
    prop_oneof![
        Just(VersionDiff::Major),
        Just(VersionDiff::Minor),
        Just(VersionDiff::Patch),
        Just(VersionDiff::Prerelease),
    ]
}

// =============================================================================
// Helper Functions
// =============================================================================

fn summary(version: BumpKind) -> BumpSummary {
    BumpSummary {
        module: "foo".to_string(),
        version,
        commits: Vec::new(),
    }
}

fn module(version: &str) -> WorkspaceModule {
    WorkspaceModule::new("foo", version, "foo/deno.json")
}

/// The parts of a summary that must not depend on input order.
fn shape(summaries: &[BumpSummary]) -> Vec<(String, BumpKind, Vec<String>, Vec<String>)> {
    summaries
        .iter()
        .map(|s| {
            let tags = s.commits.iter().map(|c| c.tag.clone()).collect();
            let mut subjects: Vec<String> =
                s.commits.iter().map(|c| c.commit.subject.clone()).collect();
            subjects.sort();
            (s.module.clone(), s.version, tags, subjects)
        })
        .collect()
}

// =============================================================================
// Property Tests: Version Arithmetic
// =============================================================================

proptest! {
    /// Contract: raising exactly one numeric field is classified as that field.
    #[test]
    fn single_field_increase_is_named(
        (major, minor, patch) in triple_strategy(),
        field in 0..3_usize,
        step in 1..10_u64,
    ) {
        let old = format!("{major}.{minor}.{patch}");
        let (new, expected) = match field {
            0 => (format!("{}.{minor}.{patch}", major + step), VersionDiff::Major),
            1 => (format!("{major}.{}.{patch}", minor + step), VersionDiff::Minor),
            _ => (format!("{major}.{minor}.{}", patch + step), VersionDiff::Patch),
        };
        prop_assert_eq!(classify_transition(&new, &old).unwrap(), expected);
    }

    /// Contract: an identical release version is never a valid transition.
    #[test]
    fn identical_versions_error((major, minor, patch) in triple_strategy()) {
        let version = format!("{major}.{minor}.{patch}");
        prop_assert!(classify_transition(&version, &version).is_err());
    }
}

// =============================================================================
// Property Tests: Version Resolver
// =============================================================================

proptest! {
    /// Contract: 0.x modules downgrade commit severity one step.
    #[test]
    fn zero_major_downgrades(
        minor in 0..50_u64,
        patch in 0..50_u64,
        kind in bump_kind_strategy(),
    ) {
        let version = format!("0.{minor}.{patch}");
        let update = resolve(&summary(kind), &module(&version), Some(&module(&version))).unwrap();
        let expected = match kind {
            BumpKind::Major => VersionDiff::Minor,
            BumpKind::Minor | BumpKind::Patch => VersionDiff::Patch,
        };
        prop_assert_eq!(update.diff, expected);
    }

    /// Contract: a prerelease module always resolves to a prerelease step.
    #[test]
    fn prerelease_always_wins(
        (major, minor, patch) in triple_strategy(),
        pre in prerelease_strategy(),
        kind in bump_kind_strategy(),
    ) {
        let version = format!("{major}.{minor}.{patch}-{pre}");
        let update = resolve(&summary(kind), &module(&version), Some(&module(&version))).unwrap();
        prop_assert_eq!(update.diff, VersionDiff::Prerelease);
        prop_assert_ne!(update.to, version);
    }
}

// =============================================================================
// Property Tests: Aggregation
// =============================================================================

proptest! {
    /// Contract: permuting the intents yields the same summaries.
    #[test]
    fn aggregate_is_order_independent((intents, shuffled) in intents_and_permutation()) {
        let a = aggregate(&intents);
        let b = aggregate(&shuffled);
        prop_assert_eq!(shape(&a), shape(&b));
    }

    /// Contract: a summary's severity is the maximum of its intents.
    #[test]
    fn aggregate_takes_maximum(intents in proptest::collection::vec(intent_strategy(), 1..30)) {
        for summary in aggregate(&intents) {
            let expected = intents
                .iter()
                .filter(|i| i.module == summary.module)
                .map(|i| i.version)
                .max()
                .unwrap();
            prop_assert_eq!(summary.version, expected);
        }
    }
}

// =============================================================================
// Property Tests: Rendering
// =============================================================================

proptest! {
    /// Contract: a rendered module heading parses back to its update.
    #[test]
    fn heading_round_trip(
        name in module_name_strategy(),
        (major, minor, patch) in triple_strategy(),
        diff in version_diff_strategy(),
        linked in any::<bool>(),
    ) {
        let update = VersionUpdate {
            from: format!("{}.{minor}.{patch}", major + 1),
            to: format!("{}.{minor}.{patch}", major + 2),
            diff,
            path: "deno.json".into(),
            summary: BumpSummary {
                module: name.clone(),
                version: BumpKind::Patch,
                commits: Vec::new(),
            },
        };
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let options = RenderOptions::new(date)
            .with_repository(linked.then_some("o/r"))
            .with_individual_tags(true);
        let text = render(&[update.clone()], RenderContext::IndividualPackage, &options);
        let heading = parse_module_heading(text.lines().next().unwrap()).unwrap();

        prop_assert_eq!(heading.module, name);
        prop_assert_eq!(heading.to, update.to);
        prop_assert_eq!(heading.diff, update.diff);
        if linked {
            prop_assert_eq!(heading.from, Some(update.from));
        }
    }

    /// Contract: every module heading of a workspace section parses back.
    #[test]
    fn workspace_heading_round_trip(
        names in proptest::collection::btree_set(module_name_strategy(), 1..5),
        (major, minor, patch) in triple_strategy(),
        diff in version_diff_strategy(),
        linked in any::<bool>(),
    ) {
        let updates: Vec<VersionUpdate> = names
            .iter()
            .map(|name| VersionUpdate {
                from: format!("{}.{minor}.{patch}", major + 1),
                to: format!("{}.{minor}.{patch}", major + 2),
                diff,
                path: "deno.json".into(),
                summary: BumpSummary {
                    module: name.clone(),
                    version: BumpKind::Patch,
                    commits: Vec::new(),
                },
            })
            .collect();
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let options = RenderOptions::new(date)
            .with_repository(linked.then_some("o/r"))
            .with_previous_tag(linked.then_some("release-2024.06.01"));
        let text = render(&updates, RenderContext::Workspace, &options);
        let headings: Vec<_> = text
            .lines()
            .filter(|line| line.starts_with("#### "))
            .map(|line| parse_module_heading(line).unwrap())
            .collect();

        prop_assert_eq!(headings.len(), updates.len());
        for (heading, update) in headings.iter().zip(&updates) {
            prop_assert_eq!(&heading.module, update.module());
            prop_assert_eq!(&heading.to, &update.to);
            prop_assert_eq!(heading.diff, update.diff);
            prop_assert_eq!(&heading.from, &None);
        }
    }
}
