//! End-to-end scenarios for classification and resolution.

// Integration tests can use unwrap/expect for cleaner assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use relbump_engine::{
    BumpKind, BumpSummary, Classification, Commit, Diagnostic, VersionDiff, WorkspaceModule,
    classify, resolve,
};

fn modules(names: &[&str]) -> Vec<WorkspaceModule> {
    names
        .iter()
        .map(|n| WorkspaceModule::new(*n, "1.0.0", format!("{n}/deno.json")))
        .collect()
}

fn commit(subject: &str) -> Commit {
    Commit::new("4b825dc642cb6eb9a060e54bf8d69288fbee4904", subject, "")
}

fn summary(module: &str, version: BumpKind) -> BumpSummary {
    BumpSummary {
        module: module.to_string(),
        version,
        commits: Vec::new(),
    }
}

#[test]
fn test_scoped_feature_targets_one_module() {
    let Classification::Intents(intents) = classify(&commit("feat(foo): add x"), &modules(&["foo", "bar"])) else {
        panic!("expected intents");
    };
    assert_eq!(intents.len(), 1);
    assert_eq!(intents[0].module, "foo");
    assert_eq!(intents[0].tag, "feat");
    assert_eq!(intents[0].version, BumpKind::Minor);
}

#[test]
fn test_wildcard_fix_targets_every_module() {
    let Classification::Intents(intents) = classify(&commit("fix(*): patch all"), &modules(&["foo", "bar"])) else {
        panic!("expected intents");
    };
    assert_eq!(intents.len(), 2);
    for intent in &intents {
        assert_eq!(intent.tag, "fix");
        assert_eq!(intent.version, BumpKind::Patch);
    }
    let mut names: Vec<_> = intents.iter().map(|i| i.module.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["bar", "foo"]);
}

#[test]
fn test_scopeless_chore_in_workspace_is_skipped() {
    let result = classify(&commit("chore: tidy"), &modules(&["foo", "bar"]));
    assert!(matches!(
        result,
        Classification::Diagnostic(Diagnostic::SkippedCommit { .. })
    ));
}

#[test]
fn test_scopeless_chore_in_single_package_targets_it() {
    let Classification::Intents(intents) = classify(&commit("chore: tidy"), &modules(&["foo"])) else {
        panic!("expected intents");
    };
    assert_eq!(intents.len(), 1);
    assert_eq!(intents[0].module, "foo");
    assert_eq!(intents[0].tag, "chore");
    assert_eq!(intents[0].version, BumpKind::Patch);
}

#[test]
fn test_unchanged_module_takes_commit_severity() {
    let current = WorkspaceModule::new("foo", "1.0.0", "foo/deno.json");
    let previous = current.clone();
    let update = resolve(&summary("foo", BumpKind::Minor), &current, Some(&previous)).unwrap();
    assert_eq!(update.from, "1.0.0");
    assert_eq!(update.to, "1.1.0");
    assert_eq!(update.diff, VersionDiff::Minor);
}

#[test]
fn test_zero_major_downgrades_breaking_change() {
    let current = WorkspaceModule::new("foo", "0.0.0", "foo/deno.json");
    let previous = current.clone();
    let update = resolve(&summary("foo", BumpKind::Major), &current, Some(&previous)).unwrap();
    assert_eq!(update.from, "0.0.0");
    assert_eq!(update.to, "0.1.0");
    assert_eq!(update.diff, VersionDiff::Minor);
}

#[test]
fn test_unknown_scope_becomes_unknown_range_commit() {
    let mods = modules(&["foo", "bar"]);
    let report = relbump_engine::CommitClassifier::new()
        .classify_all(&[commit("fix(foo,nope): x")], &mods);
    assert_eq!(report.intents.len(), 1);
    assert_eq!(report.diagnostics.len(), 1);
    assert!(matches!(
        report.diagnostics[0],
        Diagnostic::UnknownRangeCommit { .. }
    ));
    assert!(report.diagnostics[0].reason().contains("nope"));
}
