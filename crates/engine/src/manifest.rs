//! Rewriting version references in manifest and import map text.

use regex::Regex;
use tracing::debug;

/// Rewrite a module's version in manifest or import map `text`.
///
/// Replaces the first `"version": "<old>"` field and every `<module>@<old>`
/// reference, keeping a `^` or `~` range prefix. References are only
/// replaced as whole tokens, so `foo@1.0.1` never touches `foo@1.0.10` or
/// `barfoo@1.0.1`.
#[must_use]
pub fn rewrite_version(text: &str, module: &str, old: &str, new: &str) -> String {
    let with_field = match version_field_pattern(old) {
        Some(field) => field
            .replacen(text, 1, |caps: &regex::Captures<'_>| {
                format!("{}{new}\"", &caps["key"])
            })
            .into_owned(),
        None => text.to_string(),
    };

    let rewritten = rewrite_references(&with_field, module, old, new);
    if rewritten != text {
        debug!(module, old, new, "Rewrote version references");
    }
    rewritten
}

fn version_field_pattern(old: &str) -> Option<Regex> {
    Regex::new(&format!(
        r#"(?P<key>"version"\s*:\s*"){}""#,
        regex::escape(old)
    ))
    .ok()
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/')
}

const fn is_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+')
}

/// Rewrite only the `<module>@<old>` references in `text`.
///
/// Use this for files other than the module's own manifest, such as a root
/// import map, where a `"version"` field belongs to something else.
#[must_use]
pub fn rewrite_references(text: &str, module: &str, old: &str, new: &str) -> String {
    let needle = format!("{module}@");
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut search = 0;

    while let Some(found) = text[search..].find(&needle) {
        let start = search + found;
        let after = start + needle.len();
        let version_start = after + usize::from(text[after..].starts_with(['^', '~']));
        let version_end = version_start + old.len();

        let lead_ok = text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_name_char(c));
        let token_ok = text[version_start..].starts_with(old)
            && text[version_end..]
                .chars()
                .next()
                .is_none_or(|c| !is_version_char(c));

        if lead_ok && token_ok {
            out.push_str(&text[copied..version_start]);
            out.push_str(new);
            copied = version_end;
            search = version_end;
        } else {
            search = after;
        }
    }

    out.push_str(&text[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_manifest_version_field() {
        let text = "{\n  \"name\": \"@std/foo\",\n  \"version\": \"1.0.0\",\n  \"exports\": \"./mod.ts\"\n}\n";
        let out = rewrite_version(text, "@std/foo", "1.0.0", "1.1.0");
        assert!(out.contains("\"version\": \"1.1.0\""));
        assert!(!out.contains("1.0.0"));
    }

    #[test]
    fn test_rewrite_import_map_references() {
        let text = r#"{
  "imports": {
    "@std/foo": "jsr:@std/foo@^1.0.0",
    "@std/foo/tilde": "jsr:@std/foo@~1.0.0",
    "@std/foo/exact": "jsr:@std/foo@1.0.0",
    "@std/bar": "jsr:@std/bar@1.0.0"
  }
}"#;
        let out = rewrite_version(text, "@std/foo", "1.0.0", "2.0.0");
        assert!(out.contains("jsr:@std/foo@^2.0.0"));
        assert!(out.contains("jsr:@std/foo@~2.0.0"));
        assert!(out.contains("jsr:@std/foo@2.0.0"));
        assert!(out.contains("jsr:@std/bar@1.0.0"));
    }

    #[test]
    fn test_rewrite_respects_token_boundaries() {
        let text = "foo@1.0.10 barfoo@1.0.1 @x/foo@1.0.1 foo@1.0.1-rc.1 foo@1.0.1 foo@1.0.1";
        let out = rewrite_version(text, "foo", "1.0.1", "1.0.2");
        assert_eq!(
            out,
            "foo@1.0.10 barfoo@1.0.1 @x/foo@1.0.1 foo@1.0.1-rc.1 foo@1.0.2 foo@1.0.2"
        );
    }

    #[test]
    fn test_rewrite_only_first_version_field() {
        let text = r#"{"version": "1.0.0", "nested": {"version": "1.0.0"}}"#;
        let out = rewrite_version(text, "foo", "1.0.0", "1.0.1");
        assert_eq!(out, r#"{"version": "1.0.1", "nested": {"version": "1.0.0"}}"#);
    }

    #[test]
    fn test_rewrite_references_leaves_version_field() {
        let text = r#"{"version": "1.0.0", "imports": {"a": "jsr:a@1.0.0"}}"#;
        let out = rewrite_references(text, "a", "1.0.0", "1.0.1");
        assert_eq!(out, r#"{"version": "1.0.0", "imports": {"a": "jsr:a@1.0.1"}}"#);
    }

    #[test]
    fn test_rewrite_without_matches_is_identity() {
        let text = "nothing to see";
        assert_eq!(rewrite_version(text, "foo", "1.0.0", "1.0.1"), text);
    }
}
