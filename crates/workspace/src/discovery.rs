//! Module discovery from Deno and npm manifests.

use crate::error::{Error, Result};
use crate::source::{ManifestSource, normalize_pattern};
use relbump_engine::WorkspaceModule;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Manifest file names, in lookup order.
pub const MANIFEST_FILES: &[&str] = &["deno.json", "package.json"];

/// A parsed manifest and where it was found.
struct Manifest {
    path: PathBuf,
    json: Value,
}

impl Manifest {
    fn string_field(&self, field: &str) -> Option<&str> {
        self.json.get(field).and_then(Value::as_str).filter(|s| !s.trim().is_empty())
    }

    fn module(&self) -> Result<WorkspaceModule> {
        let name = self.string_field("name").ok_or_else(|| {
            Error::config(
                format!("{} has no \"name\" field", self.path.display()),
                "Every released package needs a \"name\" in its manifest",
                Some(self.path.clone()),
            )
        })?;
        let version = self.string_field("version").ok_or_else(|| {
            Error::config(
                format!("{} has no \"version\" field", self.path.display()),
                "Every released package needs a \"version\" in its manifest",
                Some(self.path.clone()),
            )
        })?;
        Ok(WorkspaceModule::new(name, version, self.path.clone()))
    }

    /// Member patterns, or `None` for a single package.
    fn members(&self) -> Result<Option<Vec<String>>> {
        let list = match (self.json.get("workspace"), self.json.get("workspaces")) {
            (Some(list), _) | (None, Some(list)) => list,
            (None, None) => return Ok(None),
        };
        // npm also accepts `{ "packages": [...] }`
        let list = list.get("packages").unwrap_or(list);

        let malformed = || {
            Error::config(
                format!("{} has a malformed workspace member list", self.path.display()),
                "The workspace field must be an array of directory paths or glob patterns",
                Some(self.path.clone()),
            )
        };
        let items = list.as_array().ok_or_else(malformed)?;
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(malformed))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

fn read_manifest(source: &dyn ManifestSource, dir: &Path) -> Result<Option<Manifest>> {
    for file in MANIFEST_FILES {
        let path = dir.join(file);
        if let Some(text) = source.read(&path)? {
            let json = serde_json::from_str(&text).map_err(|e| Error::Json {
                source: e,
                path: path.clone(),
            })?;
            return Ok(Some(Manifest { path, json }));
        }
    }
    Ok(None)
}

fn has_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Discover the modules of the repository snapshot behind `source`.
///
/// The root manifest decides the layout: a `workspace` (Deno) or
/// `workspaces` (npm) list makes each member a module, otherwise the root
/// package itself is the only module. Members matched by a glob without a
/// manifest are skipped; a literal member must have one.
///
/// # Errors
///
/// Returns a configuration error if there is no root manifest, the member
/// list is malformed, or a module lacks `name` or `version`.
pub fn discover_modules(source: &dyn ManifestSource) -> Result<Vec<WorkspaceModule>> {
    let root = read_manifest(source, Path::new(""))?.ok_or_else(|| {
        Error::config(
            format!("No deno.json or package.json found in {}", source.describe()),
            "Run relbump from the repository root, or pass --root",
            None,
        )
    })?;

    let Some(patterns) = root.members()? else {
        let module = root.module()?;
        info!(name = %module.name, version = %module.version, "Discovered single package");
        return Ok(vec![module]);
    };

    let mut modules = Vec::new();
    for pattern in &patterns {
        let dirs = source.expand(pattern)?;
        if dirs.is_empty() && !has_glob(pattern) {
            return Err(Error::config(
                format!("Workspace member '{pattern}' does not exist"),
                "Remove the member from the workspace list or create the directory",
                Some(root.path.clone()),
            ));
        }
        for dir in dirs {
            match read_manifest(source, &dir)? {
                Some(manifest) => modules.push(manifest.module()?),
                None if has_glob(pattern) => {
                    debug!(dir = %dir.display(), "Skipping member without manifest");
                }
                None => {
                    return Err(Error::config(
                        format!(
                            "Workspace member '{}' has no deno.json or package.json",
                            normalize_pattern(pattern)
                        ),
                        "Every workspace member needs a manifest with a name and version",
                        Some(dir),
                    ));
                }
            }
        }
    }

    modules.sort_by(|a, b| a.name.cmp(&b.name));
    modules.dedup_by(|a, b| a.name == b.name && a.config_path == b.config_path);
    info!(
        count = modules.len(),
        source = %source.describe(),
        "Discovered workspace modules"
    );
    Ok(modules)
}
