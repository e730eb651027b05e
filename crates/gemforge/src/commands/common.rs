//! Shared helpers for the enable/disable commands

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;
use walkdir::WalkDir;

use gemforge_core::error::Error;
use gemforge_core::identifier::ObjectIdentifier;
use gemforge_core::json;
use gemforge_core::types::{GemRecord, ProjectRecord};
use gemforge_registry::{GemRegistry, UserManifest};

/// One gem the command will act on. `record` is populated when the gem
/// was located by path so the resolver can see unregistered gems.
#[derive(Debug)]
pub struct GemTarget {
    pub id: ObjectIdentifier,
    pub record: Option<GemRecord>,
}

/// Load the project from an explicit path or by registered name
pub fn load_project(
    manifest: &UserManifest,
    path: Option<&Path>,
    name: Option<&str>,
) -> Result<ProjectRecord> {
    if let Some(path) = path {
        return Ok(json::read_project(&path.join(json::PROJECT_FILE))?);
    }
    if let Some(name) = name {
        return Ok(manifest.find_project(name)?);
    }
    Err(Error::argument("either --project-path or --project-name is required").into())
}

/// Resolve `--gem-path` to a target carrying the gem's record
pub fn target_from_path(path: &Path) -> Result<GemTarget> {
    let record = json::read_gem(&path.join(json::GEM_FILE))?;
    Ok(GemTarget {
        id: ObjectIdentifier::unrestricted(&record.gem_name),
        record: Some(record),
    })
}

/// Resolve `--all-gem-paths` directories to one target per discovered
/// gem document. Unreadable documents are logged and skipped.
pub fn targets_from_scan(dirs: &[PathBuf]) -> Result<Vec<GemTarget>> {
    let mut targets = Vec::new();
    for dir in dirs {
        for gem_json in find_gem_documents(dir) {
            match json::read_gem(&gem_json) {
                Ok(record) => targets.push(GemTarget {
                    id: ObjectIdentifier::unrestricted(&record.gem_name),
                    record: Some(record),
                }),
                Err(err) => crate::output::warning(&format!(
                    "Skipping unreadable gem at {}: {}",
                    gem_json.display(),
                    err
                )),
            }
        }
    }
    if targets.is_empty() {
        return Err(Error::argument("no gems found under the given paths").into());
    }
    Ok(targets)
}

/// Check a `--gem-name` target against the registry. The resolver would
/// reject an unknown name anyway; failing here gives a direct message.
pub fn target_from_name(name: &str, registry: &GemRegistry) -> Result<GemTarget> {
    let id = ObjectIdentifier::parse(name)?;
    if registry.find_best(&id).is_none() {
        return Err(Error::not_found("Gem", name).into());
    }
    Ok(GemTarget { id, record: None })
}

/// Every gem.json under `root`, skipping template subtrees
fn find_gem_documents(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let is_template_root =
                entry.file_type().is_dir() && entry.path().join(json::TEMPLATE_FILE).exists();
            if is_template_root {
                debug!("Skipping template subtree {}", entry.path().display());
            }
            !is_template_root
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == json::GEM_FILE)
        .map(|entry| entry.into_path())
        .collect()
}
