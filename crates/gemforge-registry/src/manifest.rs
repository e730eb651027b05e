//! Per-user manifest management
//!
//! The manifest lists locally registered engines, projects, and gem
//! paths. Located at `$O3DE_HOME/o3de_manifest.json` (default
//! `~/.o3de/o3de_manifest.json`). A missing file is an empty manifest,
//! not an error.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use gemforge_core::error::{Error, Result};
use gemforge_core::json;
use gemforge_core::paths;
use gemforge_core::types::{EngineRecord, ManifestRecord, ProjectRecord};

/// The loaded per-user manifest plus lookups over what it registers
pub struct UserManifest {
    record: ManifestRecord,
    path: PathBuf,
}

impl UserManifest {
    /// Load a manifest file; an absent file yields an empty default
    pub fn load(path: &Path) -> Result<Self> {
        let record = if path.exists() {
            json::read_manifest(path)?
        } else {
            debug!(
                "No manifest at {}, starting from an empty one",
                path.display()
            );
            ManifestRecord::default()
        };
        Ok(Self {
            record,
            path: path.to_path_buf(),
        })
    }

    /// Load from the default location (`$O3DE_HOME` / `~/.o3de`)
    pub fn load_default() -> Result<Self> {
        Self::load(&paths::manifest_path()?)
    }

    pub fn record(&self) -> &ManifestRecord {
        &self.record
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Find a registered project by its `project_name`. Unreadable
    /// project documents are logged and skipped.
    pub fn find_project(&self, name: &str) -> Result<ProjectRecord> {
        for root in self.record.projects() {
            let project_json = root.join(json::PROJECT_FILE);
            match json::read_project(&project_json) {
                Ok(record) if record.project_name == name => return Ok(record),
                Ok(_) => {}
                Err(err) => warn!("Skipping unreadable project at {}: {}", root.display(), err),
            }
        }
        Err(Error::not_found("Project", name))
    }

    /// All registered engine records. Unreadable engine documents are
    /// logged and skipped.
    pub fn engines(&self) -> Vec<EngineRecord> {
        self.record
            .engine_paths()
            .iter()
            .filter_map(
                |root| match json::read_engine(&root.join(json::ENGINE_FILE)) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        warn!("Skipping unreadable engine at {}: {}", root.display(), err);
                        None
                    }
                },
            )
            .collect()
    }

    /// Resolve the engine a project targets. The project's `engine`
    /// identifier must match on name and specifier; among matching
    /// registered engines the highest version wins.
    pub fn resolve_project_engine(&self, project: &ProjectRecord) -> Result<EngineRecord> {
        let id = project.engine_id()?;
        let mut best: Option<EngineRecord> = None;
        for engine in self.engines() {
            if engine.engine_name != id.name || !id.matches(&engine.version()) {
                continue;
            }
            let better = match &best {
                Some(current) => engine.version() > current.version(),
                None => true,
            };
            if better {
                best = Some(engine);
            }
        }
        best.ok_or_else(|| Error::not_found("Engine", project.engine.clone()))
    }
}
