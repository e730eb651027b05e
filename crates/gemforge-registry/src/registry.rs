//! Gem discovery and the candidate pool
//!
//! Traversal is breadth-first and deterministic: the seed set is the
//! union of the manifest's, project's, and engine's external
//! subdirectories, and each discovered gem's own external
//! subdirectories extend the frontier. Paths are canonicalized so a gem
//! reachable through several routes is recorded once, at its first
//! discovery position. That position is the resolver's tie-break order.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use gemforge_core::identifier::ObjectIdentifier;
use gemforge_core::json;
use gemforge_core::types::{EngineRecord, GemRecord, ProjectRecord};

use crate::manifest::UserManifest;

/// The assembled candidate pool: every reachable gem record, indexed by
/// name (an ordered list per name) and by canonical path.
#[derive(Debug, Clone, Default)]
pub struct GemRegistry {
    records: Vec<GemRecord>,
    by_name: HashMap<String, Vec<usize>>,
    by_path: HashMap<PathBuf, usize>,
}

impl GemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discover every gem reachable from the manifest plus the given
    /// project and engine.
    pub fn discover(
        manifest: &UserManifest,
        project: Option<&ProjectRecord>,
        engine: Option<&EngineRecord>,
    ) -> Self {
        let mut seeds: Vec<PathBuf> = manifest
            .record()
            .external_subdirectories()
            .iter()
            .cloned()
            .collect();
        if let Some(project) = project {
            seeds.extend(
                project
                    .external_subdirectories()
                    .iter()
                    .map(|rel| project.path.join(rel)),
            );
        }
        if let Some(engine) = engine {
            seeds.extend(
                engine
                    .external_subdirectories()
                    .iter()
                    .map(|rel| engine.path.join(rel)),
            );
        }
        Self::scan(seeds)
    }

    /// Breadth-first traversal over a seed set of directories.
    ///
    /// A directory with a `template.json` at its root halts descent; a
    /// directory without a `gem.json` is skipped; an unreadable
    /// `gem.json` is logged and skipped so one bad document cannot sink
    /// a large scan.
    pub fn scan(seeds: Vec<PathBuf>) -> Self {
        let mut registry = Self::new();
        let mut frontier: VecDeque<PathBuf> = seeds.into();
        let mut visited: HashSet<PathBuf> = HashSet::new();

        while let Some(dir) = frontier.pop_front() {
            let Ok(root) = fs::canonicalize(&dir) else {
                debug!("Skipping missing gem directory {}", dir.display());
                continue;
            };
            if !visited.insert(root.clone()) {
                continue;
            }

            let template_json = root.join(json::TEMPLATE_FILE);
            if template_json.exists() {
                match json::read_template(&template_json) {
                    Ok(template) => debug!(
                        "Halting descent at template '{}' ({})",
                        template.template_name,
                        root.display()
                    ),
                    Err(err) => debug!("Halting descent at {}: {}", root.display(), err),
                }
                continue;
            }

            let gem_json = root.join(json::GEM_FILE);
            if !gem_json.exists() {
                debug!("No gem.json under {}", root.display());
                continue;
            }
            match json::read_gem(&gem_json) {
                Ok(record) => {
                    for rel in record.external_subdirectories() {
                        frontier.push_back(root.join(rel));
                    }
                    registry.insert(record);
                }
                Err(err) => warn!("Skipping unreadable gem at {}: {}", root.display(), err),
            }
        }

        info!(
            "Discovered {} gem(s) across {} name(s)",
            registry.records.len(),
            registry.by_name.len()
        );
        registry
    }

    /// Insert a record. Records sharing a canonical path are the same
    /// record; records sharing `(name, version)` but not path are
    /// distinct candidates and both are retained.
    pub fn insert(&mut self, record: GemRecord) {
        if self.by_path.contains_key(&record.path) {
            return;
        }
        let index = self.records.len();
        self.by_path.insert(record.path.clone(), index);
        self.by_name
            .entry(record.gem_name.clone())
            .or_default()
            .push(index);
        self.records.push(record);
    }

    /// Candidates for a gem name, in first-discovery order
    pub fn candidates(&self, name: &str) -> Vec<&GemRecord> {
        self.by_name
            .get(name)
            .map(|indices| indices.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }

    pub fn has_candidates(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Look up a record by its gem root
    pub fn by_path(&self, path: &Path) -> Option<&GemRecord> {
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.by_path.get(&canonical).map(|&i| &self.records[i])
    }

    /// The highest-version candidate matching an identifier, ties going
    /// to the earlier discovery.
    pub fn find_best(&self, id: &ObjectIdentifier) -> Option<&GemRecord> {
        let mut best: Option<&GemRecord> = None;
        for record in self.candidates(&id.name) {
            if !id.matches(&record.version()) {
                continue;
            }
            let better = match best {
                Some(current) => record.version() > current.version(),
                None => true,
            };
            if better {
                best = Some(record);
            }
        }
        best
    }

    /// All records in first-discovery order
    pub fn records(&self) -> &[GemRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
