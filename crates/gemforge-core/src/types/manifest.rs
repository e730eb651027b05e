//! o3de_manifest.json record (the per-user manifest)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The per-user manifest listing locally registered engines, projects,
/// and gem paths. Every field is optional; a missing manifest file is an
/// empty default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestRecord {
    /// Absolute paths to registered engine roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engines: Option<Vec<PathBuf>>,

    /// Absolute paths to registered project roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<PathBuf>>,

    /// Absolute paths to user-registered gem roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_subdirectories: Option<Vec<PathBuf>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<PathBuf>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repos: Option<Vec<PathBuf>>,

    /// Map of engine name to engine root, kept alongside `engines`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engines_path: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_engines_folder: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_projects_folder: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_gems_folder: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_templates_folder: Option<PathBuf>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ManifestRecord {
    pub fn projects(&self) -> &[PathBuf] {
        self.projects.as_deref().unwrap_or_default()
    }

    pub fn external_subdirectories(&self) -> &[PathBuf] {
        self.external_subdirectories.as_deref().unwrap_or_default()
    }

    /// All registered engine roots: the `engines` list plus every path in
    /// the `engines_path` map, deduplicated in order.
    pub fn engine_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.engines.clone().unwrap_or_default();
        if let Some(by_name) = &self.engines_path {
            for value in by_name.values() {
                if let Some(raw) = value.as_str() {
                    let path = PathBuf::from(raw);
                    if !paths.contains(&path) {
                        paths.push(path);
                    }
                }
            }
        }
        paths
    }
}
