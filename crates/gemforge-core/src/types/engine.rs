//! engine.json record

use std::path::PathBuf;

use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::version::parse_loose_version;

/// A parsed engine.json document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineRecord {
    pub engine_name: String,

    /// Dotted version string
    pub version: String,

    /// Named facets of the engine's stable API, mapping facet name to a
    /// version string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_versions: Option<Map<String, Value>>,

    /// Relative paths to gem roots shipped with the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_subdirectories: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Engine root directory, set on read
    #[serde(skip)]
    pub path: PathBuf,
}

impl EngineRecord {
    /// Parsed engine version; malformed versions are logged and treated
    /// as 0.0.0
    pub fn version(&self) -> Version {
        parse_loose_version(&self.version).unwrap_or_else(|_| {
            warn!(
                "Engine '{}' has malformed version '{}'",
                self.engine_name, self.version
            );
            Version::new(0, 0, 0)
        })
    }

    /// Version of a named API facet, if the engine exports it
    pub fn api_version(&self, name: &str) -> Option<Version> {
        let raw = self.api_versions.as_ref()?.get(name)?.as_str()?;
        match parse_loose_version(raw) {
            Ok(version) => Some(version),
            Err(_) => {
                warn!(
                    "Engine '{}' has malformed api_versions entry '{}': '{}'",
                    self.engine_name, name, raw
                );
                None
            }
        }
    }

    pub fn external_subdirectories(&self) -> &[String] {
        self.external_subdirectories.as_deref().unwrap_or_default()
    }
}
