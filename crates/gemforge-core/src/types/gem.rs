//! gem.json record

use std::path::PathBuf;

use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;
use crate::identifier::{GemDependency, ObjectIdentifier};
use crate::version::parse_loose_version;

/// One entry in a `gem_names` or `dependencies` list: either a bare
/// identifier string (which may carry a specifier) or a tagged
/// `{name, optional}` record. The original shape is preserved so writes
/// re-serialize what was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GemNameEntry {
    Name(String),
    Tagged {
        name: String,
        #[serde(default)]
        optional: bool,
    },
}

impl GemNameEntry {
    /// Build a new entry; plain enables are stored as bare strings,
    /// optional ones as tagged records.
    pub fn new(name: impl Into<String>, optional: bool) -> Self {
        if optional {
            Self::Tagged {
                name: name.into(),
                optional: true,
            }
        } else {
            Self::Name(name.into())
        }
    }

    /// The raw identifier string, specifier included if present
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Tagged { name, .. } => name,
        }
    }

    pub fn optional(&self) -> bool {
        match self {
            Self::Name(_) => false,
            Self::Tagged { optional, .. } => *optional,
        }
    }

    /// Parse into a normalized dependency edge
    pub fn to_dependency(&self) -> Result<GemDependency> {
        Ok(GemDependency::new(
            ObjectIdentifier::parse(self.as_str())?,
            self.optional(),
        ))
    }
}

/// A parsed gem.json document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GemRecord {
    /// Gem name, the unit of dependency and activation
    pub gem_name: String,

    /// Dotted version string; absent means 0.0.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Gems this gem requires, with optional specifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<GemNameEntry>>,

    /// Engine identifiers this gem is known to work with; empty or
    /// absent means "any engine"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatible_engines: Option<Vec<String>>,

    /// Engine API facets this gem requires, e.g. `"framework==2.0.0"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_api_dependencies: Option<Vec<String>>,

    /// Relative paths to child gem roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_subdirectories: Option<Vec<String>>,

    /// Free-form metadata (display name, origin, license, tags, ...)
    /// preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Canonical gem root; identity for deduplication. Set on read.
    #[serde(skip)]
    pub path: PathBuf,
}

impl GemRecord {
    /// Parsed version, defaulting to 0.0.0 when absent. Malformed
    /// versions are logged and treated as 0.0.0.
    pub fn version(&self) -> Version {
        match &self.version {
            Some(raw) => parse_loose_version(raw).unwrap_or_else(|_| {
                warn!("Gem '{}' has malformed version '{}'", self.gem_name, raw);
                Version::new(0, 0, 0)
            }),
            None => Version::new(0, 0, 0),
        }
    }

    pub fn dependencies(&self) -> &[GemNameEntry] {
        self.dependencies.as_deref().unwrap_or_default()
    }

    pub fn compatible_engines(&self) -> &[String] {
        self.compatible_engines.as_deref().unwrap_or_default()
    }

    pub fn engine_api_dependencies(&self) -> &[String] {
        self.engine_api_dependencies.as_deref().unwrap_or_default()
    }

    pub fn external_subdirectories(&self) -> &[String] {
        self.external_subdirectories.as_deref().unwrap_or_default()
    }
}
