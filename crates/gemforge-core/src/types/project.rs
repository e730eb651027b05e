//! project.json record

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;
use crate::identifier::ObjectIdentifier;
use crate::types::gem::GemNameEntry;
use crate::version::VersionSpecifier;

/// A parsed project.json document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub project_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Engine the project targets, as `name` or `name<op>version`
    pub engine: String,

    /// Enabled gems; entries keep the shape they were read with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gem_names: Option<Vec<GemNameEntry>>,

    /// Relative paths to gem roots owned by the project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_subdirectories: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Project root directory, set on read
    #[serde(skip)]
    pub path: PathBuf,
}

impl ProjectRecord {
    /// The engine requirement parsed as an identifier
    pub fn engine_id(&self) -> Result<ObjectIdentifier> {
        ObjectIdentifier::parse(&self.engine)
    }

    pub fn gem_entries(&self) -> &[GemNameEntry] {
        self.gem_names.as_deref().unwrap_or_default()
    }

    pub fn external_subdirectories(&self) -> &[String] {
        self.external_subdirectories.as_deref().unwrap_or_default()
    }

    /// Append a gem entry, creating the list if the document had none
    pub fn add_gem_entry(&mut self, entry: GemNameEntry) {
        self.gem_names.get_or_insert_with(Vec::new).push(entry);
    }

    /// Remove gem entries matching `name`. With a specifier, only the
    /// exact `(name, specifier)` pair is removed; without one, every
    /// entry with that name goes regardless of specifier. Returns the
    /// number of entries removed.
    pub fn remove_gem_entries(
        &mut self,
        name: &str,
        specifier: Option<&VersionSpecifier>,
    ) -> usize {
        let Some(entries) = self.gem_names.as_mut() else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|entry| !entry_matches(entry, name, specifier));
        before - entries.len()
    }
}

fn entry_matches(entry: &GemNameEntry, name: &str, specifier: Option<&VersionSpecifier>) -> bool {
    let id = match ObjectIdentifier::parse(entry.as_str()) {
        Ok(id) => id,
        Err(_) => {
            warn!("Skipping malformed gem_names entry '{}'", entry.as_str());
            return false;
        }
    };
    if id.name != name {
        return false;
    }
    match specifier {
        // Canonical string comparison so "A == 1.0" matches "A==1.0.0"
        Some(wanted) => id
            .specifier
            .is_some_and(|have| have.to_string() == wanted.to_string()),
        None => true,
    }
}
