//! Typed JSON document records
//!
//! One record type per document kind. Every record carries a flattened
//! `extra` side map so unknown fields survive a read/write round trip,
//! and a non-serialized `path` recording where the document was found.

mod engine;
mod gem;
mod manifest;
mod project;

pub use engine::EngineRecord;
pub use gem::{GemNameEntry, GemRecord};
pub use manifest::ManifestRecord;
pub use project::ProjectRecord;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Marker document for remote-repository roots registered in the
/// manifest's `repos` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoRecord {
    pub repo_name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Marker document for template roots. A directory holding a
/// `template.json` halts registry descent into its subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub template_name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
