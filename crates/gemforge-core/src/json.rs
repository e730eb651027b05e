//! The JSON document store
//!
//! Typed readers tag every failure with the offending path; writers
//! serialize with 4-space indentation and go through a
//! write-temp-then-rename so a crash never leaves a half-written
//! document behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{
    EngineRecord, GemRecord, ManifestRecord, ProjectRecord, RepoRecord, TemplateRecord,
};

pub const GEM_FILE: &str = "gem.json";
pub const ENGINE_FILE: &str = "engine.json";
pub const PROJECT_FILE: &str = "project.json";
pub const MANIFEST_FILE: &str = "o3de_manifest.json";
pub const TEMPLATE_FILE: &str = "template.json";
pub const REPO_FILE: &str = "repo.json";

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|err| Error::read(path, err.to_string()))?;
    serde_json::from_str(&content).map_err(|err| Error::read(path, err.to_string()))
}

/// Canonical directory containing a document, used as record identity
fn document_root(path: &Path) -> PathBuf {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}

/// Read a gem.json file
pub fn read_gem(path: &Path) -> Result<GemRecord> {
    let mut record: GemRecord = read_document(path)?;
    record.path = document_root(path);
    debug!("Read gem '{}' from {}", record.gem_name, path.display());
    Ok(record)
}

/// Read an engine.json file
pub fn read_engine(path: &Path) -> Result<EngineRecord> {
    let mut record: EngineRecord = read_document(path)?;
    record.path = document_root(path);
    debug!(
        "Read engine '{}' {} from {}",
        record.engine_name,
        record.version,
        path.display()
    );
    Ok(record)
}

/// Read a project.json file
pub fn read_project(path: &Path) -> Result<ProjectRecord> {
    let mut record: ProjectRecord = read_document(path)?;
    record.path = document_root(path);
    debug!(
        "Read project '{}' from {}",
        record.project_name,
        path.display()
    );
    Ok(record)
}

/// Read an o3de_manifest.json file
pub fn read_manifest(path: &Path) -> Result<ManifestRecord> {
    read_document(path)
}

/// Read a template.json file
pub fn read_template(path: &Path) -> Result<TemplateRecord> {
    read_document(path)
}

/// Read a repo.json file
pub fn read_repo(path: &Path) -> Result<RepoRecord> {
    read_document(path)
}

/// Serialize a document with stable key order and 4-space indentation,
/// then replace `path` atomically.
pub fn write_document<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    record
        .serialize(&mut serializer)
        .map_err(|err| Error::write(path, err.to_string()))?;
    buffer.push(b'\n');
    write_atomic(path, &buffer)
}

/// Write a project record back to `<project root>/project.json`
pub fn write_project(record: &ProjectRecord) -> Result<()> {
    write_document(&record.path.join(PROJECT_FILE), record)
}

/// Write-temp-then-rename. The temp file lives in the destination's
/// parent so the rename stays on one filesystem.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp =
        NamedTempFile::new_in(parent).map_err(|err| Error::write(path, err.to_string()))?;
    tmp.write_all(bytes)
        .map_err(|err| Error::write(path, err.to_string()))?;
    tmp.persist(path)
        .map_err(|err| Error::write(path, err.to_string()))?;
    Ok(())
}
