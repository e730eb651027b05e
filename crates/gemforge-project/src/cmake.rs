//! Legacy CMake enable-list editing
//!
//! Older projects list active gems in `Gem/Code/enabled_gems.cmake` as
//! `Gem::Name` lines inside a `set(ENABLED_GEMS ...)` block. The format
//! carries no versions and is being replaced by `gem_names` in
//! project.json. Editing is textual and touches only entry lines inside
//! the block; everything else in the file is preserved byte for byte.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use gemforge_core::error::{Error, Result};
use gemforge_core::json;

const BLOCK_OPEN: &str = "set(ENABLED_GEMS";
const ENTRY_PREFIX: &str = "Gem::";

/// Conventional enable-list location under a project root
pub fn enabled_gems_file(project_root: &Path) -> PathBuf {
    project_root.join("Gem").join("Code").join("enabled_gems.cmake")
}

/// One entry line inside the enable-list block
struct Entry {
    line: usize,
    name: String,
    closes_block: bool,
}

/// Gem names listed in the `set(ENABLED_GEMS ...)` block
pub fn read_enabled_gems(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|err| Error::read(path, err.to_string()))?;
    Ok(block_entries(&content)
        .into_iter()
        .map(|entry| entry.name)
        .collect())
}

/// Remove every `Gem::name` entry line from the enable-list block.
/// Returns whether anything was removed; the file is rewritten only
/// when it was.
pub fn remove_enabled_gem(path: &Path, name: &str) -> Result<bool> {
    let content = fs::read_to_string(path).map_err(|err| Error::read(path, err.to_string()))?;
    let mut doomed: HashSet<usize> = HashSet::new();
    let mut keeps_closer = false;
    for entry in block_entries(&content) {
        if entry.name == name {
            doomed.insert(entry.line);
            keeps_closer |= entry.closes_block;
        }
    }
    if doomed.is_empty() {
        debug!("'{}' not present in {}", name, path.display());
        return Ok(false);
    }

    let mut output = String::with_capacity(content.len());
    for (index, line) in content.lines().enumerate() {
        if doomed.contains(&index) {
            // An entry sharing its line with the block's `)` loses only
            // the entry
            if keeps_closer && line.trim_end().ends_with(')') {
                output.push_str(")\n");
            }
            continue;
        }
        output.push_str(line);
        output.push('\n');
    }
    if !content.ends_with('\n') {
        output.pop();
    }
    json::write_atomic(path, output.as_bytes())?;
    Ok(true)
}

/// Entry lines inside the `set(ENABLED_GEMS ...)` block. Entries on the
/// opening line are not recognized; the conventional format is one
/// entry per line.
fn block_entries(content: &str) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut in_block = false;
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if !in_block {
            in_block = trimmed.starts_with(BLOCK_OPEN) && !trimmed.contains(')');
            continue;
        }
        let mut token = trimmed;
        let closes_block = token.ends_with(')');
        if closes_block {
            token = token[..token.len() - 1].trim_end();
        }
        if !token.is_empty() {
            let name = token.strip_prefix(ENTRY_PREFIX).unwrap_or(token);
            entries.push(Entry {
                line: index,
                name: name.to_string(),
                closes_block,
            });
        }
        if closes_block {
            in_block = false;
        }
    }
    entries
}
