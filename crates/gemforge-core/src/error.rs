//! Error types for gemforge-core

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::incompatibility::Incompatibility;

/// Result type alias using gemforge-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for gemforge
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or ambiguous command-line arguments
    #[error("Invalid arguments: {message}")]
    Argument { message: String },

    /// A named engine, project, or gem is not registered
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// Failed to read or validate a JSON document
    #[error("Failed to read {}: {detail}", .path.display())]
    Read { path: PathBuf, detail: String },

    /// Failed to write a JSON document
    #[error("Failed to write {}: {detail}", .path.display())]
    Write { path: PathBuf, detail: String },

    /// Malformed version or version specifier
    #[error("Invalid version specifier: '{specifier}'")]
    SpecifierParse { specifier: String },

    /// The resolver could not satisfy the requested gem set
    #[error("The requested gem set cannot be satisfied:\n{}", format_reports(.0))]
    Incompatible(Vec<Incompatibility>),

    /// Disable target was present neither in project.json nor the CMake
    /// enable-list. Mapped to exit code 2 by the CLI.
    #[error("Gem '{gem}' is not enabled in project '{project}'")]
    GemNotEnabled { gem: String, project: String },
}

fn format_reports(reports: &[Incompatibility]) -> String {
    reports
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl Error {
    /// Create an argument error
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    /// Create a not-found error for a registered object kind
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Create a read error tagged with the offending path
    pub fn read(path: impl AsRef<Path>, detail: impl Into<String>) -> Self {
        Self::Read {
            path: path.as_ref().to_path_buf(),
            detail: detail.into(),
        }
    }

    /// Create a write error tagged with the offending path
    pub fn write(path: impl AsRef<Path>, detail: impl Into<String>) -> Self {
        Self::Write {
            path: path.as_ref().to_path_buf(),
            detail: detail.into(),
        }
    }

    /// Create a specifier parse error
    pub fn specifier_parse(specifier: impl Into<String>) -> Self {
        Self::SpecifierParse {
            specifier: specifier.into(),
        }
    }

    /// Create a gem-not-enabled error
    pub fn gem_not_enabled(gem: impl Into<String>, project: impl Into<String>) -> Self {
        Self::GemNotEnabled {
            gem: gem.into(),
            project: project.into(),
        }
    }
}
