//! # gemforge-core
//!
//! Core library for the gemforge CLI providing:
//! - Version parsing and specifier matching
//! - Object identifier parsing (`name`, `name==1.2.3`, ...)
//! - Typed JSON documents (engine.json, project.json, gem.json, manifest)
//!   with unknown-field preservation
//! - Atomic JSON reads/writes

pub mod error;
pub mod identifier;
pub mod incompatibility;
pub mod json;
pub mod paths;
pub mod types;
pub mod version;

pub use error::{Error, Result};
pub use identifier::{GemDependency, ObjectIdentifier};
pub use incompatibility::{CandidateRejection, Incompatibility, RejectionReason};
pub use version::{parse_loose_version, VersionSpecifier};
