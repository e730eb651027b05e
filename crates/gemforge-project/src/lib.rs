//! # gemforge-project
//!
//! Edits a project's gem activation state: the `gem_names` list in
//! project.json and, on disable, the legacy CMake enable-list. Enables
//! are gated on the resolver unless forced.

pub mod cmake;
pub mod editor;

pub use editor::{disable_gem, EnableOptions, EnableOutcome, ProjectEditor};
