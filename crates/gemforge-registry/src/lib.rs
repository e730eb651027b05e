//! # gemforge-registry
//!
//! Aggregates every reachable gem.json across the user manifest, the
//! active engine, the project, and nested external subdirectories into
//! an ordered candidate pool for the resolver.

pub mod manifest;
pub mod registry;

pub use manifest::UserManifest;
pub use registry::GemRegistry;
