//! # gemforge-resolver
//!
//! Decides whether a set of gem requirements can be satisfied against a
//! candidate pool and an active engine, and with which concrete gem
//! versions. Resolution is a deterministic depth-first backtracking
//! search; failures come back as structured [`Incompatibility`] reports.
//!
//! [`Incompatibility`]: gemforge_core::Incompatibility

pub mod probe;
pub mod resolver;

pub use probe::probe_gem;
pub use resolver::{project_requirements, Assignment, Requirement, Resolver};
