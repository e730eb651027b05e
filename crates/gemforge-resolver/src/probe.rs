//! Compatibility probe
//!
//! Answers "would enabling this gem be compatible with this project and
//! engine?" without touching any file. Used by the editor's dry path
//! and exposed for UI callers.

use gemforge_core::identifier::ObjectIdentifier;
use gemforge_core::incompatibility::Incompatibility;
use gemforge_core::types::{EngineRecord, GemRecord, ProjectRecord};
use gemforge_registry::GemRegistry;

use crate::resolver::{project_requirements, Requirement, Resolver};

/// Check a single gem against a project's enabled set and its engine.
/// An empty list means the gem is activatable.
pub fn probe_gem(
    gem: &GemRecord,
    project: &ProjectRecord,
    engine: &EngineRecord,
    registry: &GemRegistry,
) -> Vec<Incompatibility> {
    if let Some(mismatch) = engine_mismatch(project, engine) {
        return vec![mismatch];
    }

    // The candidate pool must contain the probed gem even when it was
    // handed in by path and never registered.
    let mut pool = registry.clone();
    pool.insert(gem.clone());

    let mut required = project_requirements(project);
    required.push(Requirement::new(
        ObjectIdentifier::unrestricted(&gem.gem_name),
        "project",
    ));

    match Resolver::new(&pool, engine).resolve(required) {
        Ok(_) => Vec::new(),
        Err(reports) => reports,
    }
}

/// The project's engine requirement checked against the active engine
pub fn engine_mismatch(project: &ProjectRecord, engine: &EngineRecord) -> Option<Incompatibility> {
    let mismatch = |requirement: String| Incompatibility::EngineMismatch {
        project: project.project_name.clone(),
        requirement,
        engine_name: engine.engine_name.clone(),
        engine_version: engine.version(),
    };
    match project.engine_id() {
        Ok(id) => {
            if id.name == engine.engine_name && id.matches(&engine.version()) {
                None
            } else {
                Some(mismatch(project.engine.clone()))
            }
        }
        Err(_) => Some(mismatch(project.engine.clone())),
    }
}
