//! Depth-first backtracking resolution
//!
//! Candidates for each requirement are ordered by version descending,
//! ties broken by first-discovery order, so identical inputs always
//! produce identical assignments. A requirement whose name is already
//! assigned short-circuits, which is what makes dependency cycles safe.

use std::collections::{BTreeMap, VecDeque};

use semver::Version;
use tracing::{debug, warn};

use gemforge_core::identifier::ObjectIdentifier;
use gemforge_core::incompatibility::{CandidateRejection, Incompatibility, RejectionReason};
use gemforge_core::types::{EngineRecord, GemRecord, ProjectRecord};
use gemforge_registry::GemRegistry;

/// The successful result: one chosen record per gem name in the
/// transitive closure
pub type Assignment = BTreeMap<String, GemRecord>;

/// One pending requirement, tagged with where it came from
#[derive(Debug, Clone)]
pub struct Requirement {
    pub id: ObjectIdentifier,
    pub optional: bool,
    pub source: String,
}

impl Requirement {
    pub fn new(id: ObjectIdentifier, source: impl Into<String>) -> Self {
        Self {
            id,
            optional: false,
            source: source.into(),
        }
    }

    pub fn optional(id: ObjectIdentifier, source: impl Into<String>) -> Self {
        Self {
            id,
            optional: true,
            source: source.into(),
        }
    }
}

/// The top-level requirements a project's enabled-gem list implies.
/// Malformed entries are logged and skipped so one bad entry cannot
/// block resolution of the rest.
pub fn project_requirements(project: &ProjectRecord) -> Vec<Requirement> {
    project
        .gem_entries()
        .iter()
        .filter_map(|entry| match entry.to_dependency() {
            Ok(dep) => Some(Requirement {
                id: dep.id,
                optional: dep.optional,
                source: "project".to_string(),
            }),
            Err(err) => {
                warn!(
                    "Skipping malformed gem_names entry '{}' in project '{}': {}",
                    entry.as_str(),
                    project.project_name,
                    err
                );
                None
            }
        })
        .collect()
}

#[derive(Debug)]
struct AssignedGem {
    record: GemRecord,
    source: String,
}

/// Resolves requirement sets against a fixed candidate pool and engine
pub struct Resolver<'a> {
    registry: &'a GemRegistry,
    engine: &'a EngineRecord,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a GemRegistry, engine: &'a EngineRecord) -> Self {
        Self { registry, engine }
    }

    /// Resolve a requirement set to a full assignment, or explain why
    /// none exists.
    pub fn resolve(
        &self,
        required: Vec<Requirement>,
    ) -> std::result::Result<Assignment, Vec<Incompatibility>> {
        let mut assignment: Vec<AssignedGem> = Vec::new();
        self.solve(required.into(), &mut assignment)?;
        Ok(assignment
            .into_iter()
            .map(|assigned| (assigned.record.gem_name.clone(), assigned.record))
            .collect())
    }

    fn solve(
        &self,
        mut worklist: VecDeque<Requirement>,
        assignment: &mut Vec<AssignedGem>,
    ) -> std::result::Result<(), Vec<Incompatibility>> {
        while let Some(requirement) = worklist.pop_front() {
            let name = &requirement.id.name;

            if let Some(existing) = assignment
                .iter()
                .find(|assigned| assigned.record.gem_name == *name)
            {
                if requirement.id.matches(&existing.record.version()) {
                    continue;
                }
                return Err(vec![Incompatibility::VersionConflict {
                    name: name.clone(),
                    assigned_version: existing.record.version(),
                    assigned_source: existing.source.clone(),
                    requirement: requirement.id.to_string(),
                    source: requirement.source.clone(),
                }]);
            }

            if requirement.optional && !self.registry.has_candidates(name) {
                debug!(
                    "Optional requirement '{}' has no candidates, skipping",
                    requirement.id
                );
                continue;
            }

            let mut rejections: Vec<CandidateRejection> = Vec::new();
            let mut viable: Vec<(Version, &GemRecord)> = Vec::new();
            for record in self.registry.candidates(name) {
                let version = record.version();
                if !requirement.id.matches(&version) {
                    rejections.push(CandidateRejection {
                        version,
                        path: record.path.clone(),
                        reason: RejectionReason::SpecifierMismatch(format!(
                            "version {} does not match '{}'",
                            record.version(),
                            requirement.id
                        )),
                    });
                    continue;
                }
                if let Some(reason) = self.engine_rejection(record) {
                    rejections.push(CandidateRejection {
                        version,
                        path: record.path.clone(),
                        reason,
                    });
                    continue;
                }
                viable.push((version, record));
            }
            // Stable sort keeps first-discovery order within a version
            viable.sort_by(|a, b| b.0.cmp(&a.0));

            let mark = assignment.len();
            for (version, candidate) in viable {
                debug!("Trying {} {} for '{}'", name, version, requirement.id);
                assignment.push(AssignedGem {
                    record: candidate.clone(),
                    source: requirement.source.clone(),
                });

                let mut next = worklist.clone();
                let label = format!("{}@{}", candidate.gem_name, version);
                for entry in candidate.dependencies() {
                    match entry.to_dependency() {
                        Ok(dep) => next.push_back(Requirement {
                            id: dep.id,
                            optional: dep.optional,
                            source: label.clone(),
                        }),
                        Err(err) => warn!(
                            "Skipping malformed dependency '{}' of {}: {}",
                            entry.as_str(),
                            label,
                            err
                        ),
                    }
                }

                match self.solve(next, assignment) {
                    Ok(()) => return Ok(()),
                    Err(reports) => {
                        assignment.truncate(mark);
                        rejections.push(CandidateRejection {
                            version,
                            path: candidate.path.clone(),
                            reason: RejectionReason::DependencyFailure(reports),
                        });
                    }
                }
            }

            return Err(vec![Incompatibility::NoCandidates {
                requirement: requirement.id.to_string(),
                source: requirement.source,
                rejections,
            }]);
        }
        Ok(())
    }

    /// Engine compatibility gate for one candidate. `None` means the
    /// candidate is usable with the active engine.
    fn engine_rejection(&self, record: &GemRecord) -> Option<RejectionReason> {
        let engines = record.compatible_engines();
        if !engines.is_empty() {
            let engine_version = self.engine.version();
            let matched = engines.iter().any(|entry| {
                match ObjectIdentifier::parse(entry) {
                    Ok(id) => {
                        id.name == self.engine.engine_name && id.matches(&engine_version)
                    }
                    Err(_) => {
                        warn!(
                            "Gem '{}' has malformed compatible_engines entry '{}'",
                            record.gem_name, entry
                        );
                        false
                    }
                }
            });
            if !matched {
                return Some(RejectionReason::EngineIncompatible(format!(
                    "not compatible with {} {} (accepts: {})",
                    self.engine.engine_name,
                    engine_version,
                    engines.join(", ")
                )));
            }
        }

        for entry in record.engine_api_dependencies() {
            let id = match ObjectIdentifier::parse(entry) {
                Ok(id) => id,
                Err(_) => {
                    return Some(RejectionReason::ApiIncompatible(format!(
                        "malformed engine_api_dependencies entry '{entry}'"
                    )))
                }
            };
            match self.engine.api_version(&id.name) {
                Some(version) if id.matches(&version) => {}
                Some(version) => {
                    return Some(RejectionReason::ApiIncompatible(format!(
                        "engine api '{}' is {} but the gem requires '{}'",
                        id.name, version, entry
                    )))
                }
                None => {
                    return Some(RejectionReason::ApiIncompatible(format!(
                        "engine does not export api '{}'",
                        id.name
                    )))
                }
            }
        }
        None
    }
}
