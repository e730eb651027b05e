//! Structured resolver failure reports
//!
//! Each `Incompatibility` names the requirement that could not be
//! satisfied, where it came from, and what was tried. `Display` renders a
//! human-readable tree; the CLI prints it verbatim before exiting.

use std::fmt;
use std::path::PathBuf;

use semver::Version;

/// One reason the resolver could not produce an assignment
#[derive(Debug, Clone)]
pub enum Incompatibility {
    /// The project targets an engine the active engine does not satisfy
    EngineMismatch {
        project: String,
        requirement: String,
        engine_name: String,
        engine_version: Version,
    },

    /// A name was already assigned a version that violates a later
    /// requirement for the same name
    VersionConflict {
        name: String,
        assigned_version: Version,
        assigned_source: String,
        requirement: String,
        source: String,
    },

    /// Every candidate for a requirement was rejected
    NoCandidates {
        requirement: String,
        source: String,
        rejections: Vec<CandidateRejection>,
    },
}

/// Why one candidate was rejected for a requirement
#[derive(Debug, Clone)]
pub struct CandidateRejection {
    pub version: Version,
    pub path: PathBuf,
    pub reason: RejectionReason,
}

#[derive(Debug, Clone)]
pub enum RejectionReason {
    /// Version does not satisfy the requirement's specifier
    SpecifierMismatch(String),

    /// Candidate's compatible_engines exclude the active engine
    EngineIncompatible(String),

    /// An engine_api_dependencies clause is unsatisfied
    ApiIncompatible(String),

    /// The candidate itself was viable but its dependencies were not
    DependencyFailure(Vec<Incompatibility>),
}

impl fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_indent(f, 0)
    }
}

impl Incompatibility {
    fn fmt_with_indent(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Incompatibility::EngineMismatch {
                project,
                requirement,
                engine_name,
                engine_version,
            } => write!(
                f,
                "{pad}project '{project}' targets engine '{requirement}' but the active engine is {engine_name} {engine_version}"
            ),
            Incompatibility::VersionConflict {
                name,
                assigned_version,
                assigned_source,
                requirement,
                source,
            } => write!(
                f,
                "{pad}'{name}' was pinned to {assigned_version} for {assigned_source}, but {source} requires {requirement}"
            ),
            Incompatibility::NoCandidates {
                requirement,
                source,
                rejections,
            } => {
                write!(f, "{pad}cannot satisfy '{requirement}' (required by {source})")?;
                for rejection in rejections {
                    write!(
                        f,
                        "\n{pad}  - {} {} ({}): ",
                        requirement_name(requirement),
                        rejection.version,
                        rejection.path.display()
                    )?;
                    rejection.reason.fmt_with_indent(f, depth + 2)?;
                }
                Ok(())
            }
        }
    }
}

impl RejectionReason {
    fn fmt_with_indent(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            RejectionReason::SpecifierMismatch(detail)
            | RejectionReason::EngineIncompatible(detail)
            | RejectionReason::ApiIncompatible(detail) => write!(f, "{detail}"),
            RejectionReason::DependencyFailure(nested) => {
                write!(f, "dependencies cannot be satisfied:")?;
                for report in nested {
                    writeln!(f)?;
                    report.fmt_with_indent(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// The bare name of a rendered requirement, for rejection lines
fn requirement_name(requirement: &str) -> &str {
    requirement
        .find(|c: char| ['=', '!', '~', '>', '<'].contains(&c))
        .map_or(requirement, |idx| requirement[..idx].trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_candidates_renders_rejection_tree() {
        let report = Incompatibility::NoCandidates {
            requirement: "Atom==1.0.0".to_string(),
            source: "project".to_string(),
            rejections: vec![CandidateRejection {
                version: Version::new(2, 0, 0),
                path: PathBuf::from("/gems/Atom"),
                reason: RejectionReason::SpecifierMismatch(
                    "version 2.0.0 does not match ==1.0.0".to_string(),
                ),
            }],
        };
        let rendered = report.to_string();
        assert!(rendered.contains("cannot satisfy 'Atom==1.0.0'"));
        assert!(rendered.contains("required by project"));
        assert!(rendered.contains("Atom 2.0.0"));
        assert!(rendered.contains("does not match ==1.0.0"));
    }

    #[test]
    fn test_version_conflict_names_both_sources() {
        let report = Incompatibility::VersionConflict {
            name: "PhysX".to_string(),
            assigned_version: Version::new(5, 1, 0),
            assigned_source: "project".to_string(),
            requirement: "PhysX==4.0.0".to_string(),
            source: "Terrain@2.0.0".to_string(),
        };
        let rendered = report.to_string();
        assert!(rendered.contains("pinned to 5.1.0"));
        assert!(rendered.contains("Terrain@2.0.0"));
    }

    #[test]
    fn test_nested_dependency_failures_indent() {
        let inner = Incompatibility::NoCandidates {
            requirement: "PhysX==4.0.0".to_string(),
            source: "Terrain@2.0.0".to_string(),
            rejections: vec![],
        };
        let outer = Incompatibility::NoCandidates {
            requirement: "Terrain".to_string(),
            source: "project".to_string(),
            rejections: vec![CandidateRejection {
                version: Version::new(2, 0, 0),
                path: PathBuf::from("/gems/Terrain"),
                reason: RejectionReason::DependencyFailure(vec![inner]),
            }],
        };
        let rendered = outer.to_string();
        assert!(rendered.contains("dependencies cannot be satisfied"));
        assert!(rendered.contains("cannot satisfy 'PhysX==4.0.0'"));
    }
}
