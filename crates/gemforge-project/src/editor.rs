//! Enable/disable orchestration
//!
//! Enabling edits only `gem_names` in project.json and is gated on the
//! resolver unless forced. Disabling edits both project.json and the
//! legacy CMake enable-list, and never consults the resolver: removing
//! a gem cannot be blocked on behalf of gems that depend on it.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use gemforge_core::error::{Error, Result};
use gemforge_core::identifier::ObjectIdentifier;
use gemforge_core::json;
use gemforge_core::types::{EngineRecord, GemNameEntry, GemRecord, ProjectRecord};
use gemforge_registry::GemRegistry;
use gemforge_resolver::probe::engine_mismatch;
use gemforge_resolver::{project_requirements, Assignment, Requirement, Resolver};

use crate::cmake;

/// Flags controlling an enable operation
#[derive(Debug, Clone, Copy, Default)]
pub struct EnableOptions {
    /// Skip the resolver gate and write unconditionally
    pub force: bool,
    /// Resolve but do not write
    pub dry_run: bool,
    /// Record the gem as an optional entry
    pub optional: bool,
}

/// What an enable call did (or would have done)
#[derive(Debug)]
pub enum EnableOutcome {
    /// The exact entry was already present; nothing was written
    AlreadyEnabled,
    /// Dry run: the gem set resolves to this assignment. Empty when
    /// `--force` skipped resolution.
    DryRun(Assignment),
    /// project.json was rewritten
    Written,
}

/// Applies gem activations to a project against a fixed candidate pool
/// and engine
pub struct ProjectEditor<'a> {
    registry: &'a GemRegistry,
    engine: &'a EngineRecord,
}

impl<'a> ProjectEditor<'a> {
    pub fn new(registry: &'a GemRegistry, engine: &'a EngineRecord) -> Self {
        Self { registry, engine }
    }

    /// Enable a gem in the project. `record` carries the gem's document
    /// when the caller located one by path; it is added to the candidate
    /// pool for the resolver run.
    ///
    /// The identifier is recorded verbatim in `gem_names`, replacing any
    /// previous entry for the same gem name. Other entries keep the
    /// shape they were read with. The legacy CMake enable-list is never
    /// touched on enable.
    pub fn enable(
        &self,
        project: &mut ProjectRecord,
        id: &ObjectIdentifier,
        record: Option<&GemRecord>,
        options: EnableOptions,
    ) -> Result<EnableOutcome> {
        let assignment = if options.force {
            debug!("Skipping compatibility check for '{}'", id);
            Assignment::new()
        } else {
            if let Some(mismatch) = engine_mismatch(project, self.engine) {
                return Err(Error::Incompatible(vec![mismatch]));
            }
            let mut pool = self.registry.clone();
            if let Some(record) = record {
                pool.insert(record.clone());
            }
            // The write replaces any same-name entry, so resolve
            // against the post-write set, not the current one.
            let mut required = project_requirements(project);
            required.retain(|requirement| requirement.id.name != id.name);
            required.push(Requirement::new(id.clone(), "project"));
            match Resolver::new(&pool, self.engine).resolve(required) {
                Ok(assignment) => assignment,
                Err(reports) => return Err(Error::Incompatible(reports)),
            }
        };

        let entry = GemNameEntry::new(id.to_string(), options.optional);
        if project.gem_entries().contains(&entry) {
            info!(
                "'{}' is already enabled in project '{}'",
                id, project.project_name
            );
            return Ok(EnableOutcome::AlreadyEnabled);
        }
        if options.dry_run {
            return Ok(EnableOutcome::DryRun(assignment));
        }

        project.remove_gem_entries(&id.name, None);
        project.add_gem_entry(entry);
        json::write_project(project)?;
        info!("Enabled '{}' in project '{}'", id, project.project_name);
        Ok(EnableOutcome::Written)
    }
}

/// Disable a gem in the project.
///
/// With a specifier, only the exact `(name, specifier)` entry is
/// removed from `gem_names`; with a bare name, every entry for that
/// name goes. The legacy CMake enable-list loses the bare name either
/// way. `Error::GemNotEnabled` is returned when neither file contained
/// the gem.
pub fn disable_gem(
    project: &mut ProjectRecord,
    id: &ObjectIdentifier,
    enabled_gems_file: Option<&Path>,
) -> Result<()> {
    let removed = project.remove_gem_entries(&id.name, id.specifier.as_ref());
    if removed > 0 {
        json::write_project(project)?;
        debug!(
            "Removed {} '{}' entr{} from {}",
            removed,
            id.name,
            if removed == 1 { "y" } else { "ies" },
            project.path.join(json::PROJECT_FILE).display()
        );
    }

    let cmake_path: PathBuf = enabled_gems_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cmake::enabled_gems_file(&project.path));
    let mut removed_from_cmake = false;
    if cmake_path.exists() {
        removed_from_cmake = cmake::remove_enabled_gem(&cmake_path, &id.name)?;
    }

    if removed == 0 && !removed_from_cmake {
        return Err(Error::gem_not_enabled(
            id.name.clone(),
            project.project_name.clone(),
        ));
    }
    info!("Disabled '{}' in project '{}'", id, project.project_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn engine() -> EngineRecord {
        serde_json::from_str(r#"{"engine_name": "o3de", "version": "1.0.0"}"#).unwrap()
    }

    fn gem(body: &str, path: &str) -> GemRecord {
        let mut record: GemRecord = serde_json::from_str(body).unwrap();
        record.path = PathBuf::from(path);
        record
    }

    fn registry_with(gems: Vec<GemRecord>) -> GemRegistry {
        let mut registry = GemRegistry::new();
        for record in gems {
            registry.insert(record);
        }
        registry
    }

    fn write_project(dir: &Path, body: &str) -> ProjectRecord {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join("project.json");
        fs::write(&path, body).unwrap();
        json::read_project(&path).unwrap()
    }

    fn gem_names_on_disk(project: &ProjectRecord) -> serde_json::Value {
        let content = fs::read_to_string(project.path.join("project.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        value.get("gem_names").cloned().unwrap_or(serde_json::Value::Null)
    }

    fn id(input: &str) -> ObjectIdentifier {
        ObjectIdentifier::parse(input).unwrap()
    }

    #[test]
    fn test_enable_appends_and_writes() {
        let temp_dir = TempDir::new().unwrap();
        let mut project = write_project(
            temp_dir.path(),
            r#"{"project_name": "Shooter", "engine": "o3de", "gem_names": ["Atom"]}"#,
        );
        let eng = engine();
        let registry = registry_with(vec![
            gem(r#"{"gem_name": "Atom", "version": "1.0.0"}"#, "/g/atom"),
            gem(r#"{"gem_name": "Terrain", "version": "1.0.0"}"#, "/g/terrain"),
        ]);

        ProjectEditor::new(&registry, &eng)
            .enable(&mut project, &id("Terrain"), None, EnableOptions::default())
            .unwrap();

        assert_eq!(gem_names_on_disk(&project), serde_json::json!(["Atom", "Terrain"]));
    }

    #[test]
    fn test_enable_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut project = write_project(
            temp_dir.path(),
            r#"{"project_name": "Shooter", "engine": "o3de"}"#,
        );
        let eng = engine();
        let registry = registry_with(vec![gem(
            r#"{"gem_name": "Atom", "version": "1.0.0"}"#,
            "/g/atom",
        )]);
        let editor = ProjectEditor::new(&registry, &eng);

        let first = editor
            .enable(&mut project, &id("Atom"), None, EnableOptions::default())
            .unwrap();
        assert!(matches!(first, EnableOutcome::Written));
        let second = editor
            .enable(&mut project, &id("Atom"), None, EnableOptions::default())
            .unwrap();
        assert!(matches!(second, EnableOutcome::AlreadyEnabled));

        assert_eq!(gem_names_on_disk(&project), serde_json::json!(["Atom"]));
    }

    #[test]
    fn test_enable_replaces_same_name_entry() {
        let temp_dir = TempDir::new().unwrap();
        let mut project = write_project(
            temp_dir.path(),
            r#"{"project_name": "Shooter", "engine": "o3de", "gem_names": ["Atom", "PhysX"]}"#,
        );
        let eng = engine();
        let registry = registry_with(vec![
            gem(r#"{"gem_name": "Atom", "version": "2.0.0"}"#, "/g/atom"),
            gem(r#"{"gem_name": "PhysX", "version": "1.0.0"}"#, "/g/physx"),
        ]);

        ProjectEditor::new(&registry, &eng)
            .enable(&mut project, &id("Atom==2.0.0"), None, EnableOptions::default())
            .unwrap();

        assert_eq!(
            gem_names_on_disk(&project),
            serde_json::json!(["PhysX", "Atom==2.0.0"])
        );
    }

    #[test]
    fn test_enable_upgrades_pinned_entry() {
        let temp_dir = TempDir::new().unwrap();
        let mut project = write_project(
            temp_dir.path(),
            r#"{"project_name": "Shooter", "engine": "o3de", "gem_names": ["Atom==1.0.0"]}"#,
        );
        let eng = engine();
        let registry = registry_with(vec![
            gem(r#"{"gem_name": "Atom", "version": "1.0.0"}"#, "/g/atom1"),
            gem(r#"{"gem_name": "Atom", "version": "2.0.0"}"#, "/g/atom2"),
        ]);

        ProjectEditor::new(&registry, &eng)
            .enable(&mut project, &id("Atom==2.0.0"), None, EnableOptions::default())
            .unwrap();

        assert_eq!(
            gem_names_on_disk(&project),
            serde_json::json!(["Atom==2.0.0"])
        );
    }

    #[test]
    fn test_enable_optional_writes_tagged_entry() {
        let temp_dir = TempDir::new().unwrap();
        let mut project = write_project(
            temp_dir.path(),
            r#"{"project_name": "Shooter", "engine": "o3de"}"#,
        );
        let eng = engine();
        let registry = registry_with(vec![gem(
            r#"{"gem_name": "Atom", "version": "1.0.0"}"#,
            "/g/atom",
        )]);
        let options = EnableOptions {
            optional: true,
            ..Default::default()
        };

        ProjectEditor::new(&registry, &eng)
            .enable(&mut project, &id("Atom"), None, options)
            .unwrap();

        assert_eq!(
            gem_names_on_disk(&project),
            serde_json::json!([{"name": "Atom", "optional": true}])
        );
    }

    #[test]
    fn test_enable_dry_run_never_writes() {
        let temp_dir = TempDir::new().unwrap();
        let body = r#"{"project_name": "Shooter", "engine": "o3de"}"#;
        let mut project = write_project(temp_dir.path(), body);
        let eng = engine();
        let registry = registry_with(vec![gem(
            r#"{"gem_name": "Atom", "version": "1.0.0"}"#,
            "/g/atom",
        )]);
        let options = EnableOptions {
            dry_run: true,
            ..Default::default()
        };

        let outcome = ProjectEditor::new(&registry, &eng)
            .enable(&mut project, &id("Atom"), None, options)
            .unwrap();
        match outcome {
            EnableOutcome::DryRun(assignment) => assert!(assignment.contains_key("Atom")),
            other => panic!("expected dry-run outcome, got {other:?}"),
        }

        let on_disk = fs::read_to_string(project.path.join("project.json")).unwrap();
        assert_eq!(on_disk, body);
    }

    #[test]
    fn test_enable_incompatible_does_not_mutate() {
        let temp_dir = TempDir::new().unwrap();
        let body = r#"{"project_name": "Shooter", "engine": "o3de"}"#;
        let mut project = write_project(temp_dir.path(), body);
        let eng = engine();
        let registry = registry_with(vec![gem(
            r#"{"gem_name": "Atom", "version": "1.0.0", "compatible_engines": ["o3de==9.0.0"]}"#,
            "/g/atom",
        )]);

        let err = ProjectEditor::new(&registry, &eng)
            .enable(&mut project, &id("Atom"), None, EnableOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Incompatible(_)));

        let on_disk = fs::read_to_string(project.path.join("project.json")).unwrap();
        assert_eq!(on_disk, body);
    }

    #[test]
    fn test_enable_force_skips_the_resolver() {
        let temp_dir = TempDir::new().unwrap();
        let mut project = write_project(
            temp_dir.path(),
            r#"{"project_name": "Shooter", "engine": "o3de"}"#,
        );
        let eng = engine();
        let registry = registry_with(vec![]);
        let options = EnableOptions {
            force: true,
            ..Default::default()
        };

        ProjectEditor::new(&registry, &eng)
            .enable(&mut project, &id("Unknown"), None, options)
            .unwrap();

        assert_eq!(gem_names_on_disk(&project), serde_json::json!(["Unknown"]));
    }

    #[test]
    fn test_enable_by_path_record_joins_the_pool() {
        let temp_dir = TempDir::new().unwrap();
        let mut project = write_project(
            temp_dir.path(),
            r#"{"project_name": "Shooter", "engine": "o3de"}"#,
        );
        let eng = engine();
        let registry = registry_with(vec![]);
        let record = gem(r#"{"gem_name": "Local", "version": "0.1.0"}"#, "/g/local");

        ProjectEditor::new(&registry, &eng)
            .enable(&mut project, &id("Local"), Some(&record), EnableOptions::default())
            .unwrap();

        assert_eq!(gem_names_on_disk(&project), serde_json::json!(["Local"]));
    }

    #[test]
    fn test_disable_clears_json_and_cmake() {
        let temp_dir = TempDir::new().unwrap();
        let mut project = write_project(
            temp_dir.path(),
            r#"{"project_name": "Shooter", "engine": "o3de", "gem_names": ["TestGem"]}"#,
        );
        let cmake_path = cmake::enabled_gems_file(&project.path);
        fs::create_dir_all(cmake_path.parent().unwrap()).unwrap();
        fs::write(&cmake_path, "set(ENABLED_GEMS\n    Gem::TestGem\n)\n").unwrap();

        disable_gem(&mut project, &id("TestGem"), None).unwrap();

        assert_eq!(gem_names_on_disk(&project), serde_json::json!([]));
        assert!(cmake::read_enabled_gems(&cmake_path).unwrap().is_empty());
    }

    #[test]
    fn test_disable_cmake_only_entry_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let mut project = write_project(
            temp_dir.path(),
            r#"{"project_name": "Shooter", "engine": "o3de"}"#,
        );
        let cmake_path = temp_dir.path().join("custom_gems.cmake");
        fs::write(&cmake_path, "set(ENABLED_GEMS\n    Gem::Legacy\n)\n").unwrap();

        disable_gem(&mut project, &id("Legacy"), Some(&cmake_path)).unwrap();
        assert!(cmake::read_enabled_gems(&cmake_path).unwrap().is_empty());
    }

    #[test]
    fn test_disable_absent_gem_is_gem_not_enabled() {
        let temp_dir = TempDir::new().unwrap();
        let mut project = write_project(
            temp_dir.path(),
            r#"{"project_name": "Shooter", "engine": "o3de", "gem_names": ["Atom"]}"#,
        );

        let err = disable_gem(&mut project, &id("Terrain"), None).unwrap_err();
        assert!(matches!(err, Error::GemNotEnabled { .. }));
        assert_eq!(gem_names_on_disk(&project), serde_json::json!(["Atom"]));
    }

    #[test]
    fn test_disable_with_specifier_is_exact() {
        let temp_dir = TempDir::new().unwrap();
        let mut project = write_project(
            temp_dir.path(),
            r#"{"project_name": "Shooter", "engine": "o3de", "gem_names": ["Atom==1.0.0", "Atom==2.0.0"]}"#,
        );

        disable_gem(&mut project, &id("Atom==1.0.0"), None).unwrap();
        assert_eq!(
            gem_names_on_disk(&project),
            serde_json::json!(["Atom==2.0.0"])
        );

        let err = disable_gem(&mut project, &id("Atom==3.0.0"), None).unwrap_err();
        assert!(matches!(err, Error::GemNotEnabled { .. }));
    }

    #[test]
    fn test_disable_bare_name_removes_all_entries() {
        let temp_dir = TempDir::new().unwrap();
        let mut project = write_project(
            temp_dir.path(),
            r#"{"project_name": "Shooter", "engine": "o3de", "gem_names": ["Atom==1.0.0", "Atom==2.0.0", "PhysX"]}"#,
        );

        disable_gem(&mut project, &id("Atom"), None).unwrap();
        assert_eq!(gem_names_on_disk(&project), serde_json::json!(["PhysX"]));
    }
}
