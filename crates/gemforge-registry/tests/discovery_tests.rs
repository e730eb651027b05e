//! Integration tests for gem discovery
//!
//! Builds real directory trees under a tempdir and checks traversal
//! order, deduplication, template filtering, and bad-document recovery.

use std::fs;
use std::path::{Path, PathBuf};

use gemforge_core::identifier::ObjectIdentifier;
use gemforge_registry::{GemRegistry, UserManifest};
use tempfile::TempDir;

fn write_gem(dir: &Path, name: &str, version: &str, externals: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    let externals_json = externals
        .iter()
        .map(|e| format!("\"{e}\""))
        .collect::<Vec<_>>()
        .join(", ");
    fs::write(
        dir.join("gem.json"),
        format!(
            r#"{{"gem_name": "{name}", "version": "{version}", "external_subdirectories": [{externals_json}]}}"#
        ),
    )
    .unwrap();
}

fn names_in_order(registry: &GemRegistry) -> Vec<String> {
    registry
        .records()
        .iter()
        .map(|r| r.gem_name.clone())
        .collect()
}

#[test]
fn test_scan_is_breadth_first() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    // A and B are seeds; A carries nested children C and D.
    write_gem(&root.join("A"), "A", "1.0.0", &["children/C", "children/D"]);
    write_gem(&root.join("B"), "B", "1.0.0", &[]);
    write_gem(&root.join("A/children/C"), "C", "1.0.0", &[]);
    write_gem(&root.join("A/children/D"), "D", "1.0.0", &[]);

    let registry = GemRegistry::scan(vec![root.join("A"), root.join("B")]);
    assert_eq!(names_in_order(&registry), vec!["A", "B", "C", "D"]);
}

#[test]
fn test_scan_order_is_deterministic() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_gem(&root.join("A"), "A", "1.0.0", &["nested"]);
    write_gem(&root.join("A/nested"), "Nested", "2.0.0", &[]);
    write_gem(&root.join("B"), "B", "1.0.0", &[]);

    let seeds = vec![root.join("A"), root.join("B")];
    let first = GemRegistry::scan(seeds.clone());
    let second = GemRegistry::scan(seeds);
    assert_eq!(names_in_order(&first), names_in_order(&second));
}

#[test]
fn test_revisits_are_suppressed() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    // A and B both declare the shared gem as a child; it must be
    // recorded once, at its first discovery position.
    write_gem(&root.join("A"), "A", "1.0.0", &["../Shared"]);
    write_gem(&root.join("B"), "B", "1.0.0", &["../Shared"]);
    write_gem(&root.join("Shared"), "Shared", "1.0.0", &[]);

    let registry = GemRegistry::scan(vec![root.join("A"), root.join("B")]);
    assert_eq!(names_in_order(&registry), vec!["A", "B", "Shared"]);
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_same_name_and_version_on_two_paths_are_both_retained() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_gem(&root.join("first/Atom"), "Atom", "1.0.0", &[]);
    write_gem(&root.join("second/Atom"), "Atom", "1.0.0", &[]);

    let registry = GemRegistry::scan(vec![root.join("first/Atom"), root.join("second/Atom")]);
    assert_eq!(registry.candidates("Atom").len(), 2);
}

#[test]
fn test_template_root_halts_descent() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let template = root.join("DefaultGemTemplate");
    fs::create_dir_all(&template).unwrap();
    fs::write(
        template.join("template.json"),
        r#"{"template_name": "DefaultGem"}"#,
    )
    .unwrap();
    // A gem.json inside the template subtree must not be registered.
    write_gem(&template.join("Template"), "TemplateGem", "1.0.0", &[]);
    fs::write(
        template.join("gem.json"),
        r#"{"gem_name": "TemplateGem", "version": "1.0.0"}"#,
    )
    .unwrap();
    write_gem(&root.join("Real"), "Real", "1.0.0", &[]);

    let registry = GemRegistry::scan(vec![template, root.join("Real")]);
    assert_eq!(names_in_order(&registry), vec!["Real"]);
}

#[test]
fn test_bad_gem_json_is_skipped_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let broken = root.join("Broken");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("gem.json"), "{ not json").unwrap();
    write_gem(&root.join("Good"), "Good", "1.0.0", &[]);

    let registry = GemRegistry::scan(vec![broken, root.join("Good")]);
    assert_eq!(names_in_order(&registry), vec!["Good"]);
}

#[test]
fn test_missing_seed_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_gem(&root.join("Good"), "Good", "1.0.0", &[]);

    let registry = GemRegistry::scan(vec![root.join("does-not-exist"), root.join("Good")]);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_find_best_prefers_highest_matching_version() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_gem(&root.join("v1"), "Atom", "1.0.0", &[]);
    write_gem(&root.join("v20"), "Atom", "20.3.4", &[]);
    write_gem(&root.join("v0"), "Atom", "0.1.2", &[]);

    let registry = GemRegistry::scan(vec![root.join("v1"), root.join("v20"), root.join("v0")]);

    let any = ObjectIdentifier::parse("Atom").unwrap();
    assert_eq!(registry.find_best(&any).unwrap().version.as_deref(), Some("20.3.4"));

    let pinned = ObjectIdentifier::parse("Atom==1.0.0").unwrap();
    assert_eq!(registry.find_best(&pinned).unwrap().version.as_deref(), Some("1.0.0"));

    let impossible = ObjectIdentifier::parse("Atom>=30.0.0").unwrap();
    assert!(registry.find_best(&impossible).is_none());
}

#[test]
fn test_discover_unions_manifest_project_and_engine_seeds() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_gem(&root.join("user-gems/UserGem"), "UserGem", "1.0.0", &[]);
    write_gem(&root.join("engine/Gems/EngineGem"), "EngineGem", "1.0.0", &[]);
    write_gem(
        &root.join("project/Gems/ProjectGem"),
        "ProjectGem",
        "1.0.0",
        &[],
    );

    fs::create_dir_all(root.join("engine")).unwrap();
    fs::write(
        root.join("engine/engine.json"),
        r#"{"engine_name": "o3de", "version": "1.0.0", "external_subdirectories": ["Gems/EngineGem"]}"#,
    )
    .unwrap();
    fs::create_dir_all(root.join("project")).unwrap();
    fs::write(
        root.join("project/project.json"),
        r#"{"project_name": "Shooter", "engine": "o3de", "external_subdirectories": ["Gems/ProjectGem"]}"#,
    )
    .unwrap();

    let home = root.join("home");
    fs::create_dir_all(&home).unwrap();
    let manifest_path: PathBuf = home.join("o3de_manifest.json");
    fs::write(
        &manifest_path,
        format!(
            r#"{{"external_subdirectories": ["{}"]}}"#,
            root.join("user-gems/UserGem").display()
        ),
    )
    .unwrap();

    let manifest = UserManifest::load(&manifest_path).unwrap();
    let project = gemforge_core::json::read_project(&root.join("project/project.json")).unwrap();
    let engine = gemforge_core::json::read_engine(&root.join("engine/engine.json")).unwrap();

    let registry = GemRegistry::discover(&manifest, Some(&project), Some(&engine));
    assert_eq!(
        names_in_order(&registry),
        vec!["UserGem", "ProjectGem", "EngineGem"]
    );
}
