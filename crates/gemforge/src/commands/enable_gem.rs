//! Enable-gem command

use anyhow::{Context, Result};

use gemforge_core::error::Error;
use gemforge_project::{EnableOptions, EnableOutcome, ProjectEditor};
use gemforge_registry::{GemRegistry, UserManifest};

use crate::cli::EnableGemArgs;
use crate::commands::common;
use crate::output;

pub fn run(args: EnableGemArgs) -> Result<()> {
    let manifest = UserManifest::load_default()?;
    let mut project = common::load_project(
        &manifest,
        args.project_path.as_deref(),
        args.project_name.as_deref(),
    )?;
    let engine = manifest.resolve_project_engine(&project)?;
    let registry = GemRegistry::discover(&manifest, Some(&project), Some(&engine));

    let targets = if let Some(path) = &args.gem_path {
        vec![common::target_from_path(path)?]
    } else if let Some(name) = &args.gem_name {
        vec![common::target_from_name(name, &registry)?]
    } else if let Some(dirs) = &args.all_gem_paths {
        common::targets_from_scan(dirs)?
    } else {
        return Err(Error::argument(
            "one of --gem-path, --gem-name, or --all-gem-paths is required",
        )
        .into());
    };

    let options = EnableOptions {
        force: args.force,
        dry_run: args.dry_run,
        optional: args.optional,
    };
    let editor = ProjectEditor::new(&registry, &engine);
    for target in &targets {
        let outcome = editor
            .enable(&mut project, &target.id, target.record.as_ref(), options)
            .with_context(|| {
                format!(
                    "Failed to enable '{}' in project '{}'",
                    target.id, project.project_name
                )
            })?;
        match outcome {
            EnableOutcome::AlreadyEnabled => output::success(&format!(
                "'{}' is already enabled in project '{}'",
                target.id, project.project_name
            )),
            EnableOutcome::DryRun(assignment) => {
                output::success(&format!(
                    "Would enable '{}' in project '{}'",
                    target.id, project.project_name
                ));
                for (name, record) in &assignment {
                    println!("  {} {}", name, record.version());
                }
            }
            EnableOutcome::Written => output::success(&format!(
                "Enabled '{}' in project '{}'",
                target.id, project.project_name
            )),
        }
    }
    Ok(())
}
