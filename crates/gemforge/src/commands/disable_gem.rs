//! Disable-gem command
//!
//! Disabling never runs the resolver; it removes entries from
//! project.json and from the legacy CMake enable-list when present.

use anyhow::Result;

use gemforge_core::error::Error;
use gemforge_core::identifier::ObjectIdentifier;
use gemforge_project::disable_gem;
use gemforge_registry::UserManifest;

use crate::cli::DisableGemArgs;
use crate::commands::common::{self, GemTarget};
use crate::output;

pub fn run(args: DisableGemArgs) -> Result<()> {
    let manifest = UserManifest::load_default()?;
    let mut project = common::load_project(
        &manifest,
        args.project_path.as_deref(),
        args.project_name.as_deref(),
    )?;

    let targets = if let Some(path) = &args.gem_path {
        vec![common::target_from_path(path)?]
    } else if let Some(name) = &args.gem_name {
        // The literal name is enough to disable; no registry lookup
        vec![GemTarget {
            id: ObjectIdentifier::parse(name)?,
            record: None,
        }]
    } else if let Some(dirs) = &args.all_gem_paths {
        common::targets_from_scan(dirs)?
    } else {
        return Err(Error::argument(
            "one of --gem-path, --gem-name, or --all-gem-paths is required",
        )
        .into());
    };

    for target in &targets {
        disable_gem(&mut project, &target.id, args.enabled_gem_file.as_deref())?;
        output::success(&format!(
            "Disabled '{}' in project '{}'",
            target.id, project.project_name
        ));
    }
    Ok(())
}
