//! CLI argument parsing with clap

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

/// Gemforge - gem activation for O3DE-style projects
#[derive(Parser, Debug)]
#[command(name = "gemforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enable a gem in a project
    EnableGem(EnableGemArgs),

    /// Disable a gem in a project
    DisableGem(DisableGemArgs),
}

#[derive(Args, Debug)]
#[command(group = ArgGroup::new("project").required(true))]
#[command(group = ArgGroup::new("gem").required(true))]
pub struct EnableGemArgs {
    /// Path to the project root
    #[arg(long, group = "project", value_name = "PATH")]
    pub project_path: Option<PathBuf>,

    /// Name of a registered project
    #[arg(long, group = "project", value_name = "NAME")]
    pub project_name: Option<String>,

    /// Path to the gem root
    #[arg(long, group = "gem", value_name = "PATH")]
    pub gem_path: Option<PathBuf>,

    /// Gem name, optionally with a version specifier (e.g. Atom==1.2.3)
    #[arg(long, group = "gem", value_name = "NAME[SPEC]")]
    pub gem_name: Option<String>,

    /// Enable every gem found under the given directories
    #[arg(long, group = "gem", num_args = 1.., value_name = "DIR")]
    pub all_gem_paths: Option<Vec<PathBuf>>,

    /// Write even if the gem set cannot be resolved
    #[arg(short, long)]
    pub force: bool,

    /// Check compatibility and report, but do not write
    #[arg(long)]
    pub dry_run: bool,

    /// Record the gem as an optional entry
    #[arg(long)]
    pub optional: bool,
}

#[derive(Args, Debug)]
#[command(group = ArgGroup::new("project").required(true))]
#[command(group = ArgGroup::new("gem").required(true))]
pub struct DisableGemArgs {
    /// Path to the project root
    #[arg(long, group = "project", value_name = "PATH")]
    pub project_path: Option<PathBuf>,

    /// Name of a registered project
    #[arg(long, group = "project", value_name = "NAME")]
    pub project_name: Option<String>,

    /// Path to the gem root
    #[arg(long, group = "gem", value_name = "PATH")]
    pub gem_path: Option<PathBuf>,

    /// Gem name, optionally with a version specifier (e.g. Atom==1.2.3)
    #[arg(long, group = "gem", value_name = "NAME[SPEC]")]
    pub gem_name: Option<String>,

    /// Disable every gem found under the given directories
    #[arg(long, group = "gem", num_args = 1.., value_name = "DIR")]
    pub all_gem_paths: Option<Vec<PathBuf>>,

    /// Legacy CMake enable-list file (default: Gem/Code/enabled_gems.cmake
    /// under the project root)
    #[arg(long, value_name = "FILE")]
    pub enabled_gem_file: Option<PathBuf>,
}
