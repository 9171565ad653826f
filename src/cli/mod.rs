//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - status: Status command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod install;
pub mod status;

pub use completions::CompletionsArgs;
pub use install::InstallArgs;
pub use status::StatusArgs;

use crate::config::MANIFEST_FILE;

/// cinstall - concurrent component installer
#[derive(Parser, Debug)]
#[command(
    name = "cinstall",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install interdependent components concurrently",
    long_about = "cinstall installs the components declared in a cinstall.yaml manifest. \
                  Each component is fetched and loaded once, its dependencies are discovered \
                  from its component.yaml and installed concurrently.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  cinstall install                     \x1b[90m# Install auto_install components\x1b[0m\n   \
                  cinstall install core 'lesson-*'     \x1b[90m# Install by name or glob\x1b[0m\n   \
                  cinstall status                      \x1b[90m# Show the state of every component\x1b[0m\n   \
                  cinstall -m course/cinstall.yaml status --json\n\n\
                  "
)]
pub struct Cli {
    /// Path to the project manifest
    #[arg(
        long,
        short = 'm',
        global = true,
        env = "CINSTALL_MANIFEST",
        default_value = MANIFEST_FILE
    )]
    pub manifest: PathBuf,

    /// Install root (overrides install_root from the manifest)
    #[arg(long, short = 'r', global = true, env = "CINSTALL_ROOT")]
    pub root: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install components and their dependencies
    Install(InstallArgs),

    /// Show the state of every declared component
    Status(StatusArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
