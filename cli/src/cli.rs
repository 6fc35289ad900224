//! Command-line arguments.
use std::path::PathBuf;

use clap::{Args, Parser};

/// Top-level CLI entry point for the dotfiles installer.
///
/// Every flag is optional: a bare `dotfiles` detects the OS, finds the
/// repository, asks for confirmation, and installs.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles",
    about = "Install dotfiles for this OS into the home directory",
    version = crate::VERSION
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Install options.
    #[command(flatten)]
    pub install: InstallOpts,
}

/// Options controlling an install run.
#[derive(Args, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Do not ask for confirmation before installing
    #[arg(short, long)]
    pub yes: bool,

    /// Override dotfiles repository root directory
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Override the destination (home) directory
    #[arg(long)]
    pub home: Option<PathBuf>,
}
