//! `dotfiles` binary: install the current OS's dotfiles into `$HOME`.
use anyhow::Result;
use clap::Parser;

use dotfiles_installer::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);
    let log = logging::Logger::new();

    commands::install::run(&args.install, &log)
}
