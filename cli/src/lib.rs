//! Dotfiles installer.
//!
//! Installs the dotfiles kept under a per-OS directory of a repository
//! (`linux/`, `macos/`, `windows/`) into the user's home directory. Plain
//! files are symlinked on Linux and macOS and copied on Windows; files whose
//! first line carries the `>>> APPEND <<<` marker are merged line by line
//! into the existing destination instead.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]** : optional `dotfiles.toml` and dotfile discovery
//! - **[`resources`]** : idempotent `check + apply` primitives (symlink, copy, append)
//! - **[`tasks`]** : named units of work wired to resources
//! - **[`commands`]** : top-level orchestration of an install run
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod tasks;

/// Version reported by `--version` and the log header.
///
/// Release builds stamp `DOTFILES_VERSION`; local builds fall back to the
/// crate version.
pub const VERSION: &str = match option_env!("DOTFILES_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
