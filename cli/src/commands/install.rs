//! The install command: resolve paths, confirm, and run the install tasks.
use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::run_tasks_to_completion;
use crate::cli::InstallOpts;
use crate::config::Config;
use crate::config::dotfiles::InstallMode;
use crate::config::settings::SETTINGS_FILE;
use crate::error::InstallError;
use crate::logging::{Log as _, Logger};
use crate::platform::{Os, Platform};
use crate::tasks::{self, Context};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the OS is unsupported, the root or home directory
/// cannot be resolved, the configuration is invalid, or any dotfile fails
/// to install.
pub fn run(opts: &InstallOpts, log: &Logger) -> Result<()> {
    let platform = Platform::detect()?;
    let root = resolve_root(opts)?;
    let home = resolve_home(opts, &platform)?;

    log.info(&format!("dotfiles {}", crate::VERSION));

    log.stage("Loading configuration");
    let config = Config::load(&root, &home, &platform)?;
    log.info(&format!("repository:  {}", config.root.display()));
    log.info(&format!("source:      {}", config.source_dir.display()));
    log.info(&format!("destination: {}", config.home.display()));

    if !config.has_source_dir() {
        log.warn(&format!(
            "no dotfiles found for {} at {}",
            platform.os,
            config.source_dir.display()
        ));
        return Ok(());
    }

    log.info(&format!(
        "found {} dotfiles ({} to append)",
        config.dotfiles.len(),
        config.dotfiles_in(InstallMode::Append).count()
    ));
    for dotfile in &config.dotfiles {
        log.debug(&format!("{} [{}]", dotfile.relative.display(), dotfile.mode));
    }

    if !opts.yes && !opts.dry_run {
        let confirmed = confirm(&mut io::stdin().lock(), &mut io::stdout().lock())
            .context("reading confirmation")?;
        if !confirmed {
            log.info("installation aborted by user");
            return Ok(());
        }
    }

    let ctx = Context::new(&config, &platform, log, opts.dry_run);
    let all_tasks = tasks::all_install_tasks();
    run_tasks_to_completion(all_tasks.iter().map(AsRef::as_ref), &ctx, log)
}

/// Ask `Continue? [y/N]` on `output` and read the answer from `input`.
///
/// Only `y` or `yes` (any case) confirms; an empty answer or end of input
/// declines.
///
/// # Errors
///
/// Returns an error if writing the prompt or reading the answer fails.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "Continue? [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Resolve the dotfiles root directory from CLI arguments or auto-detection.
///
/// Order: `--root`, `DOTFILES_ROOT`, the directory the binary was built or
/// installed into, then the current directory. The result is canonical.
///
/// # Errors
///
/// Returns an error if no root can be found or the chosen one does not exist.
pub fn resolve_root(opts: &InstallOpts) -> Result<PathBuf> {
    let root = match &opts.root {
        Some(root) => root.clone(),
        None => discover_root(
            std::env::var_os("DOTFILES_ROOT").map(PathBuf::from),
            std::env::current_exe().ok().as_deref(),
            std::env::current_dir().ok().as_deref(),
        )?,
    };
    let canonical = dunce::canonicalize(&root)
        .map_err(|e| InstallError::io("resolving root", &root, e))?;
    Ok(canonical)
}

fn discover_root(
    env_root: Option<PathBuf>,
    exe: Option<&Path>,
    cwd: Option<&Path>,
) -> Result<PathBuf, InstallError> {
    if let Some(root) = env_root {
        return Ok(root);
    }

    if let Some(parent) = exe.and_then(Path::parent) {
        let candidates = [
            parent.join("../../.."), // cli/target/release/ → repo root
            parent.join(".."),       // bin/ → repo root
        ];
        if let Some(found) = candidates.into_iter().find(|c| is_repo_root(c)) {
            return Ok(found);
        }
    }

    if let Some(cwd) = cwd
        && is_repo_root(cwd)
    {
        return Ok(cwd.to_path_buf());
    }

    Err(InstallError::RootNotFound)
}

/// Whether `dir` looks like a dotfiles repository.
///
/// A repository holds at least one per-OS directory or a settings file.
#[must_use]
pub fn is_repo_root(dir: &Path) -> bool {
    dir.join(SETTINGS_FILE).is_file() || Os::ALL.iter().any(|os| dir.join(os.dir_name()).is_dir())
}

/// Resolve the destination directory: `--home`, else the environment.
///
/// # Errors
///
/// Returns [`InstallError::HomeNotFound`] when no candidate variable is set.
pub fn resolve_home(opts: &InstallOpts, platform: &Platform) -> Result<PathBuf, InstallError> {
    if let Some(home) = &opts.home {
        return Ok(home.clone());
    }
    home_from_env(home_vars(platform), |key| std::env::var_os(key))
}

const fn home_vars(platform: &Platform) -> &'static [&'static str] {
    if platform.is_windows() {
        &["USERPROFILE", "HOME"]
    } else {
        &["HOME"]
    }
}

fn home_from_env(
    vars: &[&str],
    lookup: impl Fn(&str) -> Option<OsString>,
) -> Result<PathBuf, InstallError> {
    vars.iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| InstallError::HomeNotFound(format!("{} is not set", vars.join(" or "))))
}
