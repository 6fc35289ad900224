//! Configuration: repository settings and the discovered dotfiles.
pub mod dotfiles;
pub mod settings;

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::platform::Platform;
use dotfiles::{Dotfile, InstallMode};
use settings::OsSettings;

/// Everything an install run needs to know about the repository.
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository root.
    pub root: PathBuf,
    /// Destination directory (the user's home).
    pub home: PathBuf,
    /// Directory holding this OS's dotfiles.
    pub source_dir: PathBuf,
    /// Settings section for this OS.
    pub settings: OsSettings,
    /// Dotfiles discovered under `source_dir`, sorted by relative path.
    pub dotfiles: Vec<Dotfile>,
}

impl Config {
    /// Load `dotfiles.toml` and discover the dotfiles for `platform`.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file is invalid or the source
    /// directory cannot be walked.
    pub fn load(root: &Path, home: &Path, platform: &Platform) -> Result<Self> {
        let settings_path = root.join(settings::SETTINGS_FILE);
        let settings = settings::load(&settings_path)
            .with_context(|| format!("loading {}", settings::SETTINGS_FILE))?
            .for_os(platform.os)
            .clone();

        let source_dir = root.join(settings.dir_name(platform.os));
        let dotfiles = dotfiles::discover(&source_dir, home, &settings)
            .with_context(|| format!("discovering dotfiles in {}", source_dir.display()))?;

        Ok(Self {
            root: root.to_path_buf(),
            home: home.to_path_buf(),
            source_dir,
            settings,
            dotfiles,
        })
    }

    /// Dotfiles installed in the given mode.
    pub fn dotfiles_in(&self, mode: InstallMode) -> impl Iterator<Item = &Dotfile> {
        self.dotfiles.iter().filter(move |d| d.mode == mode)
    }

    /// Whether the source directory for this OS exists.
    #[must_use]
    pub fn has_source_dir(&self) -> bool {
        self.source_dir.is_dir()
    }
}
