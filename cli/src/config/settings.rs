//! Optional `dotfiles.toml` loading.
//!
//! The file lives at the repository root and tunes, per OS, which directory
//! holds the dotfiles and which of its files are never installed:
//!
//! ```toml
//! [linux]
//! dir = "linux"
//! exclude = ["README.md", "scripts"]
//! ```
//!
//! A missing file yields the defaults.
use std::path::Path;

use serde::Deserialize;

use crate::error::InstallError;
use crate::platform::Os;

/// File name of the settings file, relative to the repository root.
pub const SETTINGS_FILE: &str = "dotfiles.toml";

/// Parsed `dotfiles.toml`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Settings for Linux hosts.
    #[serde(default)]
    pub linux: OsSettings,
    /// Settings for macOS hosts.
    #[serde(default)]
    pub macos: OsSettings,
    /// Settings for Windows hosts.
    #[serde(default)]
    pub windows: OsSettings,
}

/// Per-OS section of `dotfiles.toml`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OsSettings {
    /// Source directory relative to the repository root; defaults to the OS name.
    pub dir: Option<String>,
    /// Paths relative to the source directory that are never installed.
    /// A directory entry excludes everything beneath it.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Settings {
    /// The section that applies to `os`.
    #[must_use]
    pub const fn for_os(&self, os: Os) -> &OsSettings {
        match os {
            Os::Linux => &self.linux,
            Os::MacOs => &self.macos,
            Os::Windows => &self.windows,
        }
    }
}

impl OsSettings {
    /// Name of the source directory for `os`.
    #[must_use]
    pub fn dir_name(&self, os: Os) -> &str {
        self.dir.as_deref().unwrap_or_else(|| os.dir_name())
    }

    /// Whether `relative` (a path under the source directory) is excluded.
    #[must_use]
    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.exclude
            .iter()
            .any(|pattern| relative.starts_with(Path::new(pattern)))
    }
}

/// Load `dotfiles.toml` from `path`, returning defaults when it is absent.
///
/// # Errors
///
/// Returns [`InstallError::Io`] if the file exists but cannot be read, and
/// [`InstallError::InvalidSettings`] if it is not valid TOML or contains
/// unknown keys.
pub fn load(path: &Path) -> Result<Settings, InstallError> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| InstallError::io("reading", path, e))?;

    toml::from_str(&content).map_err(|e| InstallError::InvalidSettings {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}
