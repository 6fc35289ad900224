//! Host operating system detection.
use std::fmt;

use crate::error::InstallError;

/// Operating system family the installer supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Linux distributions.
    Linux,
    /// macOS.
    MacOs,
    /// Windows.
    Windows,
}

impl Os {
    /// All supported families, in the order they are listed to users.
    pub const ALL: [Self; 3] = [Self::Linux, Self::MacOs, Self::Windows];

    /// Parse an OS identifier as reported by [`std::env::consts::OS`].
    ///
    /// `darwin` is accepted as an alias for macOS.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::UnsupportedOs`] for any other identifier.
    pub fn from_identifier(name: &str) -> Result<Self, InstallError> {
        match name.to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::MacOs),
            "windows" => Ok(Self::Windows),
            other => Err(InstallError::UnsupportedOs(other.to_string())),
        }
    }

    /// Name of the repository directory holding this OS's dotfiles.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Windows => "windows",
        }
    }

    /// Whether standard-mode dotfiles are symlinked (`true`) or copied.
    #[must_use]
    pub const fn uses_symlinks(self) -> bool {
        matches!(self, Self::Linux | Self::MacOs)
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Detected OS family.
    pub os: Os,
}

impl Platform {
    /// Detect the current platform.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::UnsupportedOs`] when built for a target other
    /// than Linux, macOS, or Windows.
    pub fn detect() -> Result<Self, InstallError> {
        Ok(Self {
            os: Os::from_identifier(std::env::consts::OS)?,
        })
    }

    /// Create a platform with an explicit OS.
    #[must_use]
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// Whether the host is Windows.
    #[must_use]
    pub const fn is_windows(&self) -> bool {
        matches!(self.os, Os::Windows)
    }

    /// Whether standard-mode dotfiles are symlinked on this platform.
    #[must_use]
    pub const fn uses_symlinks(&self) -> bool {
        self.os.uses_symlinks()
    }
}
