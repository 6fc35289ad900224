//! Domain-specific error types for the installer.
//!
//! Internal modules return [`InstallError`] for failures that have a name of
//! their own; filesystem work inside resources carries `anyhow` context
//! instead. Command handlers at the CLI boundary convert everything to
//! [`anyhow::Error`] via the standard `?` operator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing or running an install.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The host is not Linux, macOS, or Windows.
    #[error("Unsupported operating system: {0}")]
    UnsupportedOs(String),

    /// No repository root was given and none could be discovered.
    #[error("cannot determine dotfiles root. Use --root or set DOTFILES_ROOT env var")]
    RootNotFound,

    /// The destination directory could not be determined.
    #[error("cannot determine home directory: {0}")]
    HomeNotFound(String),

    /// `dotfiles.toml` exists but is not valid.
    #[error("invalid settings file {}: {message}", .path.display())]
    InvalidSettings {
        /// Path of the settings file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A filesystem operation failed on `path`.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        /// What was being attempted (e.g. `"reading"`).
        action: &'static str,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl InstallError {
    /// Wrap an I/O error with the action and path it occurred on.
    #[must_use]
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Whether this error was caused by missing permissions.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied)
    }
}

/// Whether any cause in `err`'s chain is a permission failure.
#[must_use]
pub fn is_permission_denied(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<InstallError>()
            .is_some_and(InstallError::is_permission_denied)
            || cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io| io.kind() == std::io::ErrorKind::PermissionDenied)
    })
}
