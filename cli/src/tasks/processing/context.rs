//! Shared execution context for tasks.
use std::fmt;

use crate::config::Config;
use crate::logging::Log;
use crate::platform::Platform;

/// Shared context for task execution.
pub struct Context<'a> {
    /// Loaded configuration and discovered dotfiles.
    pub config: &'a Config,
    /// Detected platform information.
    pub platform: &'a Platform,
    /// Logger for output and task recording.
    pub log: &'a dyn Log,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("config", &"<Config>")
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl<'a> Context<'a> {
    /// Creates a new context for task execution.
    #[must_use]
    pub const fn new(
        config: &'a Config,
        platform: &'a Platform,
        log: &'a dyn Log,
        dry_run: bool,
    ) -> Self {
        Self {
            config,
            platform,
            log,
            dry_run,
        }
    }
}
