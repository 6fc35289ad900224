//! Generic resource processing loop: check state, apply, collect stats.
//!
//! - [`apply`] : single-resource processing
//! - [`context`] : shared execution context for tasks

mod apply;
pub mod context;

pub use context::Context;

use anyhow::Result;

use crate::resources::Resource;

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use dotfiles_installer::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task ran in dry-run mode.
    DryRun,
}

/// Counters for batch tasks that process many dotfiles.
///
/// # Examples
///
/// ```
/// use dotfiles_installer::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 3, already_ok: 10, ..TaskStats::default() };
/// assert_eq!(stats.summary(false), "3 changed, 10 already ok");
/// assert_eq!(stats.summary(true), "3 would change, 10 already ok");
/// ```
///
/// Skipped and failed items are only mentioned when present:
///
/// ```
/// use dotfiles_installer::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, skipped: 3, failed: 1 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 3 skipped, 1 failed");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items left alone because they cannot be installed.
    pub skipped: u32,
    /// Number of items whose check or apply returned an error.
    pub failed: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of items counted.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.changed + self.already_ok + self.skipped + self.failed
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 skipped").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut out = format!("{} {verb}, {} already ok", self.changed, self.already_ok);
        if self.skipped > 0 {
            out.push_str(&format!(", {} skipped", self.skipped));
        }
        if self.failed > 0 {
            out.push_str(&format!(", {} failed", self.failed));
        }
        out
    }

    /// Log the summary and return the task outcome.
    ///
    /// # Errors
    ///
    /// Returns an error naming the failure count if any item failed.
    pub fn finish(self, ctx: &Context) -> Result<TaskResult> {
        ctx.log.info(&self.summary(ctx.dry_run));
        if self.failed > 0 {
            anyhow::bail!("{} of {} dotfile(s) failed", self.failed, self.total());
        }
        if ctx.dry_run {
            Ok(TaskResult::DryRun)
        } else {
            Ok(TaskResult::Ok)
        }
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Check each resource and apply it when it is missing or incorrect.
///
/// Every resource is processed even when earlier ones fail; `verb` names the
/// action in log messages (e.g. `"link"`).
///
/// # Errors
///
/// Returns an error after the loop if any resource failed.
pub fn process_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    verb: &str,
) -> Result<TaskResult> {
    let mut stats = TaskStats::new();
    for resource in resources {
        stats += apply::process_single(ctx, &resource, verb);
    }
    stats.finish(ctx)
}
