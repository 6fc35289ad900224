//! Core logging types: message kinds, task outcomes, and the [`Log`] trait.

/// Kind of a user-facing message; decides how and where it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Section header such as a task name.
    Stage,
    /// Regular progress output.
    Info,
    /// Detail shown on the console only with `--verbose`.
    Debug,
    /// Something was left alone or went wrong for a single dotfile.
    Warn,
    /// A failure the user must act on.
    Error,
    /// A change that a dry run would have made.
    DryRun,
}

/// Task outcome recorded for the end-of-run summary.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable task name.
    pub name: String,
    /// Final status of the task.
    pub status: TaskStatus,
    /// Error description for failed tasks.
    pub message: Option<String>,
}

/// Status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task completed successfully.
    Ok,
    /// Task had no dotfiles of its mode.
    NotApplicable,
    /// Task ran in dry-run mode; no changes were applied.
    DryRun,
    /// At least one dotfile handled by the task failed.
    Failed,
}

impl TaskStatus {
    /// Every status, in summary order.
    pub const ALL: [Self; 4] = [Self::Ok, Self::NotApplicable, Self::DryRun, Self::Failed];

    /// Summary icon.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::NotApplicable => "·",
            Self::DryRun => "~",
            Self::Failed => "✗",
        }
    }

    /// ANSI colour used for this status in the summary.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Ok => "\x1b[32m",
            Self::NotApplicable => "\x1b[2m",
            Self::DryRun => "\x1b[37m",
            Self::Failed => "\x1b[31m",
        }
    }

    /// Label used in the summary totals line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotApplicable => "n/a",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }
}

/// Sink for installer output.
///
/// Implementors provide [`emit`](Self::emit) and
/// [`record_task`](Self::record_task); the per-kind helpers forward to
/// `emit`. Tests substitute an in-memory implementation.
pub trait Log {
    /// Write one message of the given kind.
    fn emit(&self, kind: MessageKind, msg: &str);

    /// Record a task result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);

    /// Log a stage header.
    fn stage(&self, msg: &str) {
        self.emit(MessageKind::Stage, msg);
    }
    /// Log an informational message.
    fn info(&self, msg: &str) {
        self.emit(MessageKind::Info, msg);
    }
    /// Log a debug message.
    fn debug(&self, msg: &str) {
        self.emit(MessageKind::Debug, msg);
    }
    /// Log a warning.
    fn warn(&self, msg: &str) {
        self.emit(MessageKind::Warn, msg);
    }
    /// Log an error.
    fn error(&self, msg: &str) {
        self.emit(MessageKind::Error, msg);
    }
    /// Log a dry-run preview.
    fn dry_run(&self, msg: &str) {
        self.emit(MessageKind::DryRun, msg);
    }
}
