//! Logger that routes messages to `tracing` and collects task outcomes.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, MessageKind, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Production [`Log`]: every message becomes a [`tracing`] event, which the
/// subscriber from [`init_subscriber`](super::subscriber::init_subscriber)
/// renders on the console and appends to the install log.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a logger that reports the default install log in its summary.
    #[must_use]
    pub fn new() -> Self {
        Self::with_log_file(log_file_path())
    }

    /// Create a logger that reports `log_file` (if any) in its summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file,
        }
    }

    #[cfg(test)]
    pub(crate) const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Snapshot of the recorded task outcomes.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Number of tasks recorded as failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.task_entries()
            .iter()
            .filter(|t| t.status == TaskStatus::Failed)
            .count()
    }

    /// Print one line per recorded task followed by per-status totals.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage("Summary");
        for task in &tasks {
            let suffix = task
                .message
                .as_deref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!(
                "{}{} {}{suffix}\x1b[0m",
                task.status.color(),
                task.status.icon(),
                task.name
            ));
        }

        let totals: Vec<String> = TaskStatus::ALL
            .into_iter()
            .map(|status| {
                let count = tasks.iter().filter(|t| t.status == status).count();
                format!("{}{count} {}\x1b[0m", status.color(), status.label())
            })
            .collect();
        self.info(&format!("{} tasks: {}", tasks.len(), totals.join(", ")));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    fn emit(&self, kind: MessageKind, msg: &str) {
        match kind {
            MessageKind::Stage => tracing::info!(target: STAGE_TARGET, "{msg}"),
            MessageKind::Info => tracing::info!("{msg}"),
            MessageKind::Debug => tracing::debug!("{msg}"),
            MessageKind::Warn => tracing::warn!("{msg}"),
            MessageKind::Error => tracing::error!("{msg}"),
            MessageKind::DryRun => tracing::info!(target: DRY_RUN_TARGET, "{msg}"),
        }
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}
