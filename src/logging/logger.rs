//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Tracing target for stage headers.
pub(super) const STAGE_TARGET: &str = "mailmig::stage";

/// Tracing target for dry-run actions.
pub(super) const DRY_RUN_TARGET: &str = "mailmig::dry_run";

/// Tracing target for summary lines; events carry a `status` field.
pub(super) const TASK_TARGET: &str = "mailmig::task";

/// Structured logger with dry-run awareness and summary collection.
///
/// Every message also lands in
/// `$XDG_CACHE_HOME/mailmig-installer/<command>.log` (default
/// `~/.cache/mailmig-installer/<command>.log`) through the file layer
/// installed by [`init_subscriber`](super::subscriber::init_subscriber).
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Touches nothing on disk: the file is created by the subscriber's file
    /// layer, after the privilege guard.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(Some(log_file_path(command)))
    }

    /// Create a logger that reports `log_file` in its summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded task entries.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (console only with `-v`; always in the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log an action that a dry run skipped.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a task result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed tasks.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.count(TaskStatus::Failed)
    }

    fn count(&self, status: TaskStatus) -> usize {
        self.tasks
            .lock()
            .map_or(0, |guard| guard.iter().filter(|t| t.status == status).count())
    }

    /// Print one line per recorded task, the totals, and the log location.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage("Summary");
        for task in &tasks {
            let detail = task
                .message
                .as_deref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            tracing::info!(
                target: TASK_TARGET,
                status = task.status.label(),
                "{}{detail}",
                task.name
            );
        }

        let totals: Vec<String> = [
            TaskStatus::Ok,
            TaskStatus::Skipped,
            TaskStatus::DryRun,
            TaskStatus::Failed,
        ]
        .into_iter()
        .map(|status| format!("{} {}", self.count(status), status.label()))
        .collect();
        self.info(&format!("{} tasks: {}", tasks.len(), totals.join(", ")));

        if let Some(path) = self.log_file.as_ref().filter(|p| p.is_file()) {
            self.info(&format!("log: {}", path.display()));
        }
    }
}
