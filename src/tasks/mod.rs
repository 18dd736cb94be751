//! Named pipeline stages that orchestrate resource changes.
pub mod binary;
pub mod config_file;
mod context;
pub mod dependencies;
pub mod layout;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;
use crate::source::BinarySource;

/// Outcome of a task that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed; changes may have been applied.
    Ok,
    /// Task had nothing to do.
    Skipped(String),
    /// Task ran in dry-run mode; no changes were applied.
    DryRun,
}

/// A named pipeline stage.
pub trait Task: std::fmt::Debug {
    /// Human-readable task name.
    fn name(&self) -> &'static str;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage cannot complete; the pipeline stops.
    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult>;
}

/// Stages run by `install` and `bootstrap`, in order.
#[must_use]
pub fn install_tasks(source: Box<dyn BinarySource>) -> Vec<Box<dyn Task>> {
    vec![
        Box::new(dependencies::InstallDependencies),
        Box::new(layout::CreateLayout),
        Box::new(config_file::SeedConfig),
        Box::new(binary::InstallBinary::new(source)),
        Box::new(binary::VerifyBinary),
    ]
}

/// Stages run by `uninstall`.
#[must_use]
pub fn uninstall_tasks() -> Vec<Box<dyn Task>> {
    vec![Box::new(binary::RemoveBinary)]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error after recording it as failed.
pub fn execute(task: &dyn Task, ctx: &Context<'_>) -> Result<()> {
    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            Ok(())
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
            Ok(())
        }
        Err(e) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            Err(e.context(task.name()))
        }
    }
}

/// Shared helpers for task unit tests.
#[cfg(test)]
pub mod test_helpers {
    use std::path::Path;

    use crate::config::paths::Paths;
    use crate::config::requirements::{Requirement, load_embedded};
    use crate::exec::Executor;
    use crate::logging::Logger;
    use crate::platform::PackageManager;
    use crate::resolver::HostFacts;

    use super::Context;

    /// Default layout re-rooted under `root`.
    #[must_use]
    pub fn paths_under(root: &Path) -> Paths {
        Paths::new(
            Path::new("/usr/local/bin"),
            Path::new("/etc/mailmig"),
            Path::new("/var/lib/mailmig"),
            Path::new("/var/log/mailmig"),
        )
        .rooted_at(root)
    }

    /// Every alternative in the embedded table, i.e. a fully provisioned host.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn all_present() -> Vec<String> {
        load_embedded()
            .expect("embedded table")
            .into_iter()
            .flat_map(|r: Requirement| r.provides)
            .collect()
    }

    /// Context rooted at `root` with explicit host facts.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn make_context<'a>(
        root: &Path,
        log: &'a Logger,
        executor: &'a dyn Executor,
        manager: Option<PackageManager>,
        present: Vec<String>,
        dry_run: bool,
    ) -> Context<'a> {
        Context::with_facts(
            paths_under(root),
            log,
            executor,
            dry_run,
            load_embedded().expect("embedded table"),
            HostFacts::new(manager, present),
        )
    }
}
