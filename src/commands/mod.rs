pub mod bootstrap;
pub mod check;
pub mod install;
pub mod uninstall;
pub mod version;

use anyhow::Result;

use crate::config::paths::Paths;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::privilege;
use crate::source::BinarySource;
use crate::tasks::{self, Context, Task};

/// Execute `tasks` in order, stopping at the first failure, then print the
/// summary.
///
/// # Errors
///
/// Returns the first task error.
pub fn run_tasks(tasks: &[Box<dyn Task>], ctx: &Context<'_>, log: &Logger) -> Result<()> {
    let result = tasks
        .iter()
        .try_for_each(|task| tasks::execute(task.as_ref(), ctx));
    log.print_summary();
    result
}

/// Obtain root unless this is a dry run.
///
/// `main` runs this before the subscriber creates the run log, so a
/// re-exec under sudo never leaves a log file owned by the invoking user.
///
/// # Errors
///
/// Propagates [`privilege::ensure_privileged`] failures.
pub fn require_root(dry_run: bool, log: &Logger) -> Result<()> {
    if dry_run {
        log.debug("dry run: not checking privileges");
        return Ok(());
    }
    privilege::ensure_privileged(log)
}

/// Run the full provisioning pipeline with `source` as the executable.
///
/// Does not check privileges; `main` calls [`require_root`] first.
///
/// # Errors
///
/// Returns the first fatal error from any stage.
pub fn provision(
    paths: Paths,
    dry_run: bool,
    source: Box<dyn BinarySource>,
    log: &Logger,
    executor: &dyn Executor,
) -> Result<()> {
    let ctx = Context::new(paths, log, executor, dry_run)?;
    let pipeline = tasks::install_tasks(source);
    run_tasks(&pipeline, &ctx, log)?;
    if !dry_run {
        print_next_steps(&ctx.paths, log);
    }
    Ok(())
}

fn print_next_steps(paths: &Paths, log: &Logger) {
    log.stage("Next steps");
    log.info(&format!(
        "1. review defaults in {}",
        paths.config_file().display()
    ));
    log.info(&format!(
        "2. create a migration profile in {}",
        paths.profiles_dir.display()
    ));
    log.info(&format!(
        "3. store credentials under {} (owner-only)",
        paths.secrets_dir.display()
    ));
    log.info(&format!("4. run `{} --help`", paths.bin.display()));
}
