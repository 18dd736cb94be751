//! Uninstall command implementation.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::paths::Paths;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Logger;
use crate::tasks::{self, Context};

/// Run the uninstall command.
///
/// # Errors
///
/// Returns an error if the executable cannot be removed.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    remove(Paths::from_opts(global), global.dry_run, log, &SystemExecutor)
}

/// Remove the executable and report what was kept.
///
/// # Errors
///
/// Returns an error if the executable cannot be removed.
pub fn remove(paths: Paths, dry_run: bool, log: &Logger, executor: &dyn Executor) -> Result<()> {
    let ctx = Context::new(paths, log, executor, dry_run)?;
    super::run_tasks(&tasks::uninstall_tasks(), &ctx, log)?;

    log.stage("Preserved");
    for path in preserved(&ctx.paths) {
        if path.exists() {
            log.info(&path.display().to_string());
        }
    }
    log.info(&format!("to remove all data: {}", purge_command(&ctx.paths)));
    Ok(())
}

/// Paths the uninstaller never touches.
#[must_use]
pub fn preserved(paths: &Paths) -> Vec<std::path::PathBuf> {
    vec![
        paths.config_file(),
        paths.profiles_dir.clone(),
        paths.secrets_dir.clone(),
        paths.run_state_dir.clone(),
        paths.runs_dir.clone(),
    ]
}

/// The exact command that deletes every data root.
#[must_use]
pub fn purge_command(paths: &Paths) -> String {
    let roots: Vec<String> = paths
        .data_roots()
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    format!("rm -rf {}", roots.join(" "))
}
