//! Install from a local checkout.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use crate::cli::{GlobalOpts, InstallOpts};
use crate::config::paths::Paths;
use crate::exec::SystemExecutor;
use crate::logging::Logger;
use crate::source::LocalSource;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if any stage fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Logger) -> Result<()> {
    let root = resolve_root(opts)?;
    let source = LocalSource::from_checkout(&root);
    log.info(&format!("checkout: {}", root.display()));
    super::provision(
        Paths::from_opts(global),
        global.dry_run,
        Box::new(source),
        log,
        &SystemExecutor,
    )
}

/// Checkout root: `--root`/`MAILMIG_ROOT`, else the current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read.
pub fn resolve_root(opts: &InstallOpts) -> Result<PathBuf> {
    match &opts.root {
        Some(root) => Ok(root.clone()),
        None => std::env::current_dir().context("reading current directory"),
    }
}
