//! Install from a pinned remote reference.
use anyhow::Result;

use crate::cli::{BootstrapOpts, GlobalOpts};
use crate::config::paths::Paths;
use crate::exec::SystemExecutor;
use crate::logging::Logger;
use crate::source::{HttpFetcher, RemoteSource};

/// Run the bootstrap command.
///
/// # Errors
///
/// Returns an error if any stage fails.
pub fn run(global: &GlobalOpts, opts: &BootstrapOpts, log: &Logger) -> Result<()> {
    let source = source_for(opts);
    log.info(&format!("reference: {}", source.reference));
    if source.expected_sha256.is_none() {
        log.debug("no checksum pin; relying on the script marker check");
    }
    super::provision(
        Paths::from_opts(global),
        global.dry_run,
        Box::new(source),
        log,
        &SystemExecutor,
    )
}

/// Remote source described by `opts`.
#[must_use]
pub fn source_for(opts: &BootstrapOpts) -> RemoteSource {
    RemoteSource::new(
        &opts.base_url,
        &opts.reference,
        opts.sha256.clone(),
        Box::new(HttpFetcher::new()),
    )
}
