//! Read-only status report.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::paths::Paths;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Logger;
use crate::platform::capability_name;
use crate::resolver;
use crate::resources::binary::BinaryInstall;
use crate::resources::directory::DirectoryResource;
use crate::resources::{Resource as _, ResourceState};
use crate::source::LocalSource;
use crate::tasks::Context;

/// Run the check command.
///
/// # Errors
///
/// Returns an error if anything needed at runtime is missing.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let problems = report(Paths::from_opts(global), log, &SystemExecutor)?;
    if problems > 0 {
        anyhow::bail!("{problems} problem(s) found; run `install` or `bootstrap` to fix");
    }
    Ok(())
}

/// Log the state of the host and return the number of problems found.
///
/// # Errors
///
/// Returns an error if the embedded requirements table is invalid or a path
/// cannot be inspected.
pub fn report(paths: Paths, log: &Logger, executor: &dyn Executor) -> Result<usize> {
    let ctx = Context::new(paths, log, executor, true)?;
    let mut problems = 0;

    log.stage("Dependencies");
    log.info(&format!(
        "package manager: {}",
        capability_name(ctx.facts.manager())
    ));
    for req in &ctx.requirements {
        if ctx.facts.is_satisfied(req) {
            log.info(&format!("ok      {}", req.name));
        } else {
            log.warn(&format!(
                "missing {} (any of: {})",
                req.name,
                req.provides.join(", ")
            ));
            problems += 1;
        }
    }
    match resolver::resolve(&ctx.requirements, &ctx.facts) {
        Ok(plan) if plan.is_empty() => {}
        Ok(plan) => log.info(&format!("would install: {}", plan.packages.join(" "))),
        Err(e) => log.warn(&e.to_string()),
    }

    log.stage("Layout");
    for (path, class) in ctx.paths.layout() {
        let dir = DirectoryResource::new(path, class);
        match dir.current_state()? {
            ResourceState::Correct => log.info(&format!("ok      {}", dir.path.display())),
            ResourceState::Incorrect { current } => log.info(&format!(
                "ok      {} (mode {current}, {class} is {:o})",
                dir.path.display(),
                class.mode()
            )),
            ResourceState::Missing => {
                log.warn(&format!("missing {}", dir.path.display()));
                problems += 1;
            }
            ResourceState::Invalid { reason } => {
                log.warn(&reason);
                problems += 1;
            }
        }
    }
    let config = ctx.paths.config_file();
    if config.is_file() {
        log.info(&format!("ok      {}", config.display()));
    } else {
        log.warn(&format!("missing {}", config.display()));
        problems += 1;
    }

    log.stage("Executable");
    // The source is irrelevant for a state query.
    let placeholder = LocalSource::from_checkout(std::path::Path::new("."));
    let bin = BinaryInstall::new(&ctx.paths.bin, &placeholder);
    match bin.current_state()? {
        ResourceState::Correct => log.info(&format!("ok      {}", ctx.paths.bin.display())),
        ResourceState::Incorrect { current } => {
            log.warn(&format!(
                "{} has mode {current}, expected 755",
                ctx.paths.bin.display()
            ));
            problems += 1;
        }
        ResourceState::Missing => {
            log.warn(&format!("missing {}", ctx.paths.bin.display()));
            problems += 1;
        }
        ResourceState::Invalid { reason } => {
            log.warn(&reason);
            problems += 1;
        }
    }

    Ok(problems)
}
