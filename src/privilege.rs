//! Root privilege guard.
//!
//! Runs before anything touches the system. When the process is not root it
//! replaces itself with `sudo -E <exe> <args…>`, so the elevated run sees the
//! same arguments and environment and nothing executes twice.
use std::path::PathBuf;

use anyhow::Result;
use sudo::RunningAs;

use crate::error::ProvisionError;
use crate::logging::Logger;

/// Elevation helper looked up on `PATH`.
pub const HELPER: &str = "sudo";

/// Outcome of the privilege check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Escalation {
    /// Already root; continue.
    AlreadyPrivileged,
    /// Re-execute through the helper at this path.
    Reexec(PathBuf),
    /// Not root and no helper available.
    Unavailable,
}

/// Decide how to obtain root from the current state.
#[must_use]
pub fn decide(is_root: bool, helper: Option<PathBuf>) -> Escalation {
    match (is_root, helper) {
        (true, _) => Escalation::AlreadyPrivileged,
        (false, Some(helper)) => Escalation::Reexec(helper),
        (false, None) => Escalation::Unavailable,
    }
}

/// Ensure the process runs as root, re-executing under `sudo` if needed.
///
/// Returns only when already privileged; a successful re-exec never returns.
///
/// # Errors
///
/// Returns [`ProvisionError::Privilege`] if no helper is available or the
/// re-exec fails.
pub fn ensure_privileged(log: &Logger) -> Result<()> {
    let is_root = matches!(sudo::check(), RunningAs::Root | RunningAs::Suid);
    let program = program_name();
    match decide(is_root, which::which(HELPER).ok()) {
        Escalation::AlreadyPrivileged => {
            log.debug("running as root");
            Ok(())
        }
        Escalation::Unavailable => Err(ProvisionError::Privilege {
            reason: format!("not running as root and {HELPER} was not found on PATH"),
            program,
        }
        .into()),
        Escalation::Reexec(helper) => {
            use std::os::unix::process::CommandExt as _;

            let exe = std::env::current_exe().map_err(|e| ProvisionError::Privilege {
                reason: format!("cannot locate current executable: {e}"),
                program: program.clone(),
            })?;
            log.info(&format!("re-running as root via {}", helper.display()));
            let err = std::process::Command::new(&helper)
                .arg("-E")
                .arg("--")
                .arg(&exe)
                .args(std::env::args_os().skip(1))
                .exec();
            Err(ProvisionError::Privilege {
                reason: format!("failed to execute {}: {err}", helper.display()),
                program,
            }
            .into())
        }
    }
}

fn program_name() -> String {
    program_name_from(std::env::args_os().next().as_deref())
}

fn program_name_from(argv0: Option<&std::ffi::OsStr>) -> String {
    argv0
        .and_then(|a| std::path::Path::new(a).file_name())
        .map_or_else(
            || env!("CARGO_PKG_NAME").to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
}
