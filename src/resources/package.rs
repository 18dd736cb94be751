//! Bulk package installation through the host's package manager.
use anyhow::Result;
use std::ffi::OsStr;

use super::ResourceChange;
use crate::error::ProvisionError;
use crate::exec::{ExecResult, Executor};
use crate::platform::PackageManager;

/// A fully rendered package-manager invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    /// Executable to run.
    pub program: &'static str,
    /// Arguments, packages last.
    pub args: Vec<String>,
    /// Extra environment for the child.
    pub env: Vec<(&'static str, &'static str)>,
}

impl InstallCommand {
    /// Shell-style rendering used when echoing the command to the log.
    #[must_use]
    pub fn display(&self) -> String {
        let mut parts: Vec<String> = self.env.iter().map(|(k, v)| format!("{k}={v}")).collect();
        parts.push(self.program.to_string());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Run the command, treating a spawn failure like a failed exit.
    fn run(&self, executor: &dyn Executor) -> Result<ExecResult, ProvisionError> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        executor
            .run_unchecked_with_env(OsStr::new(self.program), &args, &self.env)
            .map_err(|e| ProvisionError::PackageManager {
                program: self.program.to_string(),
                code: -1,
                stderr: format!("{e:#}"),
            })
    }
}

/// Metadata refresh required before installing, if the manager needs one.
#[must_use]
pub fn refresh_command(manager: PackageManager) -> Option<InstallCommand> {
    match manager {
        PackageManager::Apt => Some(InstallCommand {
            program: "apt-get",
            args: vec!["update".to_string()],
            env: vec![("DEBIAN_FRONTEND", "noninteractive")],
        }),
        PackageManager::Dnf
        | PackageManager::Yum
        | PackageManager::Pacman
        | PackageManager::Apk => None,
    }
}

/// Non-interactive install of `packages` in one invocation.
#[must_use]
pub fn install_command(manager: PackageManager, packages: &[String]) -> InstallCommand {
    let (program, flags, env): (&'static str, &[&str], Vec<(&'static str, &'static str)>) =
        match manager {
            PackageManager::Apt => (
                "apt-get",
                &["install", "-y", "--no-install-recommends"],
                vec![("DEBIAN_FRONTEND", "noninteractive")],
            ),
            PackageManager::Dnf => ("dnf", &["install", "-y"], vec![]),
            PackageManager::Yum => ("yum", &["install", "-y"], vec![]),
            PackageManager::Pacman => ("pacman", &["-S", "--needed", "--noconfirm"], vec![]),
            PackageManager::Apk => ("apk", &["add", "--no-cache"], vec![]),
        };
    let mut args: Vec<String> = flags.iter().map(|s| (*s).to_string()).collect();
    args.extend(packages.iter().cloned());
    InstallCommand { program, args, env }
}

/// Install every package in `packages` with a single manager invocation,
/// preceded by a metadata refresh where the manager needs one.
///
/// An empty list runs nothing.
///
/// # Errors
///
/// Returns [`ProvisionError::PackageManager`] if either invocation cannot
/// be spawned or exits non-zero.
pub fn install_plan(
    manager: PackageManager,
    packages: &[String],
    executor: &dyn Executor,
) -> Result<ResourceChange> {
    if packages.is_empty() {
        return Ok(ResourceChange::AlreadyCorrect);
    }
    if let Some(refresh) = refresh_command(manager) {
        check(&refresh, refresh.run(executor)?)?;
    }
    let install = install_command(manager, packages);
    check(&install, install.run(executor)?)?;
    Ok(ResourceChange::Applied)
}

fn check(cmd: &InstallCommand, result: ExecResult) -> Result<()> {
    if result.success {
        return Ok(());
    }
    Err(ProvisionError::PackageManager {
        program: cmd.program.to_string(),
        code: result.code.unwrap_or(-1),
        stderr: result.stderr.trim().to_string(),
    }
    .into())
}
