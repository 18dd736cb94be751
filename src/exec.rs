//! Process execution behind the [`Executor`] trait.
//!
//! Everything that shells out (package managers, the post-install smoke
//! test, `PATH` lookups) goes through an [`Executor`] so tasks can be tested
//! with recording or scripted executors instead of real processes.
use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::process::{Command, Output, Stdio};

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over process execution.
///
/// Both run methods return the exit status instead of failing on it, so each
/// caller maps a non-zero exit to its own error class.
pub trait Executor: std::fmt::Debug {
    /// Run a command and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process cannot be spawned.
    fn run_unchecked(&self, program: &OsStr, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with extra environment variables and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process cannot be spawned.
    fn run_unchecked_with_env(
        &self,
        program: &OsStr,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// Executor that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_unchecked(&self, program: &OsStr, args: &[&str]) -> Result<ExecResult> {
        self.run_unchecked_with_env(program, args, &[])
    }

    fn run_unchecked_with_env(
        &self,
        program: &OsStr,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());
        for (k, v) in env {
            cmd.env(k, v);
        }
        let output = cmd
            .output()
            .with_context(|| format!("failed to execute: {}", program.display()))?;

        Ok(ExecResult::from(output))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
