// Shared helpers for integration tests.
//
// Every test provisions into a throwaway root: the default layout is
// re-rooted under a `TempDir`, and package-manager calls are intercepted by
// `StubExecutor` so nothing is installed on the machine running the tests.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashSet;
use std::ffi::OsStr;
use std::os::unix::fs::PermissionsExt as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use mailmig_installer::config::paths::Paths;
use mailmig_installer::exec::{ExecResult, Executor, SystemExecutor};
use mailmig_installer::logging::Logger;
use mailmig_installer::platform::PackageManager;

/// Executable that passes every validation step.
pub const GOOD_SCRIPT: &str = "#!/bin/sh\nexit 0\n";

/// Executor for end-to-end runs.
///
/// `which` answers `true` for every program except those marked absent.
/// Package-manager invocations are recorded and succeed without running;
/// anything else (the post-install smoke test) runs for real.
#[derive(Debug, Default)]
pub struct StubExecutor {
    absent: HashSet<String>,
    manager_calls: Mutex<Vec<String>>,
}

impl StubExecutor {
    /// Host where every command is already present.
    pub fn provisioned() -> Self {
        Self::default()
    }

    /// Host where `programs` are missing from `PATH`.
    pub fn without(programs: &[&str]) -> Self {
        Self {
            absent: programs.iter().map(|p| (*p).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Every package-manager invocation, rendered as `program args...`.
    pub fn manager_calls(&self) -> Vec<String> {
        self.manager_calls.lock().unwrap().clone()
    }
}

fn is_manager(program: &OsStr) -> bool {
    PackageManager::ALL
        .iter()
        .any(|m| OsStr::new(m.executable()) == program)
}

impl Executor for StubExecutor {
    fn run_unchecked(&self, program: &OsStr, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.run_unchecked_with_env(program, args, &[])
    }

    fn run_unchecked_with_env(
        &self,
        program: &OsStr,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> anyhow::Result<ExecResult> {
        if is_manager(program) {
            let mut rendered = vec![program.to_string_lossy().into_owned()];
            rendered.extend(args.iter().map(|a| (*a).to_string()));
            self.manager_calls.lock().unwrap().push(rendered.join(" "));
            return Ok(ExecResult {
                stdout: String::new(),
                stderr: String::new(),
                success: true,
                code: Some(0),
            });
        }
        SystemExecutor.run_unchecked_with_env(program, args, env)
    }

    fn which(&self, program: &str) -> bool {
        !self.absent.contains(program)
    }
}

/// Default layout staged under `root`.
pub fn paths_under(root: &Path) -> Paths {
    Paths::new(
        Path::new("/usr/local/bin"),
        Path::new("/etc/mailmig"),
        Path::new("/var/lib/mailmig"),
        Path::new("/var/log/mailmig"),
    )
    .rooted_at(root)
}

/// A fake mailmig checkout containing `bin/mailmig` with `contents`.
pub fn checkout(root: &Path, contents: &str) -> PathBuf {
    let checkout = root.join("checkout");
    let bin = checkout.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::write(bin.join("mailmig"), contents).unwrap();
    std::fs::set_permissions(bin.join("mailmig"), std::fs::Permissions::from_mode(0o644))
        .unwrap();
    checkout
}

/// Logger that does not need a global subscriber.
pub fn logger() -> Logger {
    Logger::new("test")
}

/// Permission bits of `path`.
pub fn mode(path: &Path) -> u32 {
    std::fs::metadata(path).unwrap().permissions().mode() & 0o777
}

/// Names of files in `dir` that look like staging leftovers.
pub fn staging_leftovers(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.starts_with(".mailmig."))
        .collect()
}
