use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::error::ProvisionError;
use crate::resources::binary::{BinaryInstall, remove_executable};
use crate::resources::{Applicable as _, ResourceChange};
use crate::source::BinarySource;

/// Install the `mailmig` executable from the run's source.
#[derive(Debug)]
pub struct InstallBinary {
    source: Box<dyn BinarySource>,
}

impl InstallBinary {
    /// Install from `source`.
    #[must_use]
    pub fn new(source: Box<dyn BinarySource>) -> Self {
        Self { source }
    }
}

impl Task for InstallBinary {
    fn name(&self) -> &'static str {
        "Install executable"
    }

    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult> {
        let install = BinaryInstall::new(&ctx.paths.bin, self.source.as_ref());
        if ctx.dry_run {
            self.source.preflight()?;
            ctx.log
                .dry_run(&format!("would install {}", install.description()));
            return Ok(TaskResult::DryRun);
        }
        ctx.log.info(&format!("installing {}", install.description()));
        install.apply()?;
        ctx.log.info(&format!("installed {}", ctx.paths.bin.display()));
        Ok(TaskResult::Ok)
    }
}

/// Smoke-test the installed executable with `--help`.
#[derive(Debug)]
pub struct VerifyBinary;

impl Task for VerifyBinary {
    fn name(&self) -> &'static str {
        "Verify executable"
    }

    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult> {
        let bin = &ctx.paths.bin;
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would run {} --help", bin.display()));
            return Ok(TaskResult::DryRun);
        }
        let failed = |detail: String| ProvisionError::Verification {
            path: bin.clone(),
            detail,
        };
        let result = ctx
            .executor
            .run_unchecked(bin.as_os_str(), &["--help"])
            .map_err(|e| failed(format!("could not be executed: {e:#}")))?;
        if !result.success {
            let detail = result.code.map_or_else(
                || "was killed by a signal".to_string(),
                |code| format!("exited with status {code}"),
            );
            return Err(failed(detail).into());
        }
        ctx.log.debug(&format!("{} --help exited 0", bin.display()));
        Ok(TaskResult::Ok)
    }
}

/// Remove the installed executable, leaving all data in place.
#[derive(Debug)]
pub struct RemoveBinary;

impl Task for RemoveBinary {
    fn name(&self) -> &'static str {
        "Remove executable"
    }

    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult> {
        let bin = &ctx.paths.bin;
        if ctx.dry_run {
            if bin.exists() {
                ctx.log.dry_run(&format!("would remove {}", bin.display()));
                return Ok(TaskResult::DryRun);
            }
            return Ok(TaskResult::Skipped("not installed".to_string()));
        }
        match remove_executable(bin)? {
            ResourceChange::Applied => {
                ctx.log.info(&format!("removed {}", bin.display()));
                Ok(TaskResult::Ok)
            }
            ResourceChange::AlreadyCorrect => {
                Ok(TaskResult::Skipped("not installed".to_string()))
            }
        }
    }
}
