use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::config::DEFAULT_CONFIG;
use crate::resources::config_file::ConfigFileResource;
use crate::resources::error::ResourceError;
use crate::resources::{Applicable as _, Resource as _, ResourceChange, ResourceState};

const EXISTS: &str = "exists, not overwritten";

/// Write the default `mailmig.conf` unless one is already there.
#[derive(Debug)]
pub struct SeedConfig;

impl Task for SeedConfig {
    fn name(&self) -> &'static str {
        "Seed default config"
    }

    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult> {
        let file = ConfigFileResource::new(ctx.paths.config_file(), DEFAULT_CONFIG);
        match file.current_state()? {
            ResourceState::Correct | ResourceState::Incorrect { .. } => {
                ctx.log.info(&format!("{}: {EXISTS}", file.description()));
                return Ok(TaskResult::Skipped(EXISTS.to_string()));
            }
            ResourceState::Invalid { reason } => {
                return Err(ResourceError::InvalidState {
                    resource: file.description(),
                    reason,
                }
                .into());
            }
            ResourceState::Missing => {}
        }

        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would write default config to {}", file.description()));
            return Ok(TaskResult::DryRun);
        }

        match file.apply()? {
            ResourceChange::Applied => {
                if let Err(e) = file.harden() {
                    ctx.log.warn(&e.to_string());
                }
                ctx.log.info(&format!("wrote {}", file.description()));
                Ok(TaskResult::Ok)
            }
            ResourceChange::AlreadyCorrect => {
                ctx.log.info(&format!("{}: {EXISTS}", file.description()));
                Ok(TaskResult::Skipped(EXISTS.to_string()))
            }
        }
    }
}
