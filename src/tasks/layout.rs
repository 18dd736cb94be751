use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::directory::DirectoryResource;
use crate::resources::error::ResourceError;
use crate::resources::{Applicable as _, Resource as _, ResourceState};

/// Create the config, state, and log directories.
///
/// Missing directories are created and given their class mode. Existing
/// ones keep whatever mode they have; a private directory looser than its
/// class only produces a warning.
#[derive(Debug)]
pub struct CreateLayout;

impl Task for CreateLayout {
    fn name(&self) -> &'static str {
        "Create directory layout"
    }

    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult> {
        let mut created = 0usize;
        for (path, class) in ctx.paths.layout() {
            let dir = DirectoryResource::new(path, class);
            match dir.current_state()? {
                ResourceState::Missing if ctx.dry_run => {
                    ctx.log.dry_run(&format!("would create {}", dir.description()));
                }
                ResourceState::Missing => {
                    dir.apply()?;
                    if let Err(e) = dir.harden() {
                        ctx.log.warn(&e.to_string());
                    }
                    ctx.log.info(&format!("created {}", dir.description()));
                    created += 1;
                }
                ResourceState::Correct => {
                    ctx.log.debug(&format!("ok {}", dir.description()));
                }
                ResourceState::Incorrect { current } => {
                    let looser = u32::from_str_radix(&current, 8)
                        .is_ok_and(|mode| class.is_looser(mode));
                    if looser {
                        ctx.log.warn(&format!(
                            "{} is {class} but has mode {current}; leaving it unchanged",
                            dir.path.display()
                        ));
                    } else {
                        ctx.log.debug(&format!(
                            "exists {} (mode {current}, left unchanged)",
                            dir.path.display()
                        ));
                    }
                }
                ResourceState::Invalid { reason } => {
                    return Err(ResourceError::InvalidState {
                        resource: dir.path.display().to_string(),
                        reason,
                    }
                    .into());
                }
            }
        }

        if ctx.dry_run {
            Ok(TaskResult::DryRun)
        } else if created == 0 {
            Ok(TaskResult::Skipped("all directories exist".to_string()))
        } else {
            Ok(TaskResult::Ok)
        }
    }
}
