use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult};
use crate::error::ProvisionError;
use crate::platform::capability_name;
use crate::resolver;
use crate::resources::package::{self, install_command, refresh_command};

/// Install the system packages for every missing runtime command.
#[derive(Debug)]
pub struct InstallDependencies;

impl Task for InstallDependencies {
    fn name(&self) -> &'static str {
        "Install dependencies"
    }

    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult> {
        ctx.log.info(&format!(
            "package manager: {}",
            capability_name(ctx.facts.manager())
        ));

        let plan = resolver::resolve(&ctx.requirements, &ctx.facts)?;
        if plan.is_empty() {
            return Ok(TaskResult::Skipped("all required commands present".to_string()));
        }
        let manager = ctx
            .facts
            .manager()
            .ok_or_else(|| ProvisionError::UnsupportedEnvironment {
                missing: plan.unsatisfied.clone(),
            })?;

        ctx.log
            .info(&format!("missing: {}", plan.unsatisfied.join(", ")));
        let commands: Vec<_> = refresh_command(manager)
            .into_iter()
            .chain(std::iter::once(install_command(manager, &plan.packages)))
            .collect();

        if ctx.dry_run {
            for cmd in &commands {
                ctx.log.dry_run(&format!("would run: {}", cmd.display()));
            }
            return Ok(TaskResult::DryRun);
        }

        for cmd in &commands {
            ctx.log.info(&format!("running: {}", cmd.display()));
        }
        package::install_plan(manager, &plan.packages, ctx.executor)
            .with_context(|| format!("installing {}", plan.packages.join(" ")))?;
        Ok(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use crate::platform::PackageManager;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::{all_present, make_context};

    fn without(cmds: &[&str]) -> Vec<String> {
        all_present()
            .into_iter()
            .filter(|c| !cmds.contains(&c.as_str()))
            .collect()
    }

    #[test]
    fn provisioned_host_runs_nothing() {
        let (log, tmp, _guard) = isolated_logger();
        let executor = MockExecutor::with_responses(vec![]);
        let ctx = make_context(
            tmp.path(),
            &log,
            &executor,
            Some(PackageManager::Apt),
            all_present(),
            false,
        );
        let result = InstallDependencies.run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::Skipped(_)));
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn installs_deduplicated_plan_once() {
        let (log, tmp, _guard) = isolated_logger();
        let executor = MockExecutor::ok("");
        let ctx = make_context(
            tmp.path(),
            &log,
            &executor,
            Some(PackageManager::Pacman),
            without(&["flock", "setpriv", "tmux"]),
            false,
        );
        assert_eq!(InstallDependencies.run(&ctx).unwrap(), TaskResult::Ok);
        let calls = executor.recorded_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "pacman");
        assert_eq!(
            calls[0].1,
            ["-S", "--needed", "--noconfirm", "tmux", "util-linux"]
        );
    }

    #[test]
    fn dry_run_makes_no_calls() {
        let (log, tmp, _guard) = isolated_logger();
        let executor = MockExecutor::with_responses(vec![]);
        let ctx = make_context(
            tmp.path(),
            &log,
            &executor,
            Some(PackageManager::Apt),
            vec![],
            true,
        );
        assert_eq!(InstallDependencies.run(&ctx).unwrap(), TaskResult::DryRun);
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn no_manager_with_missing_commands_fails() {
        let (log, tmp, _guard) = isolated_logger();
        let executor = MockExecutor::with_responses(vec![]);
        let ctx = make_context(
            tmp.path(),
            &log,
            &executor,
            None,
            without(&["imapsync"]),
            false,
        );
        let err = InstallDependencies.run(&ctx).unwrap_err();
        assert_eq!(crate::error::exit_code_for(&err), 3);
        assert!(err.to_string().contains("imapsync"));
    }

    #[test]
    fn manager_failure_is_fatal() {
        let (log, tmp, _guard) = isolated_logger();
        let executor = MockExecutor::fail();
        let ctx = make_context(
            tmp.path(),
            &log,
            &executor,
            Some(PackageManager::Apk),
            without(&["tmux"]),
            false,
        );
        let err = InstallDependencies.run(&ctx).unwrap_err();
        assert_eq!(crate::error::exit_code_for(&err), 5);
    }
}
