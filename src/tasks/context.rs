use anyhow::{Context as _, Result};

use crate::config::paths::Paths;
use crate::config::requirements::{self, Requirement};
use crate::exec::Executor;
use crate::logging::Logger;
use crate::resolver::HostFacts;

/// Shared context for task execution.
pub struct Context<'a> {
    /// Resolved install locations.
    pub paths: Paths,
    /// Logger for output and task recording.
    pub log: &'a Logger,
    /// Command executor (real processes or a test double).
    pub executor: &'a dyn Executor,
    /// Report what would change without changing it.
    pub dry_run: bool,
    /// Runtime commands mailmig needs.
    pub requirements: Vec<Requirement>,
    /// Host facts, gathered once when the context is created.
    pub facts: HostFacts,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("paths", &self.paths)
            .field("executor", &self.executor)
            .field("dry_run", &self.dry_run)
            .field("requirements", &self.requirements.len())
            .field("facts", &self.facts)
            .finish_non_exhaustive()
    }
}

impl<'a> Context<'a> {
    /// Load the embedded requirements table and inspect the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded requirements table is invalid.
    pub fn new(
        paths: Paths,
        log: &'a Logger,
        executor: &'a dyn Executor,
        dry_run: bool,
    ) -> Result<Self> {
        let requirements =
            requirements::load_embedded().context("loading embedded requirements table")?;
        let facts = HostFacts::gather(&requirements, executor);
        log.debug(&format!("host facts: {facts:?}"));
        Ok(Self::with_facts(paths, log, executor, dry_run, requirements, facts))
    }

    /// Build a context from explicit requirements and facts.
    #[must_use]
    pub const fn with_facts(
        paths: Paths,
        log: &'a Logger,
        executor: &'a dyn Executor,
        dry_run: bool,
        requirements: Vec<Requirement>,
        facts: HostFacts,
    ) -> Self {
        Self {
            paths,
            log,
            executor,
            dry_run,
            requirements,
            facts,
        }
    }
}
