//! Turns the requirements table and host facts into an install plan.
use std::collections::{BTreeSet, HashSet};

use crate::config::requirements::Requirement;
use crate::error::ProvisionError;
use crate::exec::Executor;
use crate::platform::PackageManager;

/// What the host looks like, gathered once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    manager: Option<PackageManager>,
    present: BTreeSet<String>,
}

impl HostFacts {
    /// Facts from explicit values.
    #[must_use]
    pub fn new(manager: Option<PackageManager>, present: impl IntoIterator<Item = String>) -> Self {
        Self {
            manager,
            present: present.into_iter().collect(),
        }
    }

    /// Detect the package manager and which of the alternatives named in
    /// `requirements` are on `PATH`.
    #[must_use]
    pub fn gather(requirements: &[Requirement], executor: &dyn Executor) -> Self {
        let present = requirements
            .iter()
            .flat_map(|r| r.provides.iter())
            .filter(|cmd| executor.which(cmd))
            .cloned()
            .collect();
        Self {
            manager: PackageManager::detect(executor),
            present,
        }
    }

    /// Detected package manager, `None` when the host has none we support.
    #[must_use]
    pub const fn manager(&self) -> Option<PackageManager> {
        self.manager
    }

    /// Whether any alternative for `req` is present.
    #[must_use]
    pub fn is_satisfied(&self, req: &Requirement) -> bool {
        req.provides.iter().any(|cmd| self.present.contains(cmd))
    }
}

/// Packages to install and the requirements that asked for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPlan {
    /// Deduplicated packages in first-seen order.
    pub packages: Vec<String>,
    /// Requirements with no alternative present.
    pub unsatisfied: Vec<String>,
}

impl InstallPlan {
    /// Nothing to install.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Resolve `requirements` against `facts`.
///
/// # Errors
///
/// - [`ProvisionError::UnsupportedEnvironment`] if something is missing and
///   the host has no supported package manager.
/// - [`ProvisionError::UnmappedDependency`] if a missing requirement has no
///   packages for the detected manager.
pub fn resolve(requirements: &[Requirement], facts: &HostFacts) -> Result<InstallPlan, ProvisionError> {
    let missing: Vec<&Requirement> = requirements
        .iter()
        .filter(|r| !facts.is_satisfied(r))
        .collect();
    if missing.is_empty() {
        return Ok(InstallPlan::default());
    }

    let Some(manager) = facts.manager() else {
        return Err(ProvisionError::UnsupportedEnvironment {
            missing: missing.iter().map(|r| r.name.clone()).collect(),
        });
    };

    let mut seen = HashSet::new();
    let mut packages = Vec::new();
    for req in &missing {
        let mapped = req
            .packages_for(manager)
            .ok_or_else(|| ProvisionError::UnmappedDependency {
                manager: manager.to_string(),
                requirement: req.name.clone(),
            })?;
        for pkg in mapped {
            if seen.insert(pkg.as_str()) {
                packages.push(pkg.clone());
            }
        }
    }

    Ok(InstallPlan {
        packages,
        unsatisfied: missing.iter().map(|r| r.name.clone()).collect(),
    })
}
