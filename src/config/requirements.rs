//! The requirements table: runtime commands and the packages that provide them.
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

use super::{ConfigError, REQUIREMENTS_TOML};
use crate::platform::PackageManager;

const FILE: &str = "requirements.toml";

/// A command mailmig needs at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Requirement {
    /// Logical name, used in errors and logs.
    pub name: String,
    /// Optional one-line description.
    #[serde(default)]
    pub description: String,
    /// Alternative executables; any one of them satisfies the requirement.
    pub provides: Vec<String>,
    /// Packages to install, keyed by package manager name.
    #[serde(default)]
    pub packages: BTreeMap<String, Vec<String>>,
}

impl Requirement {
    /// Packages that satisfy this requirement under `manager`, if mapped.
    #[must_use]
    pub fn packages_for(&self, manager: PackageManager) -> Option<&[String]> {
        self.packages
            .get(&manager.to_string())
            .map(Vec::as_slice)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Table {
    #[serde(default)]
    requirement: Vec<Requirement>,
}

/// Parse and validate a requirements document.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSyntax`] for malformed TOML and
/// [`ConfigError::Invalid`] when a requirement has no name, no alternatives,
/// a duplicate name, an empty package list, or an unknown manager key.
pub fn parse(doc: &str) -> Result<Vec<Requirement>, ConfigError> {
    let table: Table = toml::from_str(doc).map_err(|e| ConfigError::InvalidSyntax {
        file: FILE,
        message: e.message().to_string(),
    })?;

    let known: HashSet<String> = PackageManager::ALL.iter().map(ToString::to_string).collect();
    let mut names = HashSet::new();
    for req in &table.requirement {
        let invalid = |message: String| ConfigError::Invalid { file: FILE, message };
        if req.name.trim().is_empty() {
            return Err(invalid("requirement with empty name".to_string()));
        }
        if !names.insert(req.name.as_str()) {
            return Err(invalid(format!("duplicate requirement '{}'", req.name)));
        }
        if req.provides.is_empty() || req.provides.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid(format!(
                "requirement '{}' must list at least one executable in provides",
                req.name
            )));
        }
        for (manager, packages) in &req.packages {
            if !known.contains(manager) {
                return Err(invalid(format!(
                    "requirement '{}' maps unknown package manager '{manager}'",
                    req.name
                )));
            }
            if packages.is_empty() {
                return Err(invalid(format!(
                    "requirement '{}' has an empty package list for {manager}",
                    req.name
                )));
            }
        }
    }
    Ok(table.requirement)
}

/// Load the table embedded at build time.
///
/// # Errors
///
/// Returns an error if the embedded table fails validation.
pub fn load_embedded() -> Result<Vec<Requirement>, ConfigError> {
    parse(REQUIREMENTS_TOML)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_loads() {
        let reqs = load_embedded().unwrap();
        let names: Vec<&str> = reqs.iter().map(|r| r.name.as_str()).collect();
        insta::assert_snapshot!(names.join("\n"), @r"
        imapsync
        tmux
        flock
        setpriv
        dns-lookup
        netcheck
        openssl
        ");
    }

    #[test]
    fn embedded_table_maps_every_manager() {
        for req in load_embedded().unwrap() {
            for manager in PackageManager::ALL {
                assert!(
                    req.packages_for(manager).is_some(),
                    "{} has no packages for {manager}",
                    req.name
                );
            }
        }
    }

    #[test]
    fn dns_lookup_is_disjunctive() {
        let reqs = load_embedded().unwrap();
        let dns = reqs.iter().find(|r| r.name == "dns-lookup").unwrap();
        assert_eq!(dns.provides, ["dig", "host", "nslookup"]);
        assert_eq!(
            dns.packages_for(PackageManager::Dnf).unwrap(),
            ["bind-utils".to_string()]
        );
    }

    #[test]
    fn missing_manager_entry_is_none() {
        let reqs = parse(
            r#"
            [[requirement]]
            name = "tmux"
            provides = ["tmux"]
            packages = { apt = ["tmux"] }
            "#,
        )
        .unwrap();
        assert!(reqs[0].packages_for(PackageManager::Apk).is_none());
    }

    #[test]
    fn rejects_misspelled_field() {
        let err = parse(
            r#"
            [[requirement]]
            name = "tmux"
            provides = ["tmux"]
            package = { apt = ["tmux"] }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSyntax { .. }), "got: {err}");
        assert!(err.to_string().contains("package"), "got: {err}");
    }

    #[test]
    fn rejects_empty_provides() {
        let err = parse(
            r#"
            [[requirement]]
            name = "tmux"
            provides = []
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("provides"), "got: {err}");
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = parse(
            r#"
            [[requirement]]
            name = "tmux"
            provides = ["tmux"]

            [[requirement]]
            name = "tmux"
            provides = ["tmux"]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"), "got: {err}");
    }

    #[test]
    fn rejects_unknown_manager() {
        let err = parse(
            r#"
            [[requirement]]
            name = "tmux"
            provides = ["tmux"]
            packages = { brew = ["tmux"] }
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("brew"), "got: {err}");
    }

    #[test]
    fn rejects_empty_package_list() {
        let err = parse(
            r#"
            [[requirement]]
            name = "tmux"
            provides = ["tmux"]
            packages = { apt = [] }
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("empty package list"), "got: {err}");
    }

    #[test]
    fn malformed_toml_is_syntax_error() {
        let err = parse("[[requirement]\nname=").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSyntax { .. }));
    }
}
