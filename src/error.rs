//! Fatal error classes for a provisioning run.
//!
//! Every variant of [`ProvisionError`] aborts the run. Tasks return them
//! inside [`anyhow::Error`]; `main` downcasts to pick the process exit code
//! via [`ProvisionError::exit_code`].
//!
//! # Error classes
//!
//! ```text
//! ProvisionError
//! ├── Privilege              not root and no elevation helper
//! ├── UnsupportedEnvironment no package manager, commands missing
//! ├── UnmappedDependency     table has no packages for (manager, requirement)
//! ├── PackageManager         the manager itself reported failure
//! ├── SourceArtifact         local binary missing, fetch failed, bad content
//! └── Verification           installed binary failed `--help`
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised by the provisioning pipeline.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Not running as root and no way to elevate.
    #[error("root privileges are required: {reason}; re-run as root (e.g. `sudo {program}`)")]
    Privilege {
        /// Why elevation was not possible.
        reason: String,
        /// Program name to suggest in the hint.
        program: String,
    },

    /// No supported package manager was found but commands are missing.
    #[error(
        "no supported package manager found (apt, dnf, yum, pacman, apk); install these manually: {}",
        .missing.join(", ")
    )]
    UnsupportedEnvironment {
        /// Names of the unsatisfied requirements.
        missing: Vec<String>,
    },

    /// The requirements table has no entry for a (manager, requirement) pair.
    #[error("no package mapping for requirement '{requirement}' on {manager}")]
    UnmappedDependency {
        /// Package manager that was detected.
        manager: String,
        /// Requirement that could not be mapped.
        requirement: String,
    },

    /// The package manager exited non-zero.
    #[error("{program} failed (exit {code}): {stderr}")]
    PackageManager {
        /// Program that was invoked.
        program: String,
        /// Exit code, `-1` when killed by a signal.
        code: i32,
        /// Captured standard error.
        stderr: String,
    },

    /// The executable could not be obtained or failed validation.
    #[error("cannot obtain executable from {source_desc}: {reason}")]
    SourceArtifact {
        /// Local path or URL of the artifact.
        source_desc: String,
        /// Human-readable failure reason.
        reason: String,
    },

    /// The installed executable failed its smoke test.
    #[error("verification failed: `{} --help` {detail}", .path.display())]
    Verification {
        /// Installed executable.
        path: PathBuf,
        /// What went wrong (exit status or spawn failure).
        detail: String,
    },
}

impl ProvisionError {
    /// Process exit code for this error class.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Privilege { .. } => 2,
            Self::UnsupportedEnvironment { .. } => 3,
            Self::UnmappedDependency { .. } => 4,
            Self::PackageManager { .. } => 5,
            Self::SourceArtifact { .. } => 6,
            Self::Verification { .. } => 7,
        }
    }

    /// Shorthand for a [`ProvisionError::SourceArtifact`].
    pub fn source_artifact(source_desc: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceArtifact {
            source_desc: source_desc.into(),
            reason: reason.into(),
        }
    }
}

/// Exit code for an arbitrary error chain: the [`ProvisionError`] class if
/// one is present, otherwise `1`.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ProvisionError>())
        .map_or(1, ProvisionError::exit_code)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Context as _;

    #[test]
    fn unsupported_environment_lists_every_missing_requirement() {
        let e = ProvisionError::UnsupportedEnvironment {
            missing: vec!["imapsync".to_string(), "tmux".to_string()],
        };
        let msg = e.to_string();
        assert!(msg.contains("imapsync, tmux"), "got: {msg}");
        assert!(msg.contains("install these manually"));
    }

    #[test]
    fn unmapped_dependency_names_the_pair() {
        let e = ProvisionError::UnmappedDependency {
            manager: "apk".to_string(),
            requirement: "netcheck".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "no package mapping for requirement 'netcheck' on apk"
        );
    }

    #[test]
    fn package_manager_display() {
        let e = ProvisionError::PackageManager {
            program: "apt-get".to_string(),
            code: 100,
            stderr: "Unable to locate package imapsync".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "apt-get failed (exit 100): Unable to locate package imapsync"
        );
    }

    #[test]
    fn verification_display_includes_path() {
        let e = ProvisionError::Verification {
            path: PathBuf::from("/usr/local/bin/mailmig"),
            detail: "exited with status 2".to_string(),
        };
        assert!(e.to_string().contains("/usr/local/bin/mailmig --help"));
    }

    #[test]
    fn exit_codes_are_distinct_and_nonzero() {
        let codes = [
            ProvisionError::Privilege {
                reason: String::new(),
                program: String::new(),
            }
            .exit_code(),
            ProvisionError::UnsupportedEnvironment { missing: vec![] }.exit_code(),
            ProvisionError::UnmappedDependency {
                manager: String::new(),
                requirement: String::new(),
            }
            .exit_code(),
            ProvisionError::PackageManager {
                program: String::new(),
                code: 1,
                stderr: String::new(),
            }
            .exit_code(),
            ProvisionError::source_artifact("", "").exit_code(),
            ProvisionError::Verification {
                path: PathBuf::new(),
                detail: String::new(),
            }
            .exit_code(),
        ];
        let unique: std::collections::HashSet<u8> = codes.iter().copied().collect();
        assert_eq!(unique.len(), codes.len());
        assert!(codes.iter().all(|&c| c > 1));
    }

    #[test]
    fn exit_code_found_through_context() {
        let err: anyhow::Error = Err::<(), _>(ProvisionError::source_artifact("x", "y"))
            .context("installing executable")
            .expect_err("should be an error");
        assert_eq!(exit_code_for(&err), 6);
    }

    #[test]
    fn exit_code_defaults_to_one() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&err), 1);
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn provision_error_is_send_sync() {
        assert_send_sync::<ProvisionError>();
    }
}
