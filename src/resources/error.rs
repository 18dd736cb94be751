//! Typed error variants for resource operations.
//!
//! Resource code returns these directly; callers convert to
//! [`anyhow::Error`] via `?`.

use thiserror::Error;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// An operation was denied due to insufficient permissions.
    #[error("permission denied: {path}")]
    PermissionDenied {
        /// Path for which permission was denied.
        path: String,
    },

    /// A resource exists but is in an unexpected or inconsistent state.
    #[error("invalid state for '{resource}': {reason}")]
    InvalidState {
        /// Name or description of the resource in the invalid state.
        resource: String,
        /// Human-readable explanation of why the state is invalid.
        reason: String,
    },

    /// A filesystem operation failed.
    #[error("{action} {path}: {source}")]
    Io {
        /// What was being attempted (e.g. `"create directory"`).
        action: &'static str,
        /// Path the operation targeted.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl ResourceError {
    /// Classify an I/O error for `path`, surfacing permission problems as
    /// [`ResourceError::PermissionDenied`].
    #[must_use]
    pub fn from_io(action: &'static str, path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                path: path.display().to_string(),
            }
        } else {
            Self::Io {
                action,
                path: path.display().to_string(),
                source,
            }
        }
    }
}
