//! Directory resource with a permission class.
use anyhow::Result;
use std::fmt;
use std::path::PathBuf;

use super::error::ResourceError;
use super::{Applicable, Resource, ResourceChange, ResourceState, mode_of};

/// Permission class of a layout directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionClass {
    /// Readable and traversable by everyone (`0755`).
    Public,
    /// Owner-only (`0700`), for secrets and mutable run state.
    Private,
}

impl PermissionClass {
    /// Octal mode applied to directories of this class.
    #[must_use]
    pub const fn mode(self) -> u32 {
        match self {
            Self::Public => 0o755,
            Self::Private => 0o700,
        }
    }

    /// Whether `mode` grants more than this class allows.
    #[must_use]
    pub const fn is_looser(self, mode: u32) -> bool {
        mode & !self.mode() & 0o777 != 0
    }
}

impl fmt::Display for PermissionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// A directory that must exist, created with its class mode.
#[derive(Debug, Clone)]
pub struct DirectoryResource {
    /// Absolute directory path.
    pub path: PathBuf,
    /// Permission class applied on creation.
    pub class: PermissionClass,
}

impl DirectoryResource {
    /// Create a new directory resource.
    #[must_use]
    pub const fn new(path: PathBuf, class: PermissionClass) -> Self {
        Self { path, class }
    }

    /// Apply the class mode to the directory.
    ///
    /// Kept separate from [`Applicable::apply`] because mode changes are
    /// best-effort: some filesystems (network mounts) reject them.
    ///
    /// # Errors
    ///
    /// Returns an error if the permissions cannot be set.
    pub fn harden(&self) -> Result<(), ResourceError> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(self.class.mode()))
            .map_err(|e| ResourceError::from_io("set permissions on", &self.path, e))
    }
}

impl Applicable for DirectoryResource {
    fn description(&self) -> String {
        format!("{:o} {}", self.class.mode(), self.path.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.path.is_dir() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        if self.path.exists() {
            return Err(ResourceError::InvalidState {
                resource: self.path.display().to_string(),
                reason: "exists but is not a directory".to_string(),
            }
            .into());
        }
        std::fs::create_dir_all(&self.path)
            .map_err(|e| ResourceError::from_io("create directory", &self.path, e))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DirectoryResource {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.path.exists() {
            return Ok(ResourceState::Missing);
        }
        if !self.path.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: format!("not a directory: {}", self.path.display()),
            });
        }
        let current = mode_of(&self.path)
            .map_err(|e| ResourceError::from_io("stat", &self.path, e))?;
        if current == self.class.mode() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: format!("{current:o}"),
            })
        }
    }
}
