//! Atomic installation of the `mailmig` executable.
//!
//! The artifact is staged in a `0600` temp file next to the destination,
//! validated there, made executable, and renamed over the destination. The
//! destination is never opened for writing, so readers see either the old
//! executable or the new one. Dropping the temp file on any error removes it.
use anyhow::{Context as _, Result};
use std::fs::Permissions;
use std::io::Write as _;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use super::error::ResourceError;
use super::{Applicable, Resource, ResourceChange, ResourceState, mode_of};
use crate::source::BinarySource;

/// Mode of the installed executable.
pub const BINARY_MODE: u32 = 0o755;

/// Mode of the staging file while it holds unvalidated content.
const STAGING_MODE: u32 = 0o600;

/// Install `source` at `dest`.
#[derive(Debug)]
pub struct BinaryInstall<'a> {
    dest: &'a Path,
    source: &'a dyn BinarySource,
}

impl<'a> BinaryInstall<'a> {
    /// Create a new binary install resource.
    #[must_use]
    pub const fn new(dest: &'a Path, source: &'a dyn BinarySource) -> Self {
        Self { dest, source }
    }

    fn stage(&self, parent: &Path) -> Result<tempfile::NamedTempFile> {
        let mut staged = tempfile::Builder::new()
            .prefix(".mailmig.")
            .permissions(Permissions::from_mode(STAGING_MODE))
            .tempfile_in(parent)
            .map_err(|e| ResourceError::from_io("create temp file in", parent, e))?;
        self.source.write_to(staged.as_file_mut())?;
        staged
            .as_file_mut()
            .flush()
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| ResourceError::from_io("write", staged.path(), e))?;
        Ok(staged)
    }
}

impl Applicable for BinaryInstall<'_> {
    fn description(&self) -> String {
        format!("{} -> {}", self.source.description(), self.dest.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.source.preflight()?;

        let parent = self
            .dest
            .parent()
            .with_context(|| format!("{} has no parent directory", self.dest.display()))?;
        std::fs::create_dir_all(parent)
            .map_err(|e| ResourceError::from_io("create directory", parent, e))?;

        let staged = self.stage(parent)?;
        self.source.validate(staged.path())?;

        std::fs::set_permissions(staged.path(), Permissions::from_mode(BINARY_MODE))
            .map_err(|e| ResourceError::from_io("set permissions on", staged.path(), e))?;
        staged
            .persist(self.dest)
            .map_err(|e| ResourceError::from_io("rename onto", self.dest, e.error))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for BinaryInstall<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.dest.exists() {
            return Ok(ResourceState::Missing);
        }
        if !self.dest.is_file() {
            return Ok(ResourceState::Invalid {
                reason: format!("{} is not a regular file", self.dest.display()),
            });
        }
        let mode = mode_of(self.dest).map_err(|e| ResourceError::from_io("stat", self.dest, e))?;
        if mode == BINARY_MODE {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: format!("{mode:o}"),
            })
        }
    }
}

/// Remove the executable at `path`; a missing file is already correct.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn remove_executable(path: &Path) -> Result<ResourceChange> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(ResourceChange::Applied),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ResourceChange::AlreadyCorrect),
        Err(e) => Err(ResourceError::from_io("remove", path, e).into()),
    }
}
