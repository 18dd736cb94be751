//! Write-once configuration file resource.
use anyhow::Result;
use std::io::Write as _;
use std::path::PathBuf;

use super::error::ResourceError;
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// Mode of a seeded configuration file.
pub const CONFIG_MODE: u32 = 0o644;

/// A file that is written once from static contents and never overwritten.
///
/// Any existing file counts as correct regardless of its contents.
#[derive(Debug, Clone)]
pub struct ConfigFileResource {
    /// Destination path.
    pub path: PathBuf,
    /// Contents written when the file is missing.
    pub contents: &'static str,
}

impl ConfigFileResource {
    /// Create a new config file resource.
    #[must_use]
    pub const fn new(path: PathBuf, contents: &'static str) -> Self {
        Self { path, contents }
    }

    /// Set the file to [`CONFIG_MODE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the permissions cannot be set.
    pub fn harden(&self) -> Result<(), ResourceError> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(CONFIG_MODE))
            .map_err(|e| ResourceError::from_io("set permissions on", &self.path, e))
    }
}

impl Applicable for ConfigFileResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        // create_new makes concurrent runs first-writer-wins.
        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Ok(ResourceChange::AlreadyCorrect);
            }
            Err(e) => return Err(ResourceError::from_io("create", &self.path, e).into()),
        };
        file.write_all(self.contents.as_bytes())
            .map_err(|e| ResourceError::from_io("write", &self.path, e))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ConfigFileResource {
    fn current_state(&self) -> Result<ResourceState> {
        if self.path.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: format!("{} is a directory", self.path.display()),
            });
        }
        if self.path.exists() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resources::mode_of;

    #[test]
    fn missing_file_is_written() {
        let tmp = tempfile::tempdir().unwrap();
        let r = ConfigFileResource::new(tmp.path().join("mailmig.conf"), "ssl1=1\n");
        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(r.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(std::fs::read_to_string(&r.path).unwrap(), "ssl1=1\n");
    }

    #[test]
    fn existing_file_is_never_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("mailmig.conf");
        std::fs::write(&path, "maxerrors=5\n").unwrap();
        let r = ConfigFileResource::new(path.clone(), "maxerrors=50\n");
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(r.apply().unwrap(), ResourceChange::AlreadyCorrect);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "maxerrors=5\n");
    }

    #[test]
    fn empty_existing_file_counts_as_present() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("mailmig.conf");
        std::fs::write(&path, "").unwrap();
        let r = ConfigFileResource::new(path.clone(), "ssl1=1\n");
        assert_eq!(r.apply().unwrap(), ResourceChange::AlreadyCorrect);
        assert!(std::fs::read_to_string(&path).unwrap().is_empty());
    }

    #[test]
    fn harden_sets_0644() {
        let tmp = tempfile::tempdir().unwrap();
        let r = ConfigFileResource::new(tmp.path().join("mailmig.conf"), "x=1\n");
        r.apply().unwrap();
        r.harden().unwrap();
        assert_eq!(mode_of(&r.path).unwrap(), 0o644);
    }

    #[test]
    fn missing_parent_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let r = ConfigFileResource::new(tmp.path().join("nope/mailmig.conf"), "x=1\n");
        assert!(r.apply().is_err());
    }
}
