use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

use super::BinarySource;
use crate::error::ProvisionError;

/// Executable copied from a local checkout.
#[derive(Debug, Clone)]
pub struct LocalSource {
    /// Path of the executable inside the checkout.
    pub path: PathBuf,
}

impl LocalSource {
    /// Source for `<root>/bin/mailmig`.
    #[must_use]
    pub fn from_checkout(root: &std::path::Path) -> Self {
        Self {
            path: root.join("bin").join("mailmig"),
        }
    }
}

impl BinarySource for LocalSource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn preflight(&self) -> Result<()> {
        if !self.path.exists() {
            return Err(ProvisionError::source_artifact(self.description(), "not found").into());
        }
        if !self.path.is_file() {
            return Err(
                ProvisionError::source_artifact(self.description(), "not a regular file").into(),
            );
        }
        Ok(())
    }

    fn write_to(&self, out: &mut dyn Write) -> Result<u64> {
        let artifact = |e: std::io::Error| ProvisionError::source_artifact(self.description(), e.to_string());
        let mut file = std::fs::File::open(&self.path).map_err(artifact)?;
        Ok(std::io::copy(&mut file, out).map_err(artifact)?)
    }
}
