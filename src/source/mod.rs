//! Where the `mailmig` executable comes from.
//!
//! A run uses exactly one [`BinarySource`], chosen by the entry point:
//! [`LocalSource`] for `install` and [`RemoteSource`] for `bootstrap`. The
//! binary provisioner streams the source into a private temp file, asks the
//! source to validate it, and only then renames it into place.
mod local;
mod remote;

pub use local::LocalSource;
pub use remote::{CONNECT_TIMEOUT, Fetcher, HttpFetcher, RemoteSource, TRANSFER_TIMEOUT};

use anyhow::{Context as _, Result};
use std::io::{Read as _, Write};
use std::path::Path;

/// A strategy for obtaining the executable.
pub trait BinarySource: std::fmt::Debug {
    /// Local path or URL, used in log lines and errors.
    fn description(&self) -> String;

    /// Checks that can fail before anything is created on disk.
    ///
    /// # Errors
    ///
    /// Returns a source-artifact error if the artifact is known to be
    /// unobtainable.
    fn preflight(&self) -> Result<()> {
        Ok(())
    }

    /// Stream the artifact into `out`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns a source-artifact error if the artifact cannot be read or
    /// fetched.
    fn write_to(&self, out: &mut dyn Write) -> Result<u64>;

    /// Validate the staged artifact at `staged` before it is installed.
    ///
    /// # Errors
    ///
    /// Returns a source-artifact error if the content is not acceptable.
    fn validate(&self, staged: &Path) -> Result<()> {
        let _ = staged;
        Ok(())
    }
}

/// Whether the file at `path` begins with a `#!` interpreter line.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn has_script_marker(path: &Path) -> Result<bool> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut head = Vec::with_capacity(2);
    file.take(2)
        .read_to_end(&mut head)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(head == b"#!")
}

/// Lowercase hex SHA-256 digest of the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_sha256(path: &Path) -> Result<String> {
    use sha2::{Digest, Sha256};
    use std::fmt::Write as _;

    let mut file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)
        .with_context(|| format!("reading {} for checksum", path.display()))?;
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for b in &digest {
        // Writing to a String cannot fail.
        write!(hex, "{b:02x}").unwrap_or(());
    }
    Ok(hex)
}
