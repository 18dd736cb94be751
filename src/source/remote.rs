use anyhow::Result;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use super::{BinarySource, compute_sha256, has_script_marker};
use crate::error::ProvisionError;

/// Connection timeout for the artifact download, in seconds.
pub const CONNECT_TIMEOUT: u64 = 10;

/// Total transfer timeout for the artifact download, in seconds.
pub const TRANSFER_TIMEOUT: u64 = 120;

/// Fetches a URL into a writer.
pub trait Fetcher: std::fmt::Debug {
    /// Stream the body of `url` into `out`, returning the bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure, non-success status, or a
    /// truncated body.
    fn fetch(&self, url: &str, out: &mut dyn Write) -> Result<u64>;
}

/// [`Fetcher`] backed by a blocking `ureq` agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Agent with [`CONNECT_TIMEOUT`] and [`TRANSFER_TIMEOUT`] applied.
    #[must_use]
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(Duration::from_secs(CONNECT_TIMEOUT)))
            .timeout_global(Some(Duration::from_secs(TRANSFER_TIMEOUT)))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher").finish_non_exhaustive()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, out: &mut dyn Write) -> Result<u64> {
        let mut response = self
            .agent
            .get(url)
            .header(
                "User-Agent",
                concat!("mailmig-installer/", env!("CARGO_PKG_VERSION")),
            )
            .call()?;
        let mut body = response.body_mut().as_reader();
        Ok(std::io::copy(&mut body, out)?)
    }
}

/// Executable downloaded from a pinned reference.
#[derive(Debug)]
pub struct RemoteSource {
    /// Base location, without a trailing slash.
    pub base_url: String,
    /// Branch, tag, or commit to fetch.
    pub reference: String,
    /// Optional lowercase hex SHA-256 pin.
    pub expected_sha256: Option<String>,
    fetcher: Box<dyn Fetcher>,
}

impl RemoteSource {
    /// Create a remote source fetching through `fetcher`.
    #[must_use]
    pub fn new(
        base_url: &str,
        reference: &str,
        expected_sha256: Option<String>,
        fetcher: Box<dyn Fetcher>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            reference: reference.to_string(),
            expected_sha256: expected_sha256.map(|s| s.trim().to_ascii_lowercase()),
            fetcher,
        }
    }

    /// `<base_url>/<reference>/bin/mailmig`
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}/{}/bin/mailmig", self.base_url, self.reference)
    }
}

impl BinarySource for RemoteSource {
    fn description(&self) -> String {
        self.url()
    }

    fn write_to(&self, out: &mut dyn Write) -> Result<u64> {
        self.fetcher
            .fetch(&self.url(), out)
            .map_err(|e| ProvisionError::source_artifact(self.url(), format!("{e:#}")).into())
    }

    fn validate(&self, staged: &Path) -> Result<()> {
        let marker = has_script_marker(staged)
            .map_err(|e| ProvisionError::source_artifact(self.url(), format!("{e:#}")))?;
        if !marker {
            return Err(ProvisionError::source_artifact(
                self.url(),
                "content does not start with '#!' (error page or redirect?)",
            )
            .into());
        }
        if let Some(expected) = &self.expected_sha256 {
            let actual = compute_sha256(staged)
                .map_err(|e| ProvisionError::source_artifact(self.url(), format!("{e:#}")))?;
            if &actual != expected {
                return Err(ProvisionError::source_artifact(
                    self.url(),
                    format!("checksum mismatch: expected {expected}, got {actual}"),
                )
                .into());
            }
        }
        Ok(())
    }
}
