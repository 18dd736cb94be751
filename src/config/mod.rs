//! Installed layout and the data embedded at build time.
pub mod paths;
pub mod requirements;

use thiserror::Error;

/// Default `mailmig.conf`, seeded on first install.
pub const DEFAULT_CONFIG: &str = include_str!("../../conf/mailmig.conf");

/// Requirements table: commands mailmig needs and the packages providing them.
pub const REQUIREMENTS_TOML: &str = include_str!("../../conf/requirements.toml");

/// Errors raised while loading embedded configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema.
    #[error("invalid syntax in {file}: {message}")]
    InvalidSyntax {
        /// Logical file name.
        file: &'static str,
        /// Parser message.
        message: String,
    },

    /// The document parsed but violates a table rule.
    #[error("invalid {file}: {message}")]
    Invalid {
        /// Logical file name.
        file: &'static str,
        /// Which rule was violated.
        message: String,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Non-comment keys of the default config, in order.
    fn config_keys(doc: &str) -> Vec<&str> {
        doc.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .filter_map(|l| l.split_once('=').map(|(k, _)| k.trim()))
            .collect()
    }

    #[test]
    fn default_config_is_key_value() {
        for line in DEFAULT_CONFIG.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            assert!(line.contains('='), "malformed line: {line}");
        }
    }

    #[test]
    fn default_config_keys() {
        insta::assert_snapshot!(config_keys(DEFAULT_CONFIG).join("\n"), @r"
        ssl1
        ssl2
        tls1
        tls2
        usecache
        automap
        syncinternaldates
        delete2
        expunge1
        maxerrors
        timeout1
        timeout2
        retries
        retry_delay
        debug
        debugimap
        extra_args
        ");
    }

    #[test]
    fn destructive_options_default_off() {
        for key in ["delete2", "expunge1"] {
            let line = DEFAULT_CONFIG
                .lines()
                .find(|l| l.starts_with(&format!("{key}=")))
                .unwrap();
            assert_eq!(line, format!("{key}=0"));
        }
    }
}
