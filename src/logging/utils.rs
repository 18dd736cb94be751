//! Log file location and timestamps.
use std::ffi::OsString;
use std::path::PathBuf;

/// Directory name under the cache root.
const CACHE_SUBDIR: &str = "mailmig-installer";

/// Timestamp prefix of each log line.
pub(super) const LINE_TIME: &str = "%H:%M:%S";

/// Timestamp in the run header.
pub(super) const HEADER_TIME: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Current UTC time rendered with a `chrono` format string.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}

/// `$XDG_CACHE_HOME`, else `$HOME/.cache`, else `./.cache`.
fn cache_root(xdg_cache_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    match (xdg_cache_home, home) {
        (Some(xdg), _) if !xdg.is_empty() => PathBuf::from(xdg),
        (_, Some(home)) => PathBuf::from(home).join(".cache"),
        (_, None) => PathBuf::from(".cache"),
    }
}

/// Log file for `command`. Only computes the path; nothing is created.
pub(super) fn log_file_path(command: &str) -> PathBuf {
    cache_root(
        std::env::var_os("XDG_CACHE_HOME"),
        std::env::var_os("HOME"),
    )
    .join(CACHE_SUBDIR)
    .join(format!("{command}.log"))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn xdg_cache_home_wins() {
        assert_eq!(
            cache_root(Some("/tmp/xdg".into()), Some("/home/op".into())),
            PathBuf::from("/tmp/xdg")
        );
    }

    #[test]
    fn empty_xdg_falls_back_to_home() {
        assert_eq!(
            cache_root(Some(OsString::new()), Some("/home/op".into())),
            PathBuf::from("/home/op/.cache")
        );
        assert_eq!(cache_root(None, None), PathBuf::from(".cache"));
    }

    #[test]
    fn log_file_is_named_after_command() {
        let path = log_file_path("bootstrap");
        assert!(path.ends_with("mailmig-installer/bootstrap.log"), "{}", path.display());
    }

    #[test]
    fn timestamp_shapes() {
        let t = utc_now(LINE_TIME);
        assert_eq!(t.len(), 8);
        assert_eq!(&t[2..3], ":");
        let dt = utc_now(HEADER_TIME);
        assert_eq!(dt.len(), 20);
        assert!(dt.ends_with('Z'));
    }
}
