//! Console and file logging on top of `tracing`.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::{init_subscriber, with_console};
pub use types::{TaskEntry, TaskStatus};

/// Logger whose events land in `test.log` inside a fresh temp directory,
/// through a thread-local subscriber.
///
/// Keep the returned guard alive for the duration of the test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::layer::SubscriberExt as _;
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("test.log");
    let layer = subscriber::FileLayer::create(&path, "test").expect("log file");
    let log = Logger::with_log_file(Some(path));
    let dispatch = tracing::Dispatch::new(tracing_subscriber::registry().with(layer));
    let guard = tracing::dispatcher::set_default(&dispatch);
    (log, tmp, guard)
}
