//! Rendering of installer events for the terminal and the run log.
//!
//! Each event is first classified into a [`Kind`] from its level, target and
//! `status` field; the console and the file then render that kind their own
//! way. Messages never carry escape codes, so the file needs no stripping.
use std::fs::{self, File};
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::registry::LookupSpan;

use super::logger::{DRY_RUN_TARGET, STAGE_TARGET, TASK_TARGET};
use super::types::TaskStatus;
use super::utils::{HEADER_TIME, LINE_TIME, log_file_path, utc_now};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[1;34m";

/// What an event means to the installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    DryRun,
    Task(TaskStatus),
    Info,
    Debug,
    Warn,
    Error,
}

impl Kind {
    fn console(self, msg: &str) -> String {
        match self {
            Self::Error => format!("{RED}ERROR{RESET} {msg}"),
            Self::Warn => format!("{YELLOW}WARN{RESET}  {msg}"),
            Self::Stage => format!("{BLUE}==>{RESET} {BOLD}{msg}{RESET}"),
            Self::DryRun => format!("  {YELLOW}[DRY RUN]{RESET} {msg}"),
            Self::Task(status) => {
                let (icon, color) = status.style();
                format!("  {color}{icon} {msg}{RESET}")
            }
            Self::Info | Self::Debug => format!("  {msg}"),
        }
    }

    fn file(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("==> {msg}"),
            Self::DryRun => format!("    [dry run] {msg}"),
            Self::Task(status) => format!("    [{}] {msg}", status.label()),
            Self::Info => format!("    {msg}"),
            Self::Debug => format!("    [debug] {msg}"),
            Self::Warn => format!("    [warn] {msg}"),
            Self::Error => format!("    [error] {msg}"),
        }
    }
}

/// The `message` and `status` fields of an event.
#[derive(Default)]
struct Fields {
    message: String,
    status: Option<String>,
}

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

fn classify(event: &Event<'_>) -> (Kind, String) {
    let mut fields = Fields::default();
    event.record(&mut fields);
    let metadata = event.metadata();
    let kind = match (*metadata.level(), metadata.target()) {
        (Level::ERROR, _) => Kind::Error,
        (Level::WARN, _) => Kind::Warn,
        (Level::INFO, STAGE_TARGET) => Kind::Stage,
        (Level::INFO, DRY_RUN_TARGET) => Kind::DryRun,
        (Level::INFO, TASK_TARGET) => fields
            .status
            .as_deref()
            .and_then(TaskStatus::from_label)
            .map_or(Kind::Info, Kind::Task),
        (Level::INFO, _) => Kind::Info,
        _ => Kind::Debug,
    };
    (kind, fields.message)
}

fn running_as() -> &'static str {
    match sudo::check() {
        sudo::RunningAs::Root => "root",
        sudo::RunningAs::Suid => "setuid root",
        sudo::RunningAs::User => "unprivileged user",
    }
}

/// Layer appending every event to the run log with a timestamp.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<File>,
}

impl FileLayer {
    /// Truncate `path`, creating its directory, and write the run header.
    ///
    /// Returns `None` if the file cannot be created.
    pub(super) fn create(path: &Path, command: &str) -> Option<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).ok()?;
        }
        let mut file = File::create(path).ok()?;
        let version = option_env!("MAILMIG_INSTALLER_VERSION")
            .unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        writeln!(
            file,
            "# mailmig-installer {version}: `{command}` started {} as {}",
            utc_now(HEADER_TIME),
            running_as(),
        )
        .ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: Subscriber> Layer<S> for FileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let (kind, msg) = classify(event);
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "[{}] {}", utc_now(LINE_TIME), kind.file(&msg)).ok();
        }
    }
}

struct ConsoleFormatter;

impl<S, N> FormatEvent<S, N> for ConsoleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let (kind, msg) = classify(event);
        writeln!(writer, "{}", kind.console(&msg))
    }
}

/// Warnings and errors to stderr, the rest to stdout.
fn console_layer<S>(verbose: bool) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;

    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));
    tracing_subscriber::fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(level)
}

/// Run `f` with console-only logging; nothing is written to disk.
///
/// Used for the privilege guard, which must run before any file exists.
pub fn with_console<T>(verbose: bool, f: impl FnOnce() -> T) -> T {
    let subscriber = tracing_subscriber::registry().with(console_layer(verbose));
    tracing::subscriber::with_default(subscriber, f)
}

/// Install the global subscriber: console output plus the run log at
/// `$XDG_CACHE_HOME/mailmig-installer/<command>.log`, which always
/// captures `DEBUG`.
///
/// Call once, after the privilege guard.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::util::SubscriberInitExt as _;

    let file_layer = FileLayer::create(&log_file_path(command), command)
        .map(|layer| layer.with_filter(LevelFilter::DEBUG));
    tracing_subscriber::registry()
        .with(console_layer(verbose))
        .with(file_layer)
        .init();
}
