use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the mailmig installer.
#[derive(Parser, Debug)]
#[command(
    name = "mailmig-installer",
    about = "Provision a host to run mailmig",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Installation prefix; the executable goes to PREFIX/bin
    #[arg(long, global = true, env = "MAILMIG_PREFIX", default_value = "/usr/local")]
    pub prefix: PathBuf,

    /// Directory for the executable (overrides PREFIX/bin)
    #[arg(long, global = true, env = "MAILMIG_BIN_DIR")]
    pub bin_dir: Option<PathBuf>,

    /// Configuration directory
    #[arg(long, global = true, env = "MAILMIG_CONFIG_DIR", default_value = "/etc/mailmig")]
    pub config_dir: PathBuf,

    /// State directory (secrets and run state)
    #[arg(long, global = true, env = "MAILMIG_STATE_DIR", default_value = "/var/lib/mailmig")]
    pub state_dir: PathBuf,

    /// Log directory
    #[arg(long, global = true, env = "MAILMIG_LOG_DIR", default_value = "/var/log/mailmig")]
    pub log_dir: PathBuf,

    /// Stage every path under this root (packaging)
    #[arg(long, global = true, env = "MAILMIG_DESTDIR")]
    pub destdir: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install from a local mailmig checkout
    Install(InstallOpts),
    /// Download a pinned mailmig release and install it
    Bootstrap(BootstrapOpts),
    /// Remove the executable, keeping configuration and data
    Uninstall,
    /// Report what is installed without changing anything
    Check,
    /// Print version information
    Version,
}

impl Command {
    /// Short name used for the persistent log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Bootstrap(_) => "bootstrap",
            Self::Uninstall => "uninstall",
            Self::Check => "check",
            Self::Version => "version",
        }
    }

    /// Whether the command changes the host and so needs root.
    #[must_use]
    pub const fn needs_root(&self) -> bool {
        matches!(self, Self::Install(_) | Self::Bootstrap(_) | Self::Uninstall)
    }
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InstallOpts {
    /// mailmig checkout to install from (defaults to the current directory)
    #[arg(long, env = "MAILMIG_ROOT")]
    pub root: Option<PathBuf>,
}

/// Options for the `bootstrap` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct BootstrapOpts {
    /// Git reference (tag, branch or commit) to fetch
    #[arg(long = "ref", env = "MAILMIG_REF", default_value = "main")]
    pub reference: String,

    /// Raw-content base URL of the mailmig repository
    #[arg(
        long,
        env = "MAILMIG_BASE_URL",
        default_value = "https://raw.githubusercontent.com/mailmig/mailmig"
    )]
    pub base_url: String,

    /// Expected SHA-256 of the downloaded executable
    #[arg(long, env = "MAILMIG_SHA256")]
    pub sha256: Option<String>,
}
