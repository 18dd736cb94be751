//! Resolved install locations.
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::resources::directory::PermissionClass;

/// File name of the installed executable.
pub const BINARY_NAME: &str = "mailmig";

/// File name of the seeded configuration file.
pub const CONFIG_FILE_NAME: &str = "mailmig.conf";

/// Every path the installer touches, after flag and environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Installed executable.
    pub bin: PathBuf,
    /// Configuration root.
    pub config_dir: PathBuf,
    /// Per-migration profile files.
    pub profiles_dir: PathBuf,
    /// State root.
    pub state_dir: PathBuf,
    /// Credentials referenced by profiles.
    pub secrets_dir: PathBuf,
    /// Mutable run state (locks, resume markers).
    pub run_state_dir: PathBuf,
    /// Log root.
    pub log_dir: PathBuf,
    /// Per-run logs.
    pub runs_dir: PathBuf,
}

impl Paths {
    /// Derive the layout from its roots.
    #[must_use]
    pub fn new(bin_dir: &Path, config_dir: &Path, state_dir: &Path, log_dir: &Path) -> Self {
        Self {
            bin: bin_dir.join(BINARY_NAME),
            config_dir: config_dir.to_path_buf(),
            profiles_dir: config_dir.join("profiles"),
            state_dir: state_dir.to_path_buf(),
            secrets_dir: state_dir.join("secrets"),
            run_state_dir: state_dir.join("state"),
            log_dir: log_dir.to_path_buf(),
            runs_dir: log_dir.join("runs"),
        }
    }

    /// Resolve from CLI flags, applying `--destdir` when set.
    #[must_use]
    pub fn from_opts(opts: &GlobalOpts) -> Self {
        let bin_dir = opts
            .bin_dir
            .clone()
            .unwrap_or_else(|| opts.prefix.join("bin"));
        let paths = Self::new(&bin_dir, &opts.config_dir, &opts.state_dir, &opts.log_dir);
        match &opts.destdir {
            Some(destdir) => paths.rooted_at(destdir),
            None => paths,
        }
    }

    /// Re-root every path under `root` (staging installs and tests).
    #[must_use]
    pub fn rooted_at(&self, root: &Path) -> Self {
        let reroot = |p: &Path| root.join(p.strip_prefix("/").unwrap_or(p));
        Self {
            bin: reroot(&self.bin),
            config_dir: reroot(&self.config_dir),
            profiles_dir: reroot(&self.profiles_dir),
            state_dir: reroot(&self.state_dir),
            secrets_dir: reroot(&self.secrets_dir),
            run_state_dir: reroot(&self.run_state_dir),
            log_dir: reroot(&self.log_dir),
            runs_dir: reroot(&self.runs_dir),
        }
    }

    /// `$CONFIG_DIR/mailmig.conf`
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Layout directories with their permission class, parents first.
    #[must_use]
    pub fn layout(&self) -> Vec<(PathBuf, PermissionClass)> {
        vec![
            (self.config_dir.clone(), PermissionClass::Public),
            (self.profiles_dir.clone(), PermissionClass::Public),
            (self.state_dir.clone(), PermissionClass::Public),
            (self.secrets_dir.clone(), PermissionClass::Private),
            (self.run_state_dir.clone(), PermissionClass::Private),
            (self.log_dir.clone(), PermissionClass::Public),
            (self.runs_dir.clone(), PermissionClass::Public),
        ]
    }

    /// Roots removed by a full purge; the uninstaller only prints these.
    #[must_use]
    pub fn data_roots(&self) -> [&Path; 3] {
        [
            self.config_dir.as_path(),
            self.state_dir.as_path(),
            self.log_dir.as_path(),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::Parser as _;

    fn defaults() -> Paths {
        let cli = crate::cli::Cli::parse_from(["mailmig-installer", "check"]);
        Paths::from_opts(&cli.global)
    }

    #[test]
    fn default_locations() {
        let p = defaults();
        assert_eq!(p.bin, PathBuf::from("/usr/local/bin/mailmig"));
        assert_eq!(p.config_file(), PathBuf::from("/etc/mailmig/mailmig.conf"));
        assert_eq!(p.secrets_dir, PathBuf::from("/var/lib/mailmig/secrets"));
        assert_eq!(p.runs_dir, PathBuf::from("/var/log/mailmig/runs"));
    }

    #[test]
    fn bin_dir_overrides_prefix() {
        let cli = crate::cli::Cli::parse_from([
            "mailmig-installer",
            "--prefix",
            "/opt/mailmig",
            "--bin-dir",
            "/usr/bin",
            "check",
        ]);
        assert_eq!(Paths::from_opts(&cli.global).bin, PathBuf::from("/usr/bin/mailmig"));
    }

    #[test]
    fn prefix_moves_binary() {
        let cli = crate::cli::Cli::parse_from([
            "mailmig-installer",
            "--prefix",
            "/opt/mailmig",
            "check",
        ]);
        assert_eq!(
            Paths::from_opts(&cli.global).bin,
            PathBuf::from("/opt/mailmig/bin/mailmig")
        );
    }

    #[test]
    fn destdir_reroots_everything() {
        let cli = crate::cli::Cli::parse_from([
            "mailmig-installer",
            "--destdir",
            "/tmp/stage",
            "check",
        ]);
        let p = Paths::from_opts(&cli.global);
        assert_eq!(p.bin, PathBuf::from("/tmp/stage/usr/local/bin/mailmig"));
        assert_eq!(p.config_dir, PathBuf::from("/tmp/stage/etc/mailmig"));
        for (dir, _) in p.layout() {
            assert!(dir.starts_with("/tmp/stage"), "{}", dir.display());
        }
    }

    #[test]
    fn layout_lists_parents_before_children() {
        let layout = defaults().layout();
        for (i, (dir, _)) in layout.iter().enumerate() {
            if let Some(parent) = dir.parent() {
                let later_parent = layout[i + 1..].iter().any(|(d, _)| d == parent);
                assert!(!later_parent, "{} listed before its parent", dir.display());
            }
        }
    }

    #[test]
    fn only_secrets_and_state_are_private() {
        let p = defaults();
        let private: Vec<PathBuf> = p
            .layout()
            .into_iter()
            .filter(|(_, c)| *c == PermissionClass::Private)
            .map(|(d, _)| d)
            .collect();
        assert_eq!(private, vec![p.secrets_dir.clone(), p.run_state_dir.clone()]);
    }
}
