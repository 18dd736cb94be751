use std::fmt;

use serde::Deserialize;

use crate::exec::Executor;

/// Package-manager families the installer knows how to drive.
///
/// Declaration order is the detection priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// Debian, Ubuntu.
    Apt,
    /// Fedora, RHEL 8+.
    Dnf,
    /// RHEL 7, CentOS 7.
    Yum,
    /// Arch Linux.
    Pacman,
    /// Alpine.
    Apk,
}

impl PackageManager {
    /// All managers in detection priority order.
    pub const ALL: [Self; 5] = [Self::Apt, Self::Dnf, Self::Yum, Self::Pacman, Self::Apk];

    /// Executable whose presence on `PATH` identifies this manager.
    #[must_use]
    pub const fn executable(self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Pacman => "pacman",
            Self::Apk => "apk",
        }
    }

    /// Detect the host's package manager: the first of [`Self::ALL`] whose
    /// executable is on `PATH`, or `None`.
    #[must_use]
    pub fn detect(executor: &dyn Executor) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|manager| executor.which(manager.executable()))
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apt => write!(f, "apt"),
            Self::Dnf => write!(f, "dnf"),
            Self::Yum => write!(f, "yum"),
            Self::Pacman => write!(f, "pacman"),
            Self::Apk => write!(f, "apk"),
        }
    }
}

/// Render a detected capability, `none` when no manager was found.
#[must_use]
pub fn capability_name(manager: Option<PackageManager>) -> String {
    manager.map_or_else(|| "none".to_string(), |m| m.to_string())
}
