//! Command: print version information.

/// Installer version: the build stamp if present, else the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("MAILMIG_INSTALLER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the installer version to stdout.
pub fn run() {
    println!("mailmig-installer {}", version());
}
