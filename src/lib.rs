//! Host provisioning engine for `mailmig`.
//!
//! Turns a fresh Linux host into one that can run `mailmig` migrations:
//! resolves and installs the external commands it needs through the native
//! package manager, lays out the configuration and state directories with
//! their permission classes, seeds a default config and places a verified
//! executable, either from a local checkout or a pinned remote reference.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]** - filesystem layout and the embedded requirements table
//! - **[`resolver`]** - map missing capabilities onto native package names
//! - **[`resources`]** - idempotent `check + apply` primitives (directories, files, packages, the executable)
//! - **[`source`]** - where the executable comes from and how it is validated
//! - **[`tasks`]** - named pipeline stages wired to resources
//! - **[`commands`]** - top-level subcommand orchestration (`install`, `bootstrap`, `uninstall`, `check`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

#[cfg(not(unix))]
compile_error!("mailmig-installer only supports Unix hosts");

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod privilege;
pub mod resolver;
pub mod resources;
pub mod source;
pub mod tasks;
