//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, filesystem
//! access, release download, systemd and identity management.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod atomic;
pub mod command_runner;
pub mod fetch;
pub mod fs;
pub mod host;
pub mod identity;
pub mod prerequisites;
pub mod settings;
pub mod systemd;

pub use command_runner::TokioCommandRunner;
pub use host::LinuxHost;
pub use settings::YamlSettingsStore;
