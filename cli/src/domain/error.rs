//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Provisioning errors ──────────────────────────────────────────────────────

/// Failure taxonomy for every lifecycle operation.
///
/// Infrastructure adapters raise these (wrapped in `anyhow::Error`) so the
/// top-level handler can recover the kind with `downcast_ref`.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Missing prerequisite: {0}")]
    PrerequisiteMissing(String),

    #[error("Identity operation failed: {0}")]
    Identity(String),

    #[error("Filesystem operation failed: {0}")]
    Filesystem(String),

    #[error("Release download failed: {0}")]
    Fetch(String),

    #[error("Malformed configuration document: {0}\n\nThe configuration file was not modified.")]
    MalformedDocument(String),

    #[error("Service supervisor command failed: {0}")]
    Supervisor(String),

    #[error("Atomic commit failed: {0}")]
    AtomicCommit(String),
}

impl ProvisionError {
    /// Stable machine-readable code, used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::PrerequisiteMissing(_) => "prerequisite_missing",
            Self::Identity(_) => "identity_error",
            Self::Filesystem(_) => "filesystem_error",
            Self::Fetch(_) => "fetch_error",
            Self::MalformedDocument(_) => "malformed_document",
            Self::Supervisor(_) => "supervisor_error",
            Self::AtomicCommit(_) => "atomic_commit_error",
        }
    }
}

// ── Target errors ────────────────────────────────────────────────────────────

/// Errors raised while validating a scrape target address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("Target '{0}' must have the form host:port (e.g. 10.0.0.5:9100)")]
    MissingPort(String),

    #[error("Target '{target}' has an invalid port '{port}': expected 1-65535")]
    InvalidPort { target: String, port: String },

    #[error("Target '{0}' has an invalid host")]
    InvalidHost(String),
}

// ── Settings errors ──────────────────────────────────────────────────────────

/// Errors related to settings validation.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid {field} '{value}': must match ^[a-z_][a-z0-9_-]{{0,31}}$")]
    InvalidName { field: &'static str, value: String },

    #[error("Invalid release.version '{0}': must be a semantic version such as 2.43.0")]
    InvalidVersion(String),

    #[error("Invalid {field} '{value}': must be an absolute path")]
    RelativePath { field: &'static str, value: String },
}
