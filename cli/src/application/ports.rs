//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::{Owner, PrincipalKind, ReleaseSpec, StatusReport};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
}

// ── Host Ports ────────────────────────────────────────────────────────────────

/// Read-only probe and mutation of system users and groups.
#[allow(async_fn_in_trait)]
pub trait IdentityStore {
    /// Whether the principal exists. Errors only when the probe itself
    /// cannot run.
    async fn principal_exists(&self, name: &str, kind: PrincipalKind) -> Result<bool>;
    /// Create a system group.
    async fn create_group(&self, name: &str) -> Result<()>;
    /// Create a system user with a non-login shell and the given primary group.
    async fn create_user(&self, name: &str, primary_group: &str) -> Result<()>;
    /// Delete a user.
    async fn delete_user(&self, name: &str) -> Result<()>;
    /// Delete a group.
    async fn delete_group(&self, name: &str) -> Result<()>;
}

/// Directory and file provisioning on the host.
#[allow(async_fn_in_trait)]
pub trait HostFs {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;
    /// Read a file, returning `None` if it does not exist.
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>>;
    /// Create each directory and its ancestors. Existing directories are
    /// left alone; an existing non-directory is an error.
    fn ensure_directories(&self, paths: &[PathBuf]) -> Result<()>;
    /// Recursively assign `owner` to each path.
    async fn set_ownership(&self, paths: &[PathBuf], owner: &Owner) -> Result<()>;
    /// Move a file or directory to `dest`, replacing whatever is there.
    fn place_file(&self, source: &Path, dest: &Path) -> Result<()>;
    /// Recursively delete each path. Missing paths are not an error.
    fn remove_all(&self, paths: &[PathBuf]) -> Result<()>;
}

/// All-or-nothing file replacement.
pub trait AtomicWriter {
    /// Make `content` visible at `final_path` in a single step.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary write or the final rename fails.
    /// In neither case is a partial file visible at `final_path`.
    fn commit(&self, content: &[u8], final_path: &Path) -> Result<()>;
}

/// Downloads and unpacks an upstream release.
#[allow(async_fn_in_trait)]
pub trait ArchiveFetcher {
    /// Download and unpack `release`.
    ///
    /// Returns `(path, guard)` where `path` is the archive's top-level
    /// folder and `guard` deletes the unpacked tree when dropped.
    async fn fetch_and_unpack(
        &self,
        release: &ReleaseSpec,
    ) -> Result<(PathBuf, Box<dyn std::any::Any>)>;
}

/// Service manager operations on a single unit.
#[allow(async_fn_in_trait)]
pub trait ProcessSupervisor {
    /// Re-read unit definitions from disk.
    async fn daemon_reload(&self) -> Result<()>;
    async fn enable(&self, unit: &str) -> Result<()>;
    async fn disable(&self, unit: &str) -> Result<()>;
    async fn start(&self, unit: &str) -> Result<()>;
    async fn stop(&self, unit: &str) -> Result<()>;
    async fn restart(&self, unit: &str) -> Result<()>;
    /// Structured status of the unit. An unknown unit is not an error; it
    /// reports `load_state = "not-found"`.
    async fn query_status(&self, unit: &str) -> Result<StatusReport>;
}

/// Composite trait: any type implementing all host sub-traits is a `HostPlatform`.
pub trait HostPlatform:
    IdentityStore + HostFs + AtomicWriter + ArchiveFetcher + ProcessSupervisor
{
}

/// Blanket implementation: any type implementing all host sub-traits is a `HostPlatform`.
impl<T> HostPlatform for T where
    T: IdentityStore + HostFs + AtomicWriter + ArchiveFetcher + ProcessSupervisor
{
}

// ── Prerequisite Port ─────────────────────────────────────────────────────────

/// Probes the invoking environment before any mutation.
#[allow(async_fn_in_trait)]
pub trait PrerequisiteProbe {
    /// Effective user id of this process.
    async fn effective_uid(&self) -> Result<u32>;
    /// Resolve a program on `PATH`.
    fn find_program(&self, name: &str) -> Option<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
