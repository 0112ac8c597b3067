//! Application service: prerequisite checks run before any host mutation.

use anyhow::Result;

use crate::application::ports::PrerequisiteProbe;
use crate::domain::ProvisionError;

/// Programs needed by install and remove.
pub const LIFECYCLE_PROGRAMS: &[&str] = &["systemctl", "getent", "groupadd", "useradd", "chown"];

/// Programs needed to restart the service after a config change.
pub const RESTART_PROGRAMS: &[&str] = &["systemctl"];

/// Verify the process runs as root and every program in `programs` is on
/// `PATH`. Reports all missing items at once.
///
/// # Errors
///
/// Returns `PrerequisiteMissing` if any check fails, or if the uid probe
/// itself cannot run.
pub async fn check(probe: &impl PrerequisiteProbe, programs: &[&str]) -> Result<()> {
    let mut missing: Vec<String> = Vec::new();

    match probe.effective_uid().await {
        Ok(0) => {}
        Ok(uid) => missing.push(format!("root privileges (running as uid {uid})")),
        Err(e) => missing.push(format!("cannot determine effective uid: {e:#}")),
    }

    missing.extend(
        programs
            .iter()
            .filter(|name| probe.find_program(name).is_none())
            .map(|name| format!("'{name}' not found on PATH")),
    );

    if missing.is_empty() {
        tracing::debug!(?programs, "prerequisites satisfied");
        return Ok(());
    }
    Err(ProvisionError::PrerequisiteMissing(missing.join("; ")).into())
}
