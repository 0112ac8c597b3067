//! Application service: remove use-case.
//!
//! Teardown order: stop and disable the unit, delete binaries and
//! directories, delete the unit file, reload the supervisor, and finally
//! (when the policy asks for it) delete the service user and group.

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{HostFs, IdentityStore, ProcessSupervisor, ProgressReporter};
use crate::domain::{PrincipalKind, Settings};

/// Options for a remove run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveOptions {
    /// Delete the dedicated user and group after everything else.
    pub delete_principals: bool,
}

/// What a remove run actually changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemoveSummary {
    pub stopped: bool,
    pub disabled: bool,
    pub files_removed: bool,
    pub unit_removed: bool,
    pub deleted_user: bool,
    pub deleted_group: bool,
}

impl RemoveSummary {
    /// `true` when the host was already clean.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Converge the host to the `Absent` state.
///
/// # Errors
///
/// Returns the first failing step's error. Missing resources are skipped,
/// so a re-run after a partial failure picks up where it stopped.
pub async fn remove(
    host: &(impl HostFs + IdentityStore + ProcessSupervisor),
    settings: &Settings,
    options: RemoveOptions,
    reporter: &impl ProgressReporter,
) -> Result<RemoveSummary> {
    let mut summary = RemoveSummary::default();
    let unit = settings.unit_name();
    let unit_path = settings.unit_path();

    // Files must not disappear under a running process.
    let status = host.query_status(&unit).await?;
    if status.is_loaded() {
        if status.is_active() {
            reporter.step(&format!("stopping {unit}..."));
            host.stop(&unit).await?;
            summary.stopped = true;
        }
        if status.is_enabled() {
            host.disable(&unit).await?;
            summary.disabled = true;
        }
    }

    let files = settings.removable_paths();
    if files.iter().any(|p| host.exists(p)) {
        reporter.step("removing binaries, configuration and data...");
        host.remove_all(&files)?;
        summary.files_removed = true;
    }

    let unit_file_present = host.exists(&unit_path);
    if unit_file_present {
        host.remove_all(std::slice::from_ref(&unit_path))?;
        summary.unit_removed = true;
        tracing::info!(path = %unit_path.display(), "unit file removed");
    }
    if unit_file_present || status.is_loaded() {
        host.daemon_reload().await?;
    }

    if options.delete_principals {
        delete_principals(host, settings, &mut summary).await?;
    }

    if summary.is_noop() {
        reporter.success(&format!("{} is not installed", settings.service.name));
    } else {
        reporter.success(&format!("{} removed", settings.service.name));
    }
    tracing::info!(?summary, "remove finished");
    Ok(summary)
}

async fn delete_principals(
    host: &impl IdentityStore,
    settings: &Settings,
    summary: &mut RemoveSummary,
) -> Result<()> {
    // Users go before groups: a group cannot be deleted while it is some
    // user's primary group.
    for principal in settings.principals().iter().rev() {
        if !host.principal_exists(&principal.name, principal.kind).await? {
            tracing::debug!(%principal, "already absent");
            continue;
        }
        tracing::info!(%principal, "deleting system principal");
        match principal.kind {
            PrincipalKind::User => {
                host.delete_user(&principal.name).await?;
                summary.deleted_user = true;
            }
            PrincipalKind::Group => {
                host.delete_group(&principal.name).await?;
                summary.deleted_group = true;
            }
        }
    }
    Ok(())
}
