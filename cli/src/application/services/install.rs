//! Application service: install use-case.
//!
//! Every step probes the host immediately before acting, so re-running
//! install on a provisioned host is a no-op apart from `chown`.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{HostPlatform, ProgressReporter};
use crate::domain::{PrincipalKind, ProvisionError, ServiceUnit, Settings};

/// What an install run actually changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallSummary {
    pub created_group: bool,
    pub created_user: bool,
    /// Archive artifacts placed on the host, by archive name.
    pub placed: Vec<&'static str>,
    pub unit_written: bool,
    pub enabled: bool,
    pub started: bool,
}

impl InstallSummary {
    /// `true` when the host was already fully installed and running.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Install, configure and start the service.
///
/// # Errors
///
/// Returns the first failing step's error. Steps already completed are left
/// in place; re-running converges.
pub async fn install(
    host: &impl HostPlatform,
    settings: &Settings,
    reporter: &impl ProgressReporter,
) -> Result<InstallSummary> {
    let mut summary = InstallSummary::default();

    reporter.step("ensuring service identity...");
    ensure_identity(host, settings, &mut summary).await?;

    reporter.step("ensuring directories...");
    // bin_dir and unit_dir are shared with the rest of the host and never chowned.
    let mut dirs = settings.owned_directories();
    dirs.push(settings.paths.bin_dir.clone());
    dirs.push(settings.paths.unit_dir.clone());
    host.ensure_directories(&dirs)?;

    summary.placed = place_missing_artifacts(host, settings, reporter).await?;

    host.set_ownership(&settings.owned_directories(), &settings.owner()).await?;

    reporter.step("writing service unit...");
    summary.unit_written = write_unit(host, settings)?;

    let unit = settings.unit_name();
    let mut status = host.query_status(&unit).await?;
    // Also reload when an earlier run committed the unit but its reload
    // never took effect.
    if summary.unit_written || !status.is_loaded() || status.need_daemon_reload {
        host.daemon_reload().await?;
        status = host.query_status(&unit).await?;
    }
    if !status.is_enabled() {
        host.enable(&unit).await?;
        summary.enabled = true;
    }
    if !status.is_active() {
        reporter.step(&format!("starting {unit}..."));
        host.start(&unit).await?;
        summary.started = true;
    }

    if summary.is_noop() {
        reporter.success(&format!("{unit} already installed and running"));
    } else {
        reporter.success(&format!("{unit} installed and running"));
    }
    tracing::info!(?summary, "install finished");
    Ok(summary)
}

async fn ensure_identity(
    host: &impl HostPlatform,
    settings: &Settings,
    summary: &mut InstallSummary,
) -> Result<()> {
    let group = &settings.service.group;

    for principal in settings.principals() {
        if host.principal_exists(&principal.name, principal.kind).await? {
            tracing::debug!(%principal, "already exists");
            continue;
        }
        tracing::info!(%principal, "creating system principal");
        match principal.kind {
            PrincipalKind::Group => {
                host.create_group(&principal.name).await?;
                summary.created_group = true;
            }
            PrincipalKind::User => {
                host.create_user(&principal.name, group).await?;
                summary.created_user = true;
            }
        }
    }
    Ok(())
}

/// Fetch the release only if some artifact is missing, then place just the
/// missing ones. An existing `prometheus.yml` is never replaced.
async fn place_missing_artifacts(
    host: &impl HostPlatform,
    settings: &Settings,
    reporter: &impl ProgressReporter,
) -> Result<Vec<&'static str>> {
    let missing: Vec<_> = settings
        .artifact_destinations()
        .into_iter()
        .filter(|(_, dest)| !host.exists(dest))
        .collect();

    if missing.is_empty() {
        tracing::debug!("all release artifacts present; skipping download");
        return Ok(Vec::new());
    }

    let release = settings.release();
    reporter.step(&format!("downloading {}...", release.archive_name()));
    let (unpacked, _guard) = host.fetch_and_unpack(&release).await?;

    let mut placed = Vec::with_capacity(missing.len());
    for (name, dest) in missing {
        let source = unpacked.join(name);
        if !host.exists(&source) {
            return Err(ProvisionError::Fetch(format!(
                "release archive has no '{name}' under {}",
                release.folder_name()
            ))
            .into());
        }
        tracing::info!(artifact = name, path = %dest.display(), "placing release artifact");
        host.place_file(&source, &dest)
            .with_context(|| format!("placing {name}"))?;
        placed.push(name);
    }
    reporter.success(&format!("placed {}", placed.join(", ")));
    Ok(placed)
}

/// Commit the unit only when its content changed.
fn write_unit(host: &impl HostPlatform, settings: &Settings) -> Result<bool> {
    let path = settings.unit_path();
    let rendered = ServiceUnit::for_settings(settings).render();

    if host.read(&path)?.as_deref() == Some(rendered.as_bytes()) {
        tracing::debug!(path = %path.display(), "unit file unchanged");
        return Ok(false);
    }

    host.commit(rendered.as_bytes(), &path)?;
    tracing::info!(path = %path.display(), "unit file written");
    Ok(true)
}
