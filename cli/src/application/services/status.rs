//! Application service: read-only status query.

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{HostFs, ProcessSupervisor};
use crate::domain::{ArtifactPresence, ServiceState, Settings, StatusReport};

/// Lifecycle state plus the supervisor's raw report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub state: ServiceState,
    pub artifacts: ArtifactPresence,
    pub supervisor: StatusReport,
}

/// Observe the host without changing anything.
///
/// # Errors
///
/// Returns `Supervisor` if the status query cannot run.
pub async fn status(
    host: &(impl HostFs + ProcessSupervisor),
    settings: &Settings,
) -> Result<StatusView> {
    let supervisor = host.query_status(&settings.unit_name()).await?;
    let artifacts = ArtifactPresence {
        binary: host.exists(&settings.binary_path()),
        config: host.exists(&settings.config_file()),
        unit: host.exists(&settings.unit_path()),
    };
    Ok(StatusView {
        state: ServiceState::observe(&artifacts, &supervisor),
        artifacts,
        supervisor,
    })
}
