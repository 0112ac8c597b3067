//! Abstract lifecycle state of the managed service and the supervisor's
//! status report it is derived from.
//!
//! Pure functions only: no I/O, no async.

use serde::Serialize;

/// Lifecycle state of the service on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    /// Nothing installed.
    Absent,
    /// Some, but not all, artifacts are in place.
    Provisioned,
    /// Fully installed, never enabled.
    Configured,
    /// Fully installed and active.
    Running,
    /// Fully installed and enabled, but not active.
    Stopped,
}

impl ServiceState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Provisioned => "provisioned",
            Self::Configured => "configured",
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }

    /// Derive the state from what is on disk and what the supervisor reports.
    #[must_use]
    pub fn observe(artifacts: &ArtifactPresence, report: &StatusReport) -> Self {
        if !artifacts.any() && !report.is_loaded() {
            return Self::Absent;
        }
        if !artifacts.all() {
            return Self::Provisioned;
        }
        if report.is_active() {
            Self::Running
        } else if report.is_enabled() {
            Self::Stopped
        } else {
            Self::Configured
        }
    }
}

/// Which install artifacts currently exist on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ArtifactPresence {
    pub binary: bool,
    pub config: bool,
    pub unit: bool,
}

impl ArtifactPresence {
    #[must_use]
    pub fn any(&self) -> bool {
        self.binary || self.config || self.unit
    }

    #[must_use]
    pub fn all(&self) -> bool {
        self.binary && self.config && self.unit
    }
}

/// Properties the supervisor reports for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StatusReport {
    pub unit: String,
    /// `loaded`, `not-found`, `masked`, ...
    pub load_state: String,
    /// `active`, `inactive`, `failed`, `activating`, ...
    pub active_state: String,
    pub sub_state: String,
    /// `enabled`, `disabled`, `static`, or empty when unknown.
    pub unit_file_state: String,
    /// `None` when the service has no running main process.
    pub main_pid: Option<u32>,
    /// The unit file changed on disk since the supervisor last loaded it.
    pub need_daemon_reload: bool,
}

impl StatusReport {
    /// Parse `systemctl show -p ... <unit>` output (`Key=Value` per line).
    /// Unknown keys are ignored; missing keys stay empty.
    #[must_use]
    pub fn parse_show(unit: &str, text: &str) -> Self {
        let mut report = Self {
            unit: unit.to_string(),
            ..Self::default()
        };
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().to_string();
            match key.trim() {
                "LoadState" => report.load_state = value,
                "ActiveState" => report.active_state = value,
                "SubState" => report.sub_state = value,
                "UnitFileState" => report.unit_file_state = value,
                "MainPID" => report.main_pid = value.parse().ok().filter(|pid| *pid != 0),
                "NeedDaemonReload" => report.need_daemon_reload = value == "yes",
                _ => {}
            }
        }
        report
    }

    /// Whether the supervisor knows the unit at all.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        !self.load_state.is_empty() && self.load_state != "not-found"
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(
            self.active_state.as_str(),
            "active" | "activating" | "reloading"
        )
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(
            self.unit_file_state.as_str(),
            "enabled" | "enabled-runtime" | "alias" | "static"
        )
    }
}
