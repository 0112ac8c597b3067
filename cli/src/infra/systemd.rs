//! `ProcessSupervisor` on top of `systemctl`.

use anyhow::Result;

use crate::application::ports::{CommandRunner, ProcessSupervisor};
use crate::domain::{ProvisionError, StatusReport};
use crate::infra::host::LinuxHost;

/// Properties requested from `systemctl show`.
const SHOW_PROPERTIES: &str = "LoadState,ActiveState,SubState,UnitFileState,MainPID,NeedDaemonReload";

fn supervisor_error(msg: String) -> anyhow::Error {
    ProvisionError::Supervisor(msg).into()
}

impl<R: CommandRunner> LinuxHost<R> {
    async fn systemctl(&self, args: &[&str]) -> Result<()> {
        self.run_checked("systemctl", args, supervisor_error).await?;
        Ok(())
    }
}

impl<R: CommandRunner> ProcessSupervisor for LinuxHost<R> {
    async fn daemon_reload(&self) -> Result<()> {
        self.systemctl(&["daemon-reload"]).await
    }

    async fn enable(&self, unit: &str) -> Result<()> {
        self.systemctl(&["enable", unit]).await
    }

    async fn disable(&self, unit: &str) -> Result<()> {
        self.systemctl(&["disable", unit]).await
    }

    async fn start(&self, unit: &str) -> Result<()> {
        self.systemctl(&["start", unit]).await
    }

    async fn stop(&self, unit: &str) -> Result<()> {
        self.systemctl(&["stop", unit]).await
    }

    async fn restart(&self, unit: &str) -> Result<()> {
        self.systemctl(&["restart", unit]).await
    }

    async fn query_status(&self, unit: &str) -> Result<StatusReport> {
        let output = self
            .run_checked(
                "systemctl",
                &["show", "--property", SHOW_PROPERTIES, unit],
                supervisor_error,
            )
            .await?;
        Ok(StatusReport::parse_show(
            unit,
            &String::from_utf8_lossy(&output.stdout),
        ))
    }
}
