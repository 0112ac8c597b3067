//! `IdentityStore` on top of `getent`, `groupadd`, `useradd`, `userdel`
//! and `groupdel`.

use anyhow::Result;

use crate::application::ports::{CommandRunner, IdentityStore};
use crate::domain::{PrincipalKind, ProvisionError};
use crate::infra::command_runner::stderr_text;
use crate::infra::host::LinuxHost;

/// `getent` exit status for "key not found in database".
const GETENT_NOT_FOUND: i32 = 2;

fn identity_error(msg: String) -> anyhow::Error {
    ProvisionError::Identity(msg).into()
}

fn database(kind: PrincipalKind) -> &'static str {
    match kind {
        PrincipalKind::User => "passwd",
        PrincipalKind::Group => "group",
    }
}

impl<R: CommandRunner> IdentityStore for LinuxHost<R> {
    async fn principal_exists(&self, name: &str, kind: PrincipalKind) -> Result<bool> {
        let db = database(kind);
        let output = self
            .runner
            .run("getent", &[db, name])
            .await
            .map_err(|e| identity_error(format!("cannot probe {db} database: {e:#}")))?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(GETENT_NOT_FOUND) => Ok(false),
            code => Err(identity_error(format!(
                "getent {db} {name} exited with {}: {}",
                code.unwrap_or(-1),
                stderr_text(&output)
            ))),
        }
    }

    async fn create_group(&self, name: &str) -> Result<()> {
        self.run_checked("groupadd", &["--system", name], identity_error).await?;
        Ok(())
    }

    async fn create_user(&self, name: &str, primary_group: &str) -> Result<()> {
        self.run_checked(
            "useradd",
            &[
                "--system",
                "--no-create-home",
                "--shell",
                "/sbin/nologin",
                "--gid",
                primary_group,
                name,
            ],
            identity_error,
        )
        .await?;
        Ok(())
    }

    async fn delete_user(&self, name: &str) -> Result<()> {
        self.run_checked("userdel", &[name], identity_error).await?;
        Ok(())
    }

    async fn delete_group(&self, name: &str) -> Result<()> {
        self.run_checked("groupdel", &[name], identity_error).await?;
        Ok(())
    }
}
