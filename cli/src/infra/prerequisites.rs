//! `PrerequisiteProbe` for the local host.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::application::ports::{CommandRunner, PrerequisiteProbe};
use crate::domain::ProvisionError;
use crate::infra::host::LinuxHost;

impl<R: CommandRunner> PrerequisiteProbe for LinuxHost<R> {
    async fn effective_uid(&self) -> Result<u32> {
        let output = self
            .run_checked("id", &["-u"], |msg| {
                ProvisionError::PrerequisiteMissing(format!("cannot determine user id: {msg}"))
                    .into()
            })
            .await?;
        let text = String::from_utf8_lossy(&output.stdout);
        text.trim().parse().map_err(|_| {
            ProvisionError::PrerequisiteMissing(format!("unexpected `id -u` output: {text}"))
                .into()
        })
    }

    fn find_program(&self, name: &str) -> Option<PathBuf> {
        let path = std::env::var_os("PATH")?;
        find_in(std::env::split_paths(&path), name)
    }
}

fn find_in(dirs: impl IntoIterator<Item = PathBuf>, name: &str) -> Option<PathBuf> {
    dirs.into_iter()
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
