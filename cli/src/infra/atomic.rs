//! Infrastructure implementation of the `AtomicWriter` port.
//!
//! Content goes to a `NamedTempFile` beside the destination, is fsynced and
//! then renamed over it, so readers see either the old file or the new one.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use tempfile::NamedTempFile;

use crate::application::ports::{AtomicWriter, CommandRunner};
use crate::domain::ProvisionError;
use crate::infra::host::LinuxHost;

/// Mode for committed config and unit files.
pub const COMMIT_MODE: u32 = 0o644;

fn commit_error(msg: String) -> anyhow::Error {
    ProvisionError::AtomicCommit(msg).into()
}

/// Replace `final_path` with `content` in one rename.
///
/// # Errors
///
/// Returns `AtomicCommit` if the temp file cannot be written or the rename
/// fails. After a failed rename the temp file is kept and its path is part
/// of the message.
pub fn commit_file(content: &[u8], final_path: &Path) -> Result<()> {
    let dir = match final_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
        commit_error(format!("cannot create temp file in {}: {e}", dir.display()))
    })?;
    tmp.write_all(content)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| commit_error(format!("cannot write {}: {e}", tmp.path().display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(COMMIT_MODE))
            .map_err(|e| {
                commit_error(format!("cannot set mode on {}: {e}", tmp.path().display()))
            })?;
        keep_previous_owner(&tmp, final_path)?;
    }

    if let Err(e) = tmp.persist(final_path) {
        let cause = e.error;
        let kept = e
            .file
            .keep()
            .map(|(_, path)| path.display().to_string())
            .unwrap_or_else(|_| "<unknown>".to_string());
        return Err(commit_error(format!(
            "cannot rename onto {}: {cause} (new content left at {kept})",
            final_path.display()
        )));
    }

    tracing::debug!(path = %final_path.display(), bytes = content.len(), "committed");
    Ok(())
}

/// Give the temp file the uid and gid of the file it is about to replace,
/// so a config owned by the service user stays owned by it.
#[cfg(unix)]
fn keep_previous_owner(tmp: &NamedTempFile, final_path: &Path) -> Result<()> {
    use std::os::unix::fs::MetadataExt;

    let Ok(previous) = std::fs::metadata(final_path) else {
        return Ok(());
    };
    let current = tmp
        .as_file()
        .metadata()
        .map_err(|e| commit_error(format!("cannot stat {}: {e}", tmp.path().display())))?;
    if (current.uid(), current.gid()) == (previous.uid(), previous.gid()) {
        return Ok(());
    }
    std::os::unix::fs::fchown(tmp.as_file(), Some(previous.uid()), Some(previous.gid()))
        .map_err(|e| {
            commit_error(format!(
                "cannot give {} the owner of {}: {e}",
                tmp.path().display(),
                final_path.display()
            ))
        })
}

impl<R: CommandRunner> AtomicWriter for LinuxHost<R> {
    fn commit(&self, content: &[u8], final_path: &Path) -> Result<()> {
        commit_file(content, final_path)
    }
}
