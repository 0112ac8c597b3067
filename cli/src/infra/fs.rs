//! `HostFs` on top of `std::fs`, with `chown` delegated to the runner.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::application::ports::{CommandRunner, HostFs};
use crate::domain::{Owner, ProvisionError};
use crate::infra::host::LinuxHost;

fn fs_error(msg: String) -> anyhow::Error {
    ProvisionError::Filesystem(msg).into()
}

impl<R: CommandRunner> HostFs for LinuxHost<R> {
    fn exists(&self, path: &Path) -> bool {
        // `symlink_metadata` so a dangling link still counts as present.
        std::fs::symlink_metadata(path).is_ok()
    }

    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(fs_error(format!("cannot read {}: {e}", path.display()))),
        }
    }

    fn ensure_directories(&self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            match std::fs::metadata(path) {
                Ok(meta) if meta.is_dir() => {
                    tracing::debug!(path = %path.display(), "directory already exists");
                }
                Ok(_) => {
                    return Err(fs_error(format!(
                        "{} exists and is not a directory",
                        path.display()
                    )));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::info!(path = %path.display(), "creating directory");
                    std::fs::create_dir_all(path).map_err(|e| {
                        fs_error(format!("cannot create {}: {e}", path.display()))
                    })?;
                }
                Err(e) => {
                    return Err(fs_error(format!("cannot stat {}: {e}", path.display())));
                }
            }
        }
        Ok(())
    }

    async fn set_ownership(&self, paths: &[PathBuf], owner: &Owner) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let owner_arg = owner.to_string();
        let path_args: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        let mut args = vec!["-R", owner_arg.as_str()];
        args.extend(path_args.iter().map(String::as_str));
        self.run_checked("chown", &args, fs_error).await?;
        Ok(())
    }

    fn place_file(&self, source: &Path, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| fs_error(format!("cannot create {}: {e}", parent.display())))?;
        }
        remove_path(dest)?;
        match std::fs::rename(source, dest) {
            Ok(()) => Ok(()),
            // The unpack directory may live on another filesystem.
            Err(e) if e.kind() == ErrorKind::CrossesDevices => {
                copy_recursive(source, dest)?;
                remove_path(source)
            }
            Err(e) => Err(fs_error(format!(
                "cannot move {} to {}: {e}",
                source.display(),
                dest.display()
            ))),
        }
    }

    fn remove_all(&self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            remove_path(path)?;
        }
        Ok(())
    }
}

/// Delete a file, link or directory tree. Absent paths are not an error.
fn remove_path(path: &Path) -> Result<()> {
    let meta = match std::fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(fs_error(format!("cannot stat {}: {e}", path.display()))),
    };
    let result = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    match result {
        Ok(()) => {
            tracing::info!(path = %path.display(), "removed");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(fs_error(format!("cannot remove {}: {e}", path.display()))),
    }
}

fn copy_recursive(source: &Path, dest: &Path) -> Result<()> {
    let copy_err = |e: std::io::Error| {
        fs_error(format!(
            "cannot copy {} to {}: {e}",
            source.display(),
            dest.display()
        ))
    };
    if std::fs::metadata(source).map_err(copy_err)?.is_dir() {
        std::fs::create_dir_all(dest).map_err(copy_err)?;
        for entry in std::fs::read_dir(source).map_err(copy_err)? {
            let entry = entry.map_err(copy_err)?;
            copy_recursive(&entry.path(), &dest.join(entry.file_name()))?;
        }
    } else {
        std::fs::copy(source, dest).map_err(copy_err)?;
    }
    Ok(())
}
