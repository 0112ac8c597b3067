//! `ArchiveFetcher`: download a Prometheus release tarball, optionally
//! verify it against the release's `sha256sums.txt`, and unpack it into a
//! temporary directory.

use std::any::Any;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tempfile::TempDir;

use crate::application::ports::{ArchiveFetcher, CommandRunner};
use crate::domain::ProvisionError;
use crate::domain::release::{ReleaseSpec, expected_digest};
use crate::infra::host::LinuxHost;

/// Upper bound on a downloaded archive body.
pub const MAX_ARCHIVE_BYTES: u64 = 512 * 1024 * 1024;
/// Upper bound on the checksum listing.
const MAX_SUMS_BYTES: u64 = 1024 * 1024;

fn fetch_error(msg: String) -> anyhow::Error {
    ProvisionError::Fetch(msg).into()
}

impl<R: CommandRunner> ArchiveFetcher for LinuxHost<R> {
    async fn fetch_and_unpack(&self, release: &ReleaseSpec) -> Result<(PathBuf, Box<dyn Any>)> {
        let release = release.clone();
        let (folder, guard) = tokio::task::spawn_blocking(move || download_and_unpack(&release))
            .await
            .context("release download task panicked")??;
        Ok((folder, Box::new(guard)))
    }
}

fn download_and_unpack(release: &ReleaseSpec) -> Result<(PathBuf, TempDir)> {
    let url = release.archive_url();
    tracing::info!(%url, "downloading release archive");
    let archive = download(&url, MAX_ARCHIVE_BYTES)?;

    if release.verify_checksum {
        let sums = download(&release.checksum_url(), MAX_SUMS_BYTES)?;
        verify_digest(&archive, &String::from_utf8_lossy(&sums), &release.archive_name())?;
    } else {
        tracing::warn!(%url, "checksum verification disabled");
    }

    unpack(&archive, release)
}

fn download(url: &str, limit: u64) -> Result<Vec<u8>> {
    let response = match ureq::get(url).set("User-Agent", "promctl").call() {
        Ok(resp) => resp,
        Err(ureq::Error::Status(code, _)) => {
            return Err(fetch_error(format!("GET {url}: HTTP {code}")));
        }
        Err(e) => return Err(fetch_error(format!("GET {url}: {e}"))),
    };

    let mut body = Vec::new();
    response
        .into_reader()
        .take(limit + 1)
        .read_to_end(&mut body)
        .map_err(|e| fetch_error(format!("reading {url}: {e}")))?;
    if body.len() as u64 > limit {
        return Err(fetch_error(format!("{url} is larger than {limit} bytes")));
    }
    tracing::debug!(%url, bytes = body.len(), "download complete");
    Ok(body)
}

/// Compare the archive's SHA-256 with its entry in a checksum listing.
///
/// # Errors
///
/// Returns `Fetch` if the listing has no entry for `archive_name` or the
/// digests differ.
pub fn verify_digest(archive: &[u8], sums: &str, archive_name: &str) -> Result<()> {
    let expected = expected_digest(sums, archive_name)
        .ok_or_else(|| fetch_error(format!("no checksum listed for {archive_name}")))?;
    let actual = format!("{:x}", Sha256::digest(archive));
    if actual != expected {
        return Err(fetch_error(format!(
            "checksum mismatch for {archive_name}: expected {expected}, got {actual}"
        )));
    }
    tracing::debug!(archive = archive_name, "checksum verified");
    Ok(())
}

/// Unpack a gzipped tarball and return the release's top-level folder
/// together with the temp dir that owns it.
///
/// # Errors
///
/// Returns `Fetch` if the archive is corrupt or lacks the expected folder.
pub fn unpack(archive: &[u8], release: &ReleaseSpec) -> Result<(PathBuf, TempDir)> {
    let dir = tempfile::Builder::new()
        .prefix("promctl-release-")
        .tempdir()
        .map_err(|e| fetch_error(format!("cannot create unpack directory: {e}")))?;

    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(archive));
    tar.unpack(dir.path())
        .map_err(|e| fetch_error(format!("cannot unpack {}: {e}", release.archive_name())))?;

    let folder = dir.path().join(release.folder_name());
    if !folder.is_dir() {
        return Err(fetch_error(format!(
            "{} does not contain {}/",
            release.archive_name(),
            release.folder_name()
        )));
    }
    Ok((folder, dir))
}
