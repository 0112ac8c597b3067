//! Settings schema for promctl and the host layout derived from it.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::SettingsError;
use crate::domain::principal::{Owner, Principal};
use crate::domain::release::ReleaseSpec;

/// Same rule `useradd` applies to portable account names.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z_][a-z0-9_-]{0,31}$").expect("valid regex")
});

// ── Settings schema ──────────────────────────────────────────────────────────

/// Top-level settings, typically stored in `/etc/promctl/settings.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub service: ServiceSettings,
    pub release: ReleaseSettings,
    pub paths: PathSettings,
    pub removal: RemovalSettings,
}

/// Identity of the managed service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Systemd unit name and binary name.
    pub name: String,
    pub user: String,
    pub group: String,
    /// Job that `add-target` appends to when `--job` is not given.
    pub job_name: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "prometheus".to_string(),
            user: "prometheus".to_string(),
            group: "prometheus".to_string(),
            job_name: "prometheus".to_string(),
        }
    }
}

/// Which upstream release to install.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseSettings {
    pub version: String,
    pub platform: String,
    pub base_url: String,
    /// Compare the archive against the release's `sha256sums.txt`.
    pub verify_checksum: bool,
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        Self {
            version: "2.43.0".to_string(),
            platform: "linux-amd64".to_string(),
            base_url: "https://github.com/prometheus/prometheus/releases/download".to_string(),
            verify_checksum: true,
        }
    }
}

/// Host directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub bin_dir: PathBuf,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub unit_dir: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from("/usr/local/bin"),
            config_dir: PathBuf::from("/etc/prometheus"),
            data_dir: PathBuf::from("/var/lib/prometheus"),
            unit_dir: PathBuf::from("/etc/systemd/system"),
        }
    }
}

/// What `remove` deletes besides files and the unit.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RemovalSettings {
    /// Delete the service user and group after all files are gone.
    pub delete_principals: bool,
}

// ── Derived layout ───────────────────────────────────────────────────────────

/// Files copied out of the release archive, relative to its top folder.
pub const BINARY_ARTIFACTS: &[&str] = &[SERVER_BINARY, "promtool"];
/// The server binary inside the archive.
pub const SERVER_BINARY: &str = "prometheus";
pub const CONFIG_ARTIFACTS: &[&str] = &["consoles", "console_libraries", "prometheus.yml"];
pub const CONFIG_FILE_NAME: &str = "prometheus.yml";

impl Settings {
    /// Unit name as passed to `systemctl`, e.g. `prometheus.service`.
    #[must_use]
    pub fn unit_name(&self) -> String {
        format!("{}.service", self.service.name)
    }

    #[must_use]
    pub fn unit_path(&self) -> PathBuf {
        self.paths.unit_dir.join(self.unit_name())
    }

    #[must_use]
    pub fn binary_path(&self) -> PathBuf {
        self.paths.bin_dir.join(&self.service.name)
    }

    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.paths.config_dir.join(CONFIG_FILE_NAME)
    }

    #[must_use]
    pub fn owner(&self) -> Owner {
        Owner {
            user: self.service.user.clone(),
            group: self.service.group.clone(),
        }
    }

    /// Principals in creation order: the primary group before the user.
    #[must_use]
    pub fn principals(&self) -> [Principal; 2] {
        [
            Principal::group(&self.service.group),
            Principal::user(&self.service.user),
        ]
    }

    /// Directories created by install, each owned by the service afterwards
    /// except `bin_dir`, which is shared with the rest of the host.
    #[must_use]
    pub fn owned_directories(&self) -> Vec<PathBuf> {
        vec![self.paths.config_dir.clone(), self.paths.data_dir.clone()]
    }

    /// Host path for a binary shipped in the archive. The server binary is
    /// installed under `service.name`, the same path the unit executes.
    fn binary_destination(&self, artifact: &str) -> PathBuf {
        if artifact == SERVER_BINARY {
            self.binary_path()
        } else {
            self.paths.bin_dir.join(artifact)
        }
    }

    /// Where each archive artifact lands on the host, `(archive name, destination)`.
    #[must_use]
    pub fn artifact_destinations(&self) -> Vec<(&'static str, PathBuf)> {
        let binaries = BINARY_ARTIFACTS
            .iter()
            .map(|name| (*name, self.binary_destination(name)));
        let config = CONFIG_ARTIFACTS
            .iter()
            .map(|name| (*name, self.paths.config_dir.join(name)));
        binaries.chain(config).collect()
    }

    /// Every path `remove` deletes before the unit file.
    #[must_use]
    pub fn removable_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = BINARY_ARTIFACTS
            .iter()
            .map(|name| self.binary_destination(name))
            .collect();
        paths.push(self.paths.data_dir.clone());
        paths.push(self.paths.config_dir.clone());
        paths
    }

    #[must_use]
    pub fn release(&self) -> ReleaseSpec {
        ReleaseSpec {
            version: self.release.version.clone(),
            platform: self.release.platform.clone(),
            base_url: self.release.base_url.clone(),
            verify_checksum: self.release.verify_checksum,
        }
    }

    /// Validate names, version and paths before any host mutation.
    ///
    /// # Errors
    ///
    /// Returns the first `SettingsError` found.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("service.name", &self.service.name),
            ("service.user", &self.service.user),
            ("service.group", &self.service.group),
            ("service.job_name", &self.service.job_name),
        ] {
            validate_name(field, value)?;
        }

        if semver::Version::parse(&self.release.version).is_err() {
            return Err(SettingsError::InvalidVersion(self.release.version.clone()).into());
        }

        for (field, path) in [
            ("paths.bin_dir", &self.paths.bin_dir),
            ("paths.config_dir", &self.paths.config_dir),
            ("paths.data_dir", &self.paths.data_dir),
            ("paths.unit_dir", &self.paths.unit_dir),
        ] {
            validate_absolute(field, path)?;
        }
        Ok(())
    }
}

/// Validates a service, principal or job name.
///
/// # Errors
///
/// Returns an error if the name does not match the portable account-name rule.
pub fn validate_name(field: &'static str, value: &str) -> Result<()> {
    if !NAME_RE.is_match(value) {
        return Err(SettingsError::InvalidName {
            field,
            value: value.to_string(),
        }
        .into());
    }
    Ok(())
}

fn validate_absolute(field: &'static str, path: &Path) -> Result<()> {
    if !path.is_absolute() {
        return Err(SettingsError::RelativePath {
            field,
            value: path.display().to_string(),
        }
        .into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
