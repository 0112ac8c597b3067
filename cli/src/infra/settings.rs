//! Loads `Settings` from YAML.
//!
//! Lookup order: an explicit path (`--settings` / `PROMCTL_SETTINGS`), then
//! `/etc/promctl/settings.yaml`, then the user config dir, then defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::Settings;

/// System-wide settings location.
pub const SYSTEM_SETTINGS_PATH: &str = "/etc/promctl/settings.yaml";

/// Production settings loader backed by a YAML file on disk.
pub struct YamlSettingsStore {
    explicit: Option<PathBuf>,
    candidates: Vec<PathBuf>,
}

impl YamlSettingsStore {
    /// Store that honours `explicit` first and then the standard locations.
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        let mut candidates = vec![PathBuf::from(SYSTEM_SETTINGS_PATH)];
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("promctl").join("settings.yaml"));
        }
        Self {
            explicit,
            candidates,
        }
    }

    /// Store with explicit candidate locations (used in tests).
    #[must_use]
    pub fn with_candidates(explicit: Option<PathBuf>, candidates: Vec<PathBuf>) -> Self {
        Self {
            explicit,
            candidates,
        }
    }

    /// The file that `load` will read, or `None` when defaults apply.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.explicit {
            return Some(path.clone());
        }
        self.candidates.iter().find(|p| p.is_file()).cloned()
    }

    /// Load and validate settings.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, any file fails to
    /// parse, or the resulting settings are invalid.
    pub fn load(&self) -> Result<Settings> {
        let settings = match self.path() {
            Some(path) => read_settings(&path)?,
            None => {
                tracing::debug!("no settings file found; using defaults");
                Settings::default()
            }
        };
        settings.validate()?;
        Ok(settings)
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    tracing::debug!(path = %path.display(), "loading settings");
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read settings file {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(&content)
        .with_context(|| format!("cannot parse settings file {}", path.display()))
}
