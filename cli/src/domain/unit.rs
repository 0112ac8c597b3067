//! Systemd unit generation for the managed service.

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::domain::settings::Settings;

/// A service unit definition. Regenerated on every install and overwritten
/// as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUnit {
    pub description: String,
    pub user: String,
    pub group: String,
    pub exec_path: PathBuf,
    pub exec_args: Vec<String>,
}

impl ServiceUnit {
    /// Unit for the configured Prometheus layout.
    #[must_use]
    pub fn for_settings(settings: &Settings) -> Self {
        let config_dir = &settings.paths.config_dir;
        // Trailing slash on the TSDB path matches the upstream sample unit.
        let data_dir = format!("{}/", settings.paths.data_dir.display());
        Self {
            description: "Prometheus".to_string(),
            user: settings.service.user.clone(),
            group: settings.service.group.clone(),
            exec_path: settings.binary_path(),
            exec_args: vec![
                format!("--config.file={}", settings.config_file().display()),
                format!("--storage.tsdb.path={data_dir}"),
                format!(
                    "--web.console.templates={}",
                    config_dir.join("consoles").display()
                ),
                format!(
                    "--web.console.libraries={}",
                    config_dir.join("console_libraries").display()
                ),
            ],
        }
    }

    /// Render the unit file text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut exec = self.exec_path.display().to_string();
        for arg in &self.exec_args {
            let _ = write!(exec, " \\\n    {arg}");
        }

        format!(
            "[Unit]\n\
             Description={description}\n\
             Wants=network-online.target\n\
             After=network-online.target\n\
             \n\
             [Service]\n\
             User={user}\n\
             Group={group}\n\
             Type=simple\n\
             ExecStart={exec}\n\
             Restart=always\n\
             \n\
             [Install]\n\
             WantedBy=multi-user.target\n",
            description = self.description,
            user = self.user,
            group = self.group,
        )
    }
}
