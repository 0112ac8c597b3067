//! `promctl menu`: interactive loop over the lifecycle operations.

use anyhow::{Result, bail};
use dialoguer::{Input, Select};

use crate::app::AppContext;
use crate::commands::add_target::AddTargetArgs;
use crate::commands::remove::RemoveArgs;
use crate::commands::{add_target, install, remove, status};
use crate::domain::ScrapeTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Install,
    AddTarget,
    Remove,
    Status,
    Exit,
}

impl MenuItem {
    const ALL: [Self; 5] = [
        Self::Install,
        Self::AddTarget,
        Self::Remove,
        Self::Status,
        Self::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Install => "Install Prometheus",
            Self::AddTarget => "Add scrape target",
            Self::Remove => "Remove Prometheus",
            Self::Status => "Show status",
            Self::Exit => "Exit",
        }
    }
}

/// Run `promctl menu`. A failed operation is printed and the menu shown again.
///
/// # Errors
///
/// Returns an error if the terminal prompt fails or `--json` was given.
pub async fn run(app: &AppContext) -> Result<()> {
    if app.is_json() {
        bail!("the interactive menu does not support --json");
    }

    let labels: Vec<&str> = MenuItem::ALL.iter().map(|item| item.label()).collect();
    loop {
        let choice = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let result = match MenuItem::ALL[choice] {
            MenuItem::Install => install::run(app).await,
            MenuItem::AddTarget => {
                let address = prompt_address()?;
                let args = AddTargetArgs {
                    address,
                    job: None,
                    no_restart: false,
                };
                add_target::run(app, &args).await
            }
            MenuItem::Remove => remove::run(app, &RemoveArgs::default()).await,
            MenuItem::Status => status::run(app).await,
            MenuItem::Exit => return Ok(()),
        };

        if let Err(e) = result {
            tracing::debug!(error = ?e, "menu operation failed");
            app.output.error(&format!("{e:#}"));
        }
        println!();
    }
}

fn prompt_address() -> Result<ScrapeTarget> {
    let raw: String = Input::new()
        .with_prompt("Target address (host:port)")
        .validate_with(|input: &String| -> Result<(), String> {
            input
                .trim()
                .parse::<ScrapeTarget>()
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok(raw.trim().parse()?)
}
