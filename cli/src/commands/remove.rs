//! `promctl remove [--delete-principals]`: tear everything down.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::prerequisites;
use crate::application::services::remove::{RemoveOptions, remove};
use crate::domain::Settings;
use crate::output::json;

/// Arguments for the remove command.
#[derive(Args, Debug, Clone, Default)]
pub struct RemoveArgs {
    /// Also delete the service user and group
    #[arg(long)]
    pub delete_principals: bool,
}

/// Run `promctl remove`.
///
/// # Errors
///
/// Returns an error if a prerequisite is missing, the prompt fails, or a
/// teardown step fails.
pub async fn run(app: &AppContext, args: &RemoveArgs) -> Result<()> {
    let options = RemoveOptions {
        delete_principals: args.delete_principals || app.settings.removal.delete_principals,
    };

    let mut programs = prerequisites::LIFECYCLE_PROGRAMS.to_vec();
    if options.delete_principals {
        programs.extend(["userdel", "groupdel"]);
    }
    prerequisites::check(&app.host, &programs).await?;

    let unit = app.settings.unit_name();
    if !app.output.quiet {
        println!();
        println!("This will stop {unit} and permanently delete:");
        println!("  • {}", app.settings.paths.config_dir.display());
        println!("  • {} (all stored metrics)", app.settings.paths.data_dir.display());
        println!(
            "  • {} and promtool in {}, and the unit file",
            app.settings.service.name,
            app.settings.paths.bin_dir.display()
        );
        if options.delete_principals {
            println!("  • {}", principals_line(&app.settings));
        }
        println!();
    }
    if !app.confirm("Continue?")? {
        app.output.info("Cancelled.");
        return Ok(());
    }

    let summary = {
        let reporter = app.reporter();
        remove(&app.host, &app.settings, options, &reporter).await?
    };

    if app.is_json() {
        println!("{}", json::format_value(&summary)?);
    } else {
        app.renderer().render_remove(&summary);
    }
    Ok(())
}

/// The user and group that `--delete-principals` removes, in deletion order.
fn principals_line(settings: &Settings) -> String {
    settings
        .principals()
        .iter()
        .rev()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" and ")
}
