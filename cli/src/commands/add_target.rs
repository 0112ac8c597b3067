//! `promctl add-target <address> [--job NAME] [--no-restart]`.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::add_target::{AddTargetRequest, add_target};
use crate::application::services::prerequisites;
use crate::domain::ScrapeTarget;
use crate::domain::settings::validate_name;
use crate::output::json;

/// Arguments for the add-target command.
#[derive(Args, Debug, Clone)]
pub struct AddTargetArgs {
    /// Endpoint to scrape, as host:port (e.g. 10.0.0.5:9100)
    pub address: ScrapeTarget,

    /// Job to add the target to (default: service.job_name from settings)
    #[arg(long, value_name = "NAME")]
    pub job: Option<String>,

    /// Only update the config file; do not restart the service
    #[arg(long)]
    pub no_restart: bool,
}

/// Run `promctl add-target`.
///
/// # Errors
///
/// Returns an error if the job name is invalid, the config file is missing
/// or malformed, the commit fails, or the restart fails.
pub async fn run(app: &AppContext, args: &AddTargetArgs) -> Result<()> {
    let job_name = args
        .job
        .clone()
        .unwrap_or_else(|| app.settings.service.job_name.clone());
    validate_name("--job", &job_name)?;

    if !args.no_restart {
        prerequisites::check(&app.host, prerequisites::RESTART_PROGRAMS).await?;
    }

    let request = AddTargetRequest {
        target: args.address.clone(),
        job_name,
        restart: !args.no_restart,
    };
    let summary = {
        let reporter = app.reporter();
        add_target(&app.host, &app.settings, &request, &reporter).await?
    };

    if app.is_json() {
        let obj = serde_json::json!({
            "target": request.target.to_string(),
            "job": request.job_name,
            "outcome": summary.outcome,
            "duplicate": summary.duplicate,
            "restarted": summary.restarted,
        });
        println!("{}", json::format_value(&obj)?);
    } else {
        app.renderer().render_add_target(&request.job_name, &summary);
    }
    Ok(())
}
