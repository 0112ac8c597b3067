//! `promctl install`: create the identity, place the release and start the unit.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::{install, prerequisites};
use crate::output::json;

/// Run `promctl install`.
///
/// # Errors
///
/// Returns an error if a prerequisite is missing or any install step fails.
pub async fn run(app: &AppContext) -> Result<()> {
    prerequisites::check(&app.host, prerequisites::LIFECYCLE_PROGRAMS).await?;

    let summary = {
        let reporter = app.reporter();
        install::install(&app.host, &app.settings, &reporter).await?
    };

    if app.is_json() {
        println!("{}", json::format_value(&summary)?);
    } else {
        app.renderer().render_install(&summary);
    }
    Ok(())
}
