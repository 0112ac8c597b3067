//! `promctl status`: read-only view of the service.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::status::status;
use crate::output::json;

/// Run `promctl status`.
///
/// # Errors
///
/// Returns an error if the supervisor cannot be queried.
pub async fn run(app: &AppContext) -> Result<()> {
    let view = status(&app.host, &app.settings).await?;
    if app.is_json() {
        println!("{}", json::format_value(&view)?);
    } else {
        app.renderer().render_status(&view);
    }
    Ok(())
}
