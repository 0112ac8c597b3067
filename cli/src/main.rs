//! promctl - Prometheus provisioning for systemd hosts

use clap::Parser;

use promctl_cli::cli::Cli;
use promctl_cli::logging;
use promctl_cli::output::json;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let json_mode = cli.json;

    if let Err(e) = cli.run().await {
        tracing::debug!(error = ?e, "command failed");
        let message = format!("{e:#}");
        match json_mode
            .then(|| json::format_error(&message, json::error_code(&e)))
            .transpose()
        {
            Ok(Some(obj)) => println!("{obj}"),
            _ => eprintln!("Error: {message}"),
        }
        std::process::exit(1);
    }
}
