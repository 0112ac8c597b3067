//! Application service: add a scrape target to the live configuration.

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{AtomicWriter, HostFs, ProcessSupervisor, ProgressReporter};
use crate::domain::{
    ConfigDocument, MergeOutcome, ProvisionError, ScrapeTarget, Settings, merge_target,
};

/// Options for a single add-target run.
#[derive(Debug, Clone)]
pub struct AddTargetRequest {
    pub target: ScrapeTarget,
    pub job_name: String,
    /// Skip the supervisor restart after committing.
    pub restart: bool,
}

/// Result of a successful add-target run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddTargetSummary {
    pub outcome: MergeOutcome,
    /// The target was already listed in the job before this run.
    pub duplicate: bool,
    pub restarted: bool,
}

/// Read the current config, merge the target in, commit it atomically and
/// restart the service.
///
/// The file is re-read on every call; nothing is cached between runs.
///
/// # Errors
///
/// Returns `Filesystem` if the config file is missing or unreadable,
/// `MalformedDocument` if it cannot be parsed or merged (nothing is
/// written in that case), `AtomicCommit` if the write fails, and
/// `Supervisor` if the restart fails after a successful commit.
pub async fn add_target(
    host: &(impl HostFs + AtomicWriter + ProcessSupervisor),
    settings: &Settings,
    request: &AddTargetRequest,
    reporter: &impl ProgressReporter,
) -> Result<AddTargetSummary> {
    let path = settings.config_file();
    let target = &request.target;
    let job = request.job_name.as_str();

    let Some(bytes) = host.read(&path)? else {
        return Err(ProvisionError::Filesystem(format!(
            "{} does not exist. Run 'promctl install' first.",
            path.display()
        ))
        .into());
    };

    let current = ConfigDocument::parse(&bytes)?;
    let target_str = target.to_string();
    let duplicate = current.job_targets(job).contains(&target_str.as_str());
    if duplicate {
        reporter.warn(&format!(
            "{target} is already listed in job '{job}'; adding it again"
        ));
    }

    let (merged, outcome) = merge_target(current, job, target)?;
    let yaml = merged.to_yaml()?;

    reporter.step(&format!("updating {}...", path.display()));
    host.commit(yaml.as_bytes(), &path)?;
    tracing::info!(%target, job, ?outcome, path = %path.display(), "scrape target added");
    reporter.success(&format!("added {target} to job '{job}'"));

    let mut restarted = false;
    if request.restart {
        let unit = settings.unit_name();
        reporter.step(&format!("restarting {unit}..."));
        host.restart(&unit).await?;
        reporter.success(&format!("{unit} restarted"));
        restarted = true;
    }

    Ok(AddTargetSummary {
        outcome,
        duplicate,
        restarted,
    })
}
