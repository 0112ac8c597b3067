//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::application::services::add_target::AddTargetSummary;
use crate::application::services::install::InstallSummary;
use crate::application::services::remove::RemoveSummary;
use crate::application::services::status::StatusView;
use crate::domain::{MergeOutcome, ServiceState};
use crate::output::OutputContext;

/// Renders service results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the observed lifecycle state and supervisor properties.
    pub fn render_status(&self, view: &StatusView) {
        if self.ctx.quiet {
            return;
        }
        let report = &view.supervisor;
        let state = view.state.as_str();
        let styled = match view.state {
            ServiceState::Running => state.style(self.ctx.styles.success).to_string(),
            ServiceState::Stopped | ServiceState::Provisioned => {
                state.style(self.ctx.styles.warning).to_string()
            }
            ServiceState::Absent | ServiceState::Configured => {
                state.style(self.ctx.styles.dim).to_string()
            }
        };

        self.ctx.header(&report.unit);
        self.ctx.kv("State:", &styled);
        self.ctx.kv("Loaded:", or_dash(&report.load_state));
        self.ctx.kv(
            "Active:",
            &format!("{} ({})", or_dash(&report.active_state), or_dash(&report.sub_state)),
        );
        self.ctx.kv("Enabled:", or_dash(&report.unit_file_state));
        if let Some(pid) = report.main_pid {
            self.ctx.kv("Main PID:", &pid.to_string());
        }
        self.ctx.kv(
            "Artifacts:",
            &format!(
                "binary {}  config {}  unit {}",
                mark(view.artifacts.binary),
                mark(view.artifacts.config),
                mark(view.artifacts.unit)
            ),
        );
    }

    /// One-line recap after install.
    pub fn render_install(&self, summary: &InstallSummary) {
        if summary.is_noop() {
            self.ctx.info("nothing to change");
            return;
        }
        let mut changes = Vec::new();
        if summary.created_group || summary.created_user {
            changes.push("identity".to_string());
        }
        if !summary.placed.is_empty() {
            changes.push(format!("{} artifact(s)", summary.placed.len()));
        }
        if summary.unit_written {
            changes.push("unit".to_string());
        }
        if summary.enabled {
            changes.push("enabled".to_string());
        }
        if summary.started {
            changes.push("started".to_string());
        }
        self.ctx.info(&format!("changed: {}", changes.join(", ")));
    }

    pub fn render_add_target(&self, job: &str, summary: &AddTargetSummary) {
        match summary.outcome {
            MergeOutcome::AppendedToStaticConfig => {}
            MergeOutcome::AddedStaticConfig => {
                self.ctx.info(&format!("job '{job}' had no static configs; added one"));
            }
            MergeOutcome::CreatedJob => self.ctx.info(&format!("created job '{job}'")),
        }
        if !summary.restarted {
            self.ctx
                .info("service not restarted; the target takes effect on next restart");
        }
    }

    pub fn render_remove(&self, summary: &RemoveSummary) {
        if summary.is_noop() {
            self.ctx.info("nothing to remove");
        }
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn mark(present: bool) -> &'static str {
    if present { "✓" } else { "✗" }
}
