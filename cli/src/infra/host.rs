//! The production host adapter.
//!
//! `LinuxHost<R>` implements every host port. Each port lives in its own
//! module (`identity`, `fs`, `atomic`, `fetch`, `systemd`); this file only
//! holds the shared state.

use std::process::Output;

use anyhow::Result;

use crate::application::ports::CommandRunner;
use crate::infra::command_runner::{TokioCommandRunner, stderr_text};

/// Infrastructure adapter that routes every external tool call through a
/// `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a scripted
/// runner without spawning real processes.
pub struct LinuxHost<R: CommandRunner> {
    pub(crate) runner: R,
}

impl<R: CommandRunner> LinuxHost<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Run a command and turn a non-zero exit into an error built by `err`.
    pub(crate) async fn run_checked(
        &self,
        program: &str,
        args: &[&str],
        err: impl Fn(String) -> anyhow::Error,
    ) -> Result<Output> {
        let output = self
            .runner
            .run(program, args)
            .await
            .map_err(|e| err(format!("{program} {}: {e:#}", args.join(" "))))?;
        if !output.status.success() {
            return Err(err(format!(
                "{program} {} exited with {}: {}",
                args.join(" "),
                output.status.code().unwrap_or(-1),
                stderr_text(&output)
            )));
        }
        Ok(output)
    }
}

impl Default for LinuxHost<TokioCommandRunner> {
    fn default() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}
