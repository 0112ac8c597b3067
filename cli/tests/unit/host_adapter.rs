//! `LinuxHost` argument construction and exit-code mapping.
//!
//! A scripted `CommandRunner` records every `(program, args)` call and
//! answers with canned output, so no real process is spawned.

#![allow(clippy::expect_used)]

use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, bail};
use promctl_cli::application::ports::{
    CommandRunner, HostFs, IdentityStore, PrerequisiteProbe, ProcessSupervisor,
};
use promctl_cli::domain::{Owner, PrincipalKind, ProvisionError};
use promctl_cli::infra::LinuxHost;

type Responder = dyn Fn(&str, &[&str]) -> Result<Output> + Send + Sync;

#[derive(Clone)]
struct ScriptedRunner {
    calls: Arc<Mutex<Vec<String>>>,
    respond: Arc<Responder>,
}

impl ScriptedRunner {
    fn new(respond: impl Fn(&str, &[&str]) -> Result<Output> + Send + Sync + 'static) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            respond: Arc::new(respond),
        }
    }

    fn ok() -> Self {
        Self::new(|_, _| Ok(output(0, b"", b"")))
    }

    fn recorded(&self) -> Vec<String> {
        self.calls.lock().expect("mutex poisoned").clone()
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.calls
            .lock()
            .expect("mutex poisoned")
            .push(format!("{program} {}", args.join(" ")));
        (self.respond)(program, args)
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Output> {
        self.run(program, args).await
    }
}

fn output(code: i32, stdout: &[u8], stderr: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(code << 8),
        stdout: stdout.to_vec(),
        stderr: stderr.to_vec(),
    }
}

fn host(runner: &ScriptedRunner) -> LinuxHost<ScriptedRunner> {
    LinuxHost::new(runner.clone())
}

// ── Identity ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_principal_exists_maps_getent_exit_codes() {
    let runner = ScriptedRunner::new(|_, args| {
        Ok(match args {
            ["group", "prometheus"] => output(0, b"prometheus:x:998:\n", b""),
            ["passwd", "prometheus"] => output(2, b"", b""),
            _ => output(1, b"", b"unknown database"),
        })
    });
    let h = host(&runner);

    assert!(h.principal_exists("prometheus", PrincipalKind::Group).await.expect("probe"));
    assert!(!h.principal_exists("prometheus", PrincipalKind::User).await.expect("probe"));

    let err = h
        .principal_exists("other", PrincipalKind::Group)
        .await
        .expect_err("exit 1 is a probe failure");
    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::Identity(_))
    ));
    assert_eq!(
        runner.recorded(),
        vec!["getent group prometheus", "getent passwd prometheus", "getent group other"]
    );
}

#[tokio::test]
async fn test_probe_unavailable_is_identity_error() {
    let runner = ScriptedRunner::new(|_, _| bail!("No such file or directory"));
    let err = host(&runner)
        .principal_exists("prometheus", PrincipalKind::User)
        .await
        .expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::Identity(_))
    ));
}

#[tokio::test]
async fn test_create_principals_use_system_accounts() {
    let runner = ScriptedRunner::ok();
    let h = host(&runner);
    h.create_group("prometheus").await.expect("group");
    h.create_user("prometheus", "prometheus").await.expect("user");
    assert_eq!(
        runner.recorded(),
        vec![
            "groupadd --system prometheus",
            "useradd --system --no-create-home --shell /sbin/nologin --gid prometheus prometheus",
        ]
    );
}

#[tokio::test]
async fn test_create_user_failure_carries_stderr() {
    let runner =
        ScriptedRunner::new(|_, _| Ok(output(6, b"", b"useradd: group 'nope' does not exist")));
    let err = host(&runner)
        .create_user("prometheus", "nope")
        .await
        .expect_err("must fail");
    let msg = err.to_string();
    assert!(msg.contains("group 'nope' does not exist"), "got: {msg}");
    assert!(msg.contains("exited with 6"), "got: {msg}");
}

#[tokio::test]
async fn test_checked_command_maps_spawn_failure_and_exit_status_to_same_kind() {
    let runner = ScriptedRunner::new(|program, _| match program {
        "groupadd" => bail!("No such file or directory"),
        _ => Ok(output(9, b"", b"userdel: user prometheus is currently used by process 812")),
    });
    let h = host(&runner);

    let spawn = h.create_group("prometheus").await.expect_err("spawn fails");
    assert!(matches!(
        spawn.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::Identity(_))
    ));
    assert!(spawn.to_string().contains("groupadd --system prometheus"));

    let exit = h.delete_user("prometheus").await.expect_err("non-zero exit");
    assert!(matches!(
        exit.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::Identity(_))
    ));
    let msg = exit.to_string();
    assert!(msg.contains("exited with 9"), "got: {msg}");
    assert!(msg.contains("currently used by process"), "got: {msg}");
}

// ── Supervisor ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_lifecycle_verbs_map_to_systemctl() {
    let runner = ScriptedRunner::ok();
    let h = host(&runner);
    h.daemon_reload().await.expect("reload");
    h.enable("prometheus.service").await.expect("enable");
    h.start("prometheus.service").await.expect("start");
    h.restart("prometheus.service").await.expect("restart");
    h.stop("prometheus.service").await.expect("stop");
    h.disable("prometheus.service").await.expect("disable");
    assert_eq!(
        runner.recorded(),
        vec![
            "systemctl daemon-reload",
            "systemctl enable prometheus.service",
            "systemctl start prometheus.service",
            "systemctl restart prometheus.service",
            "systemctl stop prometheus.service",
            "systemctl disable prometheus.service",
        ]
    );
}

#[tokio::test]
async fn test_query_status_parses_show_output() {
    let runner = ScriptedRunner::new(|_, _| {
        Ok(output(
            0,
            b"LoadState=loaded\nActiveState=active\nSubState=running\nUnitFileState=enabled\nMainPID=812\n",
            b"",
        ))
    });
    let report = host(&runner)
        .query_status("prometheus.service")
        .await
        .expect("status");
    assert!(report.is_loaded() && report.is_active() && report.is_enabled());
    assert_eq!(report.main_pid, Some(812));
    assert_eq!(
        runner.recorded(),
        vec![
            "systemctl show --property LoadState,ActiveState,SubState,UnitFileState,MainPID,NeedDaemonReload prometheus.service"
        ]
    );
}

#[tokio::test]
async fn test_failed_restart_is_supervisor_error() {
    let runner = ScriptedRunner::new(|_, _| {
        Ok(output(
            1,
            b"",
            b"Job for prometheus.service failed because the control process exited with error code.",
        ))
    });
    let err = host(&runner)
        .restart("prometheus.service")
        .await
        .expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::Supervisor(_))
    ));
    assert!(err.to_string().contains("control process exited"));
}

// ── Filesystem ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_ownership_runs_recursive_chown() {
    let runner = ScriptedRunner::ok();
    let owner = Owner {
        user: "prometheus".to_string(),
        group: "prometheus".to_string(),
    };
    host(&runner)
        .set_ownership(
            &[PathBuf::from("/etc/prometheus"), PathBuf::from("/var/lib/prometheus")],
            &owner,
        )
        .await
        .expect("chown");
    assert_eq!(
        runner.recorded(),
        vec!["chown -R prometheus:prometheus /etc/prometheus /var/lib/prometheus"]
    );
}

#[tokio::test]
async fn test_set_ownership_with_no_paths_runs_nothing() {
    let runner = ScriptedRunner::ok();
    let owner = Owner {
        user: "u".to_string(),
        group: "g".to_string(),
    };
    host(&runner).set_ownership(&[], &owner).await.expect("noop");
    assert!(runner.recorded().is_empty());
}

// ── Prerequisites ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_effective_uid_parses_id_output() {
    let runner = ScriptedRunner::new(|_, _| Ok(output(0, b"0\n", b"")));
    assert_eq!(host(&runner).effective_uid().await.expect("uid"), 0);
    assert_eq!(runner.recorded(), vec!["id -u"]);
}

#[tokio::test]
async fn test_effective_uid_rejects_garbage() {
    let runner = ScriptedRunner::new(|_, _| Ok(output(0, b"root\n", b"")));
    let err = host(&runner).effective_uid().await.expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::PrerequisiteMissing(_))
    ));
}
