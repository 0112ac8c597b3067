//! Status use-case against the in-memory host.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use promctl_cli::application::services::status::status;
use promctl_cli::domain::{ServiceState, Settings};

use crate::fakes::{FakeHost, installed_host};

#[tokio::test]
async fn test_status_fresh_host_is_absent() {
    let settings = Settings::default();
    let host = FakeHost::new(&settings);
    let view = status(&host, &settings).await.expect("status");
    assert_eq!(view.state, ServiceState::Absent);
    assert_eq!(view.supervisor.load_state, "not-found");
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_status_after_install_is_running_with_pid() {
    let settings = Settings::default();
    let host = installed_host(&settings).await;
    let view = status(&host, &settings).await.expect("status");
    assert_eq!(view.state, ServiceState::Running);
    assert!(view.artifacts.all());
    assert_eq!(view.supervisor.main_pid, Some(4242));
}

#[tokio::test]
async fn test_status_reports_stopped_and_configured() {
    let settings = Settings::default();
    let host = installed_host(&settings).await;

    host.state.borrow_mut().active = false;
    assert_eq!(
        status(&host, &settings).await.expect("status").state,
        ServiceState::Stopped
    );

    host.state.borrow_mut().enabled = false;
    assert_eq!(
        status(&host, &settings).await.expect("status").state,
        ServiceState::Configured
    );
}

#[tokio::test]
async fn test_status_partial_install_is_provisioned() {
    let settings = Settings::default();
    let host = FakeHost::new(&settings);
    host.put_file("/usr/local/bin/prometheus", "ELF");
    let view = status(&host, &settings).await.expect("status");
    assert_eq!(view.state, ServiceState::Provisioned);
    assert!(view.artifacts.binary && !view.artifacts.config);
    assert!(!host.state.borrow().dirs.contains(&PathBuf::from("/etc/prometheus")));
}
