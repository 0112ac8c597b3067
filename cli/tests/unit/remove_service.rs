//! Remove use-case against the in-memory host.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use promctl_cli::application::services::remove::{RemoveOptions, remove};
use promctl_cli::application::services::status::status;
use promctl_cli::domain::{ServiceState, Settings};

use crate::fakes::{FakeHost, RecordingReporter, installed_host};

const KEEP_PRINCIPALS: RemoveOptions = RemoveOptions {
    delete_principals: false,
};

#[tokio::test]
async fn test_remove_running_service_reaches_absent() {
    let settings = Settings::default();
    let host = installed_host(&settings).await;

    let summary = remove(&host, &settings, KEEP_PRINCIPALS, &RecordingReporter::default())
        .await
        .expect("remove");

    assert!(summary.stopped && summary.disabled);
    assert!(summary.files_removed && summary.unit_removed);
    let view = status(&host, &settings).await.expect("status");
    assert_eq!(view.state, ServiceState::Absent);

    let st = host.state.borrow();
    assert!(!st.dirs.contains(&PathBuf::from("/etc/prometheus")));
    assert!(!st.dirs.contains(&PathBuf::from("/var/lib/prometheus")));
    assert!(!st.files.contains_key(&PathBuf::from("/usr/local/bin/prometheus")));
    // Principals stay by default.
    assert!(st.users.contains_key("prometheus"));
    assert!(st.groups.contains("prometheus"));
}

#[tokio::test]
async fn test_remove_stops_before_deleting_files() {
    let settings = Settings::default();
    let host = installed_host(&settings).await;

    remove(&host, &settings, KEEP_PRINCIPALS, &RecordingReporter::default())
        .await
        .expect("remove");

    let stop = host.call_index("stop");
    let disable = host.call_index("disable");
    let files = host.call_index("remove /usr/local/bin/prometheus");
    let unit = host.call_index("remove /etc/systemd/system/prometheus.service");
    let reload = host.call_index("daemon_reload");
    assert!(stop < files && disable < files);
    assert!(files < unit && unit < reload);
}

#[tokio::test]
async fn test_remove_twice_second_is_noop() {
    let settings = Settings::default();
    let host = installed_host(&settings).await;
    remove(&host, &settings, KEEP_PRINCIPALS, &RecordingReporter::default())
        .await
        .expect("first remove");
    host.clear_calls();

    let summary = remove(&host, &settings, KEEP_PRINCIPALS, &RecordingReporter::default())
        .await
        .expect("second remove");

    assert!(summary.is_noop(), "unexpected changes: {summary:?}");
    assert!(host.calls().is_empty(), "calls: {:?}", host.calls());
}

#[tokio::test]
async fn test_remove_on_fresh_host_is_noop() {
    let settings = Settings::default();
    let host = FakeHost::new(&settings);
    let reporter = RecordingReporter::default();

    let summary = remove(&host, &settings, KEEP_PRINCIPALS, &reporter)
        .await
        .expect("remove");

    assert!(summary.is_noop());
    assert_eq!(
        reporter.successes.borrow().as_slice(),
        ["prometheus is not installed"]
    );
}

#[tokio::test]
async fn test_remove_after_partial_manual_cleanup_converges() {
    let settings = Settings::default();
    let host = installed_host(&settings).await;
    // Operator already deleted the data dir and a binary by hand.
    host.state.borrow_mut().dirs.remove(&PathBuf::from("/var/lib/prometheus"));
    host.state
        .borrow_mut()
        .files
        .remove(&PathBuf::from("/usr/local/bin/promtool"));

    remove(&host, &settings, KEEP_PRINCIPALS, &RecordingReporter::default())
        .await
        .expect("remove");

    let view = status(&host, &settings).await.expect("status");
    assert_eq!(view.state, ServiceState::Absent);
}

#[tokio::test]
async fn test_remove_with_unit_file_only_skips_supervisor_stop() {
    let settings = Settings::default();
    let host = FakeHost::new(&settings);
    host.put_file(settings.unit_path(), "[Unit]\n");

    let summary = remove(&host, &settings, KEEP_PRINCIPALS, &RecordingReporter::default())
        .await
        .expect("remove");

    assert!(!summary.stopped && !summary.disabled);
    assert!(summary.unit_removed);
    assert!(!host.called("stop"));
    assert!(host.called("daemon_reload"));
}

#[tokio::test]
async fn test_remove_can_delete_principals_user_first() {
    let settings = Settings::default();
    let host = installed_host(&settings).await;
    let options = RemoveOptions {
        delete_principals: true,
    };

    let summary = remove(&host, &settings, options, &RecordingReporter::default())
        .await
        .expect("remove");

    assert!(summary.deleted_user && summary.deleted_group);
    assert!(host.call_index("delete_user") < host.call_index("delete_group"));
    assert!(host.call_index("daemon_reload") < host.call_index("delete_user"));
    let st = host.state.borrow();
    assert!(st.users.is_empty() && st.groups.is_empty());
    drop(st);

    host.clear_calls();
    let again = remove(&host, &settings, options, &RecordingReporter::default())
        .await
        .expect("second remove");
    assert!(again.is_noop());
}

#[tokio::test]
async fn test_remove_deletes_binary_named_after_service() {
    let mut settings = Settings::default();
    settings.service.name = "prom2".to_string();
    let host = installed_host(&settings).await;

    remove(&host, &settings, KEEP_PRINCIPALS, &RecordingReporter::default())
        .await
        .expect("remove");

    let st = host.state.borrow();
    assert!(!st.files.contains_key(&PathBuf::from("/usr/local/bin/prom2")));
    assert!(!st.files.contains_key(&PathBuf::from("/usr/local/bin/promtool")));
}
