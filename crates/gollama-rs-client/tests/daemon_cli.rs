#![cfg(unix)]

use gollama_rs_client::{DaemonControl, DaemonError, DaemonStatus, OllamaDaemon};
use pretty_assertions::assert_eq;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::tempdir;

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-ollama");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut perms = fs::metadata(&path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod");
    path
}

const FAKE_DAEMON: &str = r#"
log="$(dirname "$0")/calls.log"
echo "$@" >> "$log"
case "$1" in
  ps) exit 0 ;;
  list)
    echo "NAME            ID              SIZE      MODIFIED"
    echo "llama3.2:3b     a80c4f17acd5    2.0 GB    2 days ago"
    echo "mistral:7b      f974a74358d6    4.1 GB    3 weeks ago"
    ;;
  pull)
    if [ "$2" = "broken" ]; then
      echo "pull failed" >&2
      exit 3
    fi
    echo "pulling $2"
    ;;
  *) exit 1 ;;
esac
"#;

#[tokio::test]
async fn lists_installed_models() {
    let temp = tempdir().expect("tempdir");
    let script = write_script(temp.path(), FAKE_DAEMON);
    let daemon = OllamaDaemon::new().with_binary(script.display().to_string());

    let models = daemon.list_models().await.expect("list");
    assert_eq!(models, vec!["llama3.2:3b", "mistral:7b"]);
}

#[tokio::test]
async fn pull_reports_failure_per_model() {
    let temp = tempdir().expect("tempdir");
    let script = write_script(temp.path(), FAKE_DAEMON);
    let daemon = OllamaDaemon::new().with_binary(script.display().to_string());

    daemon.pull_model("llama3.2:3b").await.expect("pull ok");
    let err = daemon.pull_model("broken").await.unwrap_err();
    match err {
        DaemonError::CommandFailed { command, detail } => {
            assert!(command.ends_with("pull broken"), "{command}");
            assert_eq!(detail, "exit status 3");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let calls = fs::read_to_string(temp.path().join("calls.log")).expect("log");
    assert_eq!(calls.lines().collect::<Vec<_>>(), vec!["pull llama3.2:3b", "pull broken"]);
}

#[tokio::test]
async fn running_daemon_is_not_restarted() {
    let temp = tempdir().expect("tempdir");
    let script = write_script(temp.path(), FAKE_DAEMON);
    let daemon = OllamaDaemon::new().with_binary(script.display().to_string());

    let status = daemon.ensure_running().await.expect("running");
    assert_eq!(status, DaemonStatus::AlreadyRunning);
    let calls = fs::read_to_string(temp.path().join("calls.log")).expect("log");
    assert_eq!(calls.trim(), "ps");
}

#[tokio::test]
async fn daemon_that_never_answers_is_not_running() {
    let temp = tempdir().expect("tempdir");
    let script = write_script(
        temp.path(),
        r#"echo "$@" >> "$(dirname "$0")/calls.log"; [ "$1" = "serve" ] && exit 0; exit 1"#,
    );
    let daemon = OllamaDaemon::new()
        .with_binary(script.display().to_string())
        .with_startup_grace(Duration::from_millis(200));

    let err = daemon.ensure_running().await.unwrap_err();
    assert!(matches!(err, DaemonError::NotRunning(_)));
    let calls = fs::read_to_string(temp.path().join("calls.log")).expect("log");
    assert!(calls.lines().any(|line| line == "serve"), "{calls}");
}

#[tokio::test]
async fn failing_list_is_a_command_failure() {
    let temp = tempdir().expect("tempdir");
    let script = write_script(temp.path(), r#"echo "daemon offline" >&2; exit 1"#);
    let daemon = OllamaDaemon::new().with_binary(script.display().to_string());

    let err = daemon.list_models().await.unwrap_err();
    match err {
        DaemonError::CommandFailed { detail, .. } => assert_eq!(detail, "daemon offline"),
        other => panic!("unexpected error: {other:?}"),
    }
}
