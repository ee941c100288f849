use std::process::Stdio;

use tokio::process::Command;

use clipforge::application::ports::RenderError;
use clipforge::domain::JobId;
use clipforge::infrastructure::render::{log_lines, spawn_relays, RelayedLine, StreamKind};

fn shell(script: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(script)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

async fn collect_lines(script: &str) -> Vec<RelayedLine> {
    let mut child = shell(script).spawn().unwrap();
    let mut rx = spawn_relays(&mut child).unwrap();

    let mut lines = Vec::new();
    while let Some(line) = rx.recv().await {
        lines.push(line);
    }
    child.wait().await.unwrap();
    lines
}

#[tokio::test]
async fn given_child_stdout_when_relayed_then_lines_arrive_in_emission_order() {
    let lines = collect_lines("printf 'one\\ntwo\\nthree\\n'").await;

    let stdout: Vec<&str> = lines
        .iter()
        .filter(|l| l.stream == StreamKind::Stdout)
        .map(|l| l.line.as_str())
        .collect();
    assert_eq!(stdout, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn given_child_writing_both_streams_then_each_line_is_tagged_by_stream() {
    let lines =
        collect_lines("printf 'out-a\\nout-b\\n'; printf 'err-a\\nerr-b\\n' >&2").await;

    let stdout: Vec<&str> = lines
        .iter()
        .filter(|l| l.stream == StreamKind::Stdout)
        .map(|l| l.line.as_str())
        .collect();
    let stderr: Vec<&str> = lines
        .iter()
        .filter(|l| l.stream == StreamKind::Stderr)
        .map(|l| l.line.as_str())
        .collect();

    assert_eq!(stdout, vec!["out-a", "out-b"]);
    assert_eq!(stderr, vec!["err-a", "err-b"]);
}

#[tokio::test]
async fn given_silent_child_when_relayed_then_channel_closes_cleanly() {
    let lines = collect_lines("exit 0").await;
    assert!(lines.is_empty());
}

#[tokio::test]
async fn given_failing_child_when_relayed_then_stderr_still_drained() {
    let mut child = shell("printf 'boom\\n' >&2; exit 3").spawn().unwrap();
    let mut rx = spawn_relays(&mut child).unwrap();

    let mut stderr = Vec::new();
    while let Some(line) = rx.recv().await {
        if line.stream == StreamKind::Stderr {
            stderr.push(line.line);
        }
    }
    let status = child.wait().await.unwrap();

    assert_eq!(stderr, vec!["boom"]);
    assert_eq!(status.code(), Some(3));
}

#[tokio::test]
async fn given_unpiped_stream_when_spawning_relays_then_reports_which_stream() {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg("exit 0")
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    match spawn_relays(&mut child) {
        Err(RenderError::StreamUnavailable(stream)) => assert_eq!(stream, "stdout"),
        other => panic!("expected StreamUnavailable, got {:?}", other.map(|_| ())),
    }
    child.wait().await.unwrap();
}

#[tokio::test]
async fn given_closed_channel_when_consuming_then_log_consumer_terminates() {
    let (tx, rx) = tokio::sync::mpsc::channel::<RelayedLine>(8);
    drop(tx);

    // Must return rather than wait forever once all senders are gone.
    log_lines(JobId::new(), rx).await;
}
