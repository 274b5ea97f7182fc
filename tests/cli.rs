//! Process-level tests for the `ws-stdio` binary: exit codes and streams.

mod common;

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

fn ws_stdio() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ws-stdio"));
    command
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    command
}

#[tokio::test]
async fn malformed_headers_exit_nonzero_without_connecting() {
    let (listener, url) = common::bind().await;

    let output = ws_stdio()
        .args([url.as_str(), "--headers", "{bad json"])
        .stdin(Stdio::null())
        .output()
        .await
        .expect("run binary");

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error parsing headers JSON"), "stderr: {stderr}");

    let accepted =
        tokio::time::timeout(std::time::Duration::from_millis(50), listener.accept()).await;
    assert!(accepted.is_err(), "no connection attempt expected");
}

#[tokio::test]
async fn unreachable_address_exits_nonzero() {
    let url = common::unreachable_url().await;

    let output = ws_stdio()
        .arg(&url)
        .stdin(Stdio::null())
        .output()
        .await
        .expect("run binary");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.starts_with("Error: WebSocket connection error"),
        "stderr: {stderr}"
    );
}

#[tokio::test]
async fn non_websocket_scheme_is_config_error() {
    let output = ws_stdio()
        .arg("http://127.0.0.1:1/")
        .stdin(Stdio::null())
        .output()
        .await
        .expect("run binary");

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn closed_stdin_exits_zero_with_no_output() {
    let url = common::echo_server().await;

    let output = ws_stdio()
        .arg(&url)
        .stdin(Stdio::null())
        .output()
        .await
        .expect("run binary");

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn drain_echoes_piped_lines() {
    let url = common::echo_server().await;

    let mut child = ws_stdio()
        .args([url.as_str(), "--drain"])
        .stdin(Stdio::piped())
        .spawn()
        .expect("spawn binary");

    let mut stdin = child.stdin.take().expect("stdin");
    stdin.write_all(b"ping\n\npong\n").await.expect("write");
    drop(stdin);

    let output = child.wait_with_output().await.expect("wait");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "ping\npong\n");
}

#[tokio::test]
async fn log_file_written_by_binary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("messages.log");
    let url = common::echo_server().await;

    let mut child = ws_stdio()
        .arg(&url)
        .arg("--drain")
        .arg("-d")
        .arg(&path)
        .stdin(Stdio::piped())
        .spawn()
        .expect("spawn binary");

    let mut stdin = child.stdin.take().expect("stdin");
    stdin.write_all(b"hello\n").await.expect("write");
    drop(stdin);

    let output = child.wait_with_output().await.expect("wait");
    assert_eq!(output.status.code(), Some(0));

    let log = std::fs::read_to_string(&path).expect("read log");
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Server started at "));
    assert_eq!(&lines[1..], &["> hello", "< hello"]);
}
