// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Interpreter process execution.
//!
//! `ProcessRunner` spawns the interpreter with the wrapper program passed
//! inline, writes the request to its stdin, and drains stdout and stderr on
//! separate tasks so a child blocked on one full pipe can never deadlock the
//! other. All three tasks are joined before the captured output is returned.

use crate::bridge::encoder::WrapperProgram;
use crate::errors::{BridgeError, BridgeResult};
use crate::observability::messages::bridge::{InterpreterExited, InterpreterSpawned};
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStdin, Command};
use tokio::task::JoinHandle;

/// Everything the interpreter produced, read once by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedOutput {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Spawns one interpreter per call. Holds only configuration, never per-call state.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
    env: HashMap<String, String>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>, env: HashMap<String, String>) -> Self {
        Self { timeout, env }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run `command -c <program>` in `working_dir` and capture its output.
    ///
    /// `label` names the call in timeout errors and log lines.
    ///
    /// # Errors
    /// * `SpawnFailure` - the executable could not be started; no output exists
    /// * `Timeout` - the deadline elapsed; the child has been killed and reaped
    /// * `Io` - waiting on the child or reading a pipe failed
    pub async fn run(
        &self,
        command: &str,
        program: &WrapperProgram,
        working_dir: &Path,
        label: &str,
    ) -> BridgeResult<CapturedOutput> {
        let mut cmd = Command::new(command);
        cmd.arg("-c")
            .arg(program.source())
            .current_dir(working_dir)
            .env("PYTHONIOENCODING", "utf-8")
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let started = Instant::now();
        let mut child = cmd.spawn().map_err(|source| BridgeError::SpawnFailure {
            command: command.to_string(),
            source,
        })?;

        tracing::debug!(
            "{}",
            InterpreterSpawned {
                command,
                pid: child.id(),
                working_dir: &working_dir.display().to_string(),
            }
        );

        let stdin_task = child
            .stdin
            .take()
            .map(|stdin| tokio::spawn(feed(stdin, program.input().to_vec())));
        let stdout_task = child.stdout.take().map(|out| tokio::spawn(drain(out)));
        let stderr_task = child.stderr.take().map(|err| tokio::spawn(drain(err)));

        let collect = async {
            let status = child.wait().await?;
            if let Some(task) = stdin_task {
                join_task(task).await?;
            }
            let stdout = join_drain(stdout_task).await?;
            let stderr = join_drain(stderr_task).await?;
            Ok::<_, BridgeError>((status, stdout, stderr))
        };

        let outcome = match self.timeout {
            Some(limit) => {
                let timed = tokio::time::timeout(limit, collect).await;
                match timed {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        // Reap the child before reporting so no zombie is left behind.
                        if let Err(e) = child.kill().await {
                            tracing::warn!("failed to kill timed out interpreter: {}", e);
                        }
                        return Err(BridgeError::Timeout {
                            function_name: label.to_string(),
                            elapsed: started.elapsed(),
                        });
                    }
                }
            }
            None => collect.await,
        };

        let (status, stdout, stderr) = outcome?;
        let exit_code = status.code().unwrap_or(-1);

        tracing::debug!(
            "{}",
            InterpreterExited {
                command,
                exit_code,
                stdout_bytes: stdout.len(),
                stderr_bytes: stderr.len(),
                duration: started.elapsed(),
            }
        );

        Ok(CapturedOutput {
            exit_code,
            stdout,
            stderr,
        })
    }
}

async fn feed(mut stdin: ChildStdin, payload: Vec<u8>) -> std::io::Result<()> {
    match stdin.write_all(&payload).await {
        Ok(()) => {}
        // The child may exit without reading its input; that is its business.
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => return Ok(()),
        Err(e) => return Err(e),
    }
    match stdin.shutdown().await {
        Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
        _ => Ok(()),
    }
}

async fn drain<R: AsyncRead + Unpin>(mut stream: R) -> std::io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    stream.read_to_end(&mut buffer).await?;
    Ok(buffer)
}

async fn join_task<T>(task: JoinHandle<std::io::Result<T>>) -> BridgeResult<T> {
    task.await
        .map_err(|e| BridgeError::Io(std::io::Error::other(e)))?
        .map_err(BridgeError::Io)
}

async fn join_drain(task: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> BridgeResult<Vec<u8>> {
    match task {
        Some(task) => join_task(task).await,
        None => Ok(Vec::new()),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str, input: impl Into<Vec<u8>>) -> WrapperProgram {
        WrapperProgram::new(script, input)
    }

    fn tmp() -> std::path::PathBuf {
        std::env::temp_dir()
    }

    #[tokio::test]
    async fn test_captures_both_streams_and_exit_code() {
        let runner = ProcessRunner::default();
        let program = sh("echo out; echo err >&2; exit 3", "");

        let output = runner.run("sh", &program, &tmp(), "t").await.unwrap();

        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout_text(), "out\n");
        assert_eq!(output.stderr_text(), "err\n");
    }

    #[tokio::test]
    async fn test_feeds_stdin() {
        let runner = ProcessRunner::default();
        let program = sh("cat", "{\"hello\": \"world\"}");

        let output = runner.run("sh", &program, &tmp(), "t").await.unwrap();

        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout_text(), "{\"hello\": \"world\"}");
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::default();

        let output = runner
            .run("sh", &sh("pwd", ""), dir.path(), "t")
            .await
            .unwrap();

        let reported = std::fs::canonicalize(output.stdout_text().trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[tokio::test]
    async fn test_large_output_on_both_pipes_does_not_deadlock() {
        // Well past the usual 64 KiB pipe buffer on each stream.
        let script = "i=0; while [ $i -lt 4000 ]; do \
                      echo 'xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx'; \
                      echo 'yyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyy' >&2; \
                      i=$((i+1)); done";
        let runner = ProcessRunner::new(Some(Duration::from_secs(60)), HashMap::new());

        let output = runner.run("sh", &sh(script, ""), &tmp(), "t").await.unwrap();

        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout_text().lines().count(), 4000);
        assert_eq!(output.stderr_text().lines().count(), 4000);
    }

    #[tokio::test]
    async fn test_child_that_ignores_stdin() {
        let runner = ProcessRunner::default();
        let payload = "z".repeat(1 << 20);

        let output = runner
            .run("sh", &sh("exit 0", payload), &tmp(), "t")
            .await
            .unwrap();

        assert_eq!(output.exit_code, 0);
    }

    #[tokio::test]
    async fn test_env_is_passed() {
        let env = HashMap::from([("BRIDGE_TEST_VAR".to_string(), "42".to_string())]);
        let runner = ProcessRunner::new(None, env);

        let output = runner
            .run("sh", &sh("echo $BRIDGE_TEST_VAR $PYTHONIOENCODING", ""), &tmp(), "t")
            .await
            .unwrap();

        assert_eq!(output.stdout_text().trim(), "42 utf-8");
    }

    #[tokio::test]
    async fn test_missing_executable_is_spawn_failure() {
        let runner = ProcessRunner::default();

        let result = runner
            .run("definitely-not-an-interpreter-xyz", &sh("", ""), &tmp(), "t")
            .await;

        match result {
            Err(BridgeError::SpawnFailure { command, source }) => {
                assert_eq!(command, "definitely-not-an-interpreter-xyz");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("Expected SpawnFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let runner = ProcessRunner::new(Some(Duration::from_millis(200)), HashMap::new());
        let started = Instant::now();

        let result = runner
            .run("sh", &sh("sleep 30", ""), &tmp(), "sleepy")
            .await;

        assert!(started.elapsed() < Duration::from_secs(10));
        match result {
            Err(BridgeError::Timeout { function_name, .. }) => {
                assert_eq!(function_name, "sleepy");
            }
            other => panic!("Expected Timeout, got {:?}", other),
        }
    }
}
