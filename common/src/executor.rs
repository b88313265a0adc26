use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::error::ExecutionError;

/// Exit status and merged stdout/stderr of a finished command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    /// None when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub output: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Human readable exit status ("exit code 1", "terminated by signal")
    pub fn status_text(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Handles executing commands on the local host
///
/// Stdout and stderr are read concurrently and merged into one buffer in
/// arrival order. With `echo` enabled every line is also printed as it
/// arrives so long upgrades show progress.
pub struct LocalExecutor {
    echo: bool,
}

impl LocalExecutor {
    pub fn new(echo: bool) -> Self {
        LocalExecutor { echo }
    }

    /// Execute a command and wait for it to exit
    ///
    /// A non-zero exit is not an error here; callers decide which exit
    /// codes are acceptable (e.g. `dnf check-update` exits 100 when updates
    /// are available).
    pub async fn execute_command(
        &self,
        cmd: &str,
        args: &[&str],
    ) -> Result<CommandOutput, ExecutionError> {
        debug!("Executing locally: {} {}", cmd, args.join(" "));

        let mut child = Command::new(cmd)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutionError::SpawnFailed {
                program: cmd.to_string(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let collected = match (stdout, stderr) {
            (Some(stdout), Some(stderr)) => self.collect(cmd, stdout, stderr).await,
            _ => Err(ExecutionError::MissingPipe {
                program: cmd.to_string(),
            }),
        };

        // Reap the child on every path, including a failed read.
        // The pipes are closed by now, so a still-writing child gets EPIPE.
        if collected.is_err() {
            let _ = child.start_kill();
        }
        let status = child
            .wait()
            .await
            .map_err(|source| ExecutionError::OutputFailed {
                program: cmd.to_string(),
                source,
            })?;

        let output = collected?;
        debug!("{} exited with {:?}", cmd, status.code());

        Ok(CommandOutput {
            exit_code: status.code(),
            output,
        })
    }

    async fn collect<O, E>(&self, cmd: &str, stdout: O, stderr: E) -> Result<String, ExecutionError>
    where
        O: AsyncRead + Unpin,
        E: AsyncRead + Unpin,
    {
        let mut out_lines = BufReader::new(stdout).split(b'\n');
        let mut err_lines = BufReader::new(stderr).split(b'\n');
        let mut out_done = false;
        let mut err_done = false;
        let mut merged = String::new();

        let read_err = |source| ExecutionError::OutputFailed {
            program: cmd.to_string(),
            source,
        };

        while !(out_done && err_done) {
            tokio::select! {
                segment = out_lines.next_segment(), if !out_done => {
                    match segment.map_err(read_err)? {
                        Some(bytes) => self.push_line(&mut merged, &bytes),
                        None => out_done = true,
                    }
                }
                segment = err_lines.next_segment(), if !err_done => {
                    match segment.map_err(read_err)? {
                        Some(bytes) => self.push_line(&mut merged, &bytes),
                        None => err_done = true,
                    }
                }
            }
        }

        Ok(merged)
    }

    fn push_line(&self, merged: &mut String, bytes: &[u8]) {
        let line = String::from_utf8_lossy(bytes);
        let line = line.trim_end_matches('\r');
        if self.echo {
            println!("{}", line);
        }
        merged.push_str(line);
        merged.push('\n');
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let executor = LocalExecutor::new(false);
        let result = executor
            .execute_command("sh", &["-c", "echo to-stdout; echo to-stderr 1>&2"])
            .await
            .unwrap();

        assert!(result.success());
        assert!(result.output.contains("to-stdout\n"));
        assert!(result.output.contains("to-stderr\n"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_not_an_error() {
        let executor = LocalExecutor::new(false);
        let result = executor
            .execute_command("sh", &["-c", "echo partial; exit 100"])
            .await
            .unwrap();

        assert!(!result.success());
        assert_eq!(result.exit_code, Some(100));
        assert_eq!(result.status_text(), "exit code 100");
        assert_eq!(result.output, "partial\n");
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_spawn() {
        let executor = LocalExecutor::new(false);
        let err = executor
            .execute_command("/nonexistent/offdroid-test-binary", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::SpawnFailed { .. }));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_lossy() {
        let executor = LocalExecutor::new(false);
        let result = executor
            .execute_command("sh", &["-c", "printf 'caf\\351\\n'"])
            .await
            .unwrap();

        assert!(result.output.starts_with("caf"));
        assert!(result.output.ends_with('\n'));
    }
}
