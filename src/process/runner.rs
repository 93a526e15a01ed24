// unity-release: Unity SDK Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and output streaming.
//!
//! ```text
//! run()
//!   build_command()   args, cwd, env, stdio
//!   spawn()
//!   reader task per piped stream --> JoinHandle<Vec<String>>
//!   wait (or kill after timeout)
//!   validate exit code (skip if ALLOW_FAILURE)
//!   --> ProcessOutput
//! ```

use std::fmt::Write as _;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};
use crate::error::{ProcessError, Result};

impl ProcessBuilder {
    /// Name used in log fields and errors.
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Full command line, quoted where needed, for logging.
    pub(crate) fn command_line(&self) -> String {
        let mut cmd = self.program().display().to_string();
        for arg in self.args_slice() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns the process and waits for it to finish.
    ///
    /// # Errors
    ///
    /// - `ProcessError::SpawnFailed` if the process cannot be started.
    /// - `ProcessError::Timeout` if a timeout was set and exceeded.
    /// - `ProcessError::NonZeroExit` if the exit code is not a success code
    ///   and `ALLOW_FAILURE` is not set.
    pub async fn run(self) -> Result<ProcessOutput> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut child = self
            .build_command()
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: cmd_line.clone(),
                source,
            })?;
        trace!(process = %name, pid = ?child.id(), "spawned");

        let stdout = child
            .stdout
            .take()
            .map(|s| self.spawn_reader(s, self.stdout_config(), &name, "stdout"));
        let stderr = child
            .stderr
            .take()
            .map(|s| self.spawn_reader(s, self.stderr_config(), &name, "stderr"));

        let status = match self.timeout_duration() {
            Some(limit) => {
                if let Ok(status) = tokio::time::timeout(limit, child.wait()).await {
                    status?
                } else {
                    warn!(process = %name, timeout = ?limit, "process timed out");
                    child.kill().await?;
                    return Err(ProcessError::Timeout {
                        command: cmd_line,
                        timeout_secs: limit.as_secs(),
                    }
                    .into());
                }
            }
            None => child.wait().await?,
        };

        let stdout = join_lines(stdout).await;
        let stderr = join_lines(stderr).await;
        let exit_code = status.code().unwrap_or(-1);

        let failed = !self.success_code_set().contains(&exit_code);
        if failed && self.process_flags().contains(ProcessFlags::IGNORE_OUTPUT_ON_SUCCESS) {
            for line in stdout.iter().chain(&stderr) {
                error!(process = %name, "{line}");
            }
        }

        if failed && !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE) {
            return Err(ProcessError::NonZeroExit {
                command: cmd_line,
                code: exit_code,
            }
            .into());
        }

        trace!(process = %name, exit_code, "completed");
        Ok(ProcessOutput::new(
            exit_code,
            kept(stdout, self.stdout_config()),
            kept(stderr, self.stderr_config()),
        ))
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }
        command.envs(self.env_vars());

        command.stdin(Stdio::null());
        command.stdout(stdio_from_flags(self.stdout_config()));
        command.stderr(stdio_from_flags(self.stderr_config()));
        command.kill_on_drop(true);

        command
    }

    /// Whether lines must be collected from a stream, not just logged.
    fn collects(&self, flags: StreamFlags) -> bool {
        flags.contains(StreamFlags::KEEP_IN_STRING)
            || self
                .process_flags()
                .contains(ProcessFlags::IGNORE_OUTPUT_ON_SUCCESS)
    }

    fn spawn_reader<R>(
        &self,
        reader: R,
        flags: StreamFlags,
        process: &str,
        stream: &'static str,
    ) -> JoinHandle<Vec<String>>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let collect = self.collects(flags);
        let forward = flags.contains(StreamFlags::FORWARD_TO_LOG)
            && !self
                .process_flags()
                .contains(ProcessFlags::IGNORE_OUTPUT_ON_SUCCESS);
        let process = process.to_string();

        tokio::spawn(async move {
            let mut kept = Vec::new();
            let mut lines = BufReader::new(reader).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if forward {
                            debug!(process = %process, stream, "{line}");
                        }
                        if collect {
                            kept.push(line);
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!(process = %process, stream, error = %e, "error reading stream");
                        break;
                    }
                }
            }
            kept
        })
    }
}

fn kept(lines: Vec<String>, flags: StreamFlags) -> String {
    if flags.contains(StreamFlags::KEEP_IN_STRING) {
        lines.join("\n")
    } else {
        String::new()
    }
}

async fn join_lines(handle: Option<JoinHandle<Vec<String>>>) -> Vec<String> {
    match handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => Vec::new(),
    }
}

fn stdio_from_flags(flags: StreamFlags) -> Stdio {
    if flags.contains(StreamFlags::INHERIT) {
        Stdio::inherit()
    } else if flags.contains(StreamFlags::BIT_BUCKET) {
        Stdio::null()
    } else {
        Stdio::piped()
    }
}
