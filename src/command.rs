use anyhow::{Context, Result};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, error, info, warn};

/// Bus interface exposing the rfkill switch
pub const RFKILL_INTERFACE: &str = "org.blueman.Mechanism";

/// Process-invocation seam. Implementations must return without waiting for
/// the command to finish.
pub trait CommandRunner: Send + Sync {
    fn execute(&self, command_line: &str);
}

/// A `SetRfkillState` method call on the system bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfkillCall {
    pub destination: String,
    pub path: String,
    pub enabled: bool,
}

impl RfkillCall {
    /// Renders the call as a `dbus-send` invocation
    pub fn command_line(&self) -> String {
        format!(
            "dbus-send --system --print-reply --dest={} {} {}.SetRfkillState boolean:{}",
            self.destination, self.path, RFKILL_INTERFACE, self.enabled
        )
    }
}

/// Runs command lines through `sh -c` and reaps them in a detached task
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn execute(&self, command_line: &str) {
        if tokio::runtime::Handle::try_current().is_err() {
            error!("Cannot run '{}': no async runtime", command_line);
            return;
        }

        let child = match spawn_shell(command_line) {
            Ok(child) => child,
            Err(e) => {
                error!("{:#}", e);
                return;
            }
        };

        let command_line = command_line.to_string();
        tokio::spawn(reap(child, command_line));
    }
}

fn spawn_shell(command_line: &str) -> Result<Child> {
    info!("Executing command: {}", command_line);

    Command::new("sh")
        .arg("-c")
        .arg(command_line)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(false)
        .spawn()
        .with_context(|| format!("Failed to spawn '{}'", command_line))
}

async fn reap(mut child: Child, command_line: String) {
    let stdout_task = child
        .stdout
        .take()
        .map(|out| tokio::spawn(log_lines(out, "STDOUT", command_line.clone())));
    let stderr_task = child
        .stderr
        .take()
        .map(|err| tokio::spawn(log_lines(err, "STDERR", command_line.clone())));

    match child.wait().await {
        Ok(status) => {
            if let Some(task) = stdout_task {
                let _ = task.await;
            }
            if let Some(task) = stderr_task {
                let _ = task.await;
            }

            if status.success() {
                debug!("Command finished: {}", command_line);
            } else {
                warn!(
                    "Command exited with non-zero status: {} (exit code: {})",
                    command_line,
                    status.code().unwrap_or(-1)
                );
            }
        }
        Err(e) => {
            error!("Failed to wait for command: {} - {}", command_line, e);
        }
    }
}

async fn log_lines<R: AsyncRead + Unpin>(reader: R, stream: &'static str, command_line: String) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        debug!("{} [{}]: {}", stream, command_line, line);
    }
}
