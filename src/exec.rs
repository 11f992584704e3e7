//! Hand-off of the chosen command to the system shell.

use anyhow::{Context, Result};
use std::process::{Command, ExitStatus};

/// Shell used when none is configured.
pub fn default_shell() -> &'static str {
    if cfg!(windows) {
        "bash.exe"
    } else {
        "sh"
    }
}

/// Build `<shell> -c <command>` with the launcher's stdio inherited.
pub fn shell_command(shell: Option<&str>, command: &str) -> Command {
    let mut c = Command::new(shell.unwrap_or(default_shell()));
    c.arg("-c").arg(command);
    c
}

/// Run `command` and wait for it. Blank commands are skipped and return `None`.
pub fn run_shell(shell: Option<&str>, command: &str) -> Result<Option<ExitStatus>> {
    if command.trim().is_empty() {
        tracing::debug!("empty command; nothing to run");
        return Ok(None);
    }
    let shell_name = shell.unwrap_or(default_shell());
    tracing::info!(shell = shell_name, command, "running command");
    let status = shell_command(shell, command)
        .status()
        .with_context(|| format!("failed to start {shell_name}"))?;
    tracing::info!(code = ?status.code(), "command finished");
    Ok(Some(status))
}

/// Exit code to report for a finished child; signals map to 1.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
