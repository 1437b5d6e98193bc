//! Privileged command execution
//!
//! Narrow seam over process invocation so the toggle protocol and status
//! probe can be exercised against a recording fake in tests.

use super::WireGuardError;
use std::process::Command;

/// Runs an argv under elevated privilege, returning combined stdout+stderr.
///
/// A non-zero exit is always an error; the captured output rides along in
/// the error so the operator sees what the tool printed.
pub trait CommandRunner: Send + Sync {
    fn run(&self, argv: &[&str]) -> Result<Vec<u8>, WireGuardError>;
}

/// Default runner: `sudo <argv...>` via a synchronous child process.
///
/// No timeout is applied; `wg` and `wg-quick` terminate on their own and a
/// missing or denied binary fails the spawn immediately.
pub struct SudoRunner;

impl CommandRunner for SudoRunner {
    fn run(&self, argv: &[&str]) -> Result<Vec<u8>, WireGuardError> {
        let command = format!("sudo {}", argv.join(" "));
        let output = Command::new("sudo")
            .args(argv)
            .output()
            .map_err(|source| WireGuardError::Exec {
                command: command.clone(),
                source,
            })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        if !output.status.success() {
            return Err(WireGuardError::CommandFailed {
                command,
                status: output.status.to_string(),
                output: String::from_utf8_lossy(&combined).into_owned(),
            });
        }

        Ok(combined)
    }
}
