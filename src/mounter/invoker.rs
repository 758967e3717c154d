//! External command invocation

use std::process::Command;

use crate::observability::Logger;

use super::errors::{MountError, MountResult};

/// Runs an external executable and captures its stdout.
///
/// The mount client only ever shells out through this seam, so tests
/// can substitute a scripted implementation.
pub trait Invoker {
    fn invoke(&self, executable: &str, args: &[String]) -> MountResult<String>;
}

/// OS-backed invoker using `std::process::Command`.
///
/// There is deliberately no timeout: a hung external tool blocks the
/// calling lifecycle operation (and, through the controller's lock,
/// every other one).
#[derive(Debug, Default)]
pub struct CommandInvoker;

impl Invoker for CommandInvoker {
    fn invoke(&self, executable: &str, args: &[String]) -> MountResult<String> {
        Logger::debug(
            "INVOKE",
            &[("executable", executable), ("args", &args.join(" "))],
        );

        let output = Command::new(executable)
            .args(args)
            .output()
            .map_err(|e| MountError::InvokeFailed {
                executable: executable.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MountError::InvokeFailed {
                executable: executable.to_string(),
                reason: format!("{} ({})", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
