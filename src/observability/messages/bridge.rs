// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for cross-process invocation events.
//!
//! This module contains message types for logging events related to:
//! * Interpreter resolution and spawning
//! * Invocation lifecycle (start, completion, failure)
//! * Timeouts and interpreter fallback

use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Invocation started.
///
/// # Log Level
/// `debug!` - Per-call detail
///
/// # Example
/// ```
/// use pybridge::observability::messages::bridge::InvocationStarted;
///
/// let msg = InvocationStarted {
///     script_path: "/srv/scripts/math.py",
///     function_name: "add",
///     arg_count: 2,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct InvocationStarted<'a> {
    pub script_path: &'a str,
    pub function_name: &'a str,
    pub arg_count: usize,
}

impl Display for InvocationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invoking {}::{} with {} argument(s)",
            self.script_path, self.function_name, self.arg_count
        )
    }
}

/// Interpreter process spawned.
///
/// # Log Level
/// `debug!` - Per-call detail
pub struct InterpreterSpawned<'a> {
    pub command: &'a str,
    pub pid: Option<u32>,
    pub working_dir: &'a str,
}

impl Display for InterpreterSpawned<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.pid {
            Some(pid) => write!(
                f,
                "Spawned interpreter '{}' (pid {}) in {}",
                self.command, pid, self.working_dir
            ),
            None => write!(
                f,
                "Spawned interpreter '{}' in {}",
                self.command, self.working_dir
            ),
        }
    }
}

/// Interpreter candidate was not found; the next one will be tried.
///
/// # Log Level
/// `warn!` - Degraded but recoverable
///
/// # Example
/// ```
/// use pybridge::observability::messages::bridge::InterpreterFallback;
///
/// let msg = InterpreterFallback {
///     missing: "python3",
///     next: "python",
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct InterpreterFallback<'a> {
    pub missing: &'a str,
    pub next: &'a str,
}

impl Display for InterpreterFallback<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Interpreter '{}' not found, falling back to '{}'",
            self.missing, self.next
        )
    }
}

/// Interpreter process exited.
///
/// # Log Level
/// `debug!` - Per-call detail
pub struct InterpreterExited<'a> {
    pub command: &'a str,
    pub exit_code: i32,
    pub stdout_bytes: usize,
    pub stderr_bytes: usize,
    pub duration: Duration,
}

impl Display for InterpreterExited<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Interpreter '{}' exited with code {}: stdout={} bytes, stderr={} bytes, duration={:?}",
            self.command, self.exit_code, self.stdout_bytes, self.stderr_bytes, self.duration
        )
    }
}

/// Invocation exceeded its deadline and the interpreter was killed.
///
/// # Log Level
/// `warn!` - Call abandoned
pub struct InvocationTimedOut<'a> {
    pub function_name: &'a str,
    pub timeout: Duration,
}

impl Display for InvocationTimedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invocation of '{}' exceeded {:?}; interpreter killed",
            self.function_name, self.timeout
        )
    }
}

/// Invocation completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use pybridge::observability::messages::bridge::InvocationCompleted;
/// use std::time::Duration;
///
/// let msg = InvocationCompleted {
///     function_name: "add",
///     duration: Duration::from_millis(42),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct InvocationCompleted<'a> {
    pub function_name: &'a str,
    pub duration: Duration,
}

impl Display for InvocationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invocation of '{}' completed in {:?}",
            self.function_name, self.duration
        )
    }
}

/// Invocation failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use pybridge::errors::BridgeError;
/// use pybridge::observability::messages::bridge::InvocationFailed;
///
/// let error = BridgeError::InvalidRequest("function name must not be empty".into());
/// let msg = InvocationFailed {
///     function_name: "",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct InvocationFailed<'a> {
    pub function_name: &'a str,
    pub error: &'a crate::errors::BridgeError,
}

impl Display for InvocationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invocation of '{}' failed [{}]: {}",
            self.function_name,
            self.error.kind(),
            self.error
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawned_without_pid() {
        let msg = InterpreterSpawned {
            command: "python3",
            pid: None,
            working_dir: "/srv",
        };
        assert_eq!(msg.to_string(), "Spawned interpreter 'python3' in /srv");
    }

    #[test]
    fn test_failed_includes_kind() {
        let error = crate::errors::BridgeError::OutputDecodeError {
            raw_output: "garbage".into(),
        };
        let msg = InvocationFailed {
            function_name: "f",
            error: &error,
        };
        assert!(msg.to_string().contains("[output_decode_error]"));
    }
}
