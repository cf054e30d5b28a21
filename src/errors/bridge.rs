// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for cross-process function invocation.
//!
//! Every way a remote call can fail maps onto exactly one `BridgeError`
//! variant. Failures are terminal for the invocation that produced them; the
//! bridge never retries a call that reached the interpreter.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Classified failure of a single `Bridge::invoke` call.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The target script did not exist when the call was made. No process was spawned.
    #[error("Script not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The request itself was malformed (e.g. an empty function name).
    #[error("Invalid invocation request: {0}")]
    InvalidRequest(String),

    /// The interpreter executable could not be found or started.
    #[error("Failed to spawn interpreter '{command}': {source}")]
    SpawnFailure {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The interpreter exited non-zero without a structured error payload.
    #[error("Interpreter exited with code {exit_code}: {}", stderr.trim_end())]
    RemoteProcessFailure { exit_code: i32, stderr: String },

    /// The result frame was missing or did not hold valid JSON.
    #[error("Could not decode interpreter output: {raw_output:?}")]
    OutputDecodeError { raw_output: String },

    /// The callee (or module loading, or function lookup) raised an exception.
    #[error("Remote exception: {message}")]
    RemoteException {
        message: String,
        /// Whatever the interpreter wrote to stderr ahead of the error frame.
        traceback: String,
    },

    /// A value could not cross the marshalling boundary.
    #[error("Marshalling error: {0}")]
    Marshal(String),

    /// The configured deadline elapsed; the interpreter was killed.
    #[error("Invocation of '{function_name}' timed out after {elapsed:?}")]
    Timeout {
        function_name: String,
        elapsed: Duration,
    },

    /// Waiting on the child or reading its pipes failed.
    #[error("I/O error while talking to interpreter: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Short, stable name of the failure kind, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::FileNotFound { .. } => "file_not_found",
            BridgeError::InvalidRequest(_) => "invalid_request",
            BridgeError::SpawnFailure { .. } => "spawn_failure",
            BridgeError::RemoteProcessFailure { .. } => "remote_process_failure",
            BridgeError::OutputDecodeError { .. } => "output_decode_error",
            BridgeError::RemoteException { .. } => "remote_exception",
            BridgeError::Marshal(_) => "marshal",
            BridgeError::Timeout { .. } => "timeout",
            BridgeError::Io(_) => "io",
        }
    }
}

/// Result type alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
