// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Cross-process function invocation.
//!
//! A [`Bridge`] runs one function from a Python script in a freshly spawned
//! interpreter and hands back its return value as a `serde_json::Value`.
//!
//! # Architecture
//!
//! ```text
//! Bridge::invoke
//!   → InterpreterResolver  (sync)  which executable
//!   → CallEncoder          (sync)  fixed template + request on stdin
//!   → ProcessRunner        (async) spawn, feed, drain both pipes, wait
//!   → ResultDecoder        (sync)  exit status + frames → Value | BridgeError
//! ```
//!
//! Each call owns its subprocess, program, and buffers; nothing is shared
//! between concurrent invocations, so they cannot see each other's output.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pybridge::bridge::Bridge;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), pybridge::errors::BridgeError> {
//! let bridge = Bridge::default();
//! let sum = bridge.invoke("scripts/math.py", "add", vec![json!(2), json!(3)]).await?;
//! assert_eq!(sum, json!(5));
//!
//! let product: i64 = bridge.call("scripts/math.py", "mul", (6, 7)).await?;
//! assert_eq!(product, 42);
//! # Ok(())
//! # }
//! ```

mod decoder;
mod encoder;
mod request;
mod resolver;
mod runner;


pub use decoder::ResultDecoder;
pub use encoder::{CallEncoder, WrapperProgram};
pub use request::InvocationRequest;
pub use resolver::InterpreterResolver;
pub use runner::{CapturedOutput, ProcessRunner};

use crate::config::BridgeConfig;
use crate::errors::{BridgeError, BridgeResult};
use crate::observability::messages::bridge::{
    InterpreterFallback, InvocationCompleted, InvocationFailed, InvocationStarted,
    InvocationTimedOut,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Instant;

/// Public facade composing resolver, encoder, runner, and decoder.
#[derive(Debug, Clone, Default)]
pub struct Bridge {
    resolver: InterpreterResolver,
    encoder: CallEncoder,
    runner: ProcessRunner,
    decoder: ResultDecoder,
}

impl Bridge {
    /// Build a bridge from configuration.
    pub fn new(config: &BridgeConfig) -> Self {
        Self::with_parts(
            InterpreterResolver::from_override(config.interpreter.as_deref()),
            ProcessRunner::new(config.timeout(), config.env.clone()),
        )
    }

    pub fn with_parts(resolver: InterpreterResolver, runner: ProcessRunner) -> Self {
        Self {
            resolver,
            encoder: CallEncoder,
            runner,
            decoder: ResultDecoder::default(),
        }
    }

    pub fn resolver(&self) -> &InterpreterResolver {
        &self.resolver
    }

    /// Run `function_name(*args)` from the script at `script_path`.
    ///
    /// # Errors
    /// See [`BridgeError`]; every failure is terminal for this call.
    pub async fn invoke<P: AsRef<Path>>(
        &self,
        script_path: P,
        function_name: &str,
        args: Vec<Value>,
    ) -> BridgeResult<Value> {
        let started = Instant::now();

        tracing::debug!(
            "{}",
            InvocationStarted {
                script_path: &script_path.as_ref().display().to_string(),
                function_name,
                arg_count: args.len(),
            }
        );

        let result = match InvocationRequest::new(script_path, function_name, args) {
            Ok(request) => self.execute(&request).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => tracing::info!(
                "{}",
                InvocationCompleted {
                    function_name,
                    duration: started.elapsed(),
                }
            ),
            Err(error) => {
                if let (BridgeError::Timeout { .. }, Some(timeout)) = (error, self.runner.timeout())
                {
                    tracing::warn!(
                        "{}",
                        InvocationTimedOut {
                            function_name,
                            timeout,
                        }
                    );
                }
                tracing::error!(
                    "{}",
                    InvocationFailed {
                        function_name,
                        error,
                    }
                );
            }
        }

        result
    }

    /// Typed variant of [`Bridge::invoke`].
    ///
    /// `args` must serialize to a JSON array (a tuple, `Vec`, or array); `()`
    /// means no arguments. The return value is deserialized into `R`.
    pub async fn call<A, R, P>(&self, script_path: P, function_name: &str, args: A) -> BridgeResult<R>
    where
        A: Serialize,
        R: DeserializeOwned,
        P: AsRef<Path>,
    {
        let args = match serde_json::to_value(args) {
            Ok(Value::Array(items)) => items,
            Ok(Value::Null) => Vec::new(),
            Ok(other) => {
                return Err(BridgeError::Marshal(format!(
                    "arguments must serialize to a JSON array, got {}",
                    other
                )))
            }
            Err(e) => return Err(BridgeError::Marshal(e.to_string())),
        };

        let value = self.invoke(script_path, function_name, args).await?;

        serde_json::from_value(value)
            .map_err(|e| BridgeError::Marshal(format!("unexpected return value: {}", e)))
    }

    async fn execute(&self, request: &InvocationRequest) -> BridgeResult<Value> {
        ensure_script_exists(request.script_path()).await?;

        let program = self.encoder.encode(request)?;
        let output = self.run_with_fallback(request, &program).await?;

        self.decoder.decode(&output)
    }

    /// Try interpreter candidates in order, moving on only when the previous
    /// one does not exist. Any other outcome, success or failure, is final.
    async fn run_with_fallback(
        &self,
        request: &InvocationRequest,
        program: &WrapperProgram,
    ) -> BridgeResult<CapturedOutput> {
        let mut candidates = self.resolver.candidates().iter().peekable();

        while let Some(command) = candidates.next() {
            let result = self
                .runner
                .run(command, program, request.script_dir(), request.function_name())
                .await;

            let fallback = match (&result, candidates.peek()) {
                (Err(BridgeError::SpawnFailure { source, .. }), Some(next))
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    Some(*next)
                }
                _ => None,
            };

            match fallback {
                Some(next) => tracing::warn!(
                    "{}",
                    InterpreterFallback {
                        missing: command,
                        next,
                    }
                ),
                None => return result,
            }
        }

        Err(BridgeError::SpawnFailure {
            command: String::new(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no interpreter candidates configured",
            ),
        })
    }
}

async fn ensure_script_exists(path: &Path) -> BridgeResult<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => Ok(()),
        Ok(_) => Err(BridgeError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BridgeError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(BridgeError::Io(e)),
    }
}
