// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Interpreter executable selection.
//!
//! Resolution is by name only. Whether the name actually exists on `PATH` is
//! discovered by the spawn itself; the bridge walks to the next candidate when
//! the OS reports "not found".

use crate::config::consts::{UNIX_INTERPRETERS, WINDOWS_INTERPRETERS};

#[derive(Debug, Clone, PartialEq)]
pub struct InterpreterResolver {
    candidates: Vec<String>,
}

impl InterpreterResolver {
    /// Candidates for the host platform.
    pub fn for_host() -> Self {
        let names: &[&str] = if cfg!(windows) {
            &WINDOWS_INTERPRETERS
        } else {
            &UNIX_INTERPRETERS
        };
        Self {
            candidates: names.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// A single pinned interpreter with no fallback.
    pub fn pinned(interpreter: impl Into<String>) -> Self {
        Self {
            candidates: vec![interpreter.into()],
        }
    }

    /// Explicit candidate list, tried in order. An empty list means host defaults.
    pub fn with_candidates<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates: Vec<String> = candidates.into_iter().map(Into::into).collect();
        if candidates.is_empty() {
            return Self::for_host();
        }
        Self { candidates }
    }

    /// Host candidates unless configuration pins an interpreter.
    pub fn from_override(interpreter: Option<&str>) -> Self {
        match interpreter {
            Some(name) => Self::pinned(name),
            None => Self::for_host(),
        }
    }

    /// Primary candidate. Never fails.
    pub fn resolve(&self) -> &str {
        // both constructors guarantee at least one candidate
        &self.candidates[0]
    }

    /// All candidates in the order they should be tried.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

impl Default for InterpreterResolver {
    fn default() -> Self {
        Self::for_host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_candidates() {
        let resolver = InterpreterResolver::for_host();
        assert_eq!(resolver.candidates().len(), 2);
        if cfg!(windows) {
            assert_eq!(resolver.resolve(), "python");
            assert_eq!(resolver.candidates()[1], "py");
        } else {
            assert_eq!(resolver.resolve(), "python3");
            assert_eq!(resolver.candidates()[1], "python");
        }
    }

    #[test]
    fn test_override_pins_single_candidate() {
        let resolver = InterpreterResolver::from_override(Some("/opt/py/bin/python3.12"));
        assert_eq!(resolver.resolve(), "/opt/py/bin/python3.12");
        assert_eq!(resolver.candidates().len(), 1);
    }

    #[test]
    fn test_explicit_candidates_keep_order() {
        let resolver = InterpreterResolver::with_candidates(["pypy3", "python3"]);
        assert_eq!(resolver.resolve(), "pypy3");
        assert_eq!(resolver.candidates(), ["pypy3".to_string(), "python3".to_string()]);

        let empty: [&str; 0] = [];
        assert_eq!(
            InterpreterResolver::with_candidates(empty),
            InterpreterResolver::for_host()
        );
    }

    #[test]
    fn test_no_override_is_host() {
        assert_eq!(
            InterpreterResolver::from_override(None),
            InterpreterResolver::default()
        );
    }
}
