// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Request encoding for the interpreter side of the protocol.
//!
//! The program the interpreter runs is a fixed template compiled into this
//! crate. Nothing from the request is spliced into its source text: the call
//! travels as a JSON document on the child's stdin, so argument strings and
//! Windows path separators cannot change what the template does.
//!
//! ## Wire format (stdin)
//! ```json
//! {
//!   "marker": "__PYBRIDGE_RESULT__",
//!   "script_path": "/srv/scripts/math.py",
//!   "module_name": "math",
//!   "module_key": "__pybridge_target_math__",
//!   "function": "add",
//!   "args": [2, 3]
//! }
//! ```
//!
//! ## Wire format (result frame)
//! The template answers with the marker line followed by one JSON line, on
//! stdout for a return value or on stderr (exit status 1) for
//! `{"error": "<Type>: <message>"}`.

use crate::bridge::request::InvocationRequest;
use crate::config::consts::{RESULT_MARKER, TARGET_MODULE_PREFIX};
use crate::errors::{BridgeError, BridgeResult};
use serde::Serialize;
use serde_json::Value;

/// Fixed protocol template executed with `-c`.
const WRAPPER_TEMPLATE: &str = include_str!("wrapper.py");

/// Program text plus the request payload to feed on stdin.
#[derive(Debug, Clone)]
pub struct WrapperProgram {
    source: String,
    input: Vec<u8>,
}

impl WrapperProgram {
    /// Arbitrary program/input pair. The bridge only ever builds these through
    /// [`CallEncoder::encode`]; this exists so the runner can drive other
    /// interpreters (e.g. `sh -c`).
    pub fn new(source: impl Into<String>, input: impl Into<Vec<u8>>) -> Self {
        Self {
            source: source.into(),
            input: input.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn input(&self) -> &[u8] {
        &self.input
    }
}

#[derive(Serialize)]
struct WireRequest<'a> {
    marker: &'a str,
    script_path: &'a str,
    module_name: String,
    module_key: String,
    function: &'a str,
    args: &'a [Value],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CallEncoder;

impl CallEncoder {
    pub fn encode(&self, request: &InvocationRequest) -> BridgeResult<WrapperProgram> {
        let script_path = request.script_path().to_str().ok_or_else(|| {
            BridgeError::Marshal(format!(
                "script path is not valid UTF-8: {}",
                request.script_path().display()
            ))
        })?;

        let wire = WireRequest {
            marker: RESULT_MARKER,
            script_path,
            module_name: request.module_name(),
            module_key: module_key(&request.module_name()),
            function: request.function_name(),
            args: request.args(),
        };

        let input = serde_json::to_vec(&wire)
            .map_err(|e| BridgeError::Marshal(format!("failed to encode request: {}", e)))?;

        Ok(WrapperProgram {
            source: WRAPPER_TEMPLATE.to_string(),
            input,
        })
    }
}

/// Private `sys.modules` key for a script stem. Registering under the bare
/// stem would shadow a standard module of the same name (`math.py`).
fn module_key(stem: &str) -> String {
    let sanitized: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("{}{}__", TARGET_MODULE_PREFIX, sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_input(program: &WrapperProgram) -> Value {
        serde_json::from_slice(program.input()).unwrap()
    }

    #[test]
    fn test_request_travels_as_data() {
        let request =
            InvocationRequest::new("/srv/scripts/math.py", "add", vec![json!(2), json!(3)])
                .unwrap();
        let program = CallEncoder.encode(&request).unwrap();

        let wire = decode_input(&program);
        assert_eq!(wire["function"], "add");
        assert_eq!(wire["module_name"], "math");
        assert_eq!(wire["module_key"], "__pybridge_target_math__");
        assert_eq!(wire["args"], json!([2, 3]));
        assert_eq!(wire["marker"], RESULT_MARKER);
        assert!(wire["script_path"]
            .as_str()
            .unwrap()
            .ends_with("math.py"));
    }

    #[test]
    fn test_source_is_fixed_template() {
        let hostile = json!("\"); import os; os.system('echo pwned') #");
        let a = InvocationRequest::new("/srv/a.py", "f", vec![hostile]).unwrap();
        let b = InvocationRequest::new("/srv/b.py", "g", vec![]).unwrap();

        let program_a = CallEncoder.encode(&a).unwrap();
        let program_b = CallEncoder.encode(&b).unwrap();

        assert_eq!(program_a.source(), program_b.source());
        assert!(!program_a.source().contains("pwned"));
    }

    #[test]
    fn test_backslashes_are_escaped_in_payload() {
        let request =
            InvocationRequest::new("/srv/f.py", "f", vec![json!("C:\\Users\\me\\data.csv")])
                .unwrap();
        let program = CallEncoder.encode(&request).unwrap();

        let raw = String::from_utf8(program.input().to_vec()).unwrap();
        assert!(raw.contains("C:\\\\Users\\\\me\\\\data.csv"));
        assert_eq!(decode_input(&program)["args"][0], "C:\\Users\\me\\data.csv");
    }

    #[test]
    fn test_module_key_is_a_plain_identifier() {
        assert_eq!(module_key("report.v2"), "__pybridge_target_report_v2__");
        assert_eq!(module_key("my-script"), "__pybridge_target_my_script__");
        assert_ne!(module_key("json"), "json");
    }

    #[test]
    fn test_template_contract() {
        // the decoder depends on these pieces of the template
        assert!(WRAPPER_TEMPLATE.contains("redirect_stdout"));
        assert!(WRAPPER_TEMPLATE.contains("spec_from_file_location"));
        assert!(WRAPPER_TEMPLATE.contains("allow_nan=False"));
        assert!(WRAPPER_TEMPLATE.contains("request[\"marker\"]"));
        assert!(WRAPPER_TEMPLATE.contains("sys.modules[module_key] = module"));
    }
}
