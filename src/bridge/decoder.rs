// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Interpretation of captured interpreter output.
//!
//! The wrapper program answers with a result frame: the marker line, then one
//! JSON line. Only the last frame on a stream counts, so anything the callee
//! managed to write around the redirect can never be mistaken for the result.

use crate::bridge::runner::CapturedOutput;
use crate::config::consts::{ERROR_KEY, RESULT_MARKER, WRAPPER_ERROR_EXIT_CODE};
use crate::errors::{BridgeError, BridgeResult};
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct ResultDecoder {
    marker: &'static str,
}

impl Default for ResultDecoder {
    fn default() -> Self {
        Self {
            marker: RESULT_MARKER,
        }
    }
}

/// Text ahead of the last frame, and the line carried by that frame.
struct Frame<'a> {
    preamble: &'a str,
    payload: &'a str,
}

impl ResultDecoder {
    pub fn decode(&self, output: &CapturedOutput) -> BridgeResult<Value> {
        if output.exit_code != 0 {
            return Err(self.decode_failure(output));
        }

        let stdout = output.stdout_text();
        let frame = match self.last_frame(&stdout) {
            Some(frame) => frame,
            None => return Err(BridgeError::OutputDecodeError { raw_output: stdout }),
        };

        let value: Value = match serde_json::from_str(frame.payload) {
            Ok(value) => value,
            Err(_) => return Err(BridgeError::OutputDecodeError { raw_output: stdout }),
        };

        match structured_error(&value) {
            Some(message) => Err(BridgeError::RemoteException {
                message: message.to_string(),
                traceback: output.stderr_text(),
            }),
            None => Ok(value),
        }
    }

    /// Non-zero exit: a framed error payload on stderr together with the
    /// wrapper's own error status is a remote exception. Any other status,
    /// e.g. a callee that forged a frame and then called `os._exit`, is a
    /// plain process failure.
    fn decode_failure(&self, output: &CapturedOutput) -> BridgeError {
        let stderr = output.stderr_text();

        if output.exit_code != WRAPPER_ERROR_EXIT_CODE {
            return BridgeError::RemoteProcessFailure {
                exit_code: output.exit_code,
                stderr,
            };
        }

        let remote = self.last_frame(&stderr).and_then(|frame| {
            let value: Value = serde_json::from_str(frame.payload).ok()?;
            let message = structured_error(&value)?.to_string();
            Some((message, frame.preamble.trim_end().to_string()))
        });

        match remote {
            Some((message, traceback)) => BridgeError::RemoteException { message, traceback },
            None => BridgeError::RemoteProcessFailure {
                exit_code: output.exit_code,
                stderr,
            },
        }
    }

    fn last_frame<'a>(&self, text: &'a str) -> Option<Frame<'a>> {
        let mut offset = 0;
        let mut found = None;

        for line in text.split_inclusive('\n') {
            let end = offset + line.len();
            if line.trim_end_matches(|c: char| c == '\r' || c == '\n') == self.marker {
                found = Some((offset, end));
            }
            offset = end;
        }

        let (marker_start, marker_end) = found?;
        let payload = text[marker_end..]
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())?;

        Some(Frame {
            preamble: &text[..marker_start],
            payload,
        })
    }
}

/// `Some(message)` when `value` is exactly `{"error": "<string>"}`.
fn structured_error(value: &Value) -> Option<&str> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.get(ERROR_KEY)?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn output(exit_code: i32, stdout: &str, stderr: &str) -> CapturedOutput {
        CapturedOutput {
            exit_code,
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    fn framed(payload: &str) -> String {
        format!("\n{}\n{}\n", RESULT_MARKER, payload)
    }

    #[test]
    fn test_decodes_framed_value() {
        let captured = output(0, &framed("5"), "");
        assert_eq!(ResultDecoder::default().decode(&captured).unwrap(), json!(5));
    }

    #[test]
    fn test_earlier_lines_are_ignored() {
        let stdout = format!("noise\n{{\"fake\": 1}}\n{}", framed("{\"real\": [1, 2]}"));
        let captured = output(0, &stdout, "");
        assert_eq!(
            ResultDecoder::default().decode(&captured).unwrap(),
            json!({"real": [1, 2]})
        );
    }

    #[test]
    fn test_last_frame_wins() {
        let stdout = format!("{}{}", framed("\"forged\""), framed("\"genuine\""));
        let captured = output(0, &stdout, "");
        assert_eq!(
            ResultDecoder::default().decode(&captured).unwrap(),
            json!("genuine")
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let stdout = format!("\r\n{}\r\n[true, null]\r\n", RESULT_MARKER);
        let captured = output(0, &stdout, "");
        assert_eq!(
            ResultDecoder::default().decode(&captured).unwrap(),
            json!([true, null])
        );
    }

    #[test]
    fn test_missing_frame_is_decode_error() {
        let captured = output(0, "42\n", "");
        match ResultDecoder::default().decode(&captured) {
            Err(BridgeError::OutputDecodeError { raw_output }) => assert_eq!(raw_output, "42\n"),
            other => panic!("Expected OutputDecodeError, got {:?}", other),
        }
    }

    #[test]
    fn test_marker_without_payload_is_decode_error() {
        let captured = output(0, &format!("{}\n\n", RESULT_MARKER), "");
        assert!(matches!(
            ResultDecoder::default().decode(&captured),
            Err(BridgeError::OutputDecodeError { .. })
        ));
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let captured = output(0, &framed("{not json"), "");
        assert!(matches!(
            ResultDecoder::default().decode(&captured),
            Err(BridgeError::OutputDecodeError { .. })
        ));
    }

    #[test]
    fn test_error_payload_on_stdout_is_remote_exception() {
        let captured = output(0, &framed("{\"error\": \"ValueError: bad\"}"), "");
        match ResultDecoder::default().decode(&captured) {
            Err(BridgeError::RemoteException { message, .. }) => {
                assert_eq!(message, "ValueError: bad")
            }
            other => panic!("Expected RemoteException, got {:?}", other),
        }
    }

    #[test]
    fn test_mapping_with_error_and_more_keys_is_a_value() {
        let payload = "{\"error\": \"x\", \"code\": 3}";
        let captured = output(0, &framed(payload), "");
        assert_eq!(
            ResultDecoder::default().decode(&captured).unwrap(),
            json!({"error": "x", "code": 3})
        );

        let captured = output(0, &framed("{\"error\": 7}"), "");
        assert_eq!(
            ResultDecoder::default().decode(&captured).unwrap(),
            json!({"error": 7})
        );
    }

    #[test]
    fn test_framed_error_on_stderr_is_remote_exception() {
        let stderr = format!(
            "Traceback (most recent call last):\n  File \"math.py\", line 2\nValueError: bad\n{}",
            framed("{\"error\": \"ValueError: bad\"}")
        );
        let captured = output(1, "", &stderr);
        match ResultDecoder::default().decode(&captured) {
            Err(BridgeError::RemoteException { message, traceback }) => {
                assert_eq!(message, "ValueError: bad");
                assert!(traceback.starts_with("Traceback"));
                assert!(!traceback.contains(RESULT_MARKER));
            }
            other => panic!("Expected RemoteException, got {:?}", other),
        }
    }

    #[test]
    fn test_nonzero_exit_without_frame_is_process_failure() {
        let captured = output(2, &framed("1"), "Fatal Python error: init\n");
        match ResultDecoder::default().decode(&captured) {
            Err(BridgeError::RemoteProcessFailure { exit_code, stderr }) => {
                assert_eq!(exit_code, 2);
                assert_eq!(stderr, "Fatal Python error: init\n");
            }
            other => panic!("Expected RemoteProcessFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_framed_error_with_foreign_exit_status_is_process_failure() {
        let stderr = framed("{\"error\": \"ValueError: forged\"}");
        let captured = output(5, "", &stderr);
        match ResultDecoder::default().decode(&captured) {
            Err(BridgeError::RemoteProcessFailure { exit_code, stderr }) => {
                assert_eq!(exit_code, 5);
                assert!(stderr.contains("forged"));
            }
            other => panic!("Expected RemoteProcessFailure, got {:?}", other),
        }
    }
}
