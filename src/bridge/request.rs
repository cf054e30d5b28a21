// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{BridgeError, BridgeResult};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A single remote call: which function, in which script, with which arguments.
///
/// Built once per `Bridge::invoke` and never mutated afterwards. The script
/// path is always absolute; relative paths are resolved against the current
/// directory at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    script_path: PathBuf,
    function_name: String,
    args: Vec<Value>,
}

impl InvocationRequest {
    pub fn new<P: AsRef<Path>>(
        script_path: P,
        function_name: impl Into<String>,
        args: Vec<Value>,
    ) -> BridgeResult<Self> {
        let function_name = function_name.into();
        if function_name.trim().is_empty() {
            return Err(BridgeError::InvalidRequest(
                "function name must not be empty".to_string(),
            ));
        }

        let script_path = std::path::absolute(script_path.as_ref())?;

        Ok(Self {
            script_path,
            function_name,
            args,
        })
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Directory holding the script; the interpreter runs from here.
    pub fn script_dir(&self) -> &Path {
        self.script_path.parent().unwrap_or_else(|| Path::new("/"))
    }

    /// Base module identifier, i.e. the file name without its extension.
    pub fn module_name(&self) -> String {
        self.script_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "__bridge_target__".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relative_path_is_made_absolute() {
        let request = InvocationRequest::new("scripts/math.py", "add", vec![json!(1)]).unwrap();
        assert!(request.script_path().is_absolute());
        assert!(request.script_path().ends_with("scripts/math.py"));
        assert!(request.script_dir().ends_with("scripts"));
    }

    #[test]
    fn test_module_name_is_file_stem() {
        let request = InvocationRequest::new("/srv/jobs/report.v2.py", "run", vec![]).unwrap();
        assert_eq!(request.module_name(), "report.v2");
    }

    #[test]
    fn test_empty_function_name_rejected() {
        let result = InvocationRequest::new("/srv/math.py", "  ", vec![]);
        assert!(matches!(result, Err(BridgeError::InvalidRequest(_))));
    }

    #[test]
    fn test_args_kept_in_order() {
        let args = vec![json!("a"), json!(2), json!({"k": [true, null]})];
        let request = InvocationRequest::new("/srv/x.py", "f", args.clone()).unwrap();
        assert_eq!(request.args(), args.as_slice());
        assert_eq!(request.function_name(), "f");
    }
}
