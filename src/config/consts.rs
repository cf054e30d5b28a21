/// Interpreter candidates on Windows, in the order they are tried
pub const WINDOWS_INTERPRETERS: [&str; 2] = ["python", "py"];
/// Interpreter candidates everywhere else, where `python` may be Python 2 or absent
pub const UNIX_INTERPRETERS: [&str; 2] = ["python3", "python"];
/// Line that precedes every protocol payload the wrapper program emits
pub const RESULT_MARKER: &str = "__PYBRIDGE_RESULT__";
/// Key of the structured error payload
pub const ERROR_KEY: &str = "error";
/// Store file used when configuration does not name one
pub const DEFAULT_STORE_FILE: &str = "variables.json";
/// Upper bound for `timeout_seconds` (one day)
pub const MAX_TIMEOUT_SECONDS: u64 = 86_400;
/// Exit status the wrapper program uses after emitting a structured error
pub const WRAPPER_ERROR_EXIT_CODE: i32 = 1;
/// Prefix of the private `sys.modules` key the target script is registered under
pub const TARGET_MODULE_PREFIX: &str = "__pybridge_target_";
