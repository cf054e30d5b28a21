// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_STORE_FILE, MAX_TIMEOUT_SECONDS};
use crate::errors::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration for the bridge and its variable store.
///
/// Every field is optional; an empty document yields the same configuration as
/// `BridgeConfig::default()`.
///
/// # Fields
/// * `interpreter` - Pin a single interpreter executable instead of the platform candidates
/// * `timeout_seconds` - Kill the interpreter if a call runs longer than this
/// * `env` - Extra environment variables for every spawned interpreter
/// * `store` - Variable store options
///
/// # Example
/// ```yaml
/// interpreter: python3
/// timeout_seconds: 30
/// env:
///   APP_MODE: batch
/// store:
///   path: data/variables.json
/// ```
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub interpreter: Option<String>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub store: StoreConfig,
}

impl BridgeConfig {
    /// Configured deadline for a single invocation, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Check values that deserialize fine but make no sense.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(interpreter) = &self.interpreter {
            if interpreter.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "interpreter",
                    reason: "must not be empty".to_string(),
                });
            }
        }

        if let Some(seconds) = self.timeout_seconds {
            if seconds == 0 || seconds > MAX_TIMEOUT_SECONDS {
                return Err(ConfigError::InvalidValue {
                    field: "timeout_seconds",
                    reason: format!("{} is outside 1..={}", seconds, MAX_TIMEOUT_SECONDS),
                });
            }
        }

        Ok(())
    }
}

/// Variable store options.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Backing file for the store, falling back to `variables.json` in the working directory.
    pub fn get_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE))
    }
}

/// Load a config from a YAML or TOML file, picked by extension.
pub fn load_config<P: AsRef<Path>>(path: P) -> ConfigResult<BridgeConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let cfg: BridgeConfig = match extension.as_deref() {
        Some("yaml") | Some("yml") => parse_yaml(&content)?,
        Some("toml") => toml::from_str(&content)?,
        _ => {
            return Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    Ok(cfg)
}

/// Load and validate a config file.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> ConfigResult<BridgeConfig> {
    let cfg = load_config(path)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse_yaml(content: &str) -> ConfigResult<BridgeConfig> {
    // serde_yaml rejects an empty document outright
    if content.trim().is_empty() {
        return Ok(BridgeConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}
