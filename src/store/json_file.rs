// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{StoreError, StoreResult};
use crate::observability::messages::store::{
    StoreFileMissing, VariableDeleted, VariableMissing, VariableSaved,
};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Name → JSON value mapping persisted as one pretty-printed JSON document.
///
/// Reads treat a missing or blank file as an empty mapping. Every write
/// replaces the whole file: the new document goes to a sibling temp file which
/// is then renamed over the original, so readers see either the old or the new
/// document and never a partial one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> StoreResult<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    "{}",
                    StoreFileMissing {
                        path: &self.path.display().to_string(),
                    }
                );
                return Ok(Map::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        let value: Value = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        match value {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }

    /// Replace the stored mapping wholesale.
    pub fn save(&self, variables: &Map<String, Value>) -> StoreResult<()> {
        let mut document = serde_json::to_string_pretty(variables).map_err(|source| {
            StoreError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;
        document.push('\n');

        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let staging = self.staging_path();
        fs::write(&staging, document).map_err(io_error)?;
        if let Err(source) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(io_error(source));
        }

        Ok(())
    }

    pub fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.load()?.remove(key))
    }

    pub fn set(&self, key: impl Into<String>, value: Value) -> StoreResult<()> {
        let mut single = Map::new();
        single.insert(key.into(), value);
        self.set_many(single)
    }

    /// Merge `variables` into the stored mapping, overwriting existing keys.
    pub fn set_many(&self, variables: Map<String, Value>) -> StoreResult<()> {
        let mut stored = self.load()?;
        let mut saved = Vec::with_capacity(variables.len());

        for (key, value) in variables {
            saved.push(key.clone());
            stored.insert(key, value);
        }

        self.save(&stored)?;

        for key in &saved {
            tracing::info!("{}", VariableSaved { key });
        }
        Ok(())
    }

    /// Remove `key`. Returns `false` (and leaves the file untouched) if it was absent.
    pub fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut stored = self.load()?;

        if stored.remove(key).is_none() {
            tracing::debug!("{}", VariableMissing { key });
            return Ok(false);
        }

        self.save(&stored)?;
        tracing::info!("{}", VariableDeleted { key });
        Ok(true)
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
