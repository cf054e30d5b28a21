// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for the JSON variable store.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading, writing, or renaming the backing file failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not valid JSON.
    #[error("Invalid JSON in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory mapping could not be rendered as JSON for writing.
    #[error("Failed to serialize variables for '{}': {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The backing file holds JSON whose top level is not an object.
    #[error("Expected a JSON object at the top level of '{}'", path.display())]
    NotAnObject { path: PathBuf },
}

pub type StoreResult<T> = Result<T, StoreError>;
