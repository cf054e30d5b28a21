// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Flat-file variable store shared between host and scripts.
//!
//! Scripts and the host exchange named values through a single JSON document.
//! The file location comes from [`StoreConfig`](crate::config::StoreConfig);
//! nothing is resolved relative to this crate's source tree.

mod json_file;

pub use json_file::JsonFileStore;

use crate::config::StoreConfig;

impl From<&StoreConfig> for JsonFileStore {
    fn from(config: &StoreConfig) -> Self {
        JsonFileStore::new(config.get_path())
    }
}
