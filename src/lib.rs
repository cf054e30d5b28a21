// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod bridge;     // subprocess invocation
pub mod config;     // config loading
pub mod errors;     // error handling
pub mod observability;
pub mod store;      // shared variable file

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use errors::{BridgeError, BridgeResult};
pub use store::JsonFileStore;
