// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` so log lines stay consistent and
//! free of ad-hoc format strings at the call site.
//!
//! # Organization
//!
//! * `bridge` - Interpreter spawning and invocation lifecycle events
//! * `store` - Variable store reads and writes
//!
//! # Usage Pattern
//!
//! ```rust
//! use pybridge::observability::messages::store::VariableSaved;
//!
//! let msg = VariableSaved { key: "threshold" };
//!
//! tracing::info!("{}", msg);
//! ```

pub mod bridge;
pub mod store;
