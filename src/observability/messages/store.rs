// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for variable store events.

use std::fmt::{Display, Formatter};

/// Variable written to the store.
///
/// # Log Level
/// `info!` - Important operational event
pub struct VariableSaved<'a> {
    pub key: &'a str,
}

impl Display for VariableSaved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Variable '{}' saved successfully", self.key)
    }
}

/// Variable removed from the store.
///
/// # Log Level
/// `info!` - Important operational event
pub struct VariableDeleted<'a> {
    pub key: &'a str,
}

impl Display for VariableDeleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Variable '{}' deleted successfully", self.key)
    }
}

/// Delete requested for a variable that is not stored.
///
/// # Log Level
/// `debug!` - Nothing changed
pub struct VariableMissing<'a> {
    pub key: &'a str,
}

impl Display for VariableMissing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Variable '{}' does not exist", self.key)
    }
}

/// Store file absent; starting from an empty mapping.
///
/// # Log Level
/// `debug!` - Expected on first use
pub struct StoreFileMissing<'a> {
    pub path: &'a str,
}

impl Display for StoreFileMissing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Store file {} not found, treating as empty", self.path)
    }
}
