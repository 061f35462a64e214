//! Shared types for syslog-insight
//!
//! This crate contains data structures used across the syslog-insight crates.

use serde::{Deserialize, Serialize};

// ============================================================================
// Log Types
// ============================================================================

/// Level token that marks a line as an error
pub const ERROR_LEVEL: &str = "ERROR";

/// A single syslog line split into its fields
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    /// Human readable timestamp, e.g. "July 31 16:00:00"
    pub timestamp: String,

    /// Originating host
    pub host: String,

    /// Service tag, e.g. "app[123]"
    pub service: String,

    /// Uppercase level token, e.g. "ERROR"
    pub level: String,

    /// Message text, trimmed
    pub message: String,
}

impl LogLine {
    pub fn new(
        timestamp: String,
        host: String,
        service: String,
        level: String,
        message: String,
    ) -> Self {
        Self {
            timestamp,
            host,
            service,
            level,
            message,
        }
    }

    /// Whether the level token is exactly "ERROR"
    pub fn is_error(&self) -> bool {
        self.level == ERROR_LEVEL
    }
}

// ============================================================================
// Report Types
// ============================================================================

/// One row of the error frequency report
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCount {
    #[serde(rename = "Error")]
    pub message: String,

    #[serde(rename = "Count")]
    pub count: usize,
}

impl ErrorCount {
    pub fn new(message: impl Into<String>, count: usize) -> Self {
        Self {
            message: message.into(),
            count,
        }
    }
}

impl From<(String, usize)> for ErrorCount {
    fn from((message, count): (String, usize)) -> Self {
        Self { message, count }
    }
}

impl From<ErrorCount> for (String, usize) {
    fn from(entry: ErrorCount) -> Self {
        (entry.message, entry.count)
    }
}
