//! Log processing for syslog-insight
//!
//! This crate provides syslog line parsing, error aggregation, and the CSV
//! error report.

mod aggregator;
mod error;
mod parser;
mod report;

pub use aggregator::{DEFAULT_TOP_LIMIT, ErrorAggregator, ScanStats};
pub use error::{Error, Result};
pub use parser::LineParser;
pub use report::{read_report, write_report};

// Re-export types used in our public API
pub use syslog_insight_types::{ErrorCount, LogLine};
