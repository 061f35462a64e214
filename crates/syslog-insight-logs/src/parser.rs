use std::sync::LazyLock;

use regex::Regex;

use syslog_insight_types::LogLine;

/// Syslog line grammar: timestamp, host, service, level, message
const LINE_PATTERN: &str = concat!(
    r"(?P<timestamp>[A-Z][a-z]+ \d{1,2} \d{2}:\d{2}:\d{2}) ",
    r"(?P<host>\w+) ",
    r"(?P<service>[\w\[\]=]+): ",
    r"(?P<level>[A-Z]+) ",
    r"(?P<message>.+)",
);

static LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LINE_PATTERN).expect("syslog line pattern is valid"));

/// Parser for extracting fields from raw syslog lines
pub struct LineParser;

impl LineParser {
    /// Parse a raw line into a LogLine
    ///
    /// Returns `None` when the line does not satisfy the grammar. The pattern
    /// is searched for anywhere in the line, so leading text before a valid
    /// record is ignored. A trailing newline is tolerated.
    pub fn parse(line: &str) -> Option<LogLine> {
        let caps = LINE_REGEX.captures(line)?;

        Some(LogLine::new(
            caps["timestamp"].to_string(),
            caps["host"].to_string(),
            caps["service"].to_string(),
            caps["level"].to_string(),
            caps["message"].trim().to_string(),
        ))
    }

    /// Check if a line satisfies the grammar
    pub fn is_match(line: &str) -> bool {
        LINE_REGEX.is_match(line)
    }
}
