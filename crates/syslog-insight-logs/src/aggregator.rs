use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use syslog_insight_types::ErrorCount;

use crate::error::{Error, Result};
use crate::parser::LineParser;
use crate::report::write_report;

/// Number of entries shown in the console summary
pub const DEFAULT_TOP_LIMIT: usize = 5;

/// Counts collected during one scan
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Lines read from the source
    pub lines: usize,
    /// Lines matching the syslog grammar
    pub parsed: usize,
    /// Lines that did not match and were skipped
    pub skipped: usize,
    /// Lines with level ERROR
    pub errors: usize,
}

/// Error message counts in first-seen order
#[derive(Clone, Debug, Default)]
struct FrequencyTable {
    /// Entries in the order their message first appeared
    entries: Vec<ErrorCount>,

    /// Message to position in `entries`
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    fn record(&mut self, message: String) {
        match self.index.get(&message) {
            Some(&pos) => self.entries[pos].count += 1,
            None => {
                self.index.insert(message.clone(), self.entries.len());
                self.entries.push(ErrorCount::new(message, 1));
            }
        }
    }

    /// Entries by count descending; equal counts keep first-seen order
    fn ranked(&self) -> Vec<ErrorCount> {
        let mut ranked = self.entries.clone();
        // sort_by is stable
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}

/// Tallies ERROR messages from a syslog file
pub struct ErrorAggregator {
    /// Source log file
    path: PathBuf,

    /// Counts from the last successful scan
    table: FrequencyTable,

    /// Stats from the last successful scan
    stats: ScanStats,
}

impl ErrorAggregator {
    /// Create an aggregator for the given log file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: FrequencyTable::default(),
            stats: ScanStats::default(),
        }
    }

    /// Source log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scan the configured log file
    ///
    /// The file is read line by line. Results replace those of any earlier
    /// scan; on failure the previous results are left untouched.
    pub fn analyze(&mut self) -> Result<()> {
        let file = File::open(&self.path).map_err(|e| Error::open(self.path.clone(), e))?;
        debug!(path = %self.path.display(), "Opened log file");

        self.analyze_reader(BufReader::new(file))
    }

    /// Scan lines from any buffered reader
    pub fn analyze_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut table = FrequencyTable::default();
        let mut stats = ScanStats::default();

        for chunk in reader.lines() {
            let chunk = chunk.map_err(|source| Error::FileAccess {
                path: self.path.clone(),
                source,
            })?;

            for line in split_bare_cr(&chunk) {
                stats.lines += 1;

                let Some(parsed) = LineParser::parse(line) else {
                    stats.skipped += 1;
                    continue;
                };
                stats.parsed += 1;

                if parsed.is_error() {
                    stats.errors += 1;
                    table.record(parsed.message);
                }
            }
        }

        info!(
            path = %self.path.display(),
            lines = stats.lines,
            parsed = stats.parsed,
            skipped = stats.skipped,
            errors = stats.errors,
            distinct = table.entries.len(),
            "Log scan complete"
        );

        self.table = table;
        self.stats = stats;
        Ok(())
    }

    /// Stats from the last successful scan
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Most frequent error messages, at most `limit` of them
    pub fn get_top_errors(&self, limit: usize) -> Vec<ErrorCount> {
        let mut ranked = self.table.ranked();
        ranked.truncate(limit);
        ranked
    }

    /// All error messages, most frequent first
    pub fn sorted_errors(&self) -> Vec<ErrorCount> {
        self.table.ranked()
    }

    /// Number of distinct error messages
    pub fn len(&self) -> usize {
        self.table.entries.len()
    }

    /// Check if no errors were counted
    pub fn is_empty(&self) -> bool {
        self.table.entries.is_empty()
    }

    /// Total ERROR occurrences across all messages
    pub fn total_errors(&self) -> usize {
        self.table.entries.iter().map(|e| e.count).sum()
    }

    /// Write the full report to `path`
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let write_err = |source: csv::Error| Error::Write {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(|e| write_err(e.into()))?;
        self.write_report(file).map_err(write_err)?;

        info!(path = %path.display(), rows = self.len(), "Saved error report");
        Ok(())
    }

    /// Write the full report to any writer
    pub fn write_report<W: Write>(&self, writer: W) -> std::result::Result<(), csv::Error> {
        write_report(writer, &self.sorted_errors())
    }
}

/// Split a `\n`-delimited chunk on lone `\r` line breaks
///
/// `lines()` already strips `\n` and `\r\n`; a trailing `\r` left at end of
/// input ends the last line rather than starting an empty one.
fn split_bare_cr(chunk: &str) -> impl Iterator<Item = &str> {
    chunk.strip_suffix('\r').unwrap_or(chunk).split('\r')
}

impl std::fmt::Debug for ErrorAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorAggregator")
            .field("path", &self.path)
            .field("distinct", &self.table.entries.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::read_report;

    fn aggregate(text: &str) -> ErrorAggregator {
        let mut aggregator = ErrorAggregator::new("test.log");
        aggregator.analyze_reader(text.as_bytes()).unwrap();
        aggregator
    }

    const SAMPLE: &str = "\
July 31 16:00:00 host app[123]: INFO Started
July 31 16:01:00 host app[123]: ERROR Connection failed
July 31 16:02:00 host app[123]: WARN High memory
July 31 16:03:00 host app[123]: ERROR Connection failed
July 31 16:04:00 host app[123]: ERROR Database timeout
";

    #[test]
    fn test_counts_errors_and_ignores_other_levels() {
        let aggregator = aggregate(SAMPLE);
        assert_eq!(
            aggregator.get_top_errors(DEFAULT_TOP_LIMIT),
            vec![
                ErrorCount::new("Connection failed", 2),
                ErrorCount::new("Database timeout", 1),
            ]
        );
        assert_eq!(aggregator.total_errors(), 3);
        assert_eq!(
            aggregator.stats(),
            ScanStats {
                lines: 5,
                parsed: 5,
                skipped: 0,
                errors: 3,
            }
        );
    }

    #[test]
    fn test_analyze_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        std::fs::write(&path, SAMPLE).unwrap();

        let mut aggregator = ErrorAggregator::new(&path);
        aggregator.analyze().unwrap();
        assert_eq!(aggregator.len(), 2);
        assert_eq!(aggregator.path(), path.as_path());
    }

    #[test]
    fn test_lowercase_and_other_levels_not_counted() {
        let aggregator = aggregate(
            "July 31 16:00:00 host app: error lower\n\
             July 31 16:00:00 host app: ERR short\n\
             July 31 16:00:00 host app: FATAL fatal\n\
             July 31 16:00:00 host app: ERRORS plural\n",
        );
        assert!(aggregator.is_empty());
        assert_eq!(aggregator.stats().parsed, 3);
        assert_eq!(aggregator.stats().skipped, 1);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let aggregator = aggregate(
            "garbage\n\
             \n\
             ERROR no header\n\
             July 31 16:00:00 host app: ERROR real one\n",
        );
        assert_eq!(aggregator.get_top_errors(10), vec![ErrorCount::new("real one", 1)]);
        assert_eq!(aggregator.stats().skipped, 3);
    }

    #[test]
    fn test_message_trimmed_before_counting() {
        let aggregator = aggregate(
            "July 31 16:00:00 host app: ERROR disk full   \n\
             July 31 16:00:01 host app: ERROR    disk full\r\n",
        );
        assert_eq!(aggregator.get_top_errors(5), vec![ErrorCount::new("disk full", 2)]);
    }

    #[test]
    fn test_messages_are_case_sensitive() {
        let aggregator = aggregate(
            "July 31 16:00:00 host app: ERROR Disk full\n\
             July 31 16:00:01 host app: ERROR disk full\n",
        );
        assert_eq!(aggregator.len(), 2);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let aggregator = aggregate(
            "July 31 16:00:00 host app: ERROR c\n\
             July 31 16:00:01 host app: ERROR a\n\
             July 31 16:00:02 host app: ERROR b\n\
             July 31 16:00:03 host app: ERROR b\n\
             July 31 16:00:04 host app: ERROR a\n\
             July 31 16:00:05 host app: ERROR d\n",
        );
        let top: Vec<(String, usize)> = aggregator
            .get_top_errors(10)
            .into_iter()
            .map(Into::into)
            .collect();
        assert_eq!(
            top,
            vec![
                ("a".to_string(), 2),
                ("b".to_string(), 2),
                ("c".to_string(), 1),
                ("d".to_string(), 1),
            ]
        );
        assert_eq!(aggregator.sorted_errors(), aggregator.get_top_errors(10));
    }

    #[test]
    fn test_top_limit() {
        let aggregator = aggregate(SAMPLE);
        assert!(aggregator.get_top_errors(0).is_empty());
        assert_eq!(aggregator.get_top_errors(1), vec![ErrorCount::new("Connection failed", 2)]);
        assert_eq!(aggregator.get_top_errors(100).len(), 2);
    }

    #[test]
    fn test_queries_are_repeatable() {
        let aggregator = aggregate(SAMPLE);
        assert_eq!(aggregator.get_top_errors(5), aggregator.get_top_errors(5));

        let mut first = Vec::new();
        let mut second = Vec::new();
        aggregator.write_report(&mut first).unwrap();
        aggregator.write_report(&mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("non_existent_file.log");

        let mut aggregator = ErrorAggregator::new(&path);
        let err = aggregator.analyze().unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert!(err.is_file_access());
        assert!(aggregator.is_empty());
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("empty.log");
        let report = dir.path().join("report.csv");
        std::fs::write(&log, "").unwrap();

        let mut aggregator = ErrorAggregator::new(&log);
        aggregator.analyze().unwrap();
        assert!(aggregator.get_top_errors(DEFAULT_TOP_LIMIT).is_empty());

        aggregator.export(&report).unwrap();
        assert_eq!(std::fs::read_to_string(&report).unwrap(), "Error,Count\r\n");
    }

    #[test]
    fn test_invalid_utf8_keeps_previous_results() {
        let mut aggregator = aggregate(SAMPLE);
        let bytes: &[u8] = b"July 31 16:00:00 host app: ERROR new\n\xff\xfe\n";

        let err = aggregator.analyze_reader(bytes).unwrap_err();
        assert!(matches!(err, Error::FileAccess { .. }));
        assert_eq!(aggregator.len(), 2);
        assert_eq!(aggregator.total_errors(), 3);
    }

    #[test]
    fn test_reanalyze_replaces_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, SAMPLE).unwrap();

        let mut aggregator = ErrorAggregator::new(&path);
        aggregator.analyze().unwrap();
        aggregator.analyze().unwrap();
        assert_eq!(aggregator.get_top_errors(1), vec![ErrorCount::new("Connection failed", 2)]);
    }

    #[test]
    fn test_export_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.csv");
        let aggregator = aggregate(
            "July 31 16:00:00 host app: ERROR plain\n\
             July 31 16:00:01 host app: ERROR user \"bob\" denied, retrying\n\
             July 31 16:00:02 host app: ERROR user \"bob\" denied, retrying\n\
             July 31 16:00:03 host app: ERROR a,b,c\n",
        );

        aggregator.export(&report).unwrap();
        let rows = read_report(std::fs::File::open(&report).unwrap()).unwrap();
        assert_eq!(
            rows,
            vec![
                ErrorCount::new("user \"bob\" denied, retrying", 2),
                ErrorCount::new("plain", 1),
                ErrorCount::new("a,b,c", 1),
            ]
        );
    }

    #[test]
    fn test_export_to_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("no_such_dir").join("report.csv");
        let aggregator = aggregate(SAMPLE);

        let err = aggregator.export(&report).unwrap_err();
        assert!(err.is_write());
        assert!(!err.is_file_access());
    }

    #[test]
    fn test_bare_carriage_return_splits_lines() {
        let aggregator = aggregate(
            "July 31 16:01:00 host app: ERROR a\r\
             July 31 16:02:00 host app: ERROR b\n\
             July 31 16:03:00 host app: ERROR b\r",
        );
        assert_eq!(
            aggregator.get_top_errors(10),
            vec![ErrorCount::new("b", 2), ErrorCount::new("a", 1)]
        );
        assert_eq!(aggregator.stats().lines, 3);
    }
}
