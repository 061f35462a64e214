use std::io::{Read, Write};

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};

use syslog_insight_types::ErrorCount;

/// Header row of the error report
const HEADER: [&str; 2] = ["Error", "Count"];

/// Write an error report as CSV
///
/// Fields containing a comma, quote or line break are quoted.
pub fn write_report<W: Write>(writer: W, entries: &[ErrorCount]) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    for entry in entries {
        wtr.serialize(entry)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read an error report written by [`write_report`]
pub fn read_report<R: Read>(reader: R) -> Result<Vec<ErrorCount>, csv::Error> {
    ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader)
        .deserialize()
        .collect()
}
