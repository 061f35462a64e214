use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for log analysis
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the aggregator
///
/// Lines that do not match the syslog grammar are not errors; they are
/// skipped during the scan.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Log file not found at: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read log file {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write report {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl Error {
    /// The input source could not be opened or read
    pub fn is_file_access(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::FileAccess { .. })
    }

    /// The report destination could not be written
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }

    pub(crate) fn open(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::FileAccess { path, source }
        }
    }
}
