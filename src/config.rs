//! Settings file for syslog-insight
//!
//! Values are resolved as: command-line flag, then config file, then the
//! built-in default.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use syslog_insight_logs::DEFAULT_TOP_LIMIT;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "syslog-insight.toml";

/// Default input log file
pub const DEFAULT_INPUT: &str = "data/syslog.log";

/// Default CSV report path
pub const DEFAULT_OUTPUT: &str = "error_report.csv";

/// Settings read from a TOML file; every key is optional
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub top: Option<usize>,
}

impl FileConfig {
    /// Load a config file
    ///
    /// An explicitly named file must exist and parse. Without one, the
    /// default file is used if present, otherwise an empty config.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::read(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }
}

/// Fully resolved run settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub top: usize,
}

impl Settings {
    /// Merge command-line values over the config file
    pub fn resolve(
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        top: Option<usize>,
        file: FileConfig,
    ) -> Self {
        Self {
            input: input
                .or(file.input)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
            output: output
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            top: top.or(file.top).unwrap_or(DEFAULT_TOP_LIMIT),
        }
    }
}
