//! Errors raised while reading a performance log.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PerfLogError {
    /// The log file could not be opened or read.
    #[error("failed to read performance log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from an in-memory or already-open stream failed.
    #[error("failed to read performance log: {0}")]
    Read(#[from] std::io::Error),

    /// The header row is absent.
    #[error("performance log has no header row")]
    MissingHeader,

    /// A column the chart depends on is not in the header.
    #[error("performance log is missing column `{0}`")]
    MissingColumn(String),

    /// A cell could not be parsed as a number.
    #[error("line {line}: column `{column}` has invalid value {value:?}")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },

    /// The header parsed but no turn rows followed.
    #[error("performance log has no turn rows")]
    Empty,
}
