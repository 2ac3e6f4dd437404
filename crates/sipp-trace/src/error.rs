use std::io;
use thiserror::Error;

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a SIPp trace log
#[derive(Error, Debug)]
pub enum Error {
    /// The log file could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The log content does not follow the SIPp message trace layout
    #[error("Malformed trace log at line {line}: {reason}")]
    MalformedLog {
        /// 1-based line number in the log
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// A delimiter line carried a date/time that is not a valid calendar value
    #[error("Invalid timestamp at line {line}: {value}")]
    InvalidTimestamp {
        /// 1-based line number in the log
        line: usize,
        /// The timestamp text as it appeared in the log
        value: String,
    },
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedLog {
            line,
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors caused by the log content rather than by I/O
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedLog { .. } | Error::InvalidTimestamp { .. })
    }
}
