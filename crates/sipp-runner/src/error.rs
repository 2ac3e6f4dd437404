use std::io;
use thiserror::Error;

use crate::runner::RunStatus;

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing or running a SIPp scenario
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration cannot be turned into a SIPp invocation
    #[error("Invalid SIPp configuration: {0}")]
    InvalidConfig(String),

    /// An injection file field or modifier cannot be represented
    #[error("Invalid injection file: {0}")]
    InvalidInjection(String),

    /// The SIPp binary could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// SIPp ran but did not complete gracefully
    #[error("SIPp run {status}: {command_line}")]
    RunFailed {
        status: RunStatus,
        command_line: String,
    },

    /// Input/output error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The message trace written by SIPp could not be parsed
    #[error("Trace error: {0}")]
    Trace(#[from] sipp_trace::Error),
}
