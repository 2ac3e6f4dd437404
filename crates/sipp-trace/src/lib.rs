//! SIPp message trace parsing and queries
//!
//! This crate turns the message trace SIPp writes with
//! `-trace_msg -message_file <path>` back into discrete SIP messages and
//! offers the lookups test assertions are built from: start-line fields,
//! case-insensitive header access with line folding, and stable filters by
//! direction, method and status code.
//!
//! ```rust,no_run
//! use sipp_trace::prelude::*;
//!
//! let messages = parse_messages_from_log("logs/sip_msg.log")?;
//! let received = filter_by_direction(&messages, Direction::Received);
//! let ringing = filter_by_status_code(received, 180);
//! assert!(ringing[0].header("to").unwrap_or_default().contains("tag="));
//! # Ok::<(), sipp_trace::Error>(())
//! ```

pub mod error;
pub mod header;
pub mod message;
pub mod parser;
pub mod query;
pub mod types;

pub use error::{Error, Result};
pub use header::HeaderField;
pub use message::TraceMessage;
pub use parser::{parse_messages_from_log, parse_messages_from_reader, parse_messages_from_str};
pub use query::{
    filter_by_direction, filter_by_method, filter_by_status_code, messages_filter, MessageFilter,
};
pub use types::{Direction, TransportKind};

/// Re-export of common types and functions
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::message::TraceMessage;
    pub use crate::parser::{parse_messages_from_log, parse_messages_from_str};
    pub use crate::query::{
        filter_by_direction, filter_by_method, filter_by_status_code, messages_filter,
        MessageFilter,
    };
    pub use crate::types::{Direction, TransportKind};
}
