//! SIPp message trace parsing
//!
//! SIPp started with `-trace_msg -message_file <path>` writes every SIP
//! message it sends or receives to a text log:
//!
//! ```text
//! ----------------------------------------------- 2019-06-29 19:42:16.839845
//! UDP message sent (442 bytes):
//!
//! INVITE sip:0312341234@127.0.0.1:5060 SIP/2.0
//! ...
//! ```
//!
//! [`lines`] recognises the delimiter and protocol lines; the functions
//! re-exported here turn a whole log into an ordered list of
//! [`TraceMessage`](crate::TraceMessage)s.

pub mod lines;
mod log;

pub use log::{parse_messages_from_log, parse_messages_from_reader, parse_messages_from_str};
