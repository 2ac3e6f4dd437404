//! # Traced SIP Message
//!
//! [`TraceMessage`] is one SIP message as SIPp wrote it to its message trace:
//! the raw text, the timestamp of the delimiter line that introduced it, and
//! the transport/direction/length metadata of its protocol line.
//!
//! All accessors work on the raw text and never fail. A request and a response
//! are told apart by [`TraceMessage::status_code`]: only responses carry a
//! numeric second token on their start line.
//!
//! ## Examples
//!
//! ```rust
//! use sipp_trace::{Direction, TraceMessage, TransportKind};
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2019, 6, 29).unwrap()
//!     .and_hms_micro_opt(19, 42, 16, 839845).unwrap();
//! let raw = "SIP/2.0 181 Call Is Being Forwarded\r\nTo: <sip:bob@biloxi.com>;tag=a6c85cf\r\n\r\n";
//! let msg = TraceMessage::new(raw, ts, Direction::Received, TransportKind::Udp, raw.len());
//!
//! assert_eq!(msg.status_code(), Some(181));
//! assert_eq!(msg.status_phrase(), "Call Is Being Forwarded");
//! assert_eq!(msg.header("to").as_deref(), Some("<sip:bob@biloxi.com>;tag=a6c85cf"));
//! ```

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::header::{self, HeaderField};
use crate::types::{Direction, TransportKind};

/// Format used when rendering timestamps, microsecond precision
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A SIP message captured in a SIPp message trace
///
/// Fields are fixed at construction; the type only hands out read access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceMessage {
    raw: String,
    timestamp: NaiveDateTime,
    direction: Direction,
    transport: TransportKind,
    declared_length: usize,
}

/// Cuts `text` to at most `length` bytes without splitting a UTF-8 sequence
fn truncate_to_byte_length(mut text: String, length: usize) -> String {
    if text.len() > length {
        let mut cut = length;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    text
}

impl TraceMessage {
    /// Creates a message, keeping at most `declared_length` bytes of `raw`.
    ///
    /// Leading whitespace of `raw` is dropped first, the same way the log
    /// parser drops the blank line between a protocol line and the message.
    pub fn new(
        raw: impl Into<String>,
        timestamp: NaiveDateTime,
        direction: Direction,
        transport: TransportKind,
        declared_length: usize,
    ) -> Self {
        let raw = raw.into();
        let raw = match raw.find(|c: char| !c.is_whitespace()) {
            Some(0) => raw,
            Some(start) => raw[start..].to_string(),
            None => String::new(),
        };

        TraceMessage {
            raw: truncate_to_byte_length(raw, declared_length),
            timestamp,
            direction,
            transport,
            declared_length,
        }
    }

    /// The message text exactly as captured, at most `declared_length` bytes
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn transport(&self) -> TransportKind {
        self.transport
    }

    /// Byte length announced on the protocol line
    pub fn declared_length(&self) -> usize {
        self.declared_length
    }

    /// First line of the message without its line terminator
    pub fn start_line(&self) -> &str {
        self.raw
            .split('\n')
            .next()
            .unwrap_or("")
            .trim_end_matches('\r')
    }

    fn start_line_token(&self, index: usize) -> Option<&str> {
        self.start_line().split_whitespace().nth(index)
    }

    /// Status code of a response; `None` for requests
    ///
    /// The second token of the start line is a URI for requests and a number
    /// for responses, so this is also the request/response discriminator.
    pub fn status_code(&self) -> Option<u32> {
        self.start_line_token(1)?.parse::<u32>().ok()
    }

    /// Reason phrase: start-line tokens from the third on, joined by single spaces
    pub fn status_phrase(&self) -> String {
        self.start_line()
            .split_whitespace()
            .skip(2)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// First token of the start line.
    ///
    /// For a response this is the protocol version (`SIP/2.0`); query
    /// responses through [`status_code`](Self::status_code) instead.
    pub fn method(&self) -> Option<&str> {
        self.start_line_token(0)
    }

    /// Second token of the start line (the status code text for a response)
    pub fn request_uri(&self) -> Option<&str> {
        self.start_line_token(1)
    }

    pub fn is_response(&self) -> bool {
        self.status_code().is_some()
    }

    pub fn is_request(&self) -> bool {
        self.method().is_some() && !self.is_response()
    }

    /// All values of header `name`, matched case-insensitively, in header order.
    ///
    /// Headers may repeat (`Via`, `Record-Route`); index into the result to
    /// pick a specific one.
    pub fn header_values(&self, name: &str) -> Vec<String> {
        header::values(&self.raw, name)
    }

    /// First value of header `name`
    pub fn header(&self, name: &str) -> Option<String> {
        self.header_values(name).into_iter().next()
    }

    /// Every logical header line, folded continuations joined
    pub fn headers(&self) -> Vec<HeaderField> {
        header::fields(&self.raw)
    }

    /// Text after the blank line that ends the header block
    pub fn body(&self) -> &str {
        header::body(&self.raw)
    }
}

impl fmt::Display for TraceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-- {}", self.timestamp.format(TIMESTAMP_FORMAT))?;
        let arrow = self.direction.arrow();
        for line in self.raw.split('\n') {
            writeln!(f, "{} {}", arrow, line.trim_end_matches('\r'))?;
        }
        Ok(())
    }
}
