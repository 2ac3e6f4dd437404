use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::message::TraceMessage;
use crate::parser::lines::{delimiter_line, protocol_line, ProtocolLine};

/// Message being accumulated between two delimiter lines
struct PendingMessage {
    /// Line number of the delimiter that opened it
    opened_at: usize,
    timestamp: NaiveDateTime,
    protocol: Option<ProtocolLine>,
    text: String,
}

impl PendingMessage {
    fn new(opened_at: usize, timestamp: NaiveDateTime) -> Self {
        PendingMessage {
            opened_at,
            timestamp,
            protocol: None,
            text: String::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        // Leading whitespace of the accumulated text is never kept
        if self.text.is_empty() {
            let line = line.trim_start();
            if line.is_empty() {
                return;
            }
            self.text.push_str(line);
        } else {
            self.text.push_str(line);
        }
        self.text.push('\n');
    }

    fn finish(self) -> Result<TraceMessage> {
        let protocol = self
            .protocol
            .ok_or_else(|| Error::malformed(self.opened_at, "message has no protocol line"))?;

        let message = TraceMessage::new(
            self.text,
            self.timestamp,
            protocol.direction,
            protocol.transport,
            protocol.length,
        );
        trace!(
            line = self.opened_at,
            direction = %message.direction(),
            start_line = message.start_line(),
            "finished trace message"
        );
        Ok(message)
    }
}

/// Line-by-line state machine over a trace log
#[derive(Default)]
struct LogScanner {
    messages: Vec<TraceMessage>,
    pending: Option<PendingMessage>,
    line_no: usize,
}

impl LogScanner {
    fn feed(&mut self, line: &str) -> Result<()> {
        self.line_no += 1;

        if let Ok((_, delimiter)) = delimiter_line(line) {
            let timestamp = delimiter.to_datetime().ok_or_else(|| Error::InvalidTimestamp {
                line: self.line_no,
                value: line.trim_start_matches('-').trim().to_string(),
            })?;
            if let Some(previous) = self.pending.take() {
                self.messages.push(previous.finish()?);
            }
            self.pending = Some(PendingMessage::new(self.line_no, timestamp));
            return Ok(());
        }

        if let Ok((_, protocol)) = protocol_line(line) {
            match self.pending.as_mut() {
                None => {
                    return Err(Error::malformed(
                        self.line_no,
                        "protocol line before any delimiter line",
                    ));
                }
                // Once the message has its protocol line or any text, a
                // matching line is message content
                Some(pending) if pending.protocol.is_none() && pending.text.is_empty() => {
                    pending.protocol = Some(protocol);
                    return Ok(());
                }
                Some(_) => {}
            }
        }

        match self.pending.as_mut() {
            Some(pending) => pending.push_line(line),
            None if line.trim().is_empty() => {}
            None => {
                return Err(Error::malformed(self.line_no, "content before any delimiter line"));
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<TraceMessage>> {
        if let Some(last) = self.pending.take() {
            self.messages.push(last.finish()?);
        }
        Ok(self.messages)
    }
}

/// Parses a SIPp message trace from any buffered reader.
///
/// Lines are split on `\n` only, so a `\r` before it stays part of the
/// message text and CRLF-terminated SIP lines come back byte for byte.
pub fn parse_messages_from_reader<R: BufRead>(mut reader: R) -> Result<Vec<TraceMessage>> {
    let mut scanner = LogScanner::default();
    let mut line = String::new();
    let mut ends_with_newline = false;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        ends_with_newline = line.ends_with('\n');
        scanner.feed(line.strip_suffix('\n').unwrap_or(line.as_str()))?;
    }

    // A terminating newline leaves one more, empty, line behind it
    if ends_with_newline {
        scanner.feed("")?;
    }

    scanner.finish()
}

/// Parses a SIPp message trace held in memory
pub fn parse_messages_from_str(log: &str) -> Result<Vec<TraceMessage>> {
    parse_messages_from_reader(log.as_bytes())
}

/// Parses the SIPp message trace at `path` (the file given to `-message_file`).
///
/// The file is held open only for the duration of the call.
pub fn parse_messages_from_log(path: impl AsRef<Path>) -> Result<Vec<TraceMessage>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let messages = parse_messages_from_reader(BufReader::new(file))?;

    debug!(path = %path.display(), count = messages.len(), "parsed SIPp message trace");
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, TransportKind};

    const DELIM: &str = "----------------------------------------------- 2019-06-29 19:42:16.839845";

    #[test]
    fn test_single_message() {
        let wire = "OPTIONS sip:a SIP/2.0\r\nContent-Length: 0\r\n\r\n";
        let log = format!("{}\nUDP message sent ({} bytes):\n\n{}\n", DELIM, wire.len(), wire);

        let messages = parse_messages_from_str(&log).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].raw(), wire);
        assert_eq!(messages[0].direction(), Direction::Sent);
        assert_eq!(messages[0].transport(), TransportKind::Udp);
        assert_eq!(messages[0].declared_length(), wire.len());
    }

    #[test]
    fn test_empty_log() {
        assert!(parse_messages_from_str("").unwrap().is_empty());
        assert!(parse_messages_from_str("\n\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_short_capture_keeps_logged_text() {
        // Declared length exceeds what was logged: everything logged is kept
        let log = format!("{}\nTCP message received (500 bytes):\n\nSIP/2.0 200 OK", DELIM);
        let messages = parse_messages_from_str(&log).unwrap();
        assert_eq!(messages[0].raw(), "SIP/2.0 200 OK\n");
    }

    #[test]
    fn test_protocol_line_before_delimiter() {
        let log = format!("UDP message sent (10 bytes):\n{}\n", DELIM);
        let err = parse_messages_from_str(&log).unwrap_err();
        assert!(matches!(err, Error::MalformedLog { line: 1, .. }));
    }

    #[test]
    fn test_content_before_delimiter() {
        let log = format!("\nINVITE sip:a SIP/2.0\n{}\n", DELIM);
        let err = parse_messages_from_str(&log).unwrap_err();
        assert!(matches!(err, Error::MalformedLog { line: 2, .. }));
        assert!(err.is_malformed());
    }

    #[test]
    fn test_missing_protocol_line() {
        let log = format!("{}\n\nINVITE sip:a SIP/2.0\n", DELIM);
        let err = parse_messages_from_str(&log).unwrap_err();
        assert!(matches!(err, Error::MalformedLog { line: 1, .. }));
    }

    #[test]
    fn test_protocol_like_body_line_is_content() {
        let wire = "MESSAGE sip:a SIP/2.0\r\nContent-Length: 24\r\n\r\nUDP message sent 3 bytes\n";
        let log = format!("{}\nUDP message sent ({} bytes):\n\n{}", DELIM, wire.len(), wire);

        let messages = parse_messages_from_str(&log).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].raw(), wire);
        assert_eq!(messages[0].body(), "UDP message sent 3 bytes\n");
        assert_eq!(messages[0].declared_length(), wire.len());
    }

    #[test]
    fn test_repeated_protocol_line_is_content() {
        let log = format!(
            "{}\nUDP message sent (60 bytes):\nTCP message received (10 bytes):\n",
            DELIM
        );
        let messages = parse_messages_from_str(&log).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].transport(), TransportKind::Udp);
        assert_eq!(messages[0].declared_length(), 60);
        assert_eq!(messages[0].start_line(), "TCP message received (10 bytes):");
    }

    #[test]
    fn test_protocol_line_after_content_is_not_metadata() {
        // Text before any protocol line leaves the message without one
        let log = format!("{}\nINVITE sip:a SIP/2.0\nUDP message sent (10 bytes):\n", DELIM);
        let err = parse_messages_from_str(&log).unwrap_err();
        assert!(matches!(err, Error::MalformedLog { line: 1, .. }));
    }

    #[test]
    fn test_invalid_timestamp() {
        let log = "--- 2019-02-30 19:42:16.839845\nUDP message sent (0 bytes):\n";
        let err = parse_messages_from_str(log).unwrap_err();
        match err {
            Error::InvalidTimestamp { line, value } => {
                assert_eq!(line, 1);
                assert_eq!(value, "2019-02-30 19:42:16.839845");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = parse_messages_from_log("/nonexistent/sipp/trace.log").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_malformed());
    }
}
