//! # Trace Metadata Types
//!
//! Closed enumerations for the metadata SIPp writes on the protocol line that
//! precedes every traced message:
//!
//! ```text
//! UDP message sent (442 bytes):
//! ```
//!
//! The transport token maps to [`TransportKind`], the `sent`/`received` token
//! maps to [`Direction`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which way a traced message travelled, seen from the SIPp instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Written to the wire by SIPp
    Sent,
    /// Read from the wire by SIPp
    Received,
}

impl Direction {
    /// The token SIPp uses in its trace log
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Sent => "sent",
            Direction::Received => "received",
        }
    }

    /// Arrow used when rendering a message for humans
    pub fn arrow(&self) -> char {
        match self {
            Direction::Sent => '>',
            Direction::Received => '<',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sent" => Ok(Direction::Sent),
            "received" => Ok(Direction::Received),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

/// Transport protocol a traced message was carried over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransportKind {
    Udp,
    Tcp,
    Sctp,
}

impl TransportKind {
    /// The token SIPp uses in its trace log
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Udp => "UDP",
            TransportKind::Tcp => "TCP",
            TransportKind::Sctp => "SCTP",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "UDP" => Ok(TransportKind::Udp),
            "TCP" => Ok(TransportKind::Tcp),
            "SCTP" => Ok(TransportKind::Sctp),
            other => Err(format!("unknown transport: {}", other)),
        }
    }
}
