//! # Message Queries
//!
//! Stable filters over parsed trace messages. Every function keeps the input
//! order and returns references into the original collection, so results can
//! be fed straight into another filter:
//!
//! ```rust
//! use sipp_trace::prelude::*;
//!
//! # fn check(messages: &[TraceMessage]) {
//! let sent = filter_by_direction(messages, Direction::Sent);
//! let first_invite = filter_by_method(sent, "INVITE").into_iter().next();
//! # }
//! ```

use crate::message::TraceMessage;
use crate::types::Direction;

/// Messages travelling in `direction`
pub fn filter_by_direction<'a, I>(messages: I, direction: Direction) -> Vec<&'a TraceMessage>
where
    I: IntoIterator<Item = &'a TraceMessage>,
{
    messages
        .into_iter()
        .filter(|msg| msg.direction() == direction)
        .collect()
}

/// Messages whose start line begins with `method` (exact, case-sensitive)
pub fn filter_by_method<'a, I>(messages: I, method: &str) -> Vec<&'a TraceMessage>
where
    I: IntoIterator<Item = &'a TraceMessage>,
{
    messages
        .into_iter()
        .filter(|msg| msg.method() == Some(method))
        .collect()
}

/// Responses carrying `status_code`
pub fn filter_by_status_code<'a, I>(messages: I, status_code: u32) -> Vec<&'a TraceMessage>
where
    I: IntoIterator<Item = &'a TraceMessage>,
{
    messages
        .into_iter()
        .filter(|msg| msg.status_code() == Some(status_code))
        .collect()
}

/// Combined criteria for [`messages_filter`]
///
/// A message matches when it satisfies every criterion that is set. A filter
/// with no criteria set matches nothing.
///
/// # Examples
///
/// ```rust
/// use sipp_trace::{Direction, MessageFilter};
///
/// let filter = MessageFilter::new()
///     .with_direction(Direction::Received)
///     .with_status_code(181);
/// assert!(!filter.is_empty());
/// assert!(MessageFilter::new().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    pub direction: Option<Direction>,
    pub method: Option<String>,
    pub status_code: Option<u32>,
}

impl MessageFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_status_code(mut self, status_code: u32) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// `true` when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.direction.is_none() && self.method.is_none() && self.status_code.is_none()
    }

    pub fn matches(&self, msg: &TraceMessage) -> bool {
        if self.is_empty() {
            return false;
        }

        self.direction.map_or(true, |direction| msg.direction() == direction)
            && self
                .method
                .as_deref()
                .map_or(true, |method| msg.method() == Some(method))
            && self
                .status_code
                .map_or(true, |code| msg.status_code() == Some(code))
    }
}

/// Messages matching all criteria set in `filter`, in input order
pub fn messages_filter<'a, I>(messages: I, filter: &MessageFilter) -> Vec<&'a TraceMessage>
where
    I: IntoIterator<Item = &'a TraceMessage>,
{
    messages
        .into_iter()
        .filter(|msg| filter.matches(msg))
        .collect()
}
