//! # Header Block Access
//!
//! Raw-text view of a traced message's header block. The block runs from the
//! line after the start line up to the first blank line; everything after that
//! blank line is the body.
//!
//! Folded headers are joined before key/value splitting: a line starting with
//! a space or horizontal tab continues the previous logical header line, and
//! each segment is trimmed before concatenation.
//!
//! ```text
//! Via: SIP/2.0/UDP a.com;branch=1
//!  ;received=2.3
//! ```
//!
//! yields the single field `Via` = `SIP/2.0/UDP a.com;branch=1;received=2.3`.

use serde::Serialize;

/// One logical `name: value` line of a header block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderField {
    /// Header name as written in the message, trimmed
    pub name: String,
    /// Header value with surrounding whitespace removed and folds joined
    pub value: String,
}

impl HeaderField {
    /// Case-insensitive comparison against a header name
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

fn is_continuation(line: &str) -> bool {
    line.starts_with(|c: char| c == ' ' || c == '\t')
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Joins folded lines of the header block into logical header lines.
///
/// The start line is not part of the result. A continuation line directly
/// after the start line has no header to continue and is dropped.
pub fn unfold(raw: &str) -> Vec<String> {
    let mut logical: Vec<String> = Vec::new();

    for line in raw.split('\n').skip(1) {
        if is_blank(line) {
            break;
        }
        if is_continuation(line) {
            // A fold with nothing before it has nothing to continue
            if let Some(last) = logical.last_mut() {
                last.push_str(line.trim());
            }
            continue;
        }
        logical.push(line.trim().to_string());
    }

    logical
}

/// Splits the header block into fields, in header order.
///
/// A line without a colon becomes a field whose name is the whole line and
/// whose value is empty.
pub fn fields(raw: &str) -> Vec<HeaderField> {
    unfold(raw)
        .into_iter()
        .map(|line| {
            let (name, value) = line.split_once(':').unwrap_or((line.as_str(), ""));
            HeaderField {
                name: name.trim().to_string(),
                value: value.trim().to_string(),
            }
        })
        .collect()
}

/// All values of header `name` (case-insensitive), in header order
pub fn values(raw: &str, name: &str) -> Vec<String> {
    fields(raw)
        .into_iter()
        .filter(|field| field.is(name))
        .map(|field| field.value)
        .collect()
}

/// Returns the body: everything after the first blank line, or `""` when the
/// message has no blank line.
pub fn body(raw: &str) -> &str {
    let mut offset = 0;
    for line in raw.split('\n') {
        let next = offset + line.len() + 1;
        if is_blank(line) {
            return raw.get(next..).unwrap_or("");
        }
        offset = next;
    }
    ""
}
