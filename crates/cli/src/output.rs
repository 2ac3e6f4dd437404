//! Rendering parsed messages for the terminal

use colored::{ColoredString, Colorize};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use sipp_trace::message::TIMESTAMP_FORMAT;
use sipp_trace::{Direction, TraceMessage};

fn arrow(direction: Direction) -> ColoredString {
    let arrow = direction.arrow().to_string();
    match direction {
        Direction::Sent => arrow.green(),
        Direction::Received => arrow.cyan(),
    }
}

/// Dump form of one message: delimiter line, then every line behind its arrow
pub fn render_message(message: &TraceMessage) -> String {
    let mut out = format!(
        "{} {}\n",
        "--".dimmed(),
        message.timestamp().format(TIMESTAMP_FORMAT).to_string().bold()
    );
    let arrow = arrow(message.direction());
    for line in message.raw().split('\n') {
        out.push_str(&format!("{} {}\n", arrow, line.trim_end_matches('\r')));
    }
    out
}

pub fn render_json<'a, I>(messages: I) -> serde_json::Result<String>
where
    I: IntoIterator<Item = &'a TraceMessage>,
{
    let messages: Vec<&TraceMessage> = messages.into_iter().collect();
    serde_json::to_string_pretty(&messages)
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Dir")]
    direction: &'static str,
    #[tabled(rename = "Transport")]
    transport: &'static str,
    #[tabled(rename = "Start line")]
    start_line: String,
    #[tabled(rename = "Bytes")]
    length: usize,
}

/// One table row per message
pub fn render_summary(messages: &[TraceMessage]) -> String {
    let rows = messages.iter().enumerate().map(|(index, m)| SummaryRow {
        index: index + 1,
        timestamp: m.timestamp().format(TIMESTAMP_FORMAT).to_string(),
        direction: m.direction().as_str(),
        transport: m.transport().as_str(),
        start_line: m.start_line().to_string(),
        length: m.declared_length(),
    });
    Table::new(rows).with(Style::psql()).to_string()
}
