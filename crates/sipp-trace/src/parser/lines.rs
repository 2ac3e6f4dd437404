use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1, take_while_m_n},
    character::complete::{char, digit1},
    combinator::{map_res, value, verify},
    sequence::tuple,
    IResult,
};

use crate::types::{Direction, TransportKind};

/// Components of a delimiter line, e.g.
/// `----------------------------------------------- 2019-06-29 19:42:16.839845`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterLine {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub micros: u32,
}

impl DelimiterLine {
    /// Combines the fields into a timestamp, `None` if they do not name a real instant
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day)?;
        let time = NaiveTime::from_hms_micro_opt(self.hour, self.minute, self.second, self.micros)?;
        Some(NaiveDateTime::new(date, time))
    }
}

/// Components of a protocol line, e.g. `UDP message sent (442 bytes):`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolLine {
    pub transport: TransportKind,
    pub direction: Direction,
    pub length: usize,
}

fn fixed_digits<'a>(count: usize) -> impl FnMut(&'a str) -> IResult<&'a str, u32> {
    move |input: &'a str| {
        map_res(
            take_while_m_n(count, count, |c: char| c.is_ascii_digit()),
            |s: &str| s.parse::<u32>(),
        )(input)
    }
}

// date = 4DIGIT "-" 2DIGIT "-" 2DIGIT
fn date(input: &str) -> IResult<&str, (u32, u32, u32)> {
    let (input, (year, _, month, _, day)) = tuple((
        fixed_digits(4),
        char('-'),
        fixed_digits(2),
        char('-'),
        fixed_digits(2),
    ))(input)?;
    Ok((input, (year, month, day)))
}

// time = 2DIGIT ":" 2DIGIT ":" 2DIGIT "." 6DIGIT
fn time(input: &str) -> IResult<&str, (u32, u32, u32, u32)> {
    let (input, (hour, _, minute, _, second, _, micros)) = tuple((
        fixed_digits(2),
        char(':'),
        fixed_digits(2),
        char(':'),
        fixed_digits(2),
        char('.'),
        fixed_digits(6),
    ))(input)?;
    Ok((input, (hour, minute, second, micros)))
}

/// Parses a delimiter line: `1*"-" SP date SP time *ANY`
///
/// Anything after the microseconds is ignored and returned as the remainder.
pub fn delimiter_line(input: &str) -> IResult<&str, DelimiterLine> {
    let (input, _) = take_while1(|c| c == '-')(input)?;
    let (input, _) = char(' ')(input)?;
    let (input, (year, month, day)) = date(input)?;
    let (input, _) = char(' ')(input)?;
    let (input, (hour, minute, second, micros)) = time(input)?;

    Ok((
        input,
        DelimiterLine {
            year: year as i32,
            month,
            day,
            hour,
            minute,
            second,
            micros,
        },
    ))
}

fn transport(input: &str) -> IResult<&str, TransportKind> {
    alt((
        value(TransportKind::Udp, tag("UDP")),
        value(TransportKind::Tcp, tag("TCP")),
        value(TransportKind::Sctp, tag("SCTP")),
    ))(input)
}

fn direction(input: &str) -> IResult<&str, Direction> {
    alt((
        value(Direction::Sent, tag("sent")),
        value(Direction::Received, tag("received")),
    ))(input)
}

/// Parses a protocol line:
/// `("UDP" / "TCP" / "SCTP") " message " ("sent" / "received") SP *NONDIGIT 1*DIGIT *NONDIGIT "bytes" *ANY`
///
/// The first run of digits is the declared length; the literal `bytes` must
/// follow it before any other digit appears.
pub fn protocol_line(input: &str) -> IResult<&str, ProtocolLine> {
    let (input, transport) = transport(input)?;
    let (input, _) = tag(" message ")(input)?;
    let (input, direction) = direction(input)?;
    let (input, _) = char(' ')(input)?;
    let (input, _) = take_while(|c: char| !c.is_ascii_digit())(input)?;
    let (input, length) = map_res(digit1, |s: &str| s.parse::<usize>())(input)?;
    let (input, _) = verify(take_while(|c: char| !c.is_ascii_digit()), |s: &str| {
        s.contains("bytes")
    })(input)?;

    Ok((
        input,
        ProtocolLine {
            transport,
            direction,
            length,
        },
    ))
}
