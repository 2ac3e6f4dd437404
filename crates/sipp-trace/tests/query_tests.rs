//! Property tests for the message queries and the length invariant

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use sipp_trace::prelude::*;

const START_LINES: &[&str] = &[
    "INVITE sip:bob@biloxi.com SIP/2.0",
    "ACK sip:bob@biloxi.com SIP/2.0",
    "BYE sip:bob@biloxi.com SIP/2.0",
    "SIP/2.0 100 Trying",
    "SIP/2.0 180 Ringing",
    "SIP/2.0 200 OK",
];

fn ts() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 6, 29)
        .unwrap()
        .and_hms_micro_opt(19, 42, 16, 839845)
        .unwrap()
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Sent), Just(Direction::Received)]
}

fn arb_message() -> impl Strategy<Value = TraceMessage> {
    (0..START_LINES.len(), arb_direction()).prop_map(|(index, direction)| {
        let raw = format!("{}\r\nContent-Length: 0\r\n\r\n", START_LINES[index]);
        let len = raw.len();
        TraceMessage::new(raw, ts(), direction, TransportKind::Udp, len)
    })
}

fn arb_filter() -> impl Strategy<Value = MessageFilter> {
    (
        proptest::option::of(arb_direction()),
        proptest::option::of(prop_oneof![Just("INVITE"), Just("BYE"), Just("SIP/2.0")]),
        proptest::option::of(prop_oneof![Just(100u32), Just(180u32), Just(200u32)]),
    )
        .prop_map(|(direction, method, status_code)| MessageFilter {
            direction,
            method: method.map(str::to_string),
            status_code,
        })
}

/// Positions of `subset` inside `all`, by identity
fn positions(all: &[TraceMessage], subset: &[&TraceMessage]) -> Vec<usize> {
    subset
        .iter()
        .map(|picked| {
            all.iter()
                .position(|m| std::ptr::eq(m, *picked))
                .expect("filter returned a message not in the input")
        })
        .collect()
}

fn strictly_increasing(positions: &[usize]) -> bool {
    positions.windows(2).all(|w| w[0] < w[1])
}

proptest! {
    #[test]
    fn direction_filter_is_ordered_subsequence(
        messages in proptest::collection::vec(arb_message(), 0..40),
        direction in arb_direction(),
    ) {
        let filtered = filter_by_direction(&messages, direction);
        let pos = positions(&messages, &filtered);

        prop_assert!(strictly_increasing(&pos));
        prop_assert!(filtered.iter().all(|m| m.direction() == direction));
        prop_assert_eq!(
            filtered.len(),
            messages.iter().filter(|m| m.direction() == direction).count()
        );
    }

    #[test]
    fn status_and_method_filters_are_ordered(
        messages in proptest::collection::vec(arb_message(), 0..40),
    ) {
        let ok = filter_by_status_code(&messages, 200);
        prop_assert!(strictly_increasing(&positions(&messages, &ok)));
        prop_assert!(ok.iter().all(|m| m.is_response()));

        let invites = filter_by_method(&messages, "INVITE");
        prop_assert!(strictly_increasing(&positions(&messages, &invites)));
        prop_assert!(invites.iter().all(|m| m.status_code().is_none()));
    }

    #[test]
    fn combined_filter_matches_every_criterion(
        messages in proptest::collection::vec(arb_message(), 0..40),
        filter in arb_filter(),
    ) {
        let matched = messages_filter(&messages, &filter);
        prop_assert!(strictly_increasing(&positions(&messages, &matched)));

        if filter.is_empty() {
            prop_assert!(matched.is_empty());
        } else {
            let mut expected: Vec<&TraceMessage> = messages.iter().collect();
            if let Some(direction) = filter.direction {
                expected = filter_by_direction(expected, direction);
            }
            if let Some(method) = filter.method.as_deref() {
                expected = filter_by_method(expected, method);
            }
            if let Some(code) = filter.status_code {
                expected = filter_by_status_code(expected, code);
            }
            prop_assert_eq!(positions(&messages, &matched), positions(&messages, &expected));
        }
    }

    #[test]
    fn raw_text_never_exceeds_declared_length(
        body in "[a-zA-Z0-9 éü€]{0,64}",
        cut in 0usize..128,
    ) {
        let raw = format!("MESSAGE sip:a SIP/2.0\r\n\r\n{}\n", body);
        let msg = TraceMessage::new(raw.clone(), ts(), Direction::Sent, TransportKind::Udp, cut);

        prop_assert!(msg.raw().len() <= cut);
        prop_assert!(raw.starts_with(msg.raw()));
        if cut <= raw.len() && raw.is_char_boundary(cut) {
            prop_assert_eq!(msg.raw().len(), cut);
        }
    }

    #[test]
    fn header_lookup_ignores_case(name in "[tT][oO]") {
        let raw = "SIP/2.0 180 Ringing\r\nTo: <sip:bob@biloxi.com>;tag=8321234356\r\n\r\n";
        let msg = TraceMessage::new(raw, ts(), Direction::Received, TransportKind::Udp, raw.len());
        prop_assert_eq!(msg.header_values(&name), msg.header_values("To"));
        prop_assert_eq!(msg.header_values(&name).len(), 1);
    }
}
