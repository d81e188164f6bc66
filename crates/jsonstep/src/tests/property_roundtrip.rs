use alloc::{string::ToString, vec};

use quickcheck::QuickCheck;
use quickcheck_macros::quickcheck;

use super::{
    arbitrary::Value,
    utils::{is_balanced, parse_events, parse_values},
};
use crate::{Event, Scalar};

const PADDING: [&str; 5] = [" ", "\n", "\t", "\r\n", " \n\t "];

fn test_count() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}

/// Property: rendering a value and parsing it back, one character at a time,
/// rebuilds the same value.
#[test]
fn roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let src = value.to_string();
        match parse_values(&src) {
            Ok(values) => values == vec![value],
            Err(err) => panic!("{src:?}: {err}"),
        }
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Value) -> bool);
}

/// Property: whitespace between tokens never changes the events.
#[test]
fn whitespace_invariance_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, padding: usize) -> bool {
        let pad = PADDING[padding % PADDING.len()];
        let compact = parse_events(&value.to_string()).unwrap();
        let padded = parse_events(&value.render(pad)).unwrap();
        compact == padded
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Value, usize) -> bool);
}

/// Property: every start has one matching end.
#[quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn events_are_balanced(value: Value) -> bool {
    let events = parse_events(&value.to_string()).unwrap();
    is_balanced(&events) && events.last() == Some(&Event::DocumentComplete)
}

/// Property: numbers keep their lexical type.
#[quickcheck]
fn integers_stay_integers(n: i64) -> bool {
    parse_events(&alloc::format!("[{n}]")).unwrap()[1] == Event::Scalar(Scalar::Integer(n))
}

#[quickcheck]
#[allow(clippy::float_cmp)]
fn doubles_stay_doubles(d: f64) -> bool {
    if !d.is_finite() {
        return true;
    }
    let src = serde_json::to_string(&d).unwrap();
    match &parse_events(&src).unwrap()[0] {
        Event::Scalar(Scalar::Double(parsed)) => *parsed == d,
        _ => false,
    }
}
