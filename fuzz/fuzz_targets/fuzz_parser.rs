#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use jsonstep::{Event, EventHandler, Flatten, NestingCounter, Parser, ParserOptions, SyntaxError};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

/// 1 flag byte + 4-byte split seed.
const HEADER: usize = 5;

const MAX_DEPTH: usize = 64;

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

static WHITESPACE: &[&str] = &[" ", "\t", "\n", "\r", "\u{a0}", "\u{2003}", "\u{3000}"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Mostly leaves mutation to libFuzzer; every tenth run writes a fresh
/// header followed by whitespace-separated serialized values.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size >= HEADER && !seed.is_multiple_of(10) {
        return fuzzer_mutate(data, size, max_size);
    }
    if max_size < HEADER {
        return fuzzer_mutate(data, size, max_size);
    }

    data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x07);
    data[1..HEADER].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

    let mut len = HEADER;
    let target = size.clamp(HEADER + 1, max_size);
    while len < target {
        len += write_value(&mut data[len..max_size], size);
        len += write_whitespace(&mut data[len..max_size]);
    }
    len
}

fn write_whitespace(buf: &mut [u8]) -> usize {
    with_rng(|rng| {
        let mut written = 0;
        for _ in 0..rng.random_range(1..=4) {
            let ws = WHITESPACE[rng.random_range(0..WHITESPACE.len())].as_bytes();
            if written + ws.len() > buf.len() {
                break;
            }
            buf[written..written + ws.len()].copy_from_slice(ws);
            written += ws.len();
        }
        written
    })
}

fn write_value(buf: &mut [u8], size: usize) -> usize {
    let value = loop {
        let bytes: Vec<u8> = with_rng(|rng| {
            let n = rng.random_range(1..=size.max(2) * 2);
            (0..n).map(|_| rng.random::<u8>()).collect()
        });
        if let Ok(value) = ArbitraryValue::arbitrary(&mut Unstructured::new(&bytes)) {
            break value;
        }
    };
    let serialized = serde_json::to_vec(&value.0).unwrap_or_default();
    let len = serialized.len().min(buf.len());
    buf[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(16)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => Value::from(u.arbitrary::<i64>()?),
            3 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            4..=8 => Value::String(u.arbitrary()?),
            9..=12 => {
                let items: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(items.into_iter().map(|v| v.0).collect())
            }
            _ => {
                let members: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(members.into_iter().map(|(k, v)| (k, v.0)).collect::<Map<_, _>>())
            }
        };
        Ok(ArbitraryValue(value))
    }
}

fn is_balanced(events: &[Event]) -> bool {
    let mut open = Vec::new();
    for event in events {
        match event {
            Event::ArrayStart | Event::MapStart => open.push(event),
            Event::ArrayEnd if open.pop() != Some(&Event::ArrayStart) => return false,
            Event::MapEnd if open.pop() != Some(&Event::MapStart) => return false,
            Event::DocumentComplete if !open.is_empty() => return false,
            _ => {}
        }
    }
    open.is_empty()
}

fn parse(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let split_seed = u64::from(u32::from_le_bytes([data[1], data[2], data[3], data[4]]));
    let Ok(text) = std::str::from_utf8(&data[HEADER..]) else {
        return;
    };

    let options = ParserOptions {
        allow_multiple_values: flags & 1 != 0,
        allow_unicode_whitespace: flags & 2 != 0,
        max_depth: (flags & 4 != 0).then_some(MAX_DEPTH),
    };

    let mut events = Vec::new();
    let accepted = {
        let handler = NestingCounter::new(MAX_DEPTH).then(Flatten::new(|e| events.push(e)));
        let mut parser = Parser::with_options(handler, options);
        match split_into_safe_chunks(text, split_seed)
            .into_iter()
            .try_for_each(|chunk| parser.feed(chunk))
        {
            Ok(()) => parser.finish().map(drop),
            Err(err) => Err(err),
        }
    };

    if accepted.is_ok() {
        assert!(is_balanced(&events), "{text:?}: {events:?}");
        assert_eq!(events.last(), Some(&Event::DocumentComplete));
    }

    // Strict single-value mode is plain JSON.
    if flags & 3 == 0 {
        let oracle = serde_json::from_str::<Value>(text);
        let out_of_scope = match (&accepted, &oracle) {
            (Err(err), _) => {
                err.handler_error().is_some()
                    || matches!(
                        err.syntax_error(),
                        Some(SyntaxError::NumberOutOfRange(_) | SyntaxError::NestingLimit { .. })
                    )
            }
            (Ok(()), Err(err)) => err.to_string().contains("recursion limit"),
            (Ok(()), Ok(_)) => false,
        };
        if !out_of_scope {
            assert_eq!(
                accepted.is_ok(),
                oracle.is_ok(),
                "{text:?}: {accepted:?} vs {oracle:?}"
            );
        }
    }
}

fuzz_target!(|data: &[u8]| parse(data));

/// Splits `text` into chunks of at least one byte, each ending on a char
/// boundary, with sizes derived from `split_seed`.
fn split_into_safe_chunks(text: &str, split_seed: u64) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let remaining = text.len() - start;
        let mut size = (split_seed as usize % remaining) + 1;
        while start + size < text.len() && !text.is_char_boundary(start + size) {
            size += 1;
        }
        chunks.push(&text[start..start + size]);
        start += size;
    }
    chunks
}
