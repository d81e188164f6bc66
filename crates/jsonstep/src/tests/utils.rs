use alloc::{string::String, vec::Vec};
use core::convert::Infallible;

use super::arbitrary::Value;
use crate::{Event, EventHandler, Events, Parser, ParserError, ParserOptions, Scalar};

pub type Result<T> = core::result::Result<T, ParserError<Infallible>>;

/// Feeds `src` one character at a time and finishes the parse.
pub fn parse_events(src: &str) -> Result<Vec<Event>> {
    parse_events_with(src, ParserOptions::default())
}

pub fn parse_events_with(src: &str, options: ParserOptions) -> Result<Vec<Event>> {
    let mut parser = Parser::with_options(Events::new(), options);
    for c in src.chars() {
        parser.parse_next(c)?;
    }
    parser.finish().map(Events::into_vec)
}

/// The first error raised by `src`, whether while feeding or at the end.
pub fn parse_error(src: &str) -> ParserError<Infallible> {
    match parse_events(src) {
        Ok(events) => panic!("expected {src:?} to fail, got {events:?}"),
        Err(err) => err,
    }
}

/// Every start has exactly one matching end of the same kind, and every
/// document ends at depth zero.
pub fn is_balanced(events: &[Event]) -> bool {
    let mut open = Vec::new();
    for event in events {
        match event {
            Event::ArrayStart | Event::MapStart => open.push(event),
            Event::ArrayEnd => {
                if open.pop() != Some(&Event::ArrayStart) {
                    return false;
                }
            }
            Event::MapEnd => {
                if open.pop() != Some(&Event::MapStart) {
                    return false;
                }
            }
            Event::DocumentComplete => {
                if !open.is_empty() {
                    return false;
                }
            }
            Event::MapKeyNext | Event::Scalar(_) => {}
        }
    }
    open.is_empty()
}

enum Frame {
    Array(Vec<Value>),
    Object {
        members: Vec<(String, Value)>,
        key: Option<String>,
    },
}

/// Rebuilds whole values from the event stream, inferring keys from call
/// order alone.
#[derive(Default)]
pub struct TreeBuilder {
    stack: Vec<Frame>,
    current: Option<Value>,
    pub documents: Vec<Value>,
}

impl TreeBuilder {
    fn attach(&mut self, value: Value) {
        match self.stack.last_mut() {
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object { members, key }) => match key.take() {
                Some(key) => members.push((key, value)),
                None => match value {
                    Value::Text(text) => *key = Some(text),
                    other => panic!("non-text key {other:?}"),
                },
            },
            None => self.current = Some(value),
        }
    }
}

impl EventHandler for TreeBuilder {
    type Error = Infallible;

    fn on_value(&mut self, value: Scalar) -> core::result::Result<(), Self::Error> {
        self.attach(Value::from(value));
        Ok(())
    }

    fn on_array(&mut self) -> core::result::Result<(), Self::Error> {
        self.stack.push(Frame::Array(Vec::new()));
        Ok(())
    }

    fn on_map(&mut self) -> core::result::Result<(), Self::Error> {
        self.stack.push(Frame::Object {
            members: Vec::new(),
            key: None,
        });
        Ok(())
    }

    fn on_end(&mut self) -> core::result::Result<(), Self::Error> {
        let value = match self.stack.pop() {
            Some(Frame::Array(items)) => Value::Array(items),
            Some(Frame::Object { members, key }) => {
                assert!(key.is_none(), "map closed after a dangling key");
                Value::Object(members)
            }
            None => panic!("end without a start"),
        };
        self.attach(value);
        Ok(())
    }

    fn on_document_end(&mut self) -> core::result::Result<(), Self::Error> {
        let value = self.current.take().expect("document without a value");
        self.documents.push(value);
        Ok(())
    }
}

/// Parses `src` into whole values.
pub fn parse_values(src: &str) -> Result<Vec<Value>> {
    let mut parser = Parser::new(TreeBuilder::default());
    parser.feed(src)?;
    Ok(parser.finish()?.documents)
}

#[test]
fn balance_check_rejects_mismatched_ends() {
    assert!(is_balanced(&[
        Event::MapStart,
        Event::ArrayStart,
        Event::ArrayEnd,
        Event::MapEnd,
        Event::DocumentComplete,
    ]));
    assert!(!is_balanced(&[Event::MapStart, Event::ArrayEnd]));
    assert!(!is_balanced(&[Event::ArrayStart, Event::DocumentComplete]));
    assert!(!is_balanced(&[Event::ArrayStart]));
}

#[test]
fn tree_builder_pairs_keys_by_position() {
    let values = parse_values(r#"{"a": [1, {"b": null}], "a": "x"}"#).unwrap();
    assert_eq!(
        values,
        alloc::vec![Value::Object(alloc::vec![
            (
                "a".into(),
                Value::Array(alloc::vec![
                    Value::Integer(1),
                    Value::Object(alloc::vec![("b".into(), Value::Null)]),
                ])
            ),
            ("a".into(), Value::Text("x".into())),
        ])]
    );
}
