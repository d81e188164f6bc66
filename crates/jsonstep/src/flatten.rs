//! Turns handler calls into a single ordered stream of [`Event`] values.
//!
//! Scalars pass through as [`Event::Scalar`]; container starts, ends and key
//! markers become sentinel events. Consumers can then fold over one sequence
//! instead of implementing [`EventHandler`], or keep the whole stream in an
//! [`Events`] collector.
use alloc::vec::Vec;
use core::{convert::Infallible, ops::Deref};

use crate::{Event, EventHandler, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Array,
    Map,
}

/// Forwards every event to a sink closure.
///
/// [`EventHandler::on_end`] carries no kind, so the flattener keeps its own
/// stack of open containers to tell `ArrayEnd` from `MapEnd`.
///
/// ```rust
/// use jsonstep::{Event, Flatten, Parser};
///
/// let mut keys = 0;
/// let mut parser = Parser::new(Flatten::new(|event| {
///     if event == Event::MapKeyNext {
///         keys += 1;
///     }
/// }));
/// parser.feed(r#"{"a": 1, "b": {"c": null}}"#).unwrap();
/// parser.finish().unwrap();
/// assert_eq!(keys, 3);
/// ```
pub struct Flatten<F> {
    sink: F,
    open: Vec<Container>,
}

impl<F: FnMut(Event)> Flatten<F> {
    pub fn new(sink: F) -> Self {
        Self {
            sink,
            open: Vec::new(),
        }
    }

    pub fn into_inner(self) -> F {
        self.sink
    }
}

impl<F: FnMut(Event)> EventHandler for Flatten<F> {
    type Error = Infallible;

    fn on_value(&mut self, value: Scalar) -> Result<(), Self::Error> {
        (self.sink)(Event::Scalar(value));
        Ok(())
    }

    fn on_array(&mut self) -> Result<(), Self::Error> {
        self.open.push(Container::Array);
        (self.sink)(Event::ArrayStart);
        Ok(())
    }

    fn on_map(&mut self) -> Result<(), Self::Error> {
        self.open.push(Container::Map);
        (self.sink)(Event::MapStart);
        Ok(())
    }

    fn on_map_key(&mut self) -> Result<(), Self::Error> {
        (self.sink)(Event::MapKeyNext);
        Ok(())
    }

    fn on_end(&mut self) -> Result<(), Self::Error> {
        let event = end_event(&mut self.open);
        (self.sink)(event);
        Ok(())
    }

    fn on_document_end(&mut self) -> Result<(), Self::Error> {
        (self.sink)(Event::DocumentComplete);
        Ok(())
    }
}

/// Collects the flattened stream in memory.
///
/// Dereferences to the collected `[Event]` slice.
///
/// ```rust
/// use jsonstep::{Event, Events, Parser};
///
/// let mut parser = Parser::new(Events::new());
/// parser.feed("[{}]").unwrap();
/// let events = parser.finish().unwrap();
/// assert_eq!(events.len(), 5);
/// assert_eq!(events[2], Event::MapEnd);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Events {
    events: Vec<Event>,
    open: Vec<Container>,
}

impl Events {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Event> {
        self.events
    }
}

impl Deref for Events {
    type Target = [Event];

    fn deref(&self) -> &[Event] {
        &self.events
    }
}

impl From<Events> for Vec<Event> {
    fn from(events: Events) -> Self {
        events.events
    }
}

impl PartialEq for Events {
    fn eq(&self, other: &Self) -> bool {
        self.events == other.events
    }
}

impl PartialEq<Vec<Event>> for Events {
    fn eq(&self, other: &Vec<Event>) -> bool {
        self.events == *other
    }
}

impl PartialEq<Events> for Vec<Event> {
    fn eq(&self, other: &Events) -> bool {
        *self == other.events
    }
}

impl<const N: usize> PartialEq<[Event; N]> for Events {
    fn eq(&self, other: &[Event; N]) -> bool {
        self.events == other
    }
}

impl EventHandler for Events {
    type Error = Infallible;

    fn on_value(&mut self, value: Scalar) -> Result<(), Self::Error> {
        self.events.push(Event::Scalar(value));
        Ok(())
    }

    fn on_array(&mut self) -> Result<(), Self::Error> {
        self.open.push(Container::Array);
        self.events.push(Event::ArrayStart);
        Ok(())
    }

    fn on_map(&mut self) -> Result<(), Self::Error> {
        self.open.push(Container::Map);
        self.events.push(Event::MapStart);
        Ok(())
    }

    fn on_map_key(&mut self) -> Result<(), Self::Error> {
        self.events.push(Event::MapKeyNext);
        Ok(())
    }

    fn on_end(&mut self) -> Result<(), Self::Error> {
        self.events.push(end_event(&mut self.open));
        Ok(())
    }

    fn on_document_end(&mut self) -> Result<(), Self::Error> {
        self.events.push(Event::DocumentComplete);
        Ok(())
    }
}

/// Closes the innermost open container. An unbalanced end is reported as an
/// array end; the depth guard is the place that rejects it.
fn end_event(open: &mut Vec<Container>) -> Event {
    match open.pop() {
        Some(Container::Map) => Event::MapEnd,
        Some(Container::Array) | None => Event::ArrayEnd,
    }
}

#[cfg(test)]
mod tests {
    use alloc::{vec, vec::Vec};

    use super::*;

    fn drive<H: EventHandler>(h: &mut H) -> Result<(), H::Error> {
        h.on_map()?;
        h.on_map_key()?;
        h.on_value("xs".into())?;
        h.on_array()?;
        h.on_map()?;
        h.on_end()?;
        h.on_value(Scalar::Integer(1))?;
        h.on_end()?;
        h.on_end()?;
        h.on_document_end()
    }

    fn expected() -> Vec<Event> {
        vec![
            Event::MapStart,
            Event::MapKeyNext,
            Event::Scalar(Scalar::Text("xs".into())),
            Event::ArrayStart,
            Event::MapStart,
            Event::MapEnd,
            Event::Scalar(Scalar::Integer(1)),
            Event::ArrayEnd,
            Event::MapEnd,
            Event::DocumentComplete,
        ]
    }

    #[test]
    fn flatten_tracks_container_kinds() {
        let mut out = Vec::new();
        let mut flat = Flatten::new(|e| out.push(e));
        drive(&mut flat).unwrap();
        drop(flat);
        assert_eq!(out, expected());
    }

    #[test]
    fn collector_matches_flatten() {
        let mut out = Events::new();
        drive(&mut out).unwrap();
        assert_eq!(out, expected());
        assert!(out.open.is_empty());
    }

    #[test]
    fn stray_end_is_an_array_end() {
        let mut out = Events::new();
        out.on_map().unwrap();
        out.on_end().unwrap();
        out.on_end().unwrap();
        assert_eq!(out, [Event::MapStart, Event::MapEnd, Event::ArrayEnd]);
    }

    #[test]
    fn collector_keeps_one_entry_per_open_container() {
        let mut out = Events::new();
        for _ in 0..3 {
            out.on_array().unwrap();
        }
        out.on_map().unwrap();
        assert_eq!(
            out.open,
            [Container::Array, Container::Array, Container::Array, Container::Map]
        );
        out.on_end().unwrap();
        assert_eq!(out.open.len(), 3);
        assert_eq!(out.last(), Some(&Event::MapEnd));
    }
}
