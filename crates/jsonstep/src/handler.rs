//! The capability interface the parser emits into, and fan-out composition.
use core::{
    convert::Infallible,
    fmt::{Debug, Display},
};

use thiserror::Error;

use crate::event::Scalar;

/// Receives parse events synchronously, in document order.
///
/// Inside a map the scalar calls alternate between keys and values: key1,
/// value1, key2, value2, ... Handlers that want an explicit marker can
/// override [`on_map_key`](Self::on_map_key), which the parser calls right
/// before each key.
///
/// Returning `Err` from any method aborts the whole parse; the error comes
/// back to the caller as [`ErrorKind::Handler`](crate::ErrorKind::Handler).
pub trait EventHandler {
    type Error: Debug + Display;

    /// A complete scalar value, including map keys.
    fn on_value(&mut self, value: Scalar) -> Result<(), Self::Error>;

    /// Start of an array. Elements follow as nested calls.
    fn on_array(&mut self) -> Result<(), Self::Error>;

    /// Start of a map (object).
    fn on_map(&mut self) -> Result<(), Self::Error>;

    /// The next [`on_value`](Self::on_value) call delivers a map key.
    fn on_map_key(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// End of the most recently started array or map.
    ///
    /// Every [`on_array`](Self::on_array) or [`on_map`](Self::on_map) call is
    /// eventually followed by exactly one matching `on_end`.
    fn on_end(&mut self) -> Result<(), Self::Error>;

    /// A top-level value has been completely parsed.
    fn on_document_end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Forwards every event to `self` first and then to `next`.
    fn then<B: EventHandler>(self, next: B) -> Then<Self, B>
    where
        Self: Sized,
    {
        then(self, next)
    }
}

impl<H: EventHandler + ?Sized> EventHandler for &mut H {
    type Error = H::Error;

    fn on_value(&mut self, value: Scalar) -> Result<(), Self::Error> {
        (**self).on_value(value)
    }

    fn on_array(&mut self) -> Result<(), Self::Error> {
        (**self).on_array()
    }

    fn on_map(&mut self) -> Result<(), Self::Error> {
        (**self).on_map()
    }

    fn on_map_key(&mut self) -> Result<(), Self::Error> {
        (**self).on_map_key()
    }

    fn on_end(&mut self) -> Result<(), Self::Error> {
        (**self).on_end()
    }

    fn on_document_end(&mut self) -> Result<(), Self::Error> {
        (**self).on_document_end()
    }
}

/// Discards every event. Useful when the parser is only run for validation,
/// or as the inner handler of a standalone [`NestingCounter`](crate::NestingCounter).
impl EventHandler for () {
    type Error = Infallible;

    fn on_value(&mut self, _value: Scalar) -> Result<(), Self::Error> {
        Ok(())
    }

    fn on_array(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn on_map(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn on_end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Error of a [`Then`] pair, telling which side aborted.
#[derive(Error, Debug, PartialEq)]
pub enum ThenError<A, B> {
    #[error("{0}")]
    First(A),
    #[error("{0}")]
    Second(B),
}

/// Fan-out of every event to two handlers, `first` before `second`.
///
/// If `first` fails, `second` does not see the event.
#[derive(Debug, Clone, Default)]
pub struct Then<A, B> {
    first: A,
    second: B,
}

/// Combines two handlers into one that calls `a` and then `b` for each event.
///
/// The usual pairing is a depth guard in front of the real consumer:
///
/// ```rust
/// use jsonstep::{Events, NestingCounter, Parser, then};
///
/// let mut parser = Parser::new(then(NestingCounter::new(2), Events::new()));
/// parser.feed("[[1]]").unwrap();
/// let (_, events) = parser.finish().unwrap().into_inner();
/// assert_eq!(events.len(), 6);
///
/// let mut parser = Parser::new(then(NestingCounter::new(2), Events::new()));
/// assert!(parser.feed("[[[1]]]").is_err());
/// ```
pub fn then<A: EventHandler, B: EventHandler>(a: A, b: B) -> Then<A, B> {
    Then {
        first: a,
        second: b,
    }
}

impl<A, B> Then<A, B> {
    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

macro_rules! fan_out {
    ($self:ident, $method:ident $(, $arg:expr)?) => {{
        $self.first.$method($($arg.clone())?).map_err(ThenError::First)?;
        $self.second.$method($($arg)?).map_err(ThenError::Second)
    }};
}

impl<A: EventHandler, B: EventHandler> EventHandler for Then<A, B> {
    type Error = ThenError<A::Error, B::Error>;

    fn on_value(&mut self, value: Scalar) -> Result<(), Self::Error> {
        fan_out!(self, on_value, value)
    }

    fn on_array(&mut self) -> Result<(), Self::Error> {
        fan_out!(self, on_array)
    }

    fn on_map(&mut self) -> Result<(), Self::Error> {
        fan_out!(self, on_map)
    }

    fn on_map_key(&mut self) -> Result<(), Self::Error> {
        fan_out!(self, on_map_key)
    }

    fn on_end(&mut self) -> Result<(), Self::Error> {
        fan_out!(self, on_end)
    }

    fn on_document_end(&mut self) -> Result<(), Self::Error> {
        fan_out!(self, on_document_end)
    }
}
