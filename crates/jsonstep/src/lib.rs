//! An incremental JSON parser that is driven one character at a time.
//!
//! The caller feeds decoded characters into a [`Parser`], which reports
//! structure and scalar values to an [`EventHandler`] as soon as they are
//! determined. Memory use grows with nesting depth, never with document size.
//!
//! ```rust
//! use jsonstep::{Event, Events, Parser, Scalar};
//!
//! let mut parser = Parser::new(Events::new());
//! parser.feed(r#"{"a": [1, 2.5]}"#).unwrap();
//! let events = parser.finish().unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         Event::MapStart,
//!         Event::MapKeyNext,
//!         Event::Scalar(Scalar::Text("a".into())),
//!         Event::ArrayStart,
//!         Event::Scalar(Scalar::Integer(1)),
//!         Event::Scalar(Scalar::Double(2.5)),
//!         Event::ArrayEnd,
//!         Event::MapEnd,
//!         Event::DocumentComplete,
//!     ]
//! );
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod event;
mod flatten;
mod handler;
mod nesting;
mod parser;

#[cfg(test)]
mod tests;

pub use event::{Event, Scalar};
pub use flatten::{Events, Flatten};
pub use handler::{EventHandler, Then, ThenError, then};
pub use nesting::{DEFAULT_NESTING_LIMIT, NestingCounter, NestingError};
pub use parser::{ErrorKind, Parser, ParserError, ParserOptions, SyntaxError};
