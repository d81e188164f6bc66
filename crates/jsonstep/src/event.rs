//! The vocabulary the parser reports to handlers.
//!
//! [`Scalar`] is a complete leaf value. [`Event`] is the flattened form of
//! every handler call, used by [`crate::Flatten`] and by the
//! [`crate::Events`] collector.
//!
//! # Examples
//!
//! ```
//! use jsonstep::{Event, Events, Parser, Scalar};
//!
//! let mut parser = Parser::new(Events::new());
//! parser.feed("[true]").unwrap();
//! assert_eq!(
//!     parser.finish().unwrap(),
//!     vec![
//!         Event::ArrayStart,
//!         Event::Scalar(Scalar::Bool(true)),
//!         Event::ArrayEnd,
//!         Event::DocumentComplete,
//!     ]
//! );
//! ```
use alloc::string::String;

/// A leaf JSON value.
///
/// Numbers are typed once, when their lexeme ends: a lexeme without `.`,
/// `e` or `E` is an [`Integer`](Scalar::Integer), anything else is a
/// [`Double`](Scalar::Double).
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    Text(String),
}

impl Scalar {
    /// Returns the string payload of a [`Scalar::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Text(v.into())
    }
}

/// One step of the flattened event stream.
///
/// Inside a map, `MapKeyNext` precedes every key, so the stream reads
/// `MapStart, MapKeyNext, key, value, MapKeyNext, key, value, ..., MapEnd`.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    ArrayStart,
    ArrayEnd,
    MapStart,
    MapEnd,
    /// The next scalar is a map key.
    MapKeyNext,
    Scalar(Scalar),
    /// A top-level value has been completely parsed.
    DocumentComplete,
}

impl From<Scalar> for Event {
    fn from(v: Scalar) -> Self {
        Self::Scalar(v)
    }
}
