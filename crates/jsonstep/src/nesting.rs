//! Structural depth guard.
//!
//! Limits how deep a document may nest, so that hostile or broken input
//! cannot make a downstream consumer grow without bound. It does not check
//! that starts and ends match in kind (`{[}]`); the parser already does.
use thiserror::Error;

use crate::{EventHandler, Scalar};

/// Container depth allowed by [`NestingCounter::default`].
pub const DEFAULT_NESTING_LIMIT: usize = 1000;

#[derive(Error, Debug, PartialEq)]
pub enum NestingError<E> {
    /// A container start would take the depth past the limit.
    #[error("nesting depth reached the limit of {limit}")]
    LimitReached { limit: usize },
    /// More container ends than starts were observed.
    #[error("nesting underflow: container end without a matching start")]
    Underflow,
    /// The wrapped handler failed.
    #[error("{0}")]
    Inner(E),
}

/// Counts container depth and forwards every call to the wrapped handler.
///
/// Used standalone through [`crate::then`], or as a decorator:
///
/// ```rust
/// use jsonstep::{Events, NestingCounter, Parser};
///
/// let mut parser = Parser::new(NestingCounter::wrap(Events::new(), 1));
/// parser.feed("[1]").unwrap();
/// assert_eq!(parser.finish().unwrap().into_inner().len(), 4);
///
/// let mut parser = Parser::new(NestingCounter::wrap(Events::new(), 1));
/// let err = parser.feed("[[1]]").unwrap_err();
/// assert_eq!(err.column, 2);
/// ```
#[derive(Debug, Clone)]
pub struct NestingCounter<H = ()> {
    inner: H,
    limit: usize,
    depth: usize,
}

impl NestingCounter {
    /// A counter that only counts, with no handler behind it.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self::wrap((), limit)
    }
}

impl Default for NestingCounter {
    fn default() -> Self {
        Self::new(DEFAULT_NESTING_LIMIT)
    }
}

impl<H> NestingCounter<H> {
    pub fn wrap(inner: H, limit: usize) -> Self {
        Self {
            inner,
            limit,
            depth: 0,
        }
    }

    /// Number of currently open containers.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: EventHandler> NestingCounter<H> {
    fn down(&mut self) -> Result<(), NestingError<H::Error>> {
        if self.depth >= self.limit {
            log::debug!("nesting depth {} reached limit", self.depth);
            return Err(NestingError::LimitReached { limit: self.limit });
        }
        self.depth += 1;
        Ok(())
    }

    fn up(&mut self) -> Result<(), NestingError<H::Error>> {
        if self.depth == 0 {
            return Err(NestingError::Underflow);
        }
        self.depth -= 1;
        Ok(())
    }
}

impl<H: EventHandler> EventHandler for NestingCounter<H> {
    type Error = NestingError<H::Error>;

    fn on_value(&mut self, value: Scalar) -> Result<(), Self::Error> {
        self.inner.on_value(value).map_err(NestingError::Inner)
    }

    fn on_array(&mut self) -> Result<(), Self::Error> {
        self.down()?;
        self.inner.on_array().map_err(NestingError::Inner)
    }

    fn on_map(&mut self) -> Result<(), Self::Error> {
        self.down()?;
        self.inner.on_map().map_err(NestingError::Inner)
    }

    fn on_map_key(&mut self) -> Result<(), Self::Error> {
        self.inner.on_map_key().map_err(NestingError::Inner)
    }

    fn on_end(&mut self) -> Result<(), Self::Error> {
        self.up()?;
        self.inner.on_end().map_err(NestingError::Inner)
    }

    fn on_document_end(&mut self) -> Result<(), Self::Error> {
        self.inner.on_document_end().map_err(NestingError::Inner)
    }
}
