//! The character-driven JSON state machine.
//!
//! Overview
//! - [`Parser`] owns the current `State` and an explicit stack of resume
//!   contexts, the states to return to once the current sub-parse completes.
//!   Nesting is tracked by this stack, never by recursion, so memory grows
//!   with depth only.
//! - Each call to [`Parser::parse_next`] runs one exhaustive `match` over the
//!   current state. A transition either consumes the character or asks for it
//!   to be replayed into the new current state.
//!
//! Replay
//! - Numbers have no closing delimiter. A number ends at the first character
//!   that cannot extend it, and that character belongs to the enclosing
//!   state: the number is emitted, its parent resumes and the same character
//!   is delivered again.
//! - A value state that sees a character which cannot start a value hands the
//!   character back to its parent without completing anything. The parent is
//!   still waiting for its value and reports what it expected.
//! - Opening a value at the document root or as the first array element also
//!   replays, so that the value state sees the character that opened it.
//!
//! Every replay moves to a state that consumes or rejects the character, so a
//! character is replayed at most a couple of times.
//!
//! Completion
//! - When a scalar is emitted or a container closes, the parent is popped and
//!   advanced past its pending value (array element done, key read, object
//!   value done). A parent at the document root counts one finished document
//!   and reports it with [`EventHandler::on_document_end`].
//!
//! Scratch buffer
//! - Only one string or number lexeme is in flight at any time, so a single
//!   `String` owned by the parser accumulates it. Escapes are decoded as they
//!   arrive; only the four-hex-digit accumulator and a pending UTF-16 high
//!   surrogate outlive a character.

mod error;
mod escape_buffer;
mod literal_buffer;
mod numbers;
mod options;


use alloc::{string::String, vec::Vec};
use core::mem;

pub use error::{ErrorKind, ParserError, SyntaxError};
use escape_buffer::{UnicodeEscapeBuffer, combine_surrogates, is_high_surrogate, is_low_surrogate};
use literal_buffer::{ExpectedLiteralBuffer, Step};
pub use options::ParserOptions;

use crate::{EventHandler, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentStep {
    /// Between top-level values.
    Ready,
    /// A top-level value is being parsed.
    ValuePending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayStep {
    /// Right after `[`.
    Start,
    /// An element is being parsed.
    Element,
    /// An element finished; `,` or `]` must follow.
    AfterElement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectStep {
    /// Right after `{`.
    Start,
    /// After `,`; a key must follow.
    Key,
    /// A key string is being parsed.
    KeyPending,
    /// A key finished; `:` must follow.
    Colon,
    /// A value is being parsed.
    ValuePending,
    /// A value finished; `,` or `}` must follow.
    AfterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Document(DocumentStep),
    Value,
    Array(ArrayStep),
    Object(ObjectStep),
    String,
    StringEscape,
    StringUnicode(UnicodeEscapeBuffer),
    Number { is_double: bool },
    Literal(ExpectedLiteralBuffer),
}

impl State {
    fn name(self) -> &'static str {
        match self {
            State::Document(_) => "document",
            State::Value => "value",
            State::Array(_) => "array",
            State::Object(_) => "object",
            State::String => "string",
            State::StringEscape => "string escape",
            State::StringUnicode(_) => "unicode escape",
            State::Number { .. } => "number",
            State::Literal(_) => "literal",
        }
    }
}

/// What a transition did with the character it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Consumed,
    /// Deliver the same character to the (new) current state.
    Replay,
}

#[derive(Debug, Clone, Copy)]
enum Container {
    Array,
    Map,
}

/// An incremental JSON parser bound to one [`EventHandler`].
///
/// Characters go in one at a time through [`parse_next`](Self::parse_next)
/// (or a whole `&str` through [`feed`](Self::feed)); events come out of the
/// handler as soon as they are known. [`finish`](Self::finish) marks the end
/// of input, reports truncated documents, and hands the handler back.
///
/// After any error the parser is unusable; every later call fails with
/// [`SyntaxError::Poisoned`]. Start a new parser to recover.
///
/// # Examples
///
/// ```rust
/// use jsonstep::{Event, Events, Parser, Scalar};
///
/// let mut parser = Parser::new(Events::new());
/// for c in r#""\u0041""#.chars() {
///     parser.parse_next(c).unwrap();
/// }
/// assert_eq!(
///     parser.finish().unwrap(),
///     vec![Event::Scalar(Scalar::Text("A".into())), Event::DocumentComplete]
/// );
///
/// let mut parser = Parser::new(Events::new());
/// parser.feed(r#"[[{"k":[]}"#).unwrap();
/// let err = parser.finish().unwrap_err();
/// assert_eq!(err.to_string(), "syntax error: unexpected end of input in array at 1:11");
/// ```
#[derive(Debug)]
pub struct Parser<H> {
    handler: H,
    options: ParserOptions,

    state: State,
    /// Resume contexts, innermost last.
    stack: Vec<State>,
    /// Open arrays and maps.
    depth: usize,
    /// Completed top-level values.
    documents: usize,

    buffer: String,
    pending_high_surrogate: Option<u32>,

    /// Position of the next character, 1-based.
    line: usize,
    column: usize,
    failed: bool,
}

impl<H: EventHandler> Parser<H> {
    /// A parser with default [`ParserOptions`].
    pub fn new(handler: H) -> Self {
        Self::with_options(handler, ParserOptions::default())
    }

    pub fn with_options(handler: H, options: ParserOptions) -> Self {
        Self {
            handler,
            options,
            state: State::Document(DocumentStep::Ready),
            stack: Vec::with_capacity(16),
            depth: 0,
            documents: 0,
            buffer: String::new(),
            pending_high_surrogate: None,
            line: 1,
            column: 1,
            failed: false,
        }
    }

    /// Consumes one character, invoking zero or more handler methods.
    ///
    /// # Errors
    ///
    /// Fails on the first character that cannot continue a valid document,
    /// or when the handler aborts. The error carries that character's line
    /// and column.
    pub fn parse_next(&mut self, c: char) -> Result<(), ParserError<H::Error>> {
        if self.failed {
            return Err(self.error(SyntaxError::Poisoned.into()));
        }
        loop {
            match self.step(c) {
                Ok(Flow::Consumed) => break,
                Ok(Flow::Replay) => {}
                Err(kind) => {
                    self.failed = true;
                    let err = self.error(kind);
                    log::debug!("parse failed: {err}");
                    return Err(err);
                }
            }
        }
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Ok(())
    }

    /// Feeds every character of `text`, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing character; see [`parse_next`](Self::parse_next).
    pub fn feed(&mut self, text: &str) -> Result<(), ParserError<H::Error>> {
        text.chars().try_for_each(|c| self.parse_next(c))
    }

    /// Signals the end of input and returns the handler.
    ///
    /// A number still in flight is completed first, since end of input
    /// terminates it.
    ///
    /// # Errors
    ///
    /// Fails with [`SyntaxError::UnexpectedEndOfInput`] unless at least one
    /// top-level value was completed and nothing is mid-parse, and with the
    /// handler's error if it aborts on the final events.
    pub fn finish(mut self) -> Result<H, ParserError<H::Error>> {
        if self.failed {
            return Err(self.error(SyntaxError::Poisoned.into()));
        }
        match self.end_of_input() {
            Ok(()) => Ok(self.handler),
            Err(kind) => {
                let err = self.error(kind);
                log::debug!("parse failed: {err}");
                Err(err)
            }
        }
    }

    /// The handler, for inspecting what it has received so far.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Returns the handler without validating the end of input.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Number of currently open arrays and maps.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of top-level values completed so far.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Line and column of the next character, both 1-based.
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    // ------------------------------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------------------------------

    fn step(&mut self, c: char) -> Result<Flow, ErrorKind<H::Error>> {
        match self.state {
            State::Document(step) => self.step_document(step, c),
            State::Value => self.step_value(c),
            State::Array(step) => self.step_array(step, c),
            State::Object(step) => self.step_object(step, c),
            State::String => self.step_string(c),
            State::StringEscape => self.step_escape(c),
            State::StringUnicode(mut digits) => {
                if let Some(unit) = digits.feed(c)? {
                    self.push_code_unit(unit)?;
                    self.resume();
                } else {
                    self.state = State::StringUnicode(digits);
                }
                Ok(Flow::Consumed)
            }
            State::Number { is_double } => {
                if numbers::is_number_char(c) {
                    self.buffer.push(c);
                    self.state = State::Number {
                        is_double: is_double || numbers::is_double_marker(c),
                    };
                    Ok(Flow::Consumed)
                } else {
                    self.finish_number(is_double)?;
                    Ok(Flow::Replay)
                }
            }
            State::Literal(mut literal) => match literal.step(c) {
                Step::NeedMore => {
                    self.state = State::Literal(literal);
                    Ok(Flow::Consumed)
                }
                Step::Done(value) => {
                    self.emit_value(value)?;
                    Ok(Flow::Consumed)
                }
                Step::Reject(expected) => Err(SyntaxError::InvalidLiteral { found: c, expected }.into()),
            },
        }
    }

    fn step_document(&mut self, step: DocumentStep, c: char) -> Result<Flow, ErrorKind<H::Error>> {
        match step {
            DocumentStep::Ready if self.is_whitespace(c) => Ok(Flow::Consumed),
            DocumentStep::Ready => {
                if self.documents > 0 && !self.options.allow_multiple_values {
                    return Err(SyntaxError::TrailingCharacter(c).into());
                }
                self.open_value(State::Document(DocumentStep::ValuePending));
                Ok(Flow::Replay)
            }
            DocumentStep::ValuePending => Err(unexpected(c, "a value")),
        }
    }

    fn step_value(&mut self, c: char) -> Result<Flow, ErrorKind<H::Error>> {
        match c {
            c if self.is_whitespace(c) => Ok(Flow::Consumed),
            '{' => {
                self.open_container(Container::Map)?;
                self.state = State::Object(ObjectStep::Start);
                Ok(Flow::Consumed)
            }
            '[' => {
                self.open_container(Container::Array)?;
                self.state = State::Array(ArrayStep::Start);
                Ok(Flow::Consumed)
            }
            '"' => {
                self.buffer.clear();
                self.state = State::String;
                Ok(Flow::Consumed)
            }
            '-' | '0'..='9' => {
                self.buffer.clear();
                self.state = State::Number { is_double: false };
                Ok(Flow::Replay)
            }
            c => {
                if let Some(literal) = ExpectedLiteralBuffer::new(c) {
                    self.state = State::Literal(literal);
                    Ok(Flow::Consumed)
                } else {
                    // Not a value: the parent was waiting for one and will
                    // report the character.
                    self.resume();
                    Ok(Flow::Replay)
                }
            }
        }
    }

    fn step_array(&mut self, step: ArrayStep, c: char) -> Result<Flow, ErrorKind<H::Error>> {
        if self.is_whitespace(c) {
            return Ok(Flow::Consumed);
        }
        match (step, c) {
            (ArrayStep::Start | ArrayStep::AfterElement, ']') => {
                self.close_container()?;
                Ok(Flow::Consumed)
            }
            (ArrayStep::Start, _) => {
                self.open_value(State::Array(ArrayStep::Element));
                Ok(Flow::Replay)
            }
            (ArrayStep::AfterElement, ',') => {
                self.open_value(State::Array(ArrayStep::Element));
                Ok(Flow::Consumed)
            }
            (ArrayStep::AfterElement, c) => Err(unexpected(c, "',' or ']'")),
            (ArrayStep::Element, c) => Err(unexpected(c, "a value")),
        }
    }

    fn step_object(&mut self, step: ObjectStep, c: char) -> Result<Flow, ErrorKind<H::Error>> {
        if self.is_whitespace(c) {
            return Ok(Flow::Consumed);
        }
        match (step, c) {
            (ObjectStep::Start | ObjectStep::AfterValue, '}') => {
                self.close_container()?;
                Ok(Flow::Consumed)
            }
            (ObjectStep::Start | ObjectStep::Key, '"') => {
                self.handler.on_map_key().map_err(ErrorKind::Handler)?;
                self.stack.push(State::Object(ObjectStep::KeyPending));
                self.buffer.clear();
                self.state = State::String;
                Ok(Flow::Consumed)
            }
            (ObjectStep::Colon, ':') => {
                self.open_value(State::Object(ObjectStep::ValuePending));
                Ok(Flow::Consumed)
            }
            (ObjectStep::AfterValue, ',') => {
                self.state = State::Object(ObjectStep::Key);
                Ok(Flow::Consumed)
            }
            (ObjectStep::Start, c) => Err(unexpected(c, "'\"' or '}'")),
            (ObjectStep::Key | ObjectStep::KeyPending, c) => Err(unexpected(c, "'\"'")),
            (ObjectStep::Colon, c) => Err(unexpected(c, "':'")),
            (ObjectStep::ValuePending, c) => Err(unexpected(c, "a value")),
            (ObjectStep::AfterValue, c) => Err(unexpected(c, "',' or '}'")),
        }
    }

    fn step_string(&mut self, c: char) -> Result<Flow, ErrorKind<H::Error>> {
        if let Some(high) = self.pending_high_surrogate {
            if c != '\\' {
                return Err(SyntaxError::InvalidUnicodeEscapeSequence(high).into());
            }
        }
        match c {
            '"' => {
                let text = mem::take(&mut self.buffer);
                self.emit_value(Scalar::Text(text))?;
            }
            '\\' => {
                self.stack.push(State::String);
                self.state = State::StringEscape;
            }
            '\u{0}'..='\u{1f}' => return Err(SyntaxError::ControlCharacter(c).into()),
            c => self.buffer.push(c),
        }
        Ok(Flow::Consumed)
    }

    fn step_escape(&mut self, c: char) -> Result<Flow, ErrorKind<H::Error>> {
        if let Some(high) = self.pending_high_surrogate {
            if c != 'u' {
                return Err(SyntaxError::InvalidUnicodeEscapeSequence(high).into());
            }
        }
        let decoded = match c {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => {
                self.state = State::StringUnicode(UnicodeEscapeBuffer::new());
                return Ok(Flow::Consumed);
            }
            c => return Err(SyntaxError::InvalidEscape(c).into()),
        };
        self.buffer.push(decoded);
        self.resume();
        Ok(Flow::Consumed)
    }

    /// Appends a decoded `\uXXXX` unit, pairing surrogates.
    fn push_code_unit(&mut self, unit: u32) -> Result<(), SyntaxError> {
        if let Some(high) = self.pending_high_surrogate.take() {
            self.buffer.push(combine_surrogates(high, unit)?);
        } else if is_high_surrogate(unit) {
            self.pending_high_surrogate = Some(unit);
        } else if is_low_surrogate(unit) {
            return Err(SyntaxError::InvalidUnicodeEscapeSequence(unit));
        } else {
            let c = char::from_u32(unit).ok_or(SyntaxError::InvalidUnicodeEscapeSequence(unit))?;
            self.buffer.push(c);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------------------------------
    // Stack
    // ------------------------------------------------------------------------------------------------

    /// Saves `parent` and starts waiting for a value scoped to it.
    fn open_value(&mut self, parent: State) {
        self.stack.push(parent);
        self.state = State::Value;
    }

    /// Returns to the innermost resume context without completing it.
    fn resume(&mut self) {
        self.state = self
            .stack
            .pop()
            .unwrap_or(State::Document(DocumentStep::Ready));
    }

    /// Resumes the parent after a value finished, advancing it past the
    /// value it was waiting for.
    fn complete_value(&mut self) -> Result<(), ErrorKind<H::Error>> {
        self.resume();
        self.state = match self.state {
            State::Array(ArrayStep::Element) => State::Array(ArrayStep::AfterElement),
            State::Object(ObjectStep::KeyPending) => State::Object(ObjectStep::Colon),
            State::Object(ObjectStep::ValuePending) => State::Object(ObjectStep::AfterValue),
            State::Document(_) => {
                self.documents += 1;
                log::debug!("document {} complete", self.documents);
                self.handler.on_document_end().map_err(ErrorKind::Handler)?;
                State::Document(DocumentStep::Ready)
            }
            other => other,
        };
        Ok(())
    }

    fn emit_value(&mut self, value: Scalar) -> Result<(), ErrorKind<H::Error>> {
        self.handler.on_value(value).map_err(ErrorKind::Handler)?;
        self.complete_value()
    }

    fn finish_number(&mut self, is_double: bool) -> Result<(), ErrorKind<H::Error>> {
        let value = numbers::to_scalar(&self.buffer, is_double)?;
        self.buffer.clear();
        self.emit_value(value)
    }

    fn open_container(&mut self, container: Container) -> Result<(), ErrorKind<H::Error>> {
        if let Some(limit) = self.options.max_depth {
            if self.depth >= limit {
                return Err(SyntaxError::NestingLimit { limit }.into());
            }
        }
        log::trace!("open {container:?} at depth {}", self.depth);
        let started = match container {
            Container::Array => self.handler.on_array(),
            Container::Map => self.handler.on_map(),
        };
        started.map_err(ErrorKind::Handler)?;
        self.depth += 1;
        Ok(())
    }

    fn close_container(&mut self) -> Result<(), ErrorKind<H::Error>> {
        self.depth -= 1;
        log::trace!("close container at depth {}", self.depth);
        self.handler.on_end().map_err(ErrorKind::Handler)?;
        self.complete_value()
    }

    fn end_of_input(&mut self) -> Result<(), ErrorKind<H::Error>> {
        if let State::Number { is_double } = self.state {
            self.finish_number(is_double)?;
        }
        match self.state {
            State::Document(DocumentStep::Ready) if self.documents > 0 => Ok(()),
            state => Err(SyntaxError::UnexpectedEndOfInput { state: state.name() }.into()),
        }
    }

    // ------------------------------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------------------------------

    fn is_whitespace(&self, c: char) -> bool {
        matches!(c, ' ' | '\t' | '\n' | '\r')
            || (self.options.allow_unicode_whitespace && c.is_whitespace())
    }

    fn error(&self, kind: ErrorKind<H::Error>) -> ParserError<H::Error> {
        ParserError {
            kind,
            line: self.line,
            column: self.column,
        }
    }
}

fn unexpected<E>(found: char, expected: &'static str) -> ErrorKind<E> {
    SyntaxError::UnexpectedCharacter { found, expected }.into()
}
