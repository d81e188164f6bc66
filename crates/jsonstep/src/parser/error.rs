use alloc::string::String;

use thiserror::Error;

/// A failed parse, with the 1-based position of the offending character.
#[derive(Error, Debug, PartialEq)]
#[error("{kind} at {line}:{column}")]
pub struct ParserError<E> {
    pub(crate) kind: ErrorKind<E>,
    /// 1-based line of the offending character.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl<E> ParserError<E> {
    pub fn kind(&self) -> &ErrorKind<E> {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind<E> {
        self.kind
    }

    /// The grammar violation, if the input was at fault.
    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        match &self.kind {
            ErrorKind::Syntax(e) => Some(e),
            ErrorKind::Handler(_) => None,
        }
    }

    /// The handler's own error, if a handler aborted the parse.
    pub fn handler_error(&self) -> Option<&E> {
        match &self.kind {
            ErrorKind::Handler(e) => Some(e),
            ErrorKind::Syntax(_) => None,
        }
    }
}

/// Whether the input or a handler stopped the parse.
#[derive(Error, Debug, PartialEq)]
pub enum ErrorKind<E> {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("handler error: {0}")]
    Handler(E),
}

/// A grammar violation in the input.
#[derive(Debug, Error, PartialEq)]
pub enum SyntaxError {
    #[error("unexpected character {found:?}, expected {expected}")]
    UnexpectedCharacter { found: char, expected: &'static str },
    #[error("unexpected character {found:?} in literal, expected {expected:?}")]
    InvalidLiteral { found: char, expected: char },
    #[error("unescaped control character U+{:04X} in string", code_point(.0))]
    ControlCharacter(char),
    #[error("invalid escape character {0:?}")]
    InvalidEscape(char),
    #[error("invalid unicode escape sequence at character: {0:?}")]
    InvalidUnicodeEscapeChar(char),
    #[error("invalid unicode escape sequence \\u{0:04X}")]
    InvalidUnicodeEscapeSequence(u32),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("number '{0}' is out of range")]
    NumberOutOfRange(String),
    #[error("unexpected character {0:?} after the end of the document")]
    TrailingCharacter(char),
    #[error("nesting depth limit of {limit} exceeded")]
    NestingLimit { limit: usize },
    #[error("unexpected end of input in {state}")]
    UnexpectedEndOfInput { state: &'static str },
    #[error("parser cannot be used after a previous error")]
    Poisoned,
}

fn code_point(c: &char) -> u32 {
    u32::from(*c)
}
