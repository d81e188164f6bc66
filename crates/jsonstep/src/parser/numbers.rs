//! Number lexemes: which characters may extend one, the canonical grammar,
//! and conversion to a [`Scalar`].
use alloc::string::ToString;

use super::error::SyntaxError;
use crate::Scalar;

/// Characters accumulated into a number lexeme before it is validated.
pub(crate) fn is_number_char(c: char) -> bool {
    matches!(c, '0'..='9' | '-' | '+' | '.' | 'e' | 'E')
}

/// Marks that make a lexeme a double.
pub(crate) fn is_double_marker(c: char) -> bool {
    matches!(c, '.' | 'e' | 'E')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Start,
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
}

/// `-? (0 | [1-9][0-9]*) (\.[0-9]+)? ([eE][+-]?[0-9]+)?`
pub(crate) fn is_valid_lexeme(lexeme: &str) -> bool {
    use NumberState::*;

    let mut state = Start;
    for c in lexeme.chars() {
        state = match (state, c) {
            (Start, '-') => Sign,
            (Start | Sign, '0') => Zero,
            (Start | Sign, '1'..='9') => DecimalInteger,
            (DecimalInteger, '0'..='9') => DecimalInteger,
            (Zero | DecimalInteger, '.') => DecimalPoint,
            (DecimalPoint | DecimalFraction, '0'..='9') => DecimalFraction,
            (Zero | DecimalInteger | DecimalFraction, 'e' | 'E') => DecimalExponent,
            (DecimalExponent, '+' | '-') => DecimalExponentSign,
            (DecimalExponent | DecimalExponentSign | DecimalExponentInteger, '0'..='9') => {
                DecimalExponentInteger
            }
            _ => return false,
        };
    }
    matches!(
        state,
        Zero | DecimalInteger | DecimalFraction | DecimalExponentInteger
    )
}

/// Validates and converts a completed lexeme.
pub(crate) fn to_scalar(lexeme: &str, is_double: bool) -> Result<Scalar, SyntaxError> {
    if !is_valid_lexeme(lexeme) {
        return Err(SyntaxError::InvalidNumber(lexeme.to_string()));
    }
    if is_double {
        match lexeme.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Scalar::Double(value)),
            Ok(_) => Err(SyntaxError::NumberOutOfRange(lexeme.to_string())),
            Err(_) => Err(SyntaxError::InvalidNumber(lexeme.to_string())),
        }
    } else {
        lexeme
            .parse::<i64>()
            .map(Scalar::Integer)
            .map_err(|_| SyntaxError::NumberOutOfRange(lexeme.to_string()))
    }
}
