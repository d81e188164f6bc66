//! Decoding of four-digit `\uXXXX` escapes without buffering characters.
//!
//! [`UnicodeEscapeBuffer`] folds each hex digit into a `u32` as it arrives and
//! hands back the UTF-16 code unit once the fourth digit is in. Pairing of
//! surrogates is left to the caller, which knows whether a high surrogate is
//! pending.

use super::error::SyntaxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u32,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn hex_val(c: char) -> Option<u32> {
        c.to_digit(16)
    }

    /// Feeds one hex digit.
    ///
    /// Returns `Ok(None)` until four digits are in, then `Ok(Some(unit))`.
    /// A non-hex character is an error.
    pub fn feed(&mut self, c: char) -> Result<Option<u32>, SyntaxError> {
        let d = Self::hex_val(c).ok_or(SyntaxError::InvalidUnicodeEscapeChar(c))?;
        self.acc = (self.acc << 4) | d;
        self.len += 1;

        if self.len < 4 {
            return Ok(None);
        }
        let unit = self.acc;
        *self = Self::new();
        Ok(Some(unit))
    }
}

/// Merges a high and a low surrogate into the character they encode.
pub(crate) fn combine_surrogates(high: u32, low: u32) -> Result<char, SyntaxError> {
    if !is_low_surrogate(low) {
        return Err(SyntaxError::InvalidUnicodeEscapeSequence(low));
    }
    let code = 0x1_0000 + ((high - 0xD800) << 10) + (low - 0xDC00);
    char::from_u32(code).ok_or(SyntaxError::InvalidUnicodeEscapeSequence(code))
}

pub(crate) fn is_high_surrogate(unit: u32) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

pub(crate) fn is_low_surrogate(unit: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}
