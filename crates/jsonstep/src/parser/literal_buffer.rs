use crate::Scalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedLiteralValue {
    Null,
    True,
    False,
}

impl ExpectedLiteralValue {
    fn scalar(self) -> Scalar {
        match self {
            ExpectedLiteralValue::Null => Scalar::Null,
            ExpectedLiteralValue::True => Scalar::Bool(true),
            ExpectedLiteralValue::False => Scalar::Bool(false),
        }
    }
}

/// What happened after feeding one more character into the literal matcher?
#[derive(Debug, PartialEq)]
pub enum Step {
    /// Character matched, but the literal is not finished yet.
    NeedMore,
    /// Character matched and was the last one of the literal.
    Done(Scalar),
    /// Character did not match; carries the character that was expected.
    Reject(char),
}

/// Remaining bytes of the literal being matched and the value it stands for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExpectedLiteralBuffer {
    rest: &'static [u8],
    kind: ExpectedLiteralValue,
}

impl ExpectedLiteralBuffer {
    /// Start matching after the first character (`n`, `t`, or `f`).
    pub fn new(first: char) -> Option<Self> {
        let (rest, kind): (&'static [u8], _) = match first {
            'n' => (b"ull", ExpectedLiteralValue::Null),
            't' => (b"rue", ExpectedLiteralValue::True),
            'f' => (b"alse", ExpectedLiteralValue::False),
            _ => return None,
        };
        Some(Self { rest, kind })
    }

    pub fn step(&mut self, c: char) -> Step {
        let Some((&expected, rest)) = self.rest.split_first() else {
            // `Done` is returned on the last byte, so the buffer is never
            // stepped while empty.
            return Step::Reject(c);
        };
        if char::from(expected) != c {
            return Step::Reject(char::from(expected));
        }
        if rest.is_empty() {
            Step::Done(self.kind.scalar())
        } else {
            self.rest = rest;
            Step::NeedMore
        }
    }
}
