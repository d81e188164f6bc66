use alloc::{string::String, vec::Vec};
use core::fmt::{self, Write};

use quickcheck::{Arbitrary, Gen};

use crate::Scalar;

/// A whole JSON value, kept in document order so duplicate keys survive.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    Text(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Integer(n) => Value::Integer(n),
            Scalar::Double(d) => Value::Double(d),
            Scalar::Text(s) => Value::Text(s),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct FiniteDouble(f64);

impl Arbitrary for FiniteDouble {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        Self(value)
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_scalar(g: &mut Gen) -> Value {
            match usize::arbitrary(g) % 5 {
                0 => Value::Null,
                1 => Value::Bool(bool::arbitrary(g)),
                2 => Value::Integer(i64::arbitrary(g)),
                3 => Value::Double(FiniteDouble::arbitrary(g).0),
                _ => Value::Text(String::arbitrary(g)),
            }
        }

        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            if depth == 0 {
                return gen_scalar(g);
            }
            match usize::arbitrary(g) % 4 {
                0 => {
                    let len = usize::arbitrary(g) % 4;
                    Value::Array((0..len).map(|_| gen_val(g, depth - 1)).collect())
                }
                1 => {
                    let len = usize::arbitrary(g) % 4;
                    Value::Object(
                        (0..len)
                            .map(|_| (String::arbitrary(g), gen_val(g, depth - 1)))
                            .collect(),
                    )
                }
                _ => gen_scalar(g),
            }
        }

        gen_val(g, 4)
    }
}

impl Value {
    /// Renders the value with `pad` written around every structural token.
    pub fn render(&self, pad: &str) -> String {
        let mut out = String::new();
        self.write_padded(&mut out, pad)
            .expect("writing to a String cannot fail");
        out
    }

    fn write_padded(&self, out: &mut String, pad: &str) -> fmt::Result {
        match self {
            Value::Null => out.write_str("null"),
            Value::Bool(b) => write!(out, "{b}"),
            Value::Integer(n) => write!(out, "{n}"),
            // Shortest round-trip form, always with `.` or an exponent.
            Value::Double(d) => out.write_str(&serde_json::to_string(d).map_err(|_| fmt::Error)?),
            Value::Text(s) => out.write_str(&serde_json::to_string(s).map_err(|_| fmt::Error)?),
            Value::Array(items) => {
                write!(out, "{pad}[{pad}")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(out, "{pad},{pad}")?;
                    }
                    item.write_padded(out, pad)?;
                }
                write!(out, "{pad}]{pad}")
            }
            Value::Object(members) => {
                write!(out, "{pad}{{{pad}")?;
                for (i, (key, value)) in members.iter().enumerate() {
                    if i > 0 {
                        write!(out, "{pad},{pad}")?;
                    }
                    out.write_str(&serde_json::to_string(key).map_err(|_| fmt::Error)?)?;
                    write!(out, "{pad}:{pad}")?;
                    value.write_padded(out, pad)?;
                }
                write!(out, "{pad}}}{pad}")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

#[test]
fn renders_compact_and_padded() {
    let value = Value::Object(alloc::vec![(
        "k".into(),
        Value::Array(alloc::vec![Value::Double(1.0), Value::Text("a\"b".into())]),
    )]);
    assert_eq!(alloc::string::ToString::to_string(&value), r#"{"k":[1.0,"a\"b"]}"#);
    assert_eq!(value.render(" "), r#" { "k" :  [ 1.0 , "a\"b" ]  } "#);
}
