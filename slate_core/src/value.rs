//! Runtime value representation.
//!
//! A Slate value is one of five shapes: `None`, a boolean, a 64-bit
//! integer, a 64-bit float, or an immutable string. Values live on the
//! VM's operand stack, in the constant table, and in the values table, so
//! cloning must be cheap: strings are reference-counted (`Rc<str>`), the
//! rest are plain scalars. The pipeline is single-threaded end to end,
//! which is why `Rc` suffices.
//!
//! Equality here is *structural*: `Value::Int(5) != Value::Float(5.0)`.
//! That is what the compiler's constant table needs (an int 5 and a float
//! 5.0 occupy distinct slots). The VM's comparison instruction implements
//! the numeric cross-type semantics separately.

use std::fmt;
use std::rc::Rc;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The singleton `None`.
    None,
    /// `True` or `False`.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// An immutable string.
    Str(Rc<str>),
}

impl Value {
    /// Build a string value from anything string-like.
    #[must_use]
    pub fn str(s: impl AsRef<str>) -> Self {
        Self::Str(Rc::from(s.as_ref()))
    }

    /// Whether this value is `None`.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Python truthiness: `None`, `False`, `0`, `0.0` and `''` are falsy,
    /// everything else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(x) => *x != 0.0,
            Self::Str(s) => !s.is_empty(),
        }
    }

    /// The Python type name, as used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::str(s)
    }
}

/// Python `str()` formatting: integral floats keep a trailing `.0`,
/// booleans print as their keywords, strings print without quotes.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => {
                if x.is_nan() {
                    f.write_str("nan")
                } else if x.is_infinite() {
                    f.write_str(if *x < 0.0 { "-inf" } else { "inf" })
                } else if x.fract() == 0.0 {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            Self::Str(s) => f.write_str(s),
        }
    }
}
