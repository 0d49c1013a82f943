//! Value-level semantics of the arithmetic, comparison, and negation
//! instructions.
//!
//! The rules are Python's, restricted to the five value shapes:
//!
//! - Booleans coerce to ints under every numeric operation (`True + True`
//!   is `2`).
//! - Int/int arithmetic stays exact while it fits `i64` and falls back to
//!   float on overflow. Any float operand makes the result float.
//! - `+` on two strings concatenates. No other operator touches strings
//!   except the comparisons.
//! - Division is true division: always float, and a zero divisor is an
//!   error no matter the operand types.
//! - `==`/`!=` are total across all shapes; the ordering operators are
//!   defined for numeric/numeric and string/string only. Every ordering
//!   against a NaN is false.

use slate_compiler::CompareOp;
use slate_core::{RuntimeError, Value};

use crate::VmResult;

/// A value viewed as a number, after bool-to-int coercion.
#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(x) => x,
        }
    }
}

fn numeric(value: &Value) -> Option<Numeric> {
    match value {
        Value::Bool(b) => Some(Numeric::Int(i64::from(*b))),
        Value::Int(i) => Some(Numeric::Int(*i)),
        Value::Float(x) => Some(Numeric::Float(*x)),
        Value::None | Value::Str(_) => None,
    }
}

fn unsupported(op: &str, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::type_error(format!(
        "unsupported operand type(s) for {op}: '{}' and '{}'",
        left.type_name(),
        right.type_name()
    ))
}

/// `left + right`: numeric addition or string concatenation.
pub fn add(left: Value, right: Value) -> VmResult<Value> {
    if let (Value::Str(a), Value::Str(b)) = (&left, &right) {
        return Ok(Value::str(format!("{a}{b}")));
    }
    match (numeric(&left), numeric(&right)) {
        (Some(Numeric::Int(x)), Some(Numeric::Int(y))) => Ok(match x.checked_add(y) {
            Some(sum) => Value::Int(sum),
            None => Value::Float(x as f64 + y as f64),
        }),
        (Some(x), Some(y)) => Ok(Value::Float(x.as_f64() + y.as_f64())),
        _ => Err(unsupported("+", &left, &right)),
    }
}

/// `left - right`: numeric subtraction.
pub fn subtract(left: Value, right: Value) -> VmResult<Value> {
    match (numeric(&left), numeric(&right)) {
        (Some(Numeric::Int(x)), Some(Numeric::Int(y))) => Ok(match x.checked_sub(y) {
            Some(difference) => Value::Int(difference),
            None => Value::Float(x as f64 - y as f64),
        }),
        (Some(x), Some(y)) => Ok(Value::Float(x.as_f64() - y.as_f64())),
        _ => Err(unsupported("-", &left, &right)),
    }
}

/// `left * right`: numeric multiplication.
pub fn multiply(left: Value, right: Value) -> VmResult<Value> {
    match (numeric(&left), numeric(&right)) {
        (Some(Numeric::Int(x)), Some(Numeric::Int(y))) => Ok(match x.checked_mul(y) {
            Some(product) => Value::Int(product),
            None => Value::Float(x as f64 * y as f64),
        }),
        (Some(x), Some(y)) => Ok(Value::Float(x.as_f64() * y.as_f64())),
        _ => Err(unsupported("*", &left, &right)),
    }
}

/// `left / right`: true division, always float.
pub fn divide(left: Value, right: Value) -> VmResult<Value> {
    match (numeric(&left), numeric(&right)) {
        (Some(x), Some(y)) => {
            let divisor = y.as_f64();
            if divisor == 0.0 {
                Err(RuntimeError::ZeroDivision)
            } else {
                Ok(Value::Float(x.as_f64() / divisor))
            }
        }
        _ => Err(unsupported("/", &left, &right)),
    }
}

/// `-value`: numeric negation. `i64::MIN` has no i64 negation and promotes
/// to float.
pub fn negate(value: Value) -> VmResult<Value> {
    match value {
        Value::Bool(b) => Ok(Value::Int(-i64::from(b))),
        Value::Int(i) => Ok(match i.checked_neg() {
            Some(negated) => Value::Int(negated),
            None => Value::Float(-(i as f64)),
        }),
        Value::Float(x) => Ok(Value::Float(-x)),
        value => Err(RuntimeError::type_error(format!(
            "bad operand type for unary -: '{}'",
            value.type_name()
        ))),
    }
}

/// `left op right` for the six comparison codes, yielding a boolean.
pub fn compare(op: CompareOp, left: &Value, right: &Value) -> VmResult<Value> {
    let result = match op {
        CompareOp::Eq => values_equal(left, right),
        CompareOp::Ne => !values_equal(left, right),
        op => ordered(op, left, right)?,
    };
    Ok(Value::Bool(result))
}

/// Total equality: numeric shapes compare by value across int/float/bool,
/// strings by content, `None` equals only `None`, anything mixed is
/// unequal.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Str(a), Value::Str(b)) => a == b,
        _ => match (numeric(left), numeric(right)) {
            (Some(Numeric::Int(x)), Some(Numeric::Int(y))) => x == y,
            (Some(x), Some(y)) => x.as_f64() == y.as_f64(),
            _ => false,
        },
    }
}

fn ordered(op: CompareOp, left: &Value, right: &Value) -> VmResult<bool> {
    if let (Value::Str(a), Value::Str(b)) = (left, right) {
        return Ok(apply(op, &a.as_ref(), &b.as_ref()));
    }
    match (numeric(left), numeric(right)) {
        (Some(Numeric::Int(x)), Some(Numeric::Int(y))) => Ok(apply(op, &x, &y)),
        (Some(x), Some(y)) => Ok(apply(op, &x.as_f64(), &y.as_f64())),
        _ => Err(RuntimeError::type_error(format!(
            "'{op}' not supported between instances of '{}' and '{}'",
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn apply<T: PartialOrd>(op: CompareOp, x: &T, y: &T) -> bool {
    match op {
        CompareOp::Lt => x < y,
        CompareOp::Le => x <= y,
        CompareOp::Eq => x == y,
        CompareOp::Ne => x != y,
        CompareOp::Gt => x > y,
        CompareOp::Ge => x >= y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_addition_stays_int() {
        assert_eq!(add(Value::Int(2), Value::Int(3)), Ok(Value::Int(5)));
    }

    #[test]
    fn test_int_overflow_falls_back_to_float() {
        let result = add(Value::Int(i64::MAX), Value::Int(1)).unwrap();
        assert_eq!(result, Value::Float(i64::MAX as f64 + 1.0));
    }

    #[test]
    fn test_mixed_addition_is_float() {
        assert_eq!(add(Value::Int(1), Value::Float(0.5)), Ok(Value::Float(1.5)));
    }

    #[test]
    fn test_bools_coerce_to_ints() {
        assert_eq!(add(Value::Bool(true), Value::Bool(true)), Ok(Value::Int(2)));
        assert_eq!(
            multiply(Value::Bool(true), Value::Int(7)),
            Ok(Value::Int(7))
        );
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            add(Value::str("foo"), Value::str("bar")),
            Ok(Value::str("foobar"))
        );
    }

    #[test]
    fn test_string_plus_int_is_type_error() {
        let err = add(Value::str("a"), Value::Int(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "TypeError: unsupported operand type(s) for +: 'str' and 'int'"
        );
    }

    #[test]
    fn test_none_arithmetic_is_type_error() {
        let err = add(Value::None, Value::Int(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "TypeError: unsupported operand type(s) for +: 'NoneType' and 'int'"
        );
    }

    #[test]
    fn test_subtraction() {
        assert_eq!(subtract(Value::Int(7), Value::Int(2)), Ok(Value::Int(5)));
        assert!(subtract(Value::str("a"), Value::str("b")).is_err());
    }

    #[test]
    fn test_division_is_always_float() {
        assert_eq!(divide(Value::Int(7), Value::Int(2)), Ok(Value::Float(3.5)));
        assert_eq!(divide(Value::Int(6), Value::Int(3)), Ok(Value::Float(2.0)));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            divide(Value::Int(1), Value::Int(0)),
            Err(RuntimeError::ZeroDivision)
        );
        assert_eq!(
            divide(Value::Float(1.0), Value::Float(0.0)),
            Err(RuntimeError::ZeroDivision)
        );
    }

    #[test]
    fn test_negation() {
        assert_eq!(negate(Value::Int(5)), Ok(Value::Int(-5)));
        assert_eq!(negate(Value::Float(2.5)), Ok(Value::Float(-2.5)));
        assert_eq!(negate(Value::Bool(true)), Ok(Value::Int(-1)));
        assert_eq!(negate(Value::Bool(false)), Ok(Value::Int(0)));
    }

    #[test]
    fn test_negating_min_int_promotes() {
        assert_eq!(
            negate(Value::Int(i64::MIN)),
            Ok(Value::Float(-(i64::MIN as f64)))
        );
    }

    #[test]
    fn test_negating_string_is_type_error() {
        let err = negate(Value::str("x")).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: bad operand type for unary -: 'str'");
    }

    #[test]
    fn test_equality_across_numeric_shapes() {
        assert_eq!(
            compare(CompareOp::Eq, &Value::Int(5), &Value::Float(5.0)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            compare(CompareOp::Eq, &Value::Bool(true), &Value::Int(1)),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn test_equality_is_total_across_categories() {
        assert_eq!(
            compare(CompareOp::Eq, &Value::str("5"), &Value::Int(5)),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            compare(CompareOp::Ne, &Value::None, &Value::Int(0)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            compare(CompareOp::Eq, &Value::None, &Value::None),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn test_numeric_ordering() {
        assert_eq!(
            compare(CompareOp::Lt, &Value::Int(1), &Value::Int(2)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            compare(CompareOp::Ge, &Value::Float(2.0), &Value::Int(2)),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn test_string_ordering_is_lexicographic() {
        assert_eq!(
            compare(CompareOp::Lt, &Value::str("abc"), &Value::str("abd")),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn test_mixed_ordering_is_type_error() {
        let err = compare(CompareOp::Lt, &Value::Int(1), &Value::str("a")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "TypeError: '<' not supported between instances of 'int' and 'str'"
        );
    }

    #[test]
    fn test_nan_ordering_is_false() {
        let nan = Value::Float(f64::NAN);
        for op in [CompareOp::Lt, CompareOp::Le, CompareOp::Gt, CompareOp::Ge] {
            assert_eq!(compare(op, &nan, &Value::Int(1)), Ok(Value::Bool(false)));
        }
        assert_eq!(compare(CompareOp::Eq, &nan, &nan), Ok(Value::Bool(false)));
        assert_eq!(compare(CompareOp::Ne, &nan, &nan), Ok(Value::Bool(true)));
    }
}
