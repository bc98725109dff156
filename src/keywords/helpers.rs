use crate::{context::Scope, error::SchemaError};
use num_cmp::NumCmp;
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

macro_rules! num_cmp {
    ($left:expr, $right:expr) => {
        if let Some(b) = $right.as_u64() {
            NumCmp::num_cmp($left, b)
        } else if let Some(b) = $right.as_i64() {
            NumCmp::num_cmp($left, b)
        } else {
            $right.as_f64().and_then(|b| NumCmp::num_cmp($left, b))
        }
    };
}

/// Compare two JSON numbers without losing precision on large integers.
#[inline]
pub(crate) fn compare(left: &Number, right: &Number) -> Option<Ordering> {
    if let Some(a) = left.as_u64() {
        num_cmp!(a, right)
    } else if let Some(a) = left.as_i64() {
        num_cmp!(a, right)
    } else {
        left.as_f64().and_then(|a| num_cmp!(a, right))
    }
}

/// Deep equality used by `enum`, `const` and `uniqueItems`.
///
/// Numbers are equal by value, so `1` and `1.0` match. Values of different kinds never do.
#[inline]
pub(crate) fn equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => compare(left, right) == Some(Ordering::Equal),
        (Value::Array(left), Value::Array(right)) => equal_arrays(left, right),
        (Value::Object(left), Value::Object(right)) => equal_objects(left, right),
        (_, _) => left == right,
    }
}

#[inline]
pub(crate) fn equal_arrays(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len() && left.iter().zip(right.iter()).all(|(a, b)| equal(a, b))
}

#[inline]
pub(crate) fn equal_objects(left: &Map<String, Value>, right: &Map<String, Value>) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|(key, value)| right.get(key).map_or(false, |other| equal(value, other)))
}

/// JSON type name of `value`, whole numbers are integers.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if is_integer(number) => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[inline]
pub(crate) fn is_integer(number: &Number) -> bool {
    number.is_u64()
        || number.is_i64()
        || number.as_f64().map_or(false, |value| value.fract() == 0.)
}

/// Non-negative integer keyword value, e.g. `minLength`.
pub(crate) fn limit(value: &Value, keyword: &str, scope: &Scope) -> Result<u64, SchemaError> {
    if let Some(limit) = value.as_u64() {
        return Ok(limit);
    }
    match value.as_f64() {
        Some(limit) if limit >= 0. && limit.fract() == 0. && limit <= u64::MAX as f64 => {
            Ok(limit as u64)
        }
        _ => Err(SchemaError::malformed(
            &scope.base,
            format!("'{}' must be a non-negative integer, got {}", keyword, value),
        )),
    }
}

/// Numeric keyword value, e.g. `minimum`.
pub(crate) fn number<'s>(
    value: &'s Value,
    keyword: &str,
    scope: &Scope,
) -> Result<&'s Number, SchemaError> {
    match value {
        Value::Number(number) => Ok(number),
        _ => Err(SchemaError::malformed(
            &scope.base,
            format!("'{}' must be a number, got {}", keyword, value),
        )),
    }
}
