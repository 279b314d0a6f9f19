//! value comparator - applies an operator to a value and its target

use std::mem;

use log::trace;
use serde_json::{Number, Value};

use super::error::MatchError;
use super::time::DateTimeFormat;
use super::types::CompareOp;

/// compare `value` against `target` with the operator token `op`
///
/// `date_time`, when set, makes ordering operators compare two strings as
/// instants parsed under that layout.
pub fn compare(
    value: &Value,
    op: &str,
    target: &Value,
    date_time: Option<&DateTimeFormat>,
) -> Result<bool, MatchError> {
    let compare_op =
        CompareOp::parse(op).ok_or_else(|| MatchError::IllegalOperator(op.trim().to_string()))?;

    let result = match compare_op {
        CompareOp::Eq => compare_equal(value, target),
        CompareOp::Ne => Ok(!values_equal(value, target)),
        CompareOp::In => compare_in(value, target),
        _ => compare_ordered(compare_op, value, target, date_time),
    };

    if let Ok(matched) = result {
        trace!("{} {} {} ? {}", value, compare_op, target, matched);
    }
    result
}

fn compare_equal(value: &Value, target: &Value) -> Result<bool, MatchError> {
    if mem::discriminant(value) != mem::discriminant(target) {
        return Err(MatchError::TypeMismatch(format!(
            "value and target should have the same type, but got ({}, {})",
            type_name(value),
            type_name(target)
        )));
    }
    Ok(values_equal(value, target))
}

fn compare_in(value: &Value, target: &Value) -> Result<bool, MatchError> {
    let candidates = target.as_array().ok_or_else(|| {
        MatchError::TypeMismatch(format!(
            "target of 'in' should be an array, but got {}",
            type_name(target)
        ))
    })?;
    Ok(candidates.iter().any(|candidate| values_equal(value, candidate)))
}

fn compare_ordered(
    op: CompareOp,
    value: &Value,
    target: &Value,
    date_time: Option<&DateTimeFormat>,
) -> Result<bool, MatchError> {
    match (value, target, date_time) {
        (Value::Number(a), Value::Number(b), _) => Ok(compare_floats(op, as_float(a), as_float(b))),
        (Value::String(a), Value::String(b), Some(format)) => {
            match (format.parse(a), format.parse(b)) {
                (Some(a), Some(b)) => Ok(op.accepts(a.cmp(&b))),
                _ => Err(MatchError::TypeMismatch(format!(
                    "expected both '{}' and '{}' to be date-times in layout '{}'",
                    a,
                    b,
                    format.layout()
                ))),
            }
        }
        _ => Err(MatchError::TypeMismatch(format!(
            "expected value and target both number, but got ({}, {})",
            type_name(value),
            type_name(target)
        ))),
    }
}

fn compare_floats(op: CompareOp, a: f64, b: f64) -> bool {
    match a.partial_cmp(&b) {
        Some(ordering) => op.accepts(ordering),
        // NaN is unordered: only the inequality holds
        None => op == CompareOp::LessOrGreater,
    }
}

fn as_float(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

/// structural equality; numbers are equal by value regardless of representation
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, a)| y.get(key).is_some_and(|b| values_equal(a, b)))
        }
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    x.as_f64() == y.as_f64()
}

/// JSON type name of a value, for error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
