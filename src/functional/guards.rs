//! Argument guards for the dynamic entry points.
//!
//! These are pure checks over [`Value`]s: they either return the typed value
//! the engine needs or the matching contract error.

use crate::error::{CurryError, CurryResult};
use crate::function::Function;
use crate::receiver::Receiver;
use crate::value::Value;

/// Accepts finite, non-negative, integral numbers as an arity.
///
/// Fractional values are rejected rather than truncated.
///
/// # Examples
///
/// ```
/// assert_eq!(check_positive_integral(&Value::from(3))?, 3);
/// assert!(check_positive_integral(&Value::from(2.5)).is_err());
/// assert!(check_positive_integral(&Value::from(-1)).is_err());
/// ```
pub fn check_positive_integral(value: &Value) -> CurryResult<usize> {
    match value {
        Value::Number(n)
            if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64 =>
        {
            Ok(*n as usize)
        }
        Value::Number(_) => Err(CurryError::InvalidArity(value.to_string())),
        other => Err(CurryError::InvalidArity(other.type_name().to_string())),
    }
}

pub fn check_function(value: &Value) -> CurryResult<Function> {
    value
        .as_function()
        .cloned()
        .ok_or_else(|| CurryError::NotCallable(value.type_name().to_string()))
}

pub fn check_object(value: &Value) -> CurryResult<Receiver> {
    value
        .as_object()
        .cloned()
        .ok_or_else(|| CurryError::NotAnObject(value.type_name().to_string()))
}
