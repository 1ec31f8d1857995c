//! Primitive decoders: one named singleton per leaf value kind.

use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::value::Value;

/// Accepts only string values.
pub fn string() -> Decoder<String> {
    Decoder::new("string", |input| match input {
        Value::String(s) => Ok(s.clone()),
        other => Err(DecodeError::mismatch("string", other)),
    })
}

/// Accepts only `true`/`false`.
pub fn boolean() -> Decoder<bool> {
    Decoder::new("boolean", |input| match input {
        Value::Bool(b) => Ok(*b),
        other => Err(DecodeError::mismatch("boolean", other)),
    })
}

/// Accepts only finite numbers. NaN and the infinities are rejected.
pub fn number() -> Decoder<f64> {
    Decoder::new("number", |input| match input {
        Value::Number(n) if n.is_finite() => Ok(*n),
        other => Err(DecodeError::mismatch("number", other)),
    })
}

/// Accepts any numeric value, NaN and the infinities included.
pub fn loose_number() -> Decoder<f64> {
    Decoder::new("loose number", |input| match input {
        Value::Number(n) => Ok(*n),
        other => Err(DecodeError::mismatch("loose number", other)),
    })
}

// i64 covers exactly [-2^63, 2^63); the upper bound is exact as an f64.
const I64_LO: f64 = -9_223_372_036_854_775_808.0;
const I64_HI: f64 = 9_223_372_036_854_775_808.0;

/// Accepts only finite, integral numbers within `i64` range.
pub fn int() -> Decoder<i64> {
    Decoder::new("int", |input| match input {
        Value::Number(n)
            if n.is_finite() && n.fract() == 0.0 && *n >= I64_LO && *n < I64_HI =>
        {
            Ok(*n as i64)
        }
        other => Err(DecodeError::mismatch("int", other)),
    })
}

/// Accepts only finite, integral, non-negative numbers within `u64` range.
pub fn uint() -> Decoder<u64> {
    Decoder::new("uint", |input| match input {
        Value::Number(n)
            if n.is_finite() && n.fract() == 0.0 && *n >= 0.0 && *n < 2.0 * I64_HI =>
        {
            Ok(*n as u64)
        }
        other => Err(DecodeError::mismatch("uint", other)),
    })
}

/// Accepts input equal to the given value.
///
/// Equality is `Value`'s `PartialEq`, so a `literal(f64::NAN)` decoder never
/// matches and `literal(0)` accepts `-0.0`.
pub fn literal(value: impl Into<Value>) -> Decoder<Value> {
    literals(vec![value.into()])
}

/// Accepts input equal to one of the given values. Name is the `|`-joined
/// rendering of the allowed values.
pub fn literals(values: Vec<Value>) -> Decoder<Value> {
    let name = values
        .iter()
        .map(Value::render)
        .collect::<Vec<_>>()
        .join(" | ");
    let err_name = name.clone();
    Decoder::new(name, move |input| {
        if values.iter().any(|v| v == input) {
            Ok(input.clone())
        } else {
            Err(DecodeError::mismatch(err_name.clone(), input))
        }
    })
}
