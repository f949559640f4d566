//! EL type coercion and operator semantics
//!
//! Arithmetic promotion: a `Decimal` operand keeps the operation exact; a
//! `Double` operand (or a string spelling a float) moves it to doubles;
//! everything else runs as wrapping 64-bit integers. `/` always divides
//! as doubles unless a decimal is involved.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use super::value::ElValue;
use crate::ast::BinaryOp;
use crate::error::{EvalError, EvalResult};

/// Target type for argument and result coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpectedType {
    /// No coercion
    Any,
    /// Coerce to boolean
    Bool,
    /// Coerce to 64-bit integer
    Long,
    /// Coerce to double
    Double,
    /// Coerce to decimal
    Decimal,
    /// Coerce to string
    Str,
}

fn coercion_error(value: &ElValue, to: &'static str) -> EvalError {
    EvalError::Coercion {
        value: value.to_string(),
        from: value.type_name(),
        to,
    }
}

/// String coercion; total
pub fn to_str(value: &ElValue) -> String {
    value.to_string()
}

/// Boolean coercion: null and non-"true" strings are false
pub fn to_bool(value: &ElValue) -> EvalResult<bool> {
    match value {
        ElValue::Null => Ok(false),
        ElValue::Bool(b) => Ok(*b),
        ElValue::Str(s) => Ok(s.eq_ignore_ascii_case("true")),
        other => Err(coercion_error(other, "boolean")),
    }
}

/// Long coercion: null and the empty string are zero, doubles truncate
pub fn to_long(value: &ElValue) -> EvalResult<i64> {
    match value {
        ElValue::Null => Ok(0),
        ElValue::Long(n) => Ok(*n),
        ElValue::Double(d) => Ok(*d as i64),
        ElValue::Decimal(d) => {
            if d.fract().is_zero() {
                d.to_i64().ok_or_else(|| coercion_error(value, "long"))
            } else {
                Err(coercion_error(value, "long"))
            }
        }
        ElValue::Str(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(0)
            } else {
                trimmed
                    .parse::<i64>()
                    .map_err(|_| coercion_error(value, "long"))
            }
        }
        other => Err(coercion_error(other, "long")),
    }
}

/// Double coercion: null and the empty string are zero
pub fn to_double(value: &ElValue) -> EvalResult<f64> {
    match value {
        ElValue::Null => Ok(0.0),
        ElValue::Long(n) => Ok(*n as f64),
        ElValue::Double(d) => Ok(*d),
        ElValue::Decimal(d) => d.to_f64().ok_or_else(|| coercion_error(value, "double")),
        ElValue::Str(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(0.0)
            } else {
                trimmed
                    .parse::<f64>()
                    .map_err(|_| coercion_error(value, "double"))
            }
        }
        other => Err(coercion_error(other, "double")),
    }
}

/// Decimal coercion: null and the empty string are zero
pub fn to_decimal(value: &ElValue) -> EvalResult<Decimal> {
    match value {
        ElValue::Null => Ok(Decimal::ZERO),
        ElValue::Long(n) => Ok(Decimal::from(*n)),
        ElValue::Double(d) => {
            Decimal::from_f64(*d).ok_or_else(|| coercion_error(value, "decimal"))
        }
        ElValue::Decimal(d) => Ok(*d),
        ElValue::Str(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(Decimal::ZERO);
            }
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map_err(|_| coercion_error(value, "decimal"))
        }
        other => Err(coercion_error(other, "decimal")),
    }
}

/// Whether a string operand spells a floating-point number
pub fn looks_float(s: &str) -> bool {
    s.contains(['.', 'e', 'E'])
}

fn is_float_str(value: &ElValue) -> bool {
    matches!(value, ElValue::Str(s) if looks_float(s))
}

/// Numeric coercion preserving the value's own numeric kind
pub fn to_number(value: &ElValue) -> EvalResult<ElValue> {
    match value {
        ElValue::Null => Ok(ElValue::Long(0)),
        ElValue::Long(_) | ElValue::Double(_) | ElValue::Decimal(_) => Ok(value.clone()),
        ElValue::Str(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(ElValue::Long(0));
            }
            if looks_float(trimmed) {
                trimmed
                    .parse::<f64>()
                    .map(ElValue::Double)
                    .map_err(|_| coercion_error(value, "number"))
            } else {
                trimmed
                    .parse::<i64>()
                    .map(ElValue::Long)
                    .map_err(|_| coercion_error(value, "number"))
            }
        }
        other => Err(coercion_error(other, "number")),
    }
}

/// Coerce a value to an expected result type
pub fn apply(value: ElValue, expected: ExpectedType) -> EvalResult<ElValue> {
    match expected {
        ExpectedType::Any => Ok(value),
        ExpectedType::Bool => to_bool(&value).map(ElValue::Bool),
        ExpectedType::Long => to_long(&value).map(ElValue::Long),
        ExpectedType::Double => to_double(&value).map(ElValue::Double),
        ExpectedType::Decimal => to_decimal(&value).map(ElValue::Decimal),
        ExpectedType::Str => Ok(ElValue::str(to_str(&value))),
    }
}

fn decimal_involved(l: &ElValue, r: &ElValue) -> bool {
    matches!(l, ElValue::Decimal(_)) || matches!(r, ElValue::Decimal(_))
}

fn double_involved(l: &ElValue, r: &ElValue) -> bool {
    matches!(l, ElValue::Double(_))
        || matches!(r, ElValue::Double(_))
        || is_float_str(l)
        || is_float_str(r)
}

/// Addition with EL numeric promotion
pub fn add(l: &ElValue, r: &ElValue) -> EvalResult<ElValue> {
    if l.is_null() && r.is_null() {
        return Ok(ElValue::Long(0));
    }
    if decimal_involved(l, r) {
        let result = to_decimal(l)?
            .checked_add(to_decimal(r)?)
            .ok_or(EvalError::Overflow { operation: "+" })?;
        return Ok(ElValue::Decimal(result));
    }
    if double_involved(l, r) {
        return Ok(ElValue::Double(to_double(l)? + to_double(r)?));
    }
    Ok(ElValue::Long(to_long(l)?.wrapping_add(to_long(r)?)))
}

/// Subtraction with EL numeric promotion
pub fn sub(l: &ElValue, r: &ElValue) -> EvalResult<ElValue> {
    if l.is_null() && r.is_null() {
        return Ok(ElValue::Long(0));
    }
    if decimal_involved(l, r) {
        let result = to_decimal(l)?
            .checked_sub(to_decimal(r)?)
            .ok_or(EvalError::Overflow { operation: "-" })?;
        return Ok(ElValue::Decimal(result));
    }
    if double_involved(l, r) {
        return Ok(ElValue::Double(to_double(l)? - to_double(r)?));
    }
    Ok(ElValue::Long(to_long(l)?.wrapping_sub(to_long(r)?)))
}

/// Multiplication with EL numeric promotion
pub fn mul(l: &ElValue, r: &ElValue) -> EvalResult<ElValue> {
    if l.is_null() && r.is_null() {
        return Ok(ElValue::Long(0));
    }
    if decimal_involved(l, r) {
        let result = to_decimal(l)?
            .checked_mul(to_decimal(r)?)
            .ok_or(EvalError::Overflow { operation: "*" })?;
        return Ok(ElValue::Decimal(result));
    }
    if double_involved(l, r) {
        return Ok(ElValue::Double(to_double(l)? * to_double(r)?));
    }
    Ok(ElValue::Long(to_long(l)?.wrapping_mul(to_long(r)?)))
}

/// Division: decimal when a decimal is involved, double otherwise
pub fn div(l: &ElValue, r: &ElValue) -> EvalResult<ElValue> {
    if l.is_null() && r.is_null() {
        return Ok(ElValue::Long(0));
    }
    if decimal_involved(l, r) {
        let divisor = to_decimal(r)?;
        if divisor.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        let result = to_decimal(l)?
            .checked_div(divisor)
            .ok_or(EvalError::Overflow { operation: "/" })?;
        return Ok(ElValue::Decimal(result));
    }
    Ok(ElValue::Double(to_double(l)? / to_double(r)?))
}

/// Remainder: double when a double or decimal is involved, long otherwise
pub fn rem(l: &ElValue, r: &ElValue) -> EvalResult<ElValue> {
    if l.is_null() && r.is_null() {
        return Ok(ElValue::Long(0));
    }
    if decimal_involved(l, r) || double_involved(l, r) {
        return Ok(ElValue::Double(to_double(l)? % to_double(r)?));
    }
    let divisor = to_long(r)?;
    if divisor == 0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(ElValue::Long(to_long(l)?.wrapping_rem(divisor)))
}

/// Arithmetic negation
pub fn neg(value: &ElValue) -> EvalResult<ElValue> {
    match to_number(value)? {
        ElValue::Long(n) => Ok(ElValue::Long(n.wrapping_neg())),
        ElValue::Double(d) => Ok(ElValue::Double(-d)),
        ElValue::Decimal(d) => Ok(ElValue::Decimal(-d)),
        other => Err(coercion_error(&other, "number")),
    }
}

/// Equality with EL coercion: numeric promotion first, then boolean,
/// then string, then structural comparison
pub fn equals(l: &ElValue, r: &ElValue) -> EvalResult<bool> {
    use ElValue::*;
    match (l, r) {
        (Null, Null) => Ok(true),
        (Null, _) | (_, Null) => Ok(false),
        _ if decimal_involved(l, r) => Ok(to_decimal(l)? == to_decimal(r)?),
        _ if matches!(l, Double(_)) || matches!(r, Double(_)) => {
            Ok(to_double(l)? == to_double(r)?)
        }
        _ if matches!(l, Long(_)) || matches!(r, Long(_)) => Ok(to_long(l)? == to_long(r)?),
        _ if matches!(l, Bool(_)) || matches!(r, Bool(_)) => Ok(to_bool(l)? == to_bool(r)?),
        _ if matches!(l, Str(_)) || matches!(r, Str(_)) => Ok(to_str(l) == to_str(r)),
        _ => Ok(l == r),
    }
}

/// Ordering comparisons; null compares false except `<=`/`>=` on equal
/// operands
pub fn compare(op: BinaryOp, l: &ElValue, r: &ElValue) -> EvalResult<bool> {
    use ElValue::*;
    if l == r && matches!(op, BinaryOp::Le | BinaryOp::Ge) {
        return Ok(true);
    }
    if l.is_null() || r.is_null() {
        return Ok(false);
    }
    let ordering = if decimal_involved(l, r) {
        to_decimal(l)?.cmp(&to_decimal(r)?)
    } else if matches!(l, Double(_)) || matches!(r, Double(_)) {
        match to_double(l)?.partial_cmp(&to_double(r)?) {
            Some(ordering) => ordering,
            None => return Ok(false),
        }
    } else if matches!(l, Long(_)) || matches!(r, Long(_)) {
        to_long(l)?.cmp(&to_long(r)?)
    } else if let (Str(a), Str(b)) = (l, r) {
        a.cmp(b)
    } else {
        return Err(EvalError::InvalidOperandTypes {
            operator: op.symbol(),
            left: l.type_name(),
            right: r.type_name(),
        });
    };
    Ok(match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::Le => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::Ge => ordering != Ordering::Less,
        _ => false,
    })
}

/// The `empty` operator: true for null, the empty string, and empty
/// arrays/objects
pub fn is_empty(value: &ElValue) -> bool {
    match value {
        ElValue::Null => true,
        ElValue::Str(s) => s.is_empty(),
        ElValue::Array(items) => items.is_empty(),
        ElValue::Object(map) => map.is_empty(),
        _ => false,
    }
}
