//! Operator semantics on [`Value`]s.
//!
//! Integer arithmetic stays integral where the result is whole. Mixed
//! integer/float arithmetic goes through `rust_decimal` so `100 * 1.1` is
//! exactly `110` and collapses back to an integer; float/float arithmetic is
//! plain `f64`.
//!
//! `Unset` on either side short-circuits: `==` holds only for two unset
//! values, `!=` is its negation, ordering comparisons are false and every
//! other operator yields `Unset`.

use std::cmp::Ordering;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};

use crate::{
    ast::{BinOp, UnaryOp},
    evaluator::EvalError,
    value::Value,
};

pub fn binary(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    if left.is_unset() || right.is_unset() {
        return Ok(match op {
            BinOp::Equal => Value::Boolean(left == right),
            BinOp::NotEqual => Value::Boolean(left != right),
            op if op.is_comparison() => Value::Boolean(false),
            _ => Value::Unset,
        });
    }

    match op {
        BinOp::Equal => Ok(Value::Boolean(left == right)),
        BinOp::NotEqual => Ok(Value::Boolean(left != right)),
        BinOp::LessThan | BinOp::GreaterThan | BinOp::LessEqual | BinOp::GreaterEqual => {
            let ordering = compare(left, right).ok_or_else(|| {
                EvalError::TypeError(format!(
                    "Cannot compare {} {} {}",
                    left.type_name(),
                    op,
                    right.type_name()
                ))
            })?;
            Ok(Value::Boolean(match op {
                BinOp::LessThan => ordering == Ordering::Less,
                BinOp::GreaterThan => ordering == Ordering::Greater,
                BinOp::LessEqual => ordering != Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinOp::Add => match (left, right) {
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            (Value::Array(a), Value::Array(b)) => {
                Ok(Value::Array(a.iter().chain(b.iter()).cloned().collect()))
            }
            _ => arithmetic(op, left, right),
        },
        BinOp::Multiply => match (left, right) {
            (Value::String(s), Value::Integer(n)) | (Value::Integer(n), Value::String(s)) => {
                repeat(s, *n)
            }
            _ => arithmetic(op, left, right),
        },
        BinOp::Subtract | BinOp::Divide | BinOp::FloorDivide | BinOp::Modulo | BinOp::Power => {
            arithmetic(op, left, right)
        }
        BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor => bitwise(op, left, right),
        BinOp::ShiftLeft | BinOp::ShiftRight => shift(op, left, right),
    }
}

pub fn unary(op: UnaryOp, value: &Value) -> Result<Value, EvalError> {
    match (op, value) {
        (_, Value::Unset) => Ok(Value::Unset),
        (UnaryOp::Negate, Value::Integer(n)) => n
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| EvalError::Overflow(format!("-({})", n))),
        (UnaryOp::Negate, Value::Float(n)) => Ok(Value::Float(-n)),
        (UnaryOp::Plus, Value::Integer(_) | Value::Float(_)) => Ok(value.clone()),
        (UnaryOp::Invert, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (UnaryOp::Invert, Value::Integer(n)) => Ok(Value::Integer(!n)),
        (op, v) => Err(EvalError::TypeError(format!(
            "Bad operand type for unary {}: {}",
            op,
            v.type_name()
        ))),
    }
}

/// Ordering between numbers (across integer/float), strings and booleans.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
        _ => left.as_float()?.partial_cmp(&right.as_float()?),
    }
}

fn arithmetic(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => integer_arith(op, *a, *b),
        (Value::Float(a), Value::Float(b)) => float_arith(op, *a, *b),
        (Value::Integer(_), Value::Float(_)) | (Value::Float(_), Value::Integer(_)) => {
            mixed_arith(op, left, right)
        }
        (a, b) => Err(EvalError::TypeError(format!(
            "Unsupported operand types for {}: {} and {}",
            op,
            a.type_name(),
            b.type_name()
        ))),
    }
}

/// `s * n`. Non-positive counts give the empty string.
fn repeat(s: &str, n: i64) -> Result<Value, EvalError> {
    let count = usize::try_from(n).unwrap_or(0);
    match s.len().checked_mul(count) {
        Some(len) if isize::try_from(len).is_ok() => Ok(Value::String(s.repeat(count))),
        _ => Err(EvalError::Overflow(format!("{:?} * {}", s, n))),
    }
}

fn integer_arith(op: BinOp, a: i64, b: i64) -> Result<Value, EvalError> {
    let overflow = || EvalError::Overflow(format!("{} {} {}", a, op, b));
    if b == 0 && matches!(op, BinOp::Divide | BinOp::FloorDivide | BinOp::Modulo) {
        return Err(EvalError::DivisionByZero);
    }
    match op {
        BinOp::Add => a.checked_add(b).map(Value::Integer).ok_or_else(overflow),
        BinOp::Subtract => a.checked_sub(b).map(Value::Integer).ok_or_else(overflow),
        BinOp::Multiply => a.checked_mul(b).map(Value::Integer).ok_or_else(overflow),
        // Exact division stays an integer
        BinOp::Divide => match a.checked_rem(b) {
            Some(0) => a.checked_div(b).map(Value::Integer).ok_or_else(overflow),
            Some(_) => Ok(Value::Float(a as f64 / b as f64)),
            None => Err(overflow()),
        },
        BinOp::FloorDivide => {
            let q = a.checked_div(b).ok_or_else(overflow)?;
            let adjust = a % b != 0 && ((a < 0) != (b < 0));
            Ok(Value::Integer(if adjust { q - 1 } else { q }))
        }
        BinOp::Modulo => {
            let r = a.checked_rem(b).ok_or_else(overflow)?;
            let adjust = r != 0 && ((r < 0) != (b < 0));
            Ok(Value::Integer(if adjust { r + b } else { r }))
        }
        BinOp::Power if b < 0 => {
            if a == 0 {
                return Err(EvalError::DivisionByZero);
            }
            float_arith(op, a as f64, b as f64)
        }
        BinOp::Power => match (u32::try_from(b), a) {
            (Ok(exp), _) => a.checked_pow(exp).map(Value::Integer).ok_or_else(overflow),
            // Exponents past u32 only stay finite for these bases
            (Err(_), 0 | 1) => Ok(Value::Integer(a)),
            (Err(_), -1) => Ok(Value::Integer(if b % 2 == 0 { 1 } else { -1 })),
            (Err(_), _) => Err(overflow()),
        },
        _ => Err(EvalError::TypeError(format!("{} is not arithmetic", op))),
    }
}

fn float_arith(op: BinOp, a: f64, b: f64) -> Result<Value, EvalError> {
    if b == 0.0 && matches!(op, BinOp::Divide | BinOp::FloorDivide | BinOp::Modulo) {
        return Err(EvalError::DivisionByZero);
    }
    let result = match op {
        BinOp::Add => a + b,
        BinOp::Subtract => a - b,
        BinOp::Multiply => a * b,
        BinOp::Divide => a / b,
        BinOp::FloorDivide => (a / b).floor(),
        BinOp::Modulo => {
            let r = a % b;
            if r != 0.0 && ((r < 0.0) != (b < 0.0)) { r + b } else { r }
        }
        BinOp::Power => {
            if a == 0.0 && b < 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            let r = a.powf(b);
            if r.is_infinite() && a.is_finite() && b.is_finite() {
                return Err(EvalError::Overflow(format!("{} {} {}", a, op, b)));
            }
            r
        }
        _ => return Err(EvalError::TypeError(format!("{} is not arithmetic", op))),
    };
    Ok(Value::Float(result))
}

fn to_decimal(v: &Value) -> Option<Decimal> {
    match v {
        Value::Integer(n) => Decimal::from_i64(*n),
        Value::Float(n) => Decimal::from_f64(*n),
        _ => None,
    }
}

fn from_decimal(d: Decimal) -> Option<Value> {
    if d.is_integer()
        && let Some(i) = d.to_i64()
    {
        return Some(Value::Integer(i));
    }
    d.to_f64().map(Value::Float)
}

/// Integer mixed with float: exact decimal arithmetic, falling back to `f64`
/// where the decimal cannot represent an operand or the result.
fn mixed_arith(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    if let (Some(a), Some(b)) = (to_decimal(left), to_decimal(right)) {
        if b.is_zero() && matches!(op, BinOp::Divide | BinOp::FloorDivide | BinOp::Modulo) {
            return Err(EvalError::DivisionByZero);
        }
        let exact = match op {
            BinOp::Add => a.checked_add(b),
            BinOp::Subtract => a.checked_sub(b),
            BinOp::Multiply => a.checked_mul(b),
            BinOp::Divide => a.checked_div(b),
            BinOp::FloorDivide => a.checked_div(b).map(|q| q.floor()),
            BinOp::Modulo => a.checked_rem(b).map(|r| {
                if !r.is_zero() && r.is_sign_negative() != b.is_sign_negative() {
                    r + b
                } else {
                    r
                }
            }),
            _ => None,
        };
        if let Some(value) = exact.and_then(from_decimal) {
            return Ok(value);
        }
    }

    match (left.as_float(), right.as_float()) {
        (Some(a), Some(b)) => float_arith(op, a, b),
        _ => Err(EvalError::TypeError(format!(
            "Unsupported operand types for {}: {} and {}",
            op,
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn bitwise(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(match op {
            BinOp::BitAnd => *a && *b,
            BinOp::BitOr => *a || *b,
            _ => a ^ b,
        })),
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(match op {
            BinOp::BitAnd => a & b,
            BinOp::BitOr => a | b,
            _ => a ^ b,
        })),
        (a, b) => Err(EvalError::TypeError(format!(
            "Unsupported operand types for {}: {} and {}",
            op,
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn shift(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Value::Integer(a), Value::Integer(b)) = (left, right) else {
        return Err(EvalError::TypeError(format!(
            "Unsupported operand types for {}: {} and {}",
            op,
            left.type_name(),
            right.type_name()
        )));
    };
    if *b < 0 {
        return Err(EvalError::TypeError(format!("negative shift count {}", b)));
    }
    let amount = u32::try_from(*b).unwrap_or(u32::MAX);
    let shifted = match op {
        BinOp::ShiftLeft if *a == 0 => Some(0),
        // Bits shifted out of the top are an overflow, not a wrap
        BinOp::ShiftLeft => a.checked_shl(amount).filter(|r| r >> amount == *a),
        _ => Some(a.checked_shr(amount).unwrap_or(if *a < 0 { -1 } else { 0 })),
    };
    shifted
        .map(Value::Integer)
        .ok_or_else(|| EvalError::Overflow(format!("{} {} {}", a, op, b)))
}
