//! Per-type parsing of raw values into canonical values.

use super::{DataType, FloatWidth, TimeFormat, Width};
use crate::{Value, ValueError};
use std::num::{IntErrorKind, ParseIntError};

const TRUE_STRINGS: [&str; 3] = ["true", "yes", "y"];
const FALSE_STRINGS: [&str; 3] = ["false", "no", "n"];

fn mismatch(expected: &DataType, raw: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected: expected.to_string(),
        found: raw.type_name(),
    }
}

fn invalid(expected: &DataType, input: &str) -> ValueError {
    ValueError::InvalidFormat {
        expected: expected.to_string(),
        input: input.to_string(),
    }
}

fn out_of_range(expected: &DataType, input: impl ToString) -> ValueError {
    ValueError::OutOfRange {
        expected: expected.to_string(),
        input: input.to_string(),
    }
}

fn int_error(expected: &DataType, input: &str, kind: &IntErrorKind) -> ValueError {
    match kind {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(expected, input),
        _ => invalid(expected, input),
    }
}

pub(super) fn boolean(raw: &Value) -> Result<Value, ValueError> {
    match raw {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::String(s) => {
            let lower = s.to_lowercase();
            if TRUE_STRINGS.contains(&lower.as_str()) {
                Ok(Value::Bool(true))
            } else if FALSE_STRINGS.contains(&lower.as_str()) {
                Ok(Value::Bool(false))
            } else {
                Err(invalid(&DataType::Bool, s))
            }
        },
        other => Err(mismatch(&DataType::Bool, other)),
    }
}

pub(super) fn signed(raw: &Value, width: Width, dt: &DataType) -> Result<Value, ValueError> {
    match raw {
        // Already typed: any width is accepted as the 64-bit form
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::String(s) => {
            let n: i64 = s
                .parse()
                .map_err(|e: ParseIntError| int_error(dt, s, e.kind()))?;
            if width.fits_signed(n) {
                Ok(Value::Int(n))
            } else {
                Err(out_of_range(dt, s))
            }
        },
        other => Err(mismatch(dt, other)),
    }
}

pub(super) fn unsigned(raw: &Value, width: Width, dt: &DataType) -> Result<Value, ValueError> {
    match raw {
        Value::Uint(n) => Ok(Value::Uint(*n)),
        // JSON integers below i64::MAX arrive as Int
        Value::Int(n) => u64::try_from(*n)
            .map(Value::Uint)
            .map_err(|_| out_of_range(dt, n)),
        Value::String(s) => {
            let n: u64 = s
                .parse()
                .map_err(|e: ParseIntError| int_error(dt, s, e.kind()))?;
            if width.fits_unsigned(n) {
                Ok(Value::Uint(n))
            } else {
                Err(out_of_range(dt, s))
            }
        },
        other => Err(mismatch(dt, other)),
    }
}

#[allow(clippy::cast_possible_truncation)]
pub(super) fn float(raw: &Value, width: FloatWidth, dt: &DataType) -> Result<Value, ValueError> {
    match raw {
        Value::Float(n) => Ok(Value::Float(*n)),
        Value::Int(_) | Value::Uint(_) => raw
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| mismatch(dt, raw)),
        Value::String(s) => {
            let n: f64 = s.parse().map_err(|_| invalid(dt, s))?;
            match width {
                FloatWidth::F64 => Ok(Value::Float(n)),
                FloatWidth::F32 => {
                    let narrowed = n as f32;
                    if narrowed.is_infinite() && n.is_finite() {
                        Err(out_of_range(dt, s))
                    } else {
                        Ok(Value::Float(f64::from(narrowed)))
                    }
                },
            }
        },
        other => Err(mismatch(dt, other)),
    }
}

pub(super) fn string(raw: &Value) -> Result<Value, ValueError> {
    match raw {
        Value::String(s) => Ok(Value::String(s.clone())),
        // No textual coercion: a non-string operand is a rejected operand
        other => Err(mismatch(&DataType::String, other)),
    }
}

pub(super) fn timestamp(
    raw: &Value,
    format: &TimeFormat,
    dt: &DataType,
) -> Result<Value, ValueError> {
    let parsed = match raw {
        Value::String(s) => match format.parse_input(s) {
            Some(t) => t,
            // Text rendered by an earlier pass
            None => {
                return format
                    .read_output(s)
                    .map(Value::String)
                    .ok_or_else(|| invalid(dt, s));
            },
        },
        Value::Timestamp(t) => *t,
        _ => return Err(mismatch(dt, raw)),
    };

    match format.format_output(&parsed) {
        Some(Ok(text)) => Ok(Value::String(text)),
        Some(Err(_)) => Err(invalid(dt, &parsed.to_rfc3339())),
        None => Ok(Value::Timestamp(parsed)),
    }
}
