//! Numeric literal values and the composite literal forms `approx`, `dec`, `rat`.

use serde::Serialize;
use std::fmt;

/// Largest accepted literal magnitude: `sqrt(i64::MAX / 2) - 1`.
///
/// Interval bounds get squared and combined downstream, so anything past this
/// is rejected while lexing instead of wrapping later.
pub const MAX_LITERAL: i64 = 2_147_483_647;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum NumberLiteral {
    Integer(i64),
    Real(f64),
    /// Decoded hexadecimal float; the value is bit-exact.
    HexFloat(f64),
}

impl NumberLiteral {
    pub fn as_f64(&self) -> f64 {
        match *self {
            NumberLiteral::Integer(i) => i as f64,
            NumberLiteral::Real(r) | NumberLiteral::HexFloat(r) => r,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            NumberLiteral::Integer(i) => Some(i),
            NumberLiteral::Real(r) if r.fract() == 0.0 => Some(r as i64),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.as_f64() == 0.0
    }

    pub fn negate(self) -> Self {
        match self {
            NumberLiteral::Integer(i) => NumberLiteral::Integer(-i),
            NumberLiteral::Real(r) => NumberLiteral::Real(-r),
            NumberLiteral::HexFloat(r) => NumberLiteral::HexFloat(-r),
        }
    }
}

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberLiteral::Integer(i) => write!(f, "{}", i),
            NumberLiteral::Real(r) => {
                if r.fract() == 0.0 && r.is_finite() {
                    write!(f, "{:.1}", r)
                } else {
                    write!(f, "{}", r)
                }
            }
            NumberLiteral::HexFloat(r) => write!(f, "{}", r),
        }
    }
}

/// Why a literal could not be turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralError {
    Overflow,
    Malformed,
}

/// Parses `\d+(\.\d*)?`: integer first, floating point when a decimal point
/// is present.
pub fn parse_decimal(text: &str) -> Result<NumberLiteral, LiteralError> {
    if text.contains('.') {
        let value: f64 = text.parse().map_err(|_| LiteralError::Malformed)?;
        if value > MAX_LITERAL as f64 {
            return Err(LiteralError::Overflow);
        }
        return Ok(NumberLiteral::Real(value));
    }
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LiteralError::Malformed);
    }
    // Too many digits for u64 is an overflow too, not a malformed literal.
    let value: u64 = text.parse().map_err(|_| LiteralError::Overflow)?;
    if value > MAX_LITERAL as u64 {
        return Err(LiteralError::Overflow);
    }
    Ok(NumberLiteral::Integer(value as i64))
}

/// Parses `0x[hex]*(\.[hex]+)?(p-?\d+)?` into the exact double it denotes.
pub fn parse_hex_float(text: &str) -> Result<NumberLiteral, LiteralError> {
    let body = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or(LiteralError::Malformed)?;

    let (mantissa_text, exponent_text) = match body.find(|c: char| c == 'p' || c == 'P') {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };
    let (int_text, frac_text) = match mantissa_text.find('.') {
        Some(i) => (&mantissa_text[..i], &mantissa_text[i + 1..]),
        None => (mantissa_text, ""),
    };

    let mut mantissa = 0.0f64;
    for ch in int_text.chars() {
        let digit = ch.to_digit(16).ok_or(LiteralError::Malformed)?;
        mantissa = mantissa * 16.0 + digit as f64;
    }
    let mut scale = 1.0 / 16.0;
    for ch in frac_text.chars() {
        let digit = ch.to_digit(16).ok_or(LiteralError::Malformed)?;
        mantissa += digit as f64 * scale;
        scale /= 16.0;
    }

    let exponent: i32 = match exponent_text {
        Some(e) => e.parse().map_err(|_| LiteralError::Malformed)?,
        None => 0,
    };
    let value = mantissa * 2f64.powi(exponent);
    if !value.is_finite() || value > MAX_LITERAL as f64 {
        return Err(LiteralError::Overflow);
    }
    Ok(NumberLiteral::HexFloat(value))
}

/// A literal number as written in source, before the engine interprets it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Numeral {
    Literal(NumberLiteral),
    /// `approx(x)`: only accepted while safe input is off.
    Approx(Box<Numeral>),
    /// `dec(a, b)`: decimal encoding, interpreted by the engine.
    Dec(Box<Numeral>, Box<Numeral>),
    /// `rat(a, b)`: rational encoding with a plain literal denominator.
    Rat(Box<Numeral>, NumberLiteral),
}

impl Numeral {
    pub fn literal(&self) -> Option<NumberLiteral> {
        match self {
            Numeral::Literal(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<NumberLiteral> for Numeral {
    fn from(n: NumberLiteral) -> Self {
        Numeral::Literal(n)
    }
}
