//! Number lexeme validation and conversion.
//!
//! The scanner consumes a maximal run of number-ish bytes without checking
//! anything, so every decoder starts by validating the lexeme against the
//! JSON number grammar (`-? (0|[1-9][0-9]*) (\.[0-9]+)? ([eE][+-]?[0-9]+)?`)
//! and only then converts. `str::parse` alone would accept a wider grammar
//! (`inf`, leading `+`, `.5`, `1.`), which is why the shape check comes
//! first.

use alloc::string::ToString;

use crate::error::{ErrorKind, ParseError, RangeError};

/// Which optional grammar parts a validated lexeme used.
pub(crate) struct Shape {
    pub negative: bool,
    pub fractional: bool,
    pub exponent: bool,
}

/// Full-match validation against the JSON number grammar.
pub(crate) fn validate(data: &str) -> Option<Shape> {
    let bytes = data.as_bytes();
    let mut at = 0;

    let negative = bytes.first() == Some(&b'-');
    if negative {
        at += 1;
    }

    // integer part: a lone zero or a nonzero digit run, no leading zeros
    match bytes.get(at) {
        Some(b'0') => at += 1,
        Some(b'1'..=b'9') => {
            at += 1;
            while matches!(bytes.get(at), Some(b'0'..=b'9')) {
                at += 1;
            }
        }
        _ => return None,
    }

    let fractional = bytes.get(at) == Some(&b'.');
    if fractional {
        at += 1;
        if !matches!(bytes.get(at), Some(b'0'..=b'9')) {
            return None;
        }
        while matches!(bytes.get(at), Some(b'0'..=b'9')) {
            at += 1;
        }
    }

    let exponent = matches!(bytes.get(at), Some(b'e' | b'E'));
    if exponent {
        at += 1;
        if matches!(bytes.get(at), Some(b'+' | b'-')) {
            at += 1;
        }
        if !matches!(bytes.get(at), Some(b'0'..=b'9')) {
            return None;
        }
        while matches!(bytes.get(at), Some(b'0'..=b'9')) {
            at += 1;
        }
    }

    (at == bytes.len()).then_some(Shape {
        negative,
        fractional,
        exponent,
    })
}

pub(crate) fn decode_double(data: &str) -> Result<f64, ErrorKind> {
    if validate(data).is_none() {
        return Err(ParseError::InvalidNumber(data.to_string()).into());
    }
    // overflow and underflow saturate to ±inf / 0 in the conversion, which
    // is not an error; the grammar check above makes failure unreachable
    data.parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber(data.to_string()).into())
}

pub(crate) fn decode_float(data: &str) -> Result<f32, ErrorKind> {
    decode_double(data).map(|value| value as f32)
}

/// Shared shape check for the integer decoders.
fn validate_integer(data: &str, signed: bool) -> Result<(), ErrorKind> {
    let Some(shape) = validate(data) else {
        return Err(ParseError::InvalidNumber(data.to_string()).into());
    };
    if shape.fractional {
        return Err(ParseError::FractionalPart(data.to_string()).into());
    }
    if shape.exponent {
        return Err(ParseError::Exponent(data.to_string()).into());
    }
    if !signed && shape.negative {
        return Err(ParseError::Negative(data.to_string()).into());
    }
    Ok(())
}

fn range_error(data: &str, target: &'static str) -> ErrorKind {
    RangeError {
        value: data.to_string(),
        target,
    }
    .into()
}

pub(crate) fn decode_unsigned_int(data: &str) -> Result<u32, ErrorKind> {
    validate_integer(data, false)?;
    data.parse::<u32>()
        .map_err(|_| range_error(data, "32 bits"))
}

pub(crate) fn decode_int(data: &str) -> Result<i32, ErrorKind> {
    validate_integer(data, true)?;
    data.parse::<i32>()
        .map_err(|_| range_error(data, "32 bits"))
}

/// 52 bits is the exactly-representable unsigned integer range of a JSON
/// number; 2^52 itself is still exact and accepted.
pub(crate) fn decode_unsigned_long(data: &str) -> Result<u64, ErrorKind> {
    validate_integer(data, false)?;
    let value = data
        .parse::<u64>()
        .map_err(|_| range_error(data, "52 bits"))?;
    if value > 1 << 52 {
        return Err(range_error(data, "52 bits"));
    }
    Ok(value)
}

/// 53 bits is the exactly-representable signed integer range of a JSON
/// number; ±2^53 are still exact and accepted.
pub(crate) fn decode_long(data: &str) -> Result<i64, ErrorKind> {
    validate_integer(data, true)?;
    let value = data
        .parse::<i64>()
        .map_err(|_| range_error(data, "53 bits"))?;
    if value > 1 << 53 || value < -(1 << 53) {
        return Err(range_error(data, "53 bits"));
    }
    Ok(value)
}
