//! 3-byte integer, float and 1-byte boolean encodings.

use super::SerialError;

/// Largest encodable integer magnitude, `2^23 - 1`.
pub const INT_MAX: i64 = (1 << 23) - 1;

const SIGN_BIT: u32 = 1 << 23;
const MANTISSA_BITS: u32 = 18;
const MANTISSA_MAX: u64 = (1 << MANTISSA_BITS) - 1;
const MANTISSA_MIN_NORMAL: u64 = 1 << (MANTISSA_BITS - 1);
const EXPONENT_BIAS: i32 = 16;
const EXPONENT_MIN: i32 = -16;
const EXPONENT_MAX: i32 = 15;

/// Largest encodable float magnitude.
pub const FLOAT_MAX: f64 = MANTISSA_MAX as f64 * (1u64 << EXPONENT_MAX) as f64;

fn to_bytes(word: u32) -> [u8; 3] {
    let [_, a, b, c] = word.to_be_bytes();
    [a, b, c]
}

fn from_bytes(bytes: [u8; 3]) -> u32 {
    u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])
}

/// Encode a signed integer with `|value| <= 2^23 - 1`.
pub fn encode_int(value: i64) -> Result<[u8; 3], SerialError> {
    if value.unsigned_abs() > INT_MAX as u64 {
        return Err(SerialError::IntOutOfRange(value));
    }
    let sign = if value < 0 { SIGN_BIT } else { 0 };
    Ok(to_bytes(sign | value.unsigned_abs() as u32))
}

pub fn decode_int(bytes: [u8; 3]) -> i64 {
    let word = from_bytes(bytes);
    let magnitude = (word & !SIGN_BIT) as i64;
    if word & SIGN_BIT != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Encode a float, rounding the mantissa to nearest.
///
/// The mantissa is normalized into `[2^17, 2^18)` unless the exponent would
/// fall below -16, so values under 2 are stored with a fixed step of 2^-16.
pub fn encode_float(value: f64) -> Result<[u8; 3], SerialError> {
    if !value.is_finite() {
        return Err(SerialError::NonFiniteFloat(value));
    }
    let sign = if value.is_sign_negative() && value != 0.0 {
        SIGN_BIT
    } else {
        0
    };
    let magnitude = value.abs();
    if magnitude == 0.0 {
        return Ok(to_bytes(sign));
    }

    let mut exponent = (magnitude.log2().floor() as i32 - (MANTISSA_BITS as i32 - 1))
        .clamp(EXPONENT_MIN, EXPONENT_MAX);
    let mut mantissa = scaled(magnitude, exponent);
    // log2 may land one off near powers of two.
    if mantissa > MANTISSA_MAX && exponent < EXPONENT_MAX {
        exponent += 1;
        mantissa = scaled(magnitude, exponent);
    } else if mantissa < MANTISSA_MIN_NORMAL && exponent > EXPONENT_MIN {
        exponent -= 1;
        mantissa = scaled(magnitude, exponent);
    }
    if mantissa > MANTISSA_MAX {
        return Err(SerialError::FloatOutOfRange(value));
    }

    let biased = (exponent + EXPONENT_BIAS) as u32;
    Ok(to_bytes(sign | (biased << MANTISSA_BITS) | mantissa as u32))
}

fn scaled(magnitude: f64, exponent: i32) -> u64 {
    (magnitude * 2f64.powi(-exponent)).round() as u64
}

pub fn decode_float(bytes: [u8; 3]) -> f64 {
    let word = from_bytes(bytes);
    let mantissa = (word & MANTISSA_MAX as u32) as f64;
    let exponent = ((word >> MANTISSA_BITS) & 0x1f) as i32 - EXPONENT_BIAS;
    let magnitude = mantissa * 2f64.powi(exponent);
    if word & SIGN_BIT != 0 {
        -magnitude
    } else {
        magnitude
    }
}

pub fn encode_bool(value: bool) -> u8 {
    u8::from(value)
}

pub fn decode_bool(byte: u8) -> Result<bool, SerialError> {
    match byte {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(SerialError::InvalidBool(other)),
    }
}
