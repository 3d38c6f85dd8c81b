//! Script number codec
//!
//! Script numbers are signed integers encoded little-endian with a sign bit
//! in the most significant byte. Zero is the empty string. Radiant extends
//! the width to 8 bytes (64-bit integers).

use crate::constants::MAX_SCRIPTNUM_SIZE;
use crate::error::{Result, ScriptError};

/// Encode a signed integer as a minimal script number.
///
/// The magnitude is serialized little-endian; if the high bit of the last
/// magnitude byte is set an extra sign byte is appended (0x80 for negative
/// values, 0x00 otherwise), else the sign is OR-ed into that byte.
pub fn encode(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }

    let neg = n < 0;
    let mut abs = n.unsigned_abs();
    let mut result = Vec::with_capacity(9);
    while abs > 0 {
        result.push((abs & 0xff) as u8);
        abs >>= 8;
    }

    let last = *result.last().unwrap();
    if last & 0x80 != 0 {
        result.push(if neg { 0x80 } else { 0x00 });
    } else if neg {
        *result.last_mut().unwrap() |= 0x80;
    }

    result
}

/// Decode a script number.
///
/// Inputs wider than 8 bytes fail with `InvalidNumberRange`. Non-minimal
/// encodings are accepted here; minimality is the interpreter's concern
/// (MINIMALDATA).
pub fn decode(bytes: &[u8]) -> Result<i64> {
    if bytes.len() > MAX_SCRIPTNUM_SIZE {
        return Err(ScriptError::InvalidNumberRange);
    }
    if bytes.is_empty() {
        return Ok(0);
    }

    let mut result: i64 = 0;
    for (i, &b) in bytes.iter().enumerate() {
        result |= (b as i64) << (8 * i);
    }

    // The top bit of the last byte is the sign bit.
    if bytes[bytes.len() - 1] & 0x80 != 0 {
        result &= !(0x80i64 << (8 * (bytes.len() - 1)));
        result = -result;
    }

    Ok(result)
}

/// Boolean coercion: any non-zero byte makes the value true, except a lone
/// sign bit (negative zero) in the last position.
pub fn to_bool(bytes: &[u8]) -> bool {
    for (i, &b) in bytes.iter().enumerate() {
        if b != 0 {
            if i == bytes.len() - 1 && b == 0x80 {
                return false;
            }
            return true;
        }
    }
    false
}

/// True if `bytes` is the minimal encoding of the number it decodes to.
pub fn is_minimally_encoded(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return true;
    }
    let last = bytes[bytes.len() - 1];
    // The last byte may only carry the sign bit if the byte below it
    // needs its high bit.
    if last & 0x7f == 0 {
        if bytes.len() == 1 {
            return false; // bare 0x00 or 0x80 encodes zero non-minimally
        }
        return bytes[bytes.len() - 2] & 0x80 != 0;
    }
    true
}

/// Minimally re-encode a byte string (OP_BIN2NUM semantics): strip
/// redundant trailing zero bytes while preserving the sign.
pub fn minimize(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut data = bytes.to_vec();
    if data.is_empty() {
        return Ok(data);
    }
    let sign = data[data.len() - 1] & 0x80;
    // Drop trailing bytes that carry no information.
    while data.len() > 1 && data[data.len() - 1] & 0x7f == 0 && data[data.len() - 2] & 0x80 == 0 {
        data.pop();
        let idx = data.len() - 1;
        data[idx] |= sign;
    }
    if data.len() == 1 && data[0] & 0x7f == 0 {
        // Plain or negative zero minimizes to the empty string.
        return Ok(Vec::new());
    }
    if data.len() > MAX_SCRIPTNUM_SIZE {
        return Err(ScriptError::InvalidNumberRange);
    }
    Ok(data)
}
