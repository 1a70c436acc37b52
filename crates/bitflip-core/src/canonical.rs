//! Fixed-width unsigned canonical form and big-endian byte conversions.
//!
//! Values are `BigUint`, so there is no sign to normalize; canonicalization
//! reduces a value modulo `2^width_bits`, keeping the low bits exactly as a
//! fixed-width unsigned register would.

use num_bigint::BigUint;
use num_traits::{Num, One};

use crate::error::FlipError;

pub const DEFAULT_WIDTH_BITS: u32 = 256;
pub const MAX_WIDTH_BITS: u32 = 4096;

pub fn check_width(width_bits: u32) -> Result<(), FlipError> {
    if width_bits == 0 || width_bits % 8 != 0 || width_bits > MAX_WIDTH_BITS {
        return Err(FlipError::WidthInvalid(width_bits));
    }
    Ok(())
}

/// `2^width_bits - 1`.
pub fn width_mask(width_bits: u32) -> BigUint {
    (BigUint::one() << width_bits) - BigUint::one()
}

pub fn canonicalize(value: &BigUint, width_bits: u32) -> BigUint {
    if value.bits() <= u64::from(width_bits) {
        return value.clone();
    }
    value & width_mask(width_bits)
}

/// Minimal big-endian serialization. Zero serializes as a single `0x00` byte.
pub fn minimal_bytes(value: &BigUint) -> Vec<u8> {
    value.to_bytes_be()
}

/// Big-endian serialization of the canonical value, left-padded with zero
/// bytes to exactly `width_bits / 8` bytes.
pub fn fixed_bytes(value: &BigUint, width_bits: u32) -> Vec<u8> {
    let width = (width_bits / 8) as usize;
    let b = canonicalize(value, width_bits).to_bytes_be();
    let mut out = vec![0u8; width];
    // A canonical value never needs more than `width` bytes.
    out[width - b.len()..].copy_from_slice(&b);
    out
}

pub fn from_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Parse a decimal value, or a hex value when prefixed with `0x`/`0X`.
pub fn parse_value(s: &str) -> Result<BigUint, FlipError> {
    let t = s.trim();
    let parsed = match t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        Some(h) => BigUint::from_str_radix(h, 16),
        None => BigUint::from_str_radix(t, 10),
    };
    parsed.map_err(|_| FlipError::ValueParse(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_wraps_above_width() {
        let v = (BigUint::one() << 256u32) + BigUint::from(5u8);
        assert_eq!(canonicalize(&v, 256), BigUint::from(5u8));
        assert_eq!(canonicalize(&BigUint::from(5u8), 256), BigUint::from(5u8));
    }

    #[test]
    fn fixed_bytes_pads_to_width() {
        let b = fixed_bytes(&BigUint::from(0x0102u32), 32);
        assert_eq!(b, vec![0x00, 0x00, 0x01, 0x02]);
        assert_eq!(fixed_bytes(&BigUint::from(0u8), 16), vec![0, 0]);
    }

    #[test]
    fn fixed_bytes_drops_bits_above_width() {
        let b = fixed_bytes(&BigUint::from(0x01_0203u32), 16);
        assert_eq!(b, vec![0x02, 0x03]);
    }

    #[test]
    fn minimal_bytes_of_zero_is_one_byte() {
        assert_eq!(minimal_bytes(&BigUint::from(0u8)), vec![0u8]);
    }

    #[test]
    fn parse_value_accepts_hex_and_decimal() {
        assert_eq!(parse_value("0xff").unwrap(), BigUint::from(255u32));
        assert_eq!(parse_value("255").unwrap(), BigUint::from(255u32));
        assert!(parse_value("0xzz").is_err());
        assert!(parse_value("").is_err());
        assert!(parse_value("-1").is_err());
    }

    #[test]
    fn check_width_rejects_partial_bytes() {
        assert!(check_width(256).is_ok());
        assert!(check_width(8).is_ok());
        assert!(check_width(0).is_err());
        assert!(check_width(12).is_err());
        assert!(check_width(MAX_WIDTH_BITS).is_ok());
        assert!(check_width(MAX_WIDTH_BITS + 8).is_err());
        assert!(check_width(4_294_967_288).is_err());
    }
}
