//! Conversions between user-facing decimal strings and the 18 decimal
//! fixed-point integers every contract call uses.

use num::BigUint;
use primitive_types::U256;
use thiserror::Error;

/// Decimal places of the on-chain fixed-point representation.
pub const FIXED_POINT_DECIMALS: u8 = 18;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DecimalError {
    #[error("empty decimal string")]
    Empty,
    #[error("malformed decimal string {0:?}")]
    Malformed(String),
    #[error("value does not fit the fixed-point representation")]
    Overflow,
}

// Note: there was another copy of this function in orderbook/conversions
pub fn u256_to_big_uint(input: &U256) -> BigUint {
    let mut bytes = [0; 32];
    input.to_big_endian(&mut bytes);
    BigUint::from_bytes_be(&bytes)
}

pub fn big_uint_to_u256(input: &BigUint) -> Result<U256, DecimalError> {
    if input.bits() > 256 {
        return Err(DecimalError::Overflow);
    }
    Ok(U256::from_big_endian(&input.to_bytes_be()))
}

// Convenience:

pub trait U256Ext {
    fn to_big_uint(&self) -> BigUint;
}

impl U256Ext for U256 {
    fn to_big_uint(&self) -> BigUint {
        u256_to_big_uint(self)
    }
}

/// Parses a user-entered decimal string into a fixed-point integer with the
/// given number of decimals. Fractional digits beyond the precision are
/// truncated, matching how the wire representation rounds.
pub fn decimal_to_fixed_point(value: &str, decimals: u8) -> Result<U256, DecimalError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DecimalError::Empty);
    }

    let malformed = || DecimalError::Malformed(value.to_string());
    let (integer, fraction) = match trimmed.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (trimmed, ""),
    };
    if integer.is_empty() && fraction.is_empty() {
        return Err(malformed());
    }
    if !integer.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(malformed());
    }
    let integer = if integer.is_empty() {
        U256::zero()
    } else {
        // Characters are validated above, so the only remaining failure is a
        // value too large for 256 bits.
        U256::from_dec_str(integer).map_err(|_| DecimalError::Overflow)?
    };

    let kept = &fraction[..fraction.len().min(usize::from(decimals))];
    let fraction_scaled = if kept.is_empty() {
        U256::zero()
    } else {
        let digits = U256::from_dec_str(kept).map_err(|_| DecimalError::Overflow)?;
        digits
            .checked_mul(U256::exp10(usize::from(decimals) - kept.len()))
            .ok_or(DecimalError::Overflow)?
    };

    integer
        .checked_mul(U256::exp10(usize::from(decimals)))
        .and_then(|scaled| scaled.checked_add(fraction_scaled))
        .ok_or(DecimalError::Overflow)
}

/// Renders a fixed-point integer back into a decimal string, trimming
/// trailing fractional zeros.
pub fn fixed_point_to_decimal(amount: U256, decimals: u8) -> String {
    let (integer, fraction) = amount.div_mod(U256::exp10(usize::from(decimals)));
    if fraction.is_zero() {
        return integer.to_string();
    }
    let fraction = format!("{:0>width$}", fraction.to_string(), width = usize::from(decimals));
    format!("{}.{}", integer, fraction.trim_end_matches('0'))
}

/// `a * b` where both operands and the result share the same fixed-point
/// scale. Intermediate math is arbitrary precision so the product cannot
/// silently wrap.
pub fn fixed_point_mul(a: U256, b: U256, decimals: u8) -> Result<U256, DecimalError> {
    let product = a.to_big_uint() * b.to_big_uint() / BigUint::from(10u8).pow(u32::from(decimals));
    big_uint_to_u256(&product)
}

/// Scales an amount by `numerator / denominator`, truncating. Used for the
/// approval buffer and the gas headroom.
pub fn apply_factor(amount: U256, numerator: u32, denominator: u32) -> Result<U256, DecimalError> {
    assert!(denominator != 0);
    let scaled = a_times_b_over_c(amount, numerator, denominator);
    big_uint_to_u256(&scaled)
}

fn a_times_b_over_c(a: U256, b: u32, c: u32) -> BigUint {
    a.to_big_uint() * BigUint::from(b) / BigUint::from(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(value: &str) -> U256 {
        decimal_to_fixed_point(value, FIXED_POINT_DECIMALS).unwrap()
    }

    #[test]
    fn parses_integers_and_fractions() {
        assert_eq!(wei("10"), U256::from(10u32) * U256::exp10(18));
        assert_eq!(wei("2.00"), U256::from(2u32) * U256::exp10(18));
        assert_eq!(wei("0.5"), U256::exp10(17) * 5u32);
        assert_eq!(wei(".5"), U256::exp10(17) * 5u32);
        assert_eq!(wei("5."), U256::from(5u32) * U256::exp10(18));
        assert_eq!(wei(" 1 "), U256::exp10(18));
        assert_eq!(wei("0"), U256::zero());
    }

    #[test]
    fn truncates_excess_fractional_digits() {
        // 19 fractional digits, the last one dropped.
        assert_eq!(wei("1.0000000000000000019"), U256::exp10(18) + 1u32);
        assert_eq!(wei("0.0000000000000000001"), U256::zero());
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", " ", ".", "1.2.3", "a", "-5", "1,5", "0x10", "+1"] {
            assert!(
                decimal_to_fixed_point(input, FIXED_POINT_DECIMALS).is_err(),
                "accepted {:?}",
                input
            );
        }
    }

    #[test]
    fn rejects_values_over_256_bits() {
        let huge = "9".repeat(80);
        assert_eq!(
            decimal_to_fixed_point(&huge, FIXED_POINT_DECIMALS),
            Err(DecimalError::Overflow)
        );
    }

    #[test]
    fn renders_decimal_strings() {
        assert_eq!(fixed_point_to_decimal(wei("10"), 18), "10");
        assert_eq!(fixed_point_to_decimal(wei("2.5"), 18), "2.5");
        assert_eq!(fixed_point_to_decimal(wei("0.05"), 18), "0.05");
        assert_eq!(fixed_point_to_decimal(U256::zero(), 18), "0");
        assert_eq!(fixed_point_to_decimal(U256::from(1u32), 18), "0.000000000000000001");
    }

    #[test]
    fn round_trips_within_precision() {
        for value in ["10", "2.5", "0.000000000000000001", "123456.654321"] {
            assert_eq!(fixed_point_to_decimal(wei(value), 18), value);
        }
    }

    #[test]
    fn multiplies_at_fixed_point_scale() {
        // 10 * 2.00 = 20.00
        assert_eq!(fixed_point_mul(wei("10"), wei("2.00"), 18).unwrap(), wei("20"));
        assert_eq!(fixed_point_mul(wei("1.5"), wei("0.5"), 18).unwrap(), wei("0.75"));
        assert_eq!(fixed_point_mul(U256::MAX, U256::MAX, 18), Err(DecimalError::Overflow));
    }

    #[test]
    fn applies_percentage_factors() {
        assert_eq!(apply_factor(wei("20"), 105, 100).unwrap(), wei("21"));
        assert_eq!(apply_factor(wei("5"), 105, 100).unwrap(), wei("5.25"));
        // Truncates: 1 wei * 105 / 100 = 1 wei.
        assert_eq!(apply_factor(U256::from(1u32), 105, 100).unwrap(), U256::from(1u32));
        assert_eq!(apply_factor(U256::MAX, 105, 100), Err(DecimalError::Overflow));
    }

    #[test]
    fn big_uint_round_trip() {
        let value = U256::MAX - 1u32;
        assert_eq!(big_uint_to_u256(&value.to_big_uint()).unwrap(), value);
        let too_large = U256::MAX.to_big_uint() + 1u32;
        assert_eq!(big_uint_to_u256(&too_large), Err(DecimalError::Overflow));
    }
}
