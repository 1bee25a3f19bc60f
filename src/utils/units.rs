//! Denomination Parsing
//!
//! Converts human-readable amounts ("1.5" ether, "50" gwei) into integer
//! base units without floating point.

use crate::error::ValidationError;

/// Decimal places of one ether
pub const ETHER_DECIMALS: u8 = 18;

/// Decimal places of one gwei
pub const GWEI_DECIMALS: u8 = 9;

/// Parse a decimal amount into base units
///
/// Accepts `"123"`, `"1.5"` and `".5"`. Rejects signs, exponents, more
/// fractional digits than `decimals`, and results above `u128::MAX`.
pub fn parse_units(amount: &str, decimals: u8) -> Result<u128, ValidationError> {
    let trimmed = amount.trim();
    let invalid = || ValidationError::InvalidAmount(format!("not a decimal amount: {:?}", amount));

    let (integer_str, fractional_str) = match trimmed.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (trimmed, ""),
    };
    if integer_str.is_empty() && fractional_str.is_empty() {
        return Err(invalid());
    }
    if !integer_str.chars().all(|c| c.is_ascii_digit()) || !fractional_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    if fractional_str.len() > decimals as usize {
        return Err(ValidationError::InvalidAmount(format!(
            "too many decimal places: {} has at most {}",
            amount, decimals
        )));
    }

    let overflow = || ValidationError::InvalidAmount(format!("amount overflow: {}", amount));
    let multiplier = 10u128.checked_pow(decimals as u32).ok_or_else(overflow)?;

    let integer: u128 = if integer_str.is_empty() {
        0
    } else {
        integer_str.parse().map_err(|_| overflow())?
    };

    // Pad fractional part to full precision
    let fractional: u128 = if fractional_str.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fractional_str, width = decimals as usize);
        padded.parse().map_err(|_| overflow())?
    };

    integer
        .checked_mul(multiplier)
        .and_then(|v| v.checked_add(fractional))
        .ok_or_else(overflow)
}

/// Ether amount in wei
pub fn parse_ether(amount: &str) -> Result<u128, ValidationError> {
    parse_units(amount, ETHER_DECIMALS)
}

/// Gwei amount in wei
pub fn parse_gwei(amount: &str) -> Result<u128, ValidationError> {
    parse_units(amount, GWEI_DECIMALS)
}

/// Render base units as a decimal string, trimming trailing zeros
pub fn format_units(raw: u128, decimals: u8) -> String {
    let Some(multiplier) = 10u128.checked_pow(decimals as u32) else {
        return raw.to_string();
    };
    let integer = raw / multiplier;
    let fractional = raw % multiplier;

    if fractional == 0 {
        integer.to_string()
    } else {
        let frac_str = format!("{:0>width$}", fractional, width = decimals as usize);
        format!("{}.{}", integer, frac_str.trim_end_matches('0'))
    }
}
