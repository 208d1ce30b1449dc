//! Parsing utilities
//!
//! Exact conversions from on-chain integer amounts (smallest units) to
//! display units. Values stay in `Decimal` until they are published.

use rust_decimal::Decimal;

/// Largest decimal exponent a `Decimal` can carry
pub const MAX_DECIMALS: u32 = 28;

/// Largest integer that fits in a `Decimal` mantissa (2^96 - 1)
const MAX_MANTISSA: u128 = (1u128 << 96) - 1;

/// Parses an amount string as returned by chain APIs ("1500000", "12.345")
///
/// Cosmos `DecCoin` amounts carry 18 fractional digits, which can exceed what a
/// 96-bit mantissa holds. Trailing fractional digits are truncated until the
/// value fits; only integer parts too large for a `Decimal` are rejected.
pub fn parse_decimal_amount(s: &str) -> Result<Decimal, String> {
	let trimmed = s.trim();
	let (integer, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
	if integer.is_empty()
		|| !integer.bytes().all(|b| b.is_ascii_digit())
		|| !fraction.bytes().all(|b| b.is_ascii_digit())
	{
		return Err(format!("Invalid amount '{}'", s));
	}

	let digits = format!("{}{}", integer, fraction);
	let mut significant = digits.trim_start_matches('0');
	let mut scale = fraction.len() as u32;

	while scale > MAX_DECIMALS || !fits_mantissa(significant) {
		if scale == 0 {
			return Err(format!("Invalid amount '{}': too large for a decimal", s));
		}
		significant = &significant[..significant.len().saturating_sub(1)];
		scale -= 1;
	}

	let mantissa = if significant.is_empty() {
		0
	} else {
		significant
			.parse::<i128>()
			.map_err(|e| format!("Invalid amount '{}': {}", s, e))?
	};

	Decimal::try_from_i128_with_scale(mantissa, scale)
		.map_err(|e| format!("Invalid amount '{}': {}", s, e))
}

fn fits_mantissa(digits: &str) -> bool {
	digits.is_empty()
		|| (digits.len() <= 29 && digits.parse::<u128>().is_ok_and(|m| m <= MAX_MANTISSA))
}

/// Divides `raw` by `10^decimals` without going through floating point
///
/// Digits beyond the 28 fractional places a `Decimal` can hold are rounded away.
pub fn scale_decimal(raw: Decimal, decimals: u32) -> Result<Decimal, String> {
	if decimals > MAX_DECIMALS {
		return Err(format!(
			"Unsupported decimals {}: at most {} are supported",
			decimals, MAX_DECIMALS
		));
	}

	let mut value = if raw.scale() + decimals > MAX_DECIMALS {
		raw.round_dp(MAX_DECIMALS - decimals)
	} else {
		raw
	};
	let scale = value.scale() + decimals;
	value
		.set_scale(scale)
		.map_err(|e| format!("Failed to scale {} by 10^{}: {}", raw, decimals, e))?;

	Ok(value.normalize())
}

/// Converts an integer amount in smallest units into display units
///
/// # Arguments
/// * `raw` - Amount in smallest units (wei, lamports, planck, ...)
/// * `decimals` - Decimal exponent of the asset
///
/// # Returns
/// * `Result<Decimal, String>` - `raw / 10^decimals`, exact whenever `raw` fits
///   in 96 bits. Larger amounts lose their least significant digits.
pub fn scale_integer(raw: u128, decimals: u32) -> Result<Decimal, String> {
	let mut raw = raw;
	let mut decimals = decimals;
	while raw > MAX_MANTISSA {
		if decimals == 0 {
			return Err(format!("Amount {} does not fit in a decimal", raw));
		}
		raw /= 10;
		decimals -= 1;
	}

	let mantissa = i128::try_from(raw).map_err(|e| format!("Invalid amount {}: {}", raw, e))?;
	let value = Decimal::try_from_i128_with_scale(mantissa, 0)
		.map_err(|e| format!("Invalid amount {}: {}", raw, e))?;

	scale_decimal(value, decimals)
}
