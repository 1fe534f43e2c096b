//! # Utility Functions
//!
//! Fixed-point conversion, address derivation and timestamp helpers.

use crate::{error::Result, market::MarketParams, Identity, MarketError, ONE_UNIT, PRICE_DECIMALS};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Derive the registry address of the `index`-th market of a factory.
///
/// The address is the last 20 bytes of a SHA256 over the factory salt, the
/// index and the market's identifying parameters, hex-encoded with a `0x`
/// prefix. Strings are length-prefixed so distinct inputs cannot collide by
/// concatenation.
pub fn derive_market_address(
    salt: &Uuid,
    index: u64,
    owner: &Identity,
    params: &MarketParams,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(index.to_be_bytes());
    hasher.update(owner.to_bytes());
    for field in [&params.trading_pair, &params.price_feed_id] {
        hasher.update((field.len() as u64).to_be_bytes());
        hasher.update(field.as_bytes());
    }
    hasher.update(params.strike_price.to_be_bytes());
    hasher.update(params.maturity_time.to_be_bytes());
    let hash = hasher.finalize();
    format!("0x{}", hex::encode(&hash[12..]))
}

/// Reproducible factory salt: the first 16 bytes of `sha256(label)`.
pub fn salt_from_label(label: &str) -> Uuid {
    let hash = Sha256::digest(label.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);
    Uuid::from_bytes(bytes)
}

/// Parse a decimal amount such as `"1.99"` into 18-decimal fixed point.
pub fn parse_units(amount: &str) -> Result<u128> {
    let amount = amount.trim();
    let invalid = |reason: &str| MarketError::InvalidParameter(format!("amount '{amount}': {reason}"));

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("empty"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected digits with an optional decimal point"));
    }
    if fraction.len() > PRICE_DECIMALS as usize {
        return Err(invalid("more than 18 decimal places"));
    }

    let whole_units = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| invalid("too large"))?
    };
    let fraction_units = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{fraction:0<width$}", width = PRICE_DECIMALS as usize);
        padded.parse::<u128>().map_err(|_| invalid("bad fraction"))?
    };

    whole_units
        .checked_mul(ONE_UNIT)
        .and_then(|v| v.checked_add(fraction_units))
        .ok_or_else(|| invalid("too large"))
}

/// Render an 18-decimal fixed-point value, trimming trailing zeros.
pub fn format_units(value: u128) -> String {
    let whole = value / ONE_UNIT;
    let fraction = value % ONE_UNIT;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0>width$}", width = PRICE_DECIMALS as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Format timestamp as human-readable string
pub fn format_timestamp(timestamp: i64) -> String {
    use chrono::DateTime;
    let dt = DateTime::from_timestamp(timestamp, 0).unwrap_or_default();
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{owner, test_params};

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("1").unwrap(), ONE_UNIT);
        assert_eq!(parse_units("1.99").unwrap(), 1_990_000_000_000_000_000);
        assert_eq!(parse_units("0.000000000000000001").unwrap(), 1);
        assert_eq!(parse_units(".5").unwrap(), ONE_UNIT / 2);
        assert_eq!(parse_units("55000").unwrap(), 55_000 * ONE_UNIT);

        for bad in ["", ".", "1.2.3", "-1", "abc", "0.0000000000000000001"] {
            assert!(parse_units(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(0), "0");
        assert_eq!(format_units(ONE_UNIT), "1");
        assert_eq!(format_units(1_990_000_000_000_000_000), "1.99");
        assert_eq!(format_units(1), "0.000000000000000001");
        assert_eq!(parse_units(&format_units(123_456_789)).unwrap(), 123_456_789);
    }

    #[test]
    fn test_market_address_derivation() {
        let salt = Uuid::from_u128(0x1234);
        let params = test_params();
        let first = derive_market_address(&salt, 0, &owner(), &params);
        let again = derive_market_address(&salt, 0, &owner(), &params);
        let second = derive_market_address(&salt, 1, &owner(), &params);
        let other_factory = derive_market_address(&Uuid::from_u128(0x5678), 0, &owner(), &params);

        assert_eq!(first, again);
        assert_ne!(first, second);
        assert_ne!(first, other_factory);
        assert!(first.starts_with("0x"));
        assert_eq!(first.len(), 42);
    }

    #[test]
    fn test_salt_from_label() {
        assert_eq!(salt_from_label("btc-weekly"), salt_from_label("btc-weekly"));
        assert_ne!(salt_from_label("btc-weekly"), salt_from_label("eth-weekly"));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1735689600), "2025-01-01 00:00:00 UTC");
    }
}
