use ethers::types::{Address, U256};
use ethers::utils::{format_units, to_checksum};

use crate::types::NATIVE_DECIMALS;
use tracing::warn;

/// Format a raw integer amount with `decimals` places, dropping trailing zeros.
///
/// `1_500_000_000_000_000_000` with 18 decimals becomes `"1.5"`, zero becomes `"0"`.
pub fn format_full(amount: U256, decimals: u32) -> String {
    match format_units(amount, decimals) {
        Ok(formatted) => trim_fraction(formatted),
        Err(e) => {
            warn!("Cannot format {} with {} decimals: {}", amount, decimals, e);
            amount.to_string()
        }
    }
}

fn trim_fraction(formatted: String) -> String {
    if !formatted.contains('.') {
        return formatted;
    }
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Native currency amount (wei) in whole units, fully formatted
pub fn format_ether(wei: U256) -> String {
    format_full(wei, NATIVE_DECIMALS)
}

/// Gas price (wei) in Gwei, fully formatted
pub fn format_gwei(wei: U256) -> String {
    format_full(wei, 9)
}

/// Prefix a formatted amount with a minus sign; zero stays unsigned.
pub fn amount_with_sign(amount: &str) -> String {
    if amount == "0" {
        amount.to_string()
    } else {
        format!("-{}", amount)
    }
}

/// EIP-55 checksummed address string (always `0x` + 40 hex characters)
pub fn checksum_address(address: &Address) -> String {
    to_checksum(address, None)
}

/// Address with a resolved name substituted when one is known
pub fn address_with_name(address: &Address, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => checksum_address(address),
    }
}

/// Shortened `0x1234...abcd` form for log lines
pub fn short_address(address: &Address) -> String {
    let full = checksum_address(address);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_address() -> Address {
        Address::from_str("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap()
    }

    // ==================== format_full tests ====================

    #[test]
    fn test_format_full_zero() {
        assert_eq!(format_full(U256::zero(), 18), "0");
    }

    #[test]
    fn test_format_full_whole_number() {
        let wei = U256::from(10u64.pow(18));
        assert_eq!(format_full(wei, 18), "1");
    }

    #[test]
    fn test_format_full_fractional() {
        let wei = U256::from(15u64) * U256::from(10u64.pow(17));
        assert_eq!(format_full(wei, 18), "1.5");
    }

    #[test]
    fn test_format_full_token_decimals() {
        // 2.5 USDC with 6 decimals
        assert_eq!(format_full(U256::from(2_500_000u64), 6), "2.5");
    }

    #[test]
    fn test_format_full_max_decimals() {
        let value = U256::from(15u64) * U256::from(10u64.pow(17));
        let formatted = format_full(value, crate::types::MAX_DECIMALS);
        assert_eq!(formatted, format!("0.{}15", "0".repeat(57)));
    }

    #[test]
    fn test_format_full_zero_decimals() {
        assert_eq!(format_full(U256::from(3u64), 0), "3");
    }

    #[test]
    fn test_format_full_keeps_integer_zeros() {
        let wei = U256::from(100u64) * U256::from(10u64.pow(18));
        assert_eq!(format_full(wei, 18), "100");
    }

    // ==================== format_ether / format_gwei tests ====================

    #[test]
    fn test_format_ether_small_fee() {
        // 21000 gas at 20 Gwei
        let fee = U256::from(21_000u64 * 20_000_000_000u64);
        assert_eq!(format_ether(fee), "0.00042");
    }

    #[test]
    fn test_format_gwei_whole() {
        let price = U256::from(20u64) * U256::from(10u64.pow(9));
        assert_eq!(format_gwei(price), "20");
    }

    #[test]
    fn test_format_gwei_fractional() {
        assert_eq!(format_gwei(U256::from(1_500_000_000u64)), "1.5");
    }

    // ==================== amount_with_sign tests ====================

    #[test]
    fn test_amount_with_sign_zero() {
        assert_eq!(amount_with_sign("0"), "0");
    }

    #[test]
    fn test_amount_with_sign_positive() {
        assert_eq!(amount_with_sign("1.5"), "-1.5");
    }

    // ==================== address helpers tests ====================

    #[test]
    fn test_checksum_address() {
        let addr = checksum_address(&sample_address());
        assert_eq!(addr, "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert_eq!(addr.len(), 42);
    }

    #[test]
    fn test_address_with_name_substitutes() {
        assert_eq!(
            address_with_name(&sample_address(), Some("vitalik.eth")),
            "vitalik.eth"
        );
    }

    #[test]
    fn test_address_with_name_falls_back() {
        assert_eq!(
            address_with_name(&sample_address(), None),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
        assert_eq!(
            address_with_name(&sample_address(), Some("")),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_short_address() {
        assert_eq!(short_address(&sample_address()), "0x5aAe...eAed");
    }
}
