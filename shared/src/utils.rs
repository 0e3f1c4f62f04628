//! # Shared Utility Functions
//!
//! ## Address Formatting
//!
//! - [`format_address`] - first N and last M characters with an ellipsis
//! - [`truncate_address`] - the `0x1234...abcd` form used in the header button
//!   and the holdings page title
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
//! assert_eq!(format_address(address, 6, 4), "0x5aAe...eAed");
//! ```

/// Format a wallet address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// Returned unchanged when it is too short to shorten.
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= prefix_len + suffix_len + 3 {
        return address.to_string();
    }

    let prefix: String = chars[..prefix_len].iter().collect();
    let suffix: String = chars[chars.len() - suffix_len..].iter().collect();
    format!("{}...{}", prefix, suffix)
}

/// `0x` plus four digits, then the last four digits.
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(ADDR, 6, 4), "0x5aAe...eAed");
        assert_eq!(format_address(ADDR, 4, 4), "0x5a...eAed");
    }

    #[test]
    fn test_format_address_short() {
        assert_eq!(format_address("0x1234", 6, 4), "0x1234");
        assert_eq!(format_address("0x12345678901", 6, 4), "0x12345678901");
        assert_eq!(format_address("", 6, 4), "");
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(truncate_address(ADDR), "0x5aAe...eAed");
    }
}
