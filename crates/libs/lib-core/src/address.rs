//! # Account Addresses
//!
//! Parsing and EIP-55 rendering of 20-byte account identifiers.
//!
//! Input is accepted as `0x` followed by 40 hex digits. All-lowercase and
//! all-uppercase digits carry no checksum and are accepted as-is; mixed case
//! must be a valid EIP-55 checksum.
//!
//! ```rust
//! use lib_core::address::{normalize, parse_account};
//!
//! let addr = parse_account("0xf6a4dc2c70e45a43c85151c4afa89f3ea9c463fd").unwrap();
//! assert_eq!(
//!     normalize("0xf6a4dc2c70e45a43c85151c4afa89f3ea9c463fd").unwrap(),
//!     lib_core::address::checksummed(&addr)
//! );
//! assert!(parse_account("not-an-address").is_err());
//! ```

use std::str::FromStr;

use alloy_primitives::Address;

use crate::error::{AppError, Result};

/// Parse a textual account identifier.
pub fn parse_account(input: &str) -> Result<Address> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| invalid(input, "missing 0x prefix"))?;

    if digits.len() != 40 {
        return Err(invalid(input, "expected 40 hex digits"));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid(input, "non-hex character"));
    }

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(format!("0x{}", digits), None)
            .map_err(|_| invalid(input, "checksum mismatch"))
    } else {
        Address::from_str(digits).map_err(|e| invalid(input, &e.to_string()))
    }
}

/// EIP-55 checksummed rendering.
pub fn checksummed(address: &Address) -> String {
    address.to_checksum(None)
}

/// Parse then re-render in checksummed form.
pub fn normalize(input: &str) -> Result<String> {
    parse_account(input).map(|a| checksummed(&a))
}

/// Case-insensitive comparison key (lowercase hex, `0x` prefixed).
pub fn lowercase(address: &Address) -> String {
    format!("0x{:x}", address)
}

fn invalid(input: &str, reason: &str) -> AppError {
    AppError::InvalidAddress(format!("'{}' ({})", input, reason))
}
