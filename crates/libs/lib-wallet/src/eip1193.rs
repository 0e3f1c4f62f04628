//! # EIP-1193 Wire Helpers
//!
//! Method names, the `wallet_addEthereumChain` payload, and parsing of the
//! loosely typed values providers hand back. Kept free of any JS types so
//! the browser binding only converts to and from `serde_json::Value`.

use lib_core::{AppError, NetworkConfig, Result};
use serde::Serialize;
use serde_json::Value;

pub const ETH_CHAIN_ID: &str = "eth_chainId";
pub const ETH_ACCOUNTS: &str = "eth_accounts";
pub const ETH_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
pub const WALLET_ADD_ETHEREUM_CHAIN: &str = "wallet_addEthereumChain";

/// Provider error codes (EIP-1193 and EIP-3085).
pub mod codes {
    pub const USER_REJECTED: i64 = 4001;
    pub const UNAUTHORIZED: i64 = 4100;
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    pub const DISCONNECTED: i64 = 4900;
    pub const CHAIN_DISCONNECTED: i64 = 4901;
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
}

/// Parameter object for `wallet_addEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEthereumChainParameter {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl From<&NetworkConfig> for AddEthereumChainParameter {
    fn from(network: &NetworkConfig) -> Self {
        Self {
            chain_id: network.chain_id_hex(),
            chain_name: network.name.to_string(),
            native_currency: NativeCurrency {
                name: network.native_currency_name.to_string(),
                symbol: network.native_currency_symbol.to_string(),
                decimals: network.native_currency_decimals,
            },
            rpc_urls: vec![network.rpc_url.to_string()],
            block_explorer_urls: vec![network.block_explorer_url.to_string()],
        }
    }
}

/// Chain id from `0x`-hex (`"0xfa"`), decimal string (`"250"`) or number.
pub fn parse_chain_id(value: &Value) -> Result<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| AppError::Decoding(format!("chain id out of range: {}", n))),
        Value::String(s) => {
            let s = s.trim();
            let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => s.parse::<u64>(),
            };
            parsed.map_err(|_| AppError::Decoding(format!("invalid chain id: '{}'", s)))
        }
        other => Err(AppError::Decoding(format!("invalid chain id: {}", other))),
    }
}

/// Account list as returned by `eth_accounts` / `eth_requestAccounts`.
pub fn parse_accounts(value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Decoding(format!("account is not a string: {}", item)))
            })
            .collect(),
        other => Err(AppError::Decoding(format!("expected account array, got {}", other))),
    }
}

/// Map a provider `{code, message}` error onto the application taxonomy.
pub fn classify_error(code: Option<i64>, message: &str) -> AppError {
    let message = message.to_string();
    match code {
        Some(codes::USER_REJECTED) => AppError::UserRejected(message),
        Some(codes::UNAUTHORIZED | codes::UNSUPPORTED_METHOD | codes::UNRECOGNIZED_CHAIN) => {
            AppError::ProviderRejected(message)
        }
        Some(codes::DISCONNECTED | codes::CHAIN_DISCONNECTED) => {
            AppError::ProviderUnavailable(message)
        }
        Some(code) => AppError::Rpc(format!("{} (code {})", message, code)),
        None => AppError::Rpc(message),
    }
}
