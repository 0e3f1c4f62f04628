//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used consistently
//! across the wallet, market, terminal and browser crates. It follows the `thiserror`
//! pattern for ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **Provider** - the injected wallet provider
//!    - [`ProviderUnavailable`](AppError::ProviderUnavailable) - no provider, or unreachable after retry
//!    - [`UserRejected`](AppError::UserRejected) - the user declined an authorization prompt
//!    - [`ProviderRejected`](AppError::ProviderRejected) - the provider declined a chain switch/add
//!    - [`WrongChain`](AppError::WrongChain) - network mismatch
//!    - [`Rpc`](AppError::Rpc) - transient provider or HTTP failure (retryable)
//!
//! 2. **Holdings** - remote listing and activity services
//!    - [`HoldingsUnavailable`](AppError::HoldingsUnavailable) - primary listing retrieval failed
//!    - [`InvalidAddress`](AppError::InvalidAddress) - malformed account identifier
//!    - [`Decoding`](AppError::Decoding) - unexpected response payload
//!
//! 3. **Startup**
//!    - [`Config`](AppError::Config) - invalid environment configuration
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn page_size(raw: u32) -> Result<u32> {
//!     if raw == 0 {
//!         return Err(AppError::Config("page size must be positive".to_string()));
//!     }
//!     Ok(raw)
//! }
//! ```

use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type covering all error scenarios.
///
/// Each variant includes a descriptive `String` for context. None of them is
/// fatal: every failure path resolves to a defined connection state or is
/// handed back to the caller to decide on retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// No injected provider was found, or it stopped answering after a retry.
    #[error("Wallet provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The user declined an authorization prompt (EIP-1193 code 4001).
    #[error("User rejected request: {0}")]
    UserRejected(String),

    /// The provider refused a request, e.g. adding or switching a chain.
    #[error("Provider rejected request: {0}")]
    ProviderRejected(String),

    /// The provider is connected to a network other than the target one.
    #[error("Wrong chain: connected to {actual}, expected {expected}")]
    WrongChain { expected: u64, actual: u64 },

    /// The primary holdings listing could not be retrieved.
    #[error("Holdings unavailable: {0}")]
    HoldingsUnavailable(String),

    /// Malformed account identifier. Never sent to the network.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Transient provider RPC or HTTP failure.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Response payload did not match the expected shape.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Whether an immediate retry may succeed.
    ///
    /// Rejections and malformed input are final; transport failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Rpc(_) | AppError::ProviderUnavailable(_))
    }

    /// `UserRejected` or `ProviderRejected`.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AppError::UserRejected(_) | AppError::ProviderRejected(_))
    }

    /// Short, stable code for logs and JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ProviderUnavailable(_) => "ProviderUnavailable",
            AppError::UserRejected(_) => "UserRejected",
            AppError::ProviderRejected(_) => "ProviderRejected",
            AppError::WrongChain { .. } => "WrongChain",
            AppError::HoldingsUnavailable(_) => "HoldingsUnavailable",
            AppError::InvalidAddress(_) => "InvalidAddress",
            AppError::Rpc(_) => "Rpc",
            AppError::Decoding(_) => "Decoding",
            AppError::Config(_) => "Config",
        }
    }

    /// Get a user-facing message.
    ///
    /// Transport details are kept out of what the UI shows.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ProviderUnavailable(_) => {
                "No wallet detected. Install MetaMask or another injected wallet.".to_string()
            }
            AppError::UserRejected(_) => "Request cancelled in wallet.".to_string(),
            AppError::ProviderRejected(msg) => format!("Wallet refused the request: {}", msg),
            AppError::WrongChain { expected, .. } => {
                format!("Wrong network. Switch your wallet to chain {}.", expected)
            }
            AppError::HoldingsUnavailable(_) => {
                "Could not load NFTs for this wallet. Try again.".to_string()
            }
            AppError::InvalidAddress(msg) => msg.clone(),
            AppError::Rpc(_) | AppError::Decoding(_) => {
                "Service temporarily unavailable".to_string()
            }
            AppError::Config(msg) => msg.clone(),
        }
    }
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decoding(format!("JSON error: {}", err))
    }
}
