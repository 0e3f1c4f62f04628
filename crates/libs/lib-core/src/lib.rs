//! # Core Library
//!
//! Network descriptor, process configuration, account addresses, and the
//! application-wide error type shared by every Skelly crate.

pub mod address;
pub mod config;
pub mod error;
pub mod retry;

// Re-export commonly used types
pub use address::{checksummed, parse_account};
pub use config::{Config, NetworkConfig, FANTOM_OPERA};
pub use error::{AppError, Result};
pub use retry::retry_once;
