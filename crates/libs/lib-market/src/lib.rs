//! # Market Data
//!
//! Holdings lookup for any account: the listing and activity source traits,
//! the [`WalletHoldingsAggregator`] that merges them, a `reqwest` client for
//! both services, and the registry of known collections.

#[cfg(feature = "http")]
pub mod client;
pub mod collections;
pub mod holdings;
pub mod sources;

#[cfg(feature = "http")]
pub use client::MarketClient;
pub use collections::{Collection, COLLECTIONS};
pub use holdings::{AggregatorOptions, WalletHoldingsAggregator};
pub use sources::{ActivitySource, ListingSource};
