//! # Data Transfer Objects (DTOs)
//!
//! ## Module Organization
//!
//! - [`holdings`] - NFT ownership listing, marketplace activity, merged holdings
//!
//! ## Example JSON Communication
//!
//! ```text
//! GET /userNFTs/0xabc...?allowNSFW=true&numToFetch=150&numToSkip=0
//!
//! {
//!   "nfts": [
//!     { "id": "42", "address": "0xf6a4...", "nft": { "tokenId": "17", "uri": "ipfs://..." } }
//!   ]
//! }
//! ```
//!
//! ```text
//! GET /wallet/0xabc...
//!
//! [ { "address": "0xf6a4...", "tokenId": "17" } ]
//! ```

pub mod holdings;

pub use holdings::*;
