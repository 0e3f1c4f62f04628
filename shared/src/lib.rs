//! # Shared Data Transfer Objects Library
//!
//! Wire types exchanged with the two remote data sources (the NFT listing
//! service and the marketplace activity index) and the merged
//! [`HoldingsRecord`](dto::holdings::HoldingsRecord) handed to every front-end.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects
//!   - **[`dto::holdings`]**: listing payloads, activity payloads, merged holdings
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Format wallet addresses for display
//!   - **[`utils::truncate_address`]**: `0x1234...abcd` form used in headers and titles
//!
//! ## Wire Format
//!
//! The remote services speak camelCase JSON (`tokenId`, `uri`), so the
//! listing/activity DTOs rename their fields. Types produced by this
//! workspace (`HoldingsRecord`, `HoldingsReport`) also serialize camelCase so
//! the terminal's `--json` output and the browser share one shape.
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::holdings::ListingResponse;
//! use shared::utils::truncate_address;
//!
//! let body = r#"{"nfts":[{"id":"1","address":"0xf6a4dc2c70e45a43c85151c4afa89f3ea9c463fd","nft":{"tokenId":"7","uri":"ipfs://x"}}]}"#;
//! let listing: ListingResponse = serde_json::from_str(body).unwrap();
//! assert_eq!(listing.nfts[0].nft.token_id, "7");
//! assert_eq!(truncate_address(&listing.nfts[0].address), "0xf6a4...63fd");
//! ```

pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;
