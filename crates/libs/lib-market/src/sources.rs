//! Remote data sources consumed by the aggregator.
//!
//! `?Send` so the browser can implement them over `gloo-net`.

use async_trait::async_trait;
use lib_core::Result;
use shared::dto::{ActivityItem, ListedNft};

/// Paginated ownership listing.
#[async_trait(?Send)]
pub trait ListingSource {
    /// One page of up to `limit` items starting at `offset`.
    async fn fetch_page(&self, address: &str, offset: u32, limit: u32) -> Result<Vec<ListedNft>>;
}

/// Tokens with recorded marketplace activity.
#[async_trait(?Send)]
pub trait ActivitySource {
    async fn fetch_activity(&self, address: &str) -> Result<Vec<ActivityItem>>;
}
