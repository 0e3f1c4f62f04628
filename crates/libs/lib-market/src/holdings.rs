//! # Wallet Holdings Aggregator
//!
//! Merges the ownership listing for an account with the marketplace activity
//! index. The listing is authoritative: its order is kept, and activity for
//! tokens it does not list is ignored. Losing the activity index degrades the
//! report with a warning; losing the listing fails the call.

use std::collections::HashSet;

use futures::join;
use lib_core::address::{checksummed, lowercase};
use lib_core::{parse_account, retry_once, AppError, Config, Result};
use shared::dto::{ActivityItem, HoldingsRecord, HoldingsReport, HoldingsWarning, ListedNft};
use tracing::{debug, info, warn};

use crate::sources::{ActivitySource, ListingSource};

/// Paging limits for one aggregation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorOptions {
    pub page_size: u32,
    pub max_pages: u32,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl AggregatorOptions {
    /// Rejects limits that could never finish paging.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(AppError::Config("page size must be positive".to_string()));
        }
        if self.max_pages == 0 {
            return Err(AppError::Config("max pages must be positive".to_string()));
        }
        Ok(())
    }
}

impl From<&Config> for AggregatorOptions {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            max_pages: config.max_pages,
        }
    }
}

pub struct WalletHoldingsAggregator<L, A> {
    listing: L,
    activity: A,
    options: AggregatorOptions,
}

impl<L: ListingSource, A: ActivitySource> WalletHoldingsAggregator<L, A> {
    pub fn new(listing: L, activity: A, options: AggregatorOptions) -> Self {
        Self {
            listing,
            activity,
            options,
        }
    }

    /// Holdings of `address`, annotated with marketplace activity.
    ///
    /// # Errors
    ///
    /// - `InvalidAddress` before any request if `address` is malformed
    /// - `Config` before any request if the paging limits are unusable
    /// - `HoldingsUnavailable` if the listing fails after one retry
    pub async fn fetch_holdings(&self, address: &str) -> Result<HoldingsReport> {
        let account = parse_account(address)?;
        self.options.validate()?;
        let key = lowercase(&account);

        let (listing, activity) = join!(self.fetch_listing(&key), self.fetch_activity(&key));

        let (listed, truncated_at) = listing.map_err(|err| {
            warn!(address = %key, error = %err, "Listing retrieval failed");
            AppError::HoldingsUnavailable(err.to_string())
        })?;

        let mut warnings = Vec::new();
        let active = match activity {
            Ok(items) => activity_keys(items),
            Err(err) => {
                warn!(address = %key, error = %err, "Activity index unavailable, reporting no activity");
                warnings.push(HoldingsWarning::ActivityUnavailable(err.to_string()));
                HashSet::new()
            }
        };
        if let Some(pages) = truncated_at {
            warnings.push(HoldingsWarning::Truncated { pages });
        }

        let records: Vec<HoldingsRecord> = listed
            .into_iter()
            .map(|item| {
                let has_marketplace_activity =
                    active.contains(&(item.address.to_lowercase(), item.nft.token_id.clone()));
                HoldingsRecord {
                    contract_address: item.address,
                    token_id: item.nft.token_id,
                    token_uri: item.nft.uri,
                    has_marketplace_activity,
                }
            })
            .collect();

        info!(
            address = %key,
            count = records.len(),
            active = records.iter().filter(|r| r.has_marketplace_activity).count(),
            degraded = !warnings.is_empty(),
            "Holdings aggregated"
        );

        Ok(HoldingsReport {
            address: checksummed(&account),
            records,
            warnings,
        })
    }

    /// Pages until a short page or the page cap. Returns the page count when
    /// the cap cut the listing off.
    async fn fetch_listing(&self, address: &str) -> Result<(Vec<ListedNft>, Option<u32>)> {
        let AggregatorOptions {
            page_size,
            max_pages,
        } = self.options;
        let mut items = Vec::new();

        for page in 0..max_pages {
            let offset = page_offset(page, page_size)?;
            let batch = retry_once("listing", || self.listing.fetch_page(address, offset, page_size)).await?;
            let count = batch.len();
            debug!(address, page, offset, count, "Listing page received");
            items.extend(batch);

            if count < page_size as usize {
                return Ok((items, None));
            }
        }

        Ok((items, Some(max_pages)))
    }

    async fn fetch_activity(&self, address: &str) -> Result<Vec<ActivityItem>> {
        retry_once("activity", || self.activity.fetch_activity(address)).await
    }
}

fn page_offset(page: u32, page_size: u32) -> Result<u32> {
    page.checked_mul(page_size)
        .ok_or_else(|| AppError::Config(format!("listing offset overflows at page {}", page)))
}

fn activity_keys(items: Vec<ActivityItem>) -> HashSet<(String, String)> {
    items
        .into_iter()
        .map(|item| (item.address.to_lowercase(), item.token_id))
        .collect()
}
