//! # Market HTTP Client
//!
//! `reqwest` client for the listing service and the activity index. One
//! instance serves both traits; it is cheap to clone.

use std::time::Duration;

use async_trait::async_trait;
use lib_core::{AppError, Config, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::dto::{ActivityItem, ListedNft, ListingResponse};
use tracing::debug;

use crate::sources::{ActivitySource, ListingSource};

#[derive(Clone, Debug)]
pub struct MarketClient {
    client: Client,
    listing_api_url: String,
    activity_api_url: String,
    allow_nsfw: bool,
}

impl MarketClient {
    /// Build a client from the process configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            listing_api_url: config.listing_api_url.trim_end_matches('/').to_string(),
            activity_api_url: config.activity_api_url.trim_end_matches('/').to_string(),
            allow_nsfw: config.allow_nsfw,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Rpc(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Rpc(format!("{} returned {}", url, status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Rpc(format!("Failed to read response: {}", e)))?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait(?Send)]
impl ListingSource for MarketClient {
    async fn fetch_page(&self, address: &str, offset: u32, limit: u32) -> Result<Vec<ListedNft>> {
        let url = format!("{}/userNFTs/{}", self.listing_api_url, address);
        debug!(address, offset, limit, "Fetching listing page");

        let page: ListingResponse = self
            .get_json(
                &url,
                &[
                    ("allowNSFW", self.allow_nsfw.to_string()),
                    ("numToFetch", limit.to_string()),
                    ("numToSkip", offset.to_string()),
                ],
            )
            .await?;
        Ok(page.nfts)
    }
}

#[async_trait(?Send)]
impl ActivitySource for MarketClient {
    async fn fetch_activity(&self, address: &str) -> Result<Vec<ActivityItem>> {
        let url = format!("{}/wallet/{}", self.activity_api_url, address);
        debug!(address, "Fetching marketplace activity");
        self.get_json(&url, &[]).await
    }
}
