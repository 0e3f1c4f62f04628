//! Listing and activity sources over `gloo-net`.

use async_trait::async_trait;
use gloo_net::http::Request;
use lib_core::config::core_config;
use lib_core::{AppError, Config, Result};
use lib_market::{ActivitySource, AggregatorOptions, ListingSource, WalletHoldingsAggregator};
use serde::de::DeserializeOwned;
use shared::dto::{ActivityItem, HoldingsReport, ListedNft, ListingResponse};

#[derive(Clone, Debug)]
pub struct BrowserMarketClient {
    listing_api_url: String,
    activity_api_url: String,
    allow_nsfw: bool,
}

impl BrowserMarketClient {
    pub fn new(config: &Config) -> Self {
        Self {
            listing_api_url: config.listing_api_url.trim_end_matches('/').to_string(),
            activity_api_url: config.activity_api_url.trim_end_matches('/').to_string(),
            allow_nsfw: config.allow_nsfw,
        }
    }
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| AppError::Rpc(format!("Network error: {}", e)))?;

    if !response.ok() {
        return Err(AppError::Rpc(format!("{} returned {}", url, response.status())));
    }

    let body = response
        .text()
        .await
        .map_err(|e| AppError::Rpc(format!("Failed to read response: {}", e)))?;
    Ok(serde_json::from_str(&body)?)
}

#[async_trait(?Send)]
impl ListingSource for BrowserMarketClient {
    async fn fetch_page(&self, address: &str, offset: u32, limit: u32) -> Result<Vec<ListedNft>> {
        let url = format!(
            "{}/userNFTs/{}?allowNSFW={}&numToFetch={}&numToSkip={}",
            self.listing_api_url, address, self.allow_nsfw, limit, offset
        );
        let page: ListingResponse = get_json(&url).await?;
        Ok(page.nfts)
    }
}

#[async_trait(?Send)]
impl ActivitySource for BrowserMarketClient {
    async fn fetch_activity(&self, address: &str) -> Result<Vec<ActivityItem>> {
        get_json(&format!("{}/wallet/{}", self.activity_api_url, address)).await
    }
}

/// Holdings of any account, with the default configuration.
pub async fn fetch_holdings(address: &str) -> Result<HoldingsReport> {
    let config = core_config();
    let client = BrowserMarketClient::new(config);
    WalletHoldingsAggregator::new(client.clone(), client, AggregatorOptions::from(config))
        .fetch_holdings(address)
        .await
}
