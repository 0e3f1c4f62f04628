use serde::{Deserialize, Serialize};

/// One page from the listing service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingResponse {
    #[serde(default)]
    pub nfts: Vec<ListedNft>,
}

/// An ownership record as served by the listing service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListedNft {
    /// Service-side identifier (unused beyond logging)
    #[serde(default)]
    pub id: Option<String>,
    /// ERC-721 contract address
    pub address: String,
    pub nft: ListedToken,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListedToken {
    #[serde(rename = "tokenId")]
    pub token_id: String,
    #[serde(default)]
    pub uri: Option<String>,
}

/// A token with recorded marketplace activity, as served by the activity index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityItem {
    /// ERC-721 contract address
    pub address: String,
    #[serde(rename = "tokenId")]
    pub token_id: String,
}

/// A listed token annotated with marketplace activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsRecord {
    pub contract_address: String,
    pub token_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    pub has_marketplace_activity: bool,
}

/// Non-fatal problems encountered while aggregating holdings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum HoldingsWarning {
    /// The activity index failed; every record reports no activity.
    ActivityUnavailable(String),
    /// The listing stopped at the page cap; more items may exist.
    Truncated { pages: u32 },
}

/// Result of one holdings aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsReport {
    /// Checksummed owner address
    pub address: String,
    /// In listing-service order
    pub records: Vec<HoldingsRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<HoldingsWarning>,
}

impl HoldingsReport {
    pub fn with_activity(&self) -> impl Iterator<Item = &HoldingsRecord> {
        self.records.iter().filter(|r| r.has_marketplace_activity)
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}
