//! # Application Configuration
//!
//! The target network is a compile-time constant ([`FANTOM_OPERA`]). Everything
//! else (service endpoints, paging, timeouts) comes from environment variables
//! with defaults matching the production deployment, and is validated on
//! startup to fail fast if misconfigured.
//!
//! ## Global Config Access
//!
//! ```rust,no_run
//! use lib_core::config::{core_config, init_config};
//!
//! init_config().expect("invalid configuration");
//! let config = core_config();
//! println!("{}", config.listing_api_url);
//! ```
//!
//! The browser build never calls [`init_config()`]; [`core_config()`] then
//! falls back to [`Config::default()`].

use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::Serialize;

use crate::error::{AppError, Result};

/// Static description of the target chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: &'static str,
    pub rpc_url: &'static str,
    pub block_explorer_url: &'static str,
    pub native_currency_name: &'static str,
    pub native_currency_symbol: &'static str,
    pub native_currency_decimals: u8,
}

/// Fantom Opera mainnet, the only deployment target.
pub const FANTOM_OPERA: NetworkConfig = NetworkConfig {
    chain_id: 250,
    name: "Fantom Opera",
    rpc_url: "https://rpc.ftm.tools/",
    block_explorer_url: "https://ftmscan.com/",
    native_currency_name: "Fantom",
    native_currency_symbol: "FTM",
    native_currency_decimals: 18,
};

impl NetworkConfig {
    /// Chain id as the `0x`-prefixed hex quantity wallets expect (`0xfa`).
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }

    /// Block explorer page for an account or contract.
    pub fn explorer_address_url(&self, address: &str) -> String {
        format!("{}address/{}", self.block_explorer_url, address)
    }
}

const DEFAULT_LISTING_API_URL: &str = "https://api.paintswap.finance";
const DEFAULT_ACTIVITY_API_URL: &str = "http://127.0.0.1:3001";

/// Largest page the listing service will serve.
pub const MAX_PAGE_SIZE: u32 = 150;

/// Upper bound on `max_pages`; keeps `page * page_size` well inside `u32`.
pub const MAX_PAGES: u32 = 1000;

/// Process configuration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Config {
    /// Target network
    pub network: NetworkConfig,

    /// Base URL of the NFT listing service (no trailing slash)
    pub listing_api_url: String,

    /// Base URL of the marketplace activity index (no trailing slash)
    pub activity_api_url: String,

    /// Items requested per listing page (1..=150)
    pub page_size: u32,

    /// Upper bound on listing pages fetched per holdings call
    pub max_pages: u32,

    /// Forwarded to the listing service as `allowNSFW`
    pub allow_nsfw: bool,

    /// HTTP request timeout in seconds (native client only)
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: FANTOM_OPERA,
            listing_api_url: DEFAULT_LISTING_API_URL.to_string(),
            activity_api_url: DEFAULT_ACTIVITY_API_URL.to_string(),
            page_size: MAX_PAGE_SIZE,
            max_pages: 1,
            allow_nsfw: true,
            http_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults; set-but-unparsable ones are errors.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            network: FANTOM_OPERA,
            listing_api_url: trim_base_url(env_or(
                "SKELLY_LISTING_API_URL",
                defaults.listing_api_url,
            )?),
            activity_api_url: trim_base_url(env_or(
                "SKELLY_ACTIVITY_API_URL",
                defaults.activity_api_url,
            )?),
            page_size: env_or("SKELLY_PAGE_SIZE", defaults.page_size)?,
            max_pages: env_or("SKELLY_MAX_PAGES", defaults.max_pages)?,
            allow_nsfw: env_or("SKELLY_ALLOW_NSFW", defaults.allow_nsfw)?,
            http_timeout_secs: env_or("SKELLY_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(AppError::Config(format!(
                "SKELLY_PAGE_SIZE must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        if self.max_pages == 0 || self.max_pages > MAX_PAGES {
            return Err(AppError::Config(format!(
                "SKELLY_MAX_PAGES must be between 1 and {}",
                MAX_PAGES
            )));
        }

        for (name, url) in [
            ("SKELLY_LISTING_API_URL", &self.listing_api_url),
            ("SKELLY_ACTIVITY_API_URL", &self.activity_api_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::Config(format!(
                    "{} must be an absolute http(s) URL, got '{}'",
                    name, url
                )));
            }
        }

        if self.http_timeout_secs == 0 {
            return Err(AppError::Config(
                "SKELLY_HTTP_TIMEOUT_SECS must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

fn env_or<T: FromStr>(name: &'static str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: '{}'", name, raw))),
        Err(_) => Ok(default),
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load, validate and install the global configuration.
///
/// # Errors
///
/// Returns an error if a variable is invalid, validation fails, or the
/// config has already been initialized.
pub fn init_config() -> Result<&'static Config> {
    let config = Config::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| AppError::Config("Config has already been initialized".to_string()))?;

    Ok(core_config())
}

/// Get a reference to the global configuration, or the defaults when
/// [`init_config()`] was never called.
pub fn core_config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}
