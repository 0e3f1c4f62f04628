//! # Command Implementations
//!
//! Each command returns its output as a string so `main` owns all printing
//! and tests can assert on the text.

use lib_core::{Config, NetworkConfig, Result};
use lib_market::collections::{self, COLLECTIONS};
use lib_market::{AggregatorOptions, MarketClient, WalletHoldingsAggregator};
use shared::dto::{HoldingsReport, HoldingsWarning};
use shared::utils::truncate_address;
use tracing::{info, warn};

use crate::cli::Command;

/// Execute `command` against `config`.
pub async fn run(command: Command, config: &Config) -> Result<String> {
    match command {
        Command::Holdings { address, json } => holdings(config, &address, json).await,
        Command::Collections { json } => list_collections(&config.network, json),
        Command::Network { json } => show_network(&config.network, json),
    }
}

async fn holdings(config: &Config, address: &str, json: bool) -> Result<String> {
    info!(address, "Fetching holdings");
    let client = MarketClient::new(config)?;
    let aggregator =
        WalletHoldingsAggregator::new(client.clone(), client, AggregatorOptions::from(config));

    let report = aggregator.fetch_holdings(address).await?;
    for warning in &report.warnings {
        warn!(?warning, "Holdings report is incomplete");
    }

    if json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(render_holdings(&report, &config.network))
    }
}

fn list_collections(network: &NetworkConfig, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&COLLECTIONS)?);
    }

    let mut lines = vec![format!("{:<18} {}", "COLLECTION", "CONTRACT")];
    lines.extend(
        COLLECTIONS
            .iter()
            .map(|c| format!("{:<18} {}", c.name, network.explorer_address_url(c.address))),
    );
    Ok(lines.join("\n"))
}

fn show_network(network: &NetworkConfig, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(network)?);
    }

    Ok([
        format!("Network:   {}", network.name),
        format!("Chain id:  {} ({})", network.chain_id, network.chain_id_hex()),
        format!("RPC:       {}", network.rpc_url),
        format!("Explorer:  {}", network.block_explorer_url),
        format!(
            "Currency:  {} ({}, {} decimals)",
            network.native_currency_name, network.native_currency_symbol, network.native_currency_decimals
        ),
    ]
    .join("\n"))
}

/// Human-readable holdings table.
pub fn render_holdings(report: &HoldingsReport, network: &NetworkConfig) -> String {
    let active = report.with_activity().count();
    let mut lines = vec![
        format!(
            "Holdings of {} ({} NFTs, {} with marketplace activity)",
            truncate_address(&report.address),
            report.records.len(),
            active
        ),
        network.explorer_address_url(&report.address),
        String::new(),
    ];

    if report.records.is_empty() {
        lines.push("No NFTs held.".to_string());
    } else {
        lines.push(format!("{:<18} {:<10} {:<9} {}", "COLLECTION", "TOKEN", "ACTIVITY", "METADATA"));
        for record in &report.records {
            let collection = collections::name_of(&record.contract_address)
                .map(str::to_string)
                .unwrap_or_else(|| truncate_address(&record.contract_address));
            lines.push(format!(
                "{:<18} {:<10} {:<9} {}",
                collection,
                format!("#{}", record.token_id),
                if record.has_marketplace_activity { "traded" } else { "-" },
                record.token_uri.as_deref().unwrap_or("-")
            ));
        }
    }

    for warning in &report.warnings {
        lines.push(match warning {
            HoldingsWarning::ActivityUnavailable(reason) => {
                format!("warning: marketplace activity unavailable ({})", reason)
            }
            HoldingsWarning::Truncated { pages } => {
                format!("warning: listing stopped after {} pages; more NFTs may exist", pages)
            }
        });
    }

    lines.join("\n")
}
