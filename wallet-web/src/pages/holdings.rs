//! Holdings of one wallet, any address.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;
use lib_core::config::core_config;
use lib_core::AppError;
use lib_market::collections;
use shared::dto::{HoldingsRecord, HoldingsReport, HoldingsWarning};
use shared::utils::truncate_address;

use crate::services::market::fetch_holdings;

#[component]
pub fn HoldingsPage() -> impl IntoView {
    let params = use_params_map();
    let address = move || params.with(|p| p.get("address").unwrap_or_default());
    let (report, set_report) = signal(None::<Result<HoldingsReport, AppError>>);
    let network = core_config().network;

    Effect::new(move |_| {
        let requested = address();
        set_report.set(None);
        spawn_local(async move {
            let result = fetch_holdings(&requested).await;
            // the route may have moved on while this was in flight
            if params.with_untracked(|p| p.get("address")).as_deref() == Some(requested.as_str()) {
                set_report.set(Some(result));
            }
        });
    });

    view! {
        <div class="card">
            <h1 class="card-title">{move || format!("Wallet {}", truncate_address(&address()))}</h1>
            <a href=move || network.explorer_address_url(&address()) target="_blank" rel="noopener">
                "View on explorer"
            </a>
            {move || match report.get() {
                None => view! { <p class="info">"Loading NFTs..."</p> }.into_any(),
                Some(Err(err)) => {
                    let message = match err {
                        AppError::InvalidAddress(_) => err.to_string(),
                        other => other.user_message(),
                    };
                    view! { <div class="error"><p>{message}</p></div> }.into_any()
                }
                Some(Ok(report)) => view! { <HoldingsTable report=report/> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn HoldingsTable(report: HoldingsReport) -> impl IntoView {
    let warnings = report
        .warnings
        .iter()
        .map(|warning| match warning {
            HoldingsWarning::ActivityUnavailable(_) => {
                "Marketplace activity is unavailable right now.".to_string()
            }
            HoldingsWarning::Truncated { pages } => {
                format!("Showing the first {} pages of this wallet.", pages)
            }
        })
        .map(|text| view! { <p class="warning">{text}</p> })
        .collect::<Vec<_>>();

    if report.records.is_empty() {
        return view! {
            <div>
                {warnings}
                <p class="info">"This wallet holds no NFTs."</p>
            </div>
        }
        .into_any();
    }

    view! {
        <div>
            {warnings}
            <table class="holdings">
                <thead>
                    <tr>
                        <th>"Collection"</th>
                        <th>"Token"</th>
                        <th>"Metadata"</th>
                        <th>"Marketplace"</th>
                    </tr>
                </thead>
                <tbody>
                    {report.records.into_iter().map(|record| view! { <HoldingsRow record=record/> }).collect::<Vec<_>>()}
                </tbody>
            </table>
        </div>
    }
    .into_any()
}

#[component]
fn HoldingsRow(record: HoldingsRecord) -> impl IntoView {
    let collection = collections::name_of(&record.contract_address)
        .map(str::to_string)
        .unwrap_or_else(|| truncate_address(&record.contract_address));

    view! {
        <tr>
            <td title=record.contract_address.clone()>{collection}</td>
            <td>{format!("#{}", record.token_id)}</td>
            <td>
                {record.token_uri.map(|uri| view! {
                    <a href=uri target="_blank" rel="noopener">"metadata"</a>
                })}
            </td>
            <td>{if record.has_marketplace_activity { "Traded" } else { "" }}</td>
        </tr>
    }
}
