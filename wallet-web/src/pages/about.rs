//! About page

use leptos::prelude::*;
use lib_core::config::core_config;

#[component]
pub fn AboutPage() -> impl IntoView {
    let network = core_config().network;

    view! {
        <div class="card about">
            <h1 class="card-title">"About Skelly"</h1>
            <p>
                {format!(
                    "Skelly is a marketplace front-end for NFT collections on {}. \
                     Browse the known collections, or open any wallet to see what it holds \
                     and which of its tokens have traded on the marketplace.",
                    network.name
                )}
            </p>
            <h2>"Network"</h2>
            <ul>
                <li>{format!("Chain id: {} ({})", network.chain_id, network.chain_id_hex())}</li>
                <li>{format!("RPC: {}", network.rpc_url)}</li>
                <li>
                    "Explorer: "
                    <a href=network.block_explorer_url target="_blank" rel="noopener">
                        {network.block_explorer_url}
                    </a>
                </li>
                <li>{format!("Currency: {} ({})", network.native_currency_name, network.native_currency_symbol)}</li>
            </ul>
        </div>
    }
}
