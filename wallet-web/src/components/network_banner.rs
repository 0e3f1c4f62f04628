//! Wrong-network banner and transient notices.

use leptos::prelude::*;
use lib_core::config::core_config;

use crate::state::wallet::use_wallet_context;

#[component]
pub fn NetworkBanner() -> impl IntoView {
    let wallet = use_wallet_context();
    let network = core_config().network;

    view! {
        <Show when=move || wallet.connection.with(|state| state.wrong_chain)>
            <div class="banner warning">
                <p>
                    {format!("Your wallet is on another network. Skelly runs on {}.", network.name)}
                </p>
                <button class="btn" on:click=move |_| wallet.add_and_switch_network()>
                    {format!("Add {} to MetaMask", network.name)}
                </button>
            </div>
        </Show>
        {move || wallet.notice.get().map(|notice| view! {
            <div class="notice">
                <span>{notice.message}</span>
                <button class="notice-close" on:click=move |_| wallet.dismiss_notice()>"×"</button>
            </div>
        })}
    }
}
