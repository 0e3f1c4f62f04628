//! Navigation bar and wallet button.

use leptos::prelude::*;
use leptos_router::components::A;
use lib_wallet::PhaseLabel;
use shared::utils::truncate_address;

use crate::state::wallet::use_wallet_context;

const METAMASK_DOWNLOAD_URL: &str = "https://metamask.io/download/";

#[component]
pub fn Navbar() -> impl IntoView {
    let wallet = use_wallet_context();

    view! {
        <nav>
            <A href="/" attr:class="nav-title">"Skelly"</A>
            <div class="nav-links">
                <A href="/">"Browse"</A>
                {move || wallet.address().map(|address| view! {
                    <A href=format!("/wallet/{}", address)>"My NFTs"</A>
                })}
                <A href="/about">"About"</A>
            </div>
            <WalletButton/>
        </nav>
    }
}

/// Connect, switch-network, install, or the shortened active address.
#[component]
fn WalletButton() -> impl IntoView {
    let wallet = use_wallet_context();

    move || {
        let state = wallet.connection.get();
        match state.phase {
            PhaseLabel::Connected => {
                let address = state.address.unwrap_or_default();
                view! {
                    <span class="wallet-address" title=address.clone()>
                        {truncate_address(&address)}
                    </span>
                }
                .into_any()
            }
            PhaseLabel::Disconnected => view! {
                <button class="btn" on:click=move |_| wallet.connect()>"Connect"</button>
            }
            .into_any(),
            PhaseLabel::WrongChain => view! {
                <button class="btn" on:click=move |_| wallet.add_and_switch_network()>
                    "Switch network"
                </button>
            }
            .into_any(),
            PhaseLabel::NotInstalled => view! {
                <a class="btn" href=METAMASK_DOWNLOAD_URL target="_blank" rel="noopener">
                    "Install MetaMask"
                </a>
            }
            .into_any(),
            PhaseLabel::Uninitialized | PhaseLabel::Detecting => {
                view! { <span class="wallet-status">"Detecting wallet..."</span> }.into_any()
            }
        }
    }
}
