//! Skelly Web App - Leptos Frontend
//!
//! Routes use plain paths (`/wallet/:address`), not `#/` fragments. A static
//! host must answer unknown paths with `index.html` so deep links load; see
//! the note in `index.html`.

use leptos::prelude::*;
use leptos_router::{
    components::{Route, Router, Routes, A},
    path,
};
use lib_core::config::core_config;
use lib_wallet::PhaseLabel;

use crate::components::{Navbar, NetworkBanner};
use crate::pages::{AboutPage, BrowsePage, HoldingsPage};
use crate::state::wallet::{provide_wallet_context, use_wallet_context};

#[component]
pub fn App() -> impl IntoView {
    let wallet = provide_wallet_context();

    view! {
        <Router>
            <div class="app-container">
                <Navbar/>
                <NetworkBanner/>
                <main>
                    <Show when=move || wallet.is_ready() fallback=|| view! { <NotReady/> }>
                        <Routes fallback=|| view! { <NotFound/> }>
                            <Route path=path!("/") view=BrowsePage/>
                            <Route path=path!("/wallet/:address") view=HoldingsPage/>
                            <Route path=path!("/about") view=AboutPage/>
                        </Routes>
                    </Show>
                </main>
            </div>
        </Router>
    }
}

/// Shown instead of route content until the wallet is on the target chain.
#[component]
fn NotReady() -> impl IntoView {
    let wallet = use_wallet_context();

    let network = core_config().network;

    let message = move || match wallet.connection.with(|state| state.phase) {
        PhaseLabel::NotInstalled => "Install MetaMask to use Skelly.".to_string(),
        PhaseLabel::WrongChain => format!("Switch your wallet to {} to continue.", network.name),
        _ => "Looking for your wallet...".to_string(),
    };

    view! {
        <div class="card">
            <p class="info">{message}</p>
        </div>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="card">
            <h1>"404 - Page Not Found"</h1>
            <p>"The page you're looking for doesn't exist."</p>
            <A href="/">
                <span class="btn">"Go to collections"</span>
            </A>
        </div>
    }
}
