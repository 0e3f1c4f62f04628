//! Collection registry and address lookup.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use lib_core::address::normalize;
use lib_core::config::core_config;
use lib_market::COLLECTIONS;
use shared::utils::truncate_address;

#[component]
pub fn BrowsePage() -> impl IntoView {
    let network = core_config().network;

    view! {
        <div class="card">
            <h1 class="card-title">"Collections"</h1>
            <ul class="collection-list">
                {COLLECTIONS
                    .iter()
                    .map(|collection| view! {
                        <li>
                            <span class="collection-name">{collection.name}</span>
                            <a
                                href=network.explorer_address_url(collection.address)
                                target="_blank"
                                rel="noopener"
                            >
                                {truncate_address(collection.address)}
                            </a>
                        </li>
                    })
                    .collect::<Vec<_>>()}
            </ul>
            <WalletLookup/>
        </div>
    }
}

/// Jump to the holdings page of any address.
#[component]
fn WalletLookup() -> impl IntoView {
    let navigate = use_navigate();
    let (input, set_input) = signal(String::new());
    let (error, set_error) = signal(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match normalize(&input.get_untracked()) {
            Ok(address) => {
                set_error.set(None);
                navigate(&format!("/wallet/{}", address), Default::default());
            }
            Err(e) => set_error.set(Some(e.to_string())),
        }
    };

    view! {
        <form class="wallet-lookup" on:submit=on_submit>
            <input
                type="text"
                placeholder="0x..."
                prop:value=input
                on:input=move |ev| set_input.set(event_target_value(&ev))
            />
            <button class="btn" type="submit">"View wallet"</button>
            {move || error.get().map(|err| view! { <p class="error">{err}</p> })}
        </form>
    }
}
