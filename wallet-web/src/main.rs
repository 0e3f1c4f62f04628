//! Skelly browser front-end.
//!
//! Hosts the connection state machine over `window.ethereum` and renders the
//! collection browser and per-wallet holdings pages.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

mod app;
mod components;
mod pages;
mod services;
mod state;

use app::App;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Skelly starting");

    hide_loading_screen();
    leptos::mount::mount_to_body(|| view! { <App/> });
}

/// Hide the static loading placeholder from index.html.
fn hide_loading_screen() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("No document available");
        return;
    };
    if let Some(loading) = document.get_element_by_id("leptos-loading") {
        if let Err(e) = loading.set_attribute("style", "display: none;") {
            log::warn!("Failed to hide loading screen: {:?}", e);
        }
    }
}
