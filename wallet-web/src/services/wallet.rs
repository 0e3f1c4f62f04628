//! Injected Ethereum Provider Binding via wasm-bindgen
//!
//! Implements the provider traits over `window.ethereum` (EIP-1193). Requests
//! go through one `ethRequest` shim; results and errors are converted to
//! `serde_json::Value` and parsed by `lib_wallet::eip1193`.

use async_trait::async_trait;
use js_sys::Reflect;
use lib_core::{AppError, NetworkConfig, Result};
use lib_wallet::eip1193::{
    self, AddEthereumChainParameter, ETH_ACCOUNTS, ETH_CHAIN_ID, ETH_REQUEST_ACCOUNTS,
    WALLET_ADD_ETHEREUM_CHAIN,
};
use lib_wallet::{EventSink, ProviderDetector, ProviderEvent, WalletProvider};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ============================================================================
// JAVASCRIPT INTEROP
// ============================================================================

#[wasm_bindgen(inline_js = "
export function hasEthereum() {
    return typeof window !== 'undefined' && !!window.ethereum;
}

export async function ethRequest(method, params) {
    const provider = window.ethereum;
    if (!provider) {
        throw { code: 4900, message: 'No injected provider' };
    }
    return await provider.request(params === undefined ? { method } : { method, params });
}

export function subscribeEthereum(onChain, onAccounts) {
    const provider = window.ethereum;
    if (!provider || typeof provider.on !== 'function') {
        return false;
    }

    // chainChanged only carries the new id; remember the last one so the
    // first notification can be told apart from a real switch
    let lastChain = null;
    const report = (chainId) => {
        const previous = lastChain;
        lastChain = chainId;
        onChain(chainId, previous);
    };

    provider.on('chainChanged', report);
    provider.on('accountsChanged', (accounts) => onAccounts(accounts || []));
    provider.request({ method: 'eth_chainId' })
        .then((chainId) => { if (lastChain === null) { report(chainId); } })
        .catch(() => {});
    return true;
}
")]
extern "C" {
    fn hasEthereum() -> bool;

    #[wasm_bindgen(catch)]
    async fn ethRequest(method: &str, params: JsValue) -> std::result::Result<JsValue, JsValue>;

    fn subscribeEthereum(
        on_chain: &Closure<dyn FnMut(JsValue, JsValue)>,
        on_accounts: &Closure<dyn FnMut(JsValue)>,
    ) -> bool;
}

// ============================================================================

/// Probes `window.ethereum`.
#[derive(Clone, Copy, Debug, Default)]
pub struct InjectedDetector;

#[async_trait(?Send)]
impl ProviderDetector for InjectedDetector {
    type Provider = InjectedProvider;

    async fn detect(&self) -> Option<InjectedProvider> {
        hasEthereum().then_some(InjectedProvider)
    }
}

/// Handle to the injected provider.
#[derive(Clone, Copy, Debug)]
pub struct InjectedProvider;

impl InjectedProvider {
    async fn request(&self, method: &str, params: JsValue) -> Result<serde_json::Value> {
        log::debug!("Provider request: {}", method);
        let result = ethRequest(method, params).await.map_err(provider_error)?;
        from_js(result)
    }
}

#[async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    async fn chain_id(&self) -> Result<u64> {
        let value = self.request(ETH_CHAIN_ID, JsValue::UNDEFINED).await?;
        eip1193::parse_chain_id(&value)
    }

    async fn accounts(&self) -> Result<Vec<String>> {
        let value = self.request(ETH_ACCOUNTS, JsValue::UNDEFINED).await?;
        eip1193::parse_accounts(&value)
    }

    async fn request_accounts(&self) -> Result<Vec<String>> {
        let value = self.request(ETH_REQUEST_ACCOUNTS, JsValue::UNDEFINED).await?;
        eip1193::parse_accounts(&value)
    }

    async fn add_network(&self, network: &NetworkConfig) -> Result<()> {
        let params = [AddEthereumChainParameter::from(network)];
        let params = params
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| AppError::Decoding(format!("Failed to encode chain parameters: {}", e)))?;
        self.request(WALLET_ADD_ETHEREUM_CHAIN, params).await?;
        Ok(())
    }

    fn subscribe(&self, sink: EventSink) {
        let chain_sink = sink.clone();
        let on_chain = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |new: JsValue, old: JsValue| {
            let Some(new_chain_id) = chain_id_from_js(new) else {
                log::warn!("Ignoring chainChanged with an unreadable chain id");
                return;
            };
            let old_chain_id = if old.is_null() || old.is_undefined() {
                None
            } else {
                chain_id_from_js(old)
            };
            forward(
                &chain_sink,
                ProviderEvent::NetworkChanged {
                    new_chain_id,
                    old_chain_id,
                },
            );
        });

        let on_accounts = Closure::<dyn FnMut(JsValue)>::new(move |accounts: JsValue| {
            match from_js(accounts).and_then(|value| eip1193::parse_accounts(&value)) {
                Ok(accounts) => forward(&sink, ProviderEvent::AccountsChanged(accounts)),
                Err(e) => log::warn!("Ignoring malformed accountsChanged payload: {}", e),
            }
        });

        if !subscribeEthereum(&on_chain, &on_accounts) {
            log::warn!("Provider does not support event subscriptions");
        }

        // Listeners live for the rest of the page.
        on_chain.forget();
        on_accounts.forget();
    }
}

fn forward(sink: &EventSink, event: ProviderEvent) {
    if let Err(e) = sink.try_send(event) {
        log::warn!("Dropping provider event: {}", e);
    }
}

fn from_js(value: JsValue) -> Result<serde_json::Value> {
    if value.is_undefined() {
        return Ok(serde_json::Value::Null);
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| AppError::Decoding(format!("Unexpected provider payload: {}", e)))
}

fn chain_id_from_js(value: JsValue) -> Option<u64> {
    from_js(value)
        .and_then(|v| eip1193::parse_chain_id(&v))
        .ok()
}

/// Classify a thrown provider error (`{ code, message }` or a plain string).
fn provider_error(err: JsValue) -> AppError {
    let field = |name: &str| Reflect::get(&err, &JsValue::from_str(name)).ok();

    let code = field("code").and_then(|c| c.as_f64()).map(|c| c as i64);
    let message = field("message")
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));

    let error = eip1193::classify_error(code, &message);
    log::debug!("Provider error {:?}: {}", code, error);
    error
}
