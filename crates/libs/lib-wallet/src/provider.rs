//! # Provider Binding
//!
//! Capability traits over an injected wallet provider. Implementations are
//! expected to be thin: every method maps to one provider request, and
//! change notifications are pushed into an [`EventSink`] in the order the
//! provider emits them.
//!
//! The traits are `?Send`. Browser handles are single-threaded and the state
//! machine runs on one cooperative event loop.

use async_trait::async_trait;
use lib_core::{NetworkConfig, Result};

/// Where a provider delivers its change notifications.
pub type EventSink = async_channel::Sender<ProviderEvent>;

/// A provider-originated change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// Active chain changed. `old_chain_id` is `None` on the first
    /// notification after subscribing.
    NetworkChanged {
        new_chain_id: u64,
        old_chain_id: Option<u64>,
    },
    /// Authorized accounts changed; empty when the user revoked access.
    AccountsChanged(Vec<String>),
}

/// Finds the injected provider, if any.
#[async_trait(?Send)]
pub trait ProviderDetector {
    type Provider: WalletProvider;

    /// Absent is a normal outcome, not an error.
    async fn detect(&self) -> Option<Self::Provider>;
}

/// One injected provider.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Active chain id.
    async fn chain_id(&self) -> Result<u64>;

    /// Previously authorized accounts. Never prompts.
    async fn accounts(&self) -> Result<Vec<String>>;

    /// Prompt the user for account access.
    ///
    /// Fails with `UserRejected` when declined.
    async fn request_accounts(&self) -> Result<Vec<String>>;

    /// Register (or switch to) `network`.
    ///
    /// Fails with `ProviderRejected` or `UserRejected` when declined.
    async fn add_network(&self, network: &NetworkConfig) -> Result<()>;

    /// Start forwarding change notifications into `sink`.
    fn subscribe(&self, sink: EventSink);
}
