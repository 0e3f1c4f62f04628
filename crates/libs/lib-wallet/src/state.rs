//! # Connection State
//!
//! The machine keeps one tagged [`Phase`]. The flat [`ConnectionState`] the
//! UI reads is derived from it, so flag combinations such as "wrong chain
//! but connected" cannot be represented.
//!
//! ```text
//! Uninitialized -> Detecting -> NotInstalled
//!                            -> Detected(WrongChain)
//!                            -> Detected(TargetChain(Disconnected | Connected))
//! ```

use alloy_primitives::Address;
use lib_core::{checksummed, AppError};
use serde::Serialize;
use uuid::Uuid;

/// Capability bound to one account on one detection generation.
///
/// A fresh handle (new `id`) is issued whenever the active account is set,
/// and every handle is invalidated by the next account or network change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerHandle {
    pub id: Uuid,
    pub address: Address,
    pub chain_id: u64,
    pub generation: u64,
}

impl SignerHandle {
    pub(crate) fn issue(address: Address, chain_id: u64, generation: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            address,
            chain_id,
            generation,
        }
    }

    /// EIP-55 rendering of the bound account.
    pub fn address_checksummed(&self) -> String {
        checksummed(&self.address)
    }
}

/// Account session on the target chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Disconnected,
    Connected { signer: SignerHandle },
}

/// What a detected provider is connected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainStatus {
    WrongChain { chain_id: u64 },
    TargetChain(Session),
}

/// Authoritative machine state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Uninitialized,
    Detecting {
        generation: u64,
    },
    /// No provider, or the provider stopped answering (`diagnostic` is then
    /// a `ProviderUnavailable` error).
    NotInstalled {
        diagnostic: Option<AppError>,
    },
    Detected(ChainStatus),
}

impl Phase {
    pub fn label(&self) -> PhaseLabel {
        match self {
            Phase::Uninitialized => PhaseLabel::Uninitialized,
            Phase::Detecting { .. } => PhaseLabel::Detecting,
            Phase::NotInstalled { .. } => PhaseLabel::NotInstalled,
            Phase::Detected(ChainStatus::WrongChain { .. }) => PhaseLabel::WrongChain,
            Phase::Detected(ChainStatus::TargetChain(Session::Disconnected)) => {
                PhaseLabel::Disconnected
            }
            Phase::Detected(ChainStatus::TargetChain(Session::Connected { .. })) => {
                PhaseLabel::Connected
            }
        }
    }

    pub fn signer(&self) -> Option<&SignerHandle> {
        match self {
            Phase::Detected(ChainStatus::TargetChain(Session::Connected { signer })) => {
                Some(signer)
            }
            _ => None,
        }
    }
}

/// Flattened name of a [`Phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseLabel {
    Uninitialized,
    Detecting,
    NotInstalled,
    WrongChain,
    Disconnected,
    Connected,
}

/// Read-only snapshot handed to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    pub phase: PhaseLabel,
    pub installed: bool,
    pub chain_id: Option<u64>,
    pub wrong_chain: bool,
    /// Checksummed active account
    pub address: Option<String>,
    pub ready: bool,
}

impl ConnectionState {
    /// Derive the snapshot for `phase`.
    ///
    /// `installed` is only consulted while detecting, where the previous
    /// answer is kept until the new one arrives.
    pub fn derive(phase: &Phase, target_chain_id: u64, installed: bool) -> Self {
        let label = phase.label();
        match phase {
            Phase::Uninitialized | Phase::NotInstalled { .. } => Self::blank(label, false),
            Phase::Detecting { .. } => Self::blank(label, installed),
            Phase::Detected(ChainStatus::WrongChain { chain_id }) => Self {
                chain_id: Some(*chain_id),
                wrong_chain: true,
                ..Self::blank(label, true)
            },
            Phase::Detected(ChainStatus::TargetChain(session)) => Self {
                chain_id: Some(target_chain_id),
                address: match session {
                    Session::Connected { signer } => Some(signer.address_checksummed()),
                    Session::Disconnected => None,
                },
                ready: true,
                ..Self::blank(label, true)
            },
        }
    }

    fn blank(phase: PhaseLabel, installed: bool) -> Self {
        Self {
            phase,
            installed,
            chain_id: None,
            wrong_chain: false,
            address: None,
            ready: false,
        }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::blank(PhaseLabel::Uninitialized, false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    ProviderUnavailable,
    InstallWallet,
    WrongChain,
    Declined,
    NetworkSwitchFailed,
}

/// Transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result of a user-initiated action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The provider accepted and state was updated.
    Applied,
    /// The user or provider declined; state is unchanged.
    Declined,
    /// Not applicable in the current phase, or overtaken by a newer detection.
    Skipped,
    /// The provider failed; state is unchanged.
    Failed(Notice),
}

/// Published on the machine's outbound channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineEvent {
    StateChanged(ConnectionState),
    Notice(Notice),
}
