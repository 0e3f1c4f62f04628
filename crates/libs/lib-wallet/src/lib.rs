//! # Wallet Connectivity
//!
//! Everything between an injected wallet provider and the UI:
//!
//! - [`provider`] - the capability traits a provider binding implements
//! - [`eip1193`] - request method names, payload parsing, error-code mapping
//! - [`state`] - the tagged connection phase and the snapshot derived from it
//! - [`machine`] - [`ConnectionStateMachine`], the single owner of that state
//!
//! The binding itself lives with the host (the browser crate wraps
//! `window.ethereum`); this crate stays target-independent.

pub mod eip1193;
pub mod machine;
pub mod provider;
pub mod state;

#[cfg(test)]
mod testing;

pub use machine::ConnectionStateMachine;
pub use provider::{EventSink, ProviderDetector, ProviderEvent, WalletProvider};
pub use state::{
    ActionOutcome, ChainStatus, ConnectionState, MachineEvent, Notice, NoticeKind, Phase,
    PhaseLabel, Session, SignerHandle,
};
