//! # Connection State Machine
//!
//! Single owner of the wallet connection state. It consumes a
//! [`ProviderDetector`], the provider's change events, and two user actions
//! ([`connect`](ConnectionStateMachine::connect) and
//! [`add_and_switch_network`](ConnectionStateMachine::add_and_switch_network)),
//! and publishes a [`MachineEvent`] for every applied transition.
//!
//! ## Generations
//!
//! Every detection attempt takes a new generation number. A result is only
//! applied if its generation is still the current one when it arrives, so a
//! slow probe started before a network change can never overwrite the state
//! written after it.
//!
//! Account updates carry their own counter. A `connect()` reply is dropped
//! if an accounts event was applied while the prompt was open, so the
//! address always follows the most recently delivered account list.
//!
//! ## Locking
//!
//! State sits behind a `parking_lot::RwLock` that is never held across an
//! `.await`. Provider calls run with the lock released, and every write
//! re-checks the generation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (machine, mut events) = ConnectionStateMachine::new(detector, FANTOM_OPERA);
//! let machine = Rc::new(machine);
//! spawn_local({
//!     let machine = machine.clone();
//!     async move { machine.run().await }
//! });
//! while let Ok(event) = events.recv().await {
//!     // mirror MachineEvent::StateChanged into the UI
//! }
//! ```

use std::rc::Rc;

use alloy_primitives::Address;
use lib_core::{parse_account, retry_once, AppError, NetworkConfig, Result};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::provider::{EventSink, ProviderDetector, ProviderEvent, WalletProvider};
use crate::state::{
    ActionOutcome, ChainStatus, ConnectionState, MachineEvent, Notice, NoticeKind, Phase, Session,
    SignerHandle,
};

#[cfg(test)]
mod tests;

const INSTALL_MESSAGE: &str = "No wallet detected. Install MetaMask to continue.";

struct Inner<P> {
    phase: Phase,
    generation: u64,
    /// Bumped on every applied account update
    accounts_epoch: u64,
    /// Last detection outcome, shown while re-detecting
    installed: bool,
    started: bool,
    subscribed: bool,
    provider: Option<Rc<P>>,
}

impl<P> Inner<P> {
    fn ticket(&self) -> Ticket {
        Ticket {
            generation: self.generation,
            accounts_epoch: self.accounts_epoch,
        }
    }
}

/// State a provider call started from; its result is dropped once either
/// counter has moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    generation: u64,
    accounts_epoch: u64,
}

/// What one detection attempt found.
enum Probe<P> {
    Absent,
    Unavailable(AppError),
    WrongChain { provider: Rc<P>, chain_id: u64 },
    TargetChain { provider: Rc<P>, accounts: Vec<String> },
}

/// Owns the connection [`Phase`] for one application session.
pub struct ConnectionStateMachine<D: ProviderDetector> {
    detector: D,
    network: NetworkConfig,
    inner: RwLock<Inner<D::Provider>>,
    events_tx: EventSink,
    events_rx: async_channel::Receiver<ProviderEvent>,
    outbound: async_channel::Sender<MachineEvent>,
}

impl<D: ProviderDetector> ConnectionStateMachine<D> {
    /// Create a machine targeting `network`.
    ///
    /// The returned receiver carries state snapshots and transient notices.
    pub fn new(detector: D, network: NetworkConfig) -> (Self, async_channel::Receiver<MachineEvent>) {
        let (events_tx, events_rx) = async_channel::unbounded();
        let (outbound, notices) = async_channel::unbounded();

        let machine = Self {
            detector,
            network,
            inner: RwLock::new(Inner {
                phase: Phase::Uninitialized,
                generation: 0,
                accounts_epoch: 0,
                installed: false,
                started: false,
                subscribed: false,
                provider: None,
            }),
            events_tx,
            events_rx,
            outbound,
        };
        (machine, notices)
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Sender a provider binding pushes its change notifications into.
    pub fn event_sink(&self) -> EventSink {
        self.events_tx.clone()
    }

    /// Consistent snapshot of the current state.
    pub fn state(&self) -> ConnectionState {
        self.snapshot_of(&self.inner.read())
    }

    pub fn phase(&self) -> Phase {
        self.inner.read().phase.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Signer for the active account, if connected.
    pub fn signer(&self) -> Option<SignerHandle> {
        self.inner.read().phase.signer().cloned()
    }

    /// Whether `handle` is still the signer for the active account.
    pub fn is_signer_current(&self, handle: &SignerHandle) -> bool {
        self.inner
            .read()
            .phase
            .signer()
            .is_some_and(|signer| signer.id == handle.id)
    }

    /// Initial detection. Returns `false` if the machine was already started.
    pub async fn start(&self) -> bool {
        {
            let mut inner = self.inner.write();
            if inner.started {
                debug!("Connection state machine already started");
                return false;
            }
            inner.started = true;
        }
        info!(chain_id = self.network.chain_id, network = self.network.name, "Starting wallet detection");
        self.detect().await;
        true
    }

    /// Start (once), then handle provider events one at a time until
    /// [`shutdown`](Self::shutdown) is called.
    pub async fn run(&self) {
        self.start().await;
        while let Ok(event) = self.events_rx.recv().await {
            self.handle_event(event).await;
        }
        debug!("Provider event stream closed");
    }

    /// Stop [`run`](Self::run) once queued events have been handled.
    pub fn shutdown(&self) {
        self.events_rx.close();
    }

    /// Run one full detection, discarding the current session.
    pub async fn detect(&self) {
        let generation = self.begin_detection();
        let probe = self.probe().await;
        self.finish_detection(generation, probe);
    }

    /// Apply one provider-originated change.
    pub async fn handle_event(&self, event: ProviderEvent) {
        match event {
            ProviderEvent::NetworkChanged {
                new_chain_id,
                old_chain_id: None,
            } => {
                // The first notification only matters if the chain moved
                // between the probe and the subscription.
                let recorded = self.state().chain_id;
                if recorded.is_some_and(|chain_id| chain_id != new_chain_id) {
                    info!(recorded = ?recorded, new_chain_id, "Chain changed before subscription, resetting session");
                    self.detect().await;
                } else {
                    debug!(chain_id = new_chain_id, "Initial network notification");
                }
            }
            ProviderEvent::NetworkChanged {
                new_chain_id,
                old_chain_id: Some(old_chain_id),
            } => {
                info!(old_chain_id, new_chain_id, "Network changed, resetting session");
                self.detect().await;
            }
            ProviderEvent::AccountsChanged(accounts) => {
                self.apply_accounts(None, &accounts);
            }
        }
    }

    /// Ask the provider for account access.
    ///
    /// Only acts while on the target chain without an account. A declined
    /// prompt leaves the state untouched.
    pub async fn connect(&self) -> ActionOutcome {
        let (ticket, provider) = {
            let inner = self.inner.read();
            match (&inner.phase, &inner.provider) {
                (Phase::Detected(ChainStatus::TargetChain(Session::Disconnected)), Some(provider)) => {
                    (inner.ticket(), provider.clone())
                }
                (phase, _) => {
                    debug!(phase = ?phase.label(), "connect() not applicable");
                    return ActionOutcome::Skipped;
                }
            }
        };

        info!(generation = ticket.generation, "Requesting account access");
        match provider.request_accounts().await {
            Ok(accounts) if accounts.is_empty() => {
                debug!(generation = ticket.generation, "Provider granted no accounts");
                ActionOutcome::Skipped
            }
            Ok(accounts) => {
                if self.apply_accounts(Some(ticket), &accounts) {
                    ActionOutcome::Applied
                } else {
                    ActionOutcome::Skipped
                }
            }
            Err(err) if err.is_rejection() => {
                info!(error = %err, "Account access declined");
                ActionOutcome::Declined
            }
            Err(err) => {
                warn!(error = %err, "Account request failed");
                ActionOutcome::Failed(self.notify(NoticeKind::ProviderUnavailable, err.user_message()))
            }
        }
    }

    /// Ask the provider to add (or switch to) the target network, then
    /// re-detect.
    ///
    /// Acts from the wrong-chain and not-installed phases. Failures leave the
    /// state in place and publish a notice.
    pub async fn add_and_switch_network(&self) -> ActionOutcome {
        let (generation, known) = {
            let inner = self.inner.read();
            match inner.phase {
                Phase::Detected(ChainStatus::WrongChain { .. }) | Phase::NotInstalled { .. } => {
                    (inner.generation, inner.provider.clone())
                }
                ref phase => {
                    debug!(phase = ?phase.label(), "add_and_switch_network() not applicable");
                    return ActionOutcome::Skipped;
                }
            }
        };

        let provider = match known {
            Some(provider) => provider,
            None => match self.detector.detect().await {
                Some(provider) => Rc::new(provider),
                None => {
                    info!("Network switch requested without a wallet");
                    return ActionOutcome::Failed(self.notify(NoticeKind::InstallWallet, INSTALL_MESSAGE));
                }
            },
        };

        info!(generation, chain_id = self.network.chain_id, "Requesting network switch");
        match provider.add_network(&self.network).await {
            Ok(()) => {
                if self.generation() == generation {
                    self.detect().await;
                } else {
                    debug!(generation, "Network switch overtaken by a newer detection");
                }
                ActionOutcome::Applied
            }
            Err(err) if err.is_rejection() => {
                info!(error = %err, "Network switch declined");
                self.notify(NoticeKind::Declined, err.user_message());
                ActionOutcome::Declined
            }
            Err(err) => {
                warn!(error = %err, "Network switch failed");
                let message = format!("Could not switch to {}: {}", self.network.name, err.user_message());
                ActionOutcome::Failed(self.notify(NoticeKind::NetworkSwitchFailed, message))
            }
        }
    }

    fn begin_detection(&self) -> u64 {
        let (generation, snapshot) = {
            let mut inner = self.inner.write();
            inner.generation += 1;
            inner.phase = Phase::Detecting {
                generation: inner.generation,
            };
            (inner.generation, self.snapshot_of(&inner))
        };
        debug!(generation, "Detecting wallet provider");
        self.publish(MachineEvent::StateChanged(snapshot));
        generation
    }

    async fn probe(&self) -> Probe<D::Provider> {
        let Some(provider) = self.detector.detect().await else {
            return Probe::Absent;
        };
        let provider = Rc::new(provider);
        let handle: &D::Provider = &provider;

        let chain_id = match retry_once("eth_chainId", || handle.chain_id()).await {
            Ok(chain_id) => chain_id,
            Err(err) => return Probe::Unavailable(unavailable(err)),
        };
        if chain_id != self.network.chain_id {
            return Probe::WrongChain { provider, chain_id };
        }

        let accounts = retry_once("eth_accounts", || handle.accounts()).await;
        match accounts {
            Ok(accounts) => Probe::TargetChain { provider, accounts },
            Err(err) => Probe::Unavailable(unavailable(err)),
        }
    }

    fn finish_detection(&self, generation: u64, probe: Probe<D::Provider>) {
        let mut notice = None;
        let mut subscribe = None;

        let snapshot = {
            let mut inner = self.inner.write();
            if inner.generation != generation {
                debug!(generation, current = inner.generation, "Discarding stale detection result");
                return;
            }

            let (phase, provider) = match probe {
                Probe::Absent => {
                    info!(generation, "No wallet provider detected");
                    notice = Some((NoticeKind::InstallWallet, INSTALL_MESSAGE.to_string()));
                    (Phase::NotInstalled { diagnostic: None }, None)
                }
                Probe::Unavailable(err) => {
                    warn!(generation, error = %err, "Wallet provider unavailable");
                    notice = Some((NoticeKind::ProviderUnavailable, err.user_message()));
                    (Phase::NotInstalled { diagnostic: Some(err) }, None)
                }
                Probe::WrongChain { provider, chain_id } => {
                    let err = AppError::WrongChain {
                        expected: self.network.chain_id,
                        actual: chain_id,
                    };
                    info!(generation, chain_id, expected = self.network.chain_id, "Wallet is on the wrong chain");
                    notice = Some((NoticeKind::WrongChain, err.user_message()));
                    (Phase::Detected(ChainStatus::WrongChain { chain_id }), Some(provider))
                }
                Probe::TargetChain { provider, accounts } => {
                    let session = match first_account(&accounts) {
                        Ok(Some(address)) => Session::Connected {
                            signer: SignerHandle::issue(address, self.network.chain_id, generation),
                        },
                        Ok(None) => Session::Disconnected,
                        Err(err) => {
                            warn!(generation, error = %err, "Ignoring malformed account from provider");
                            Session::Disconnected
                        }
                    };
                    (Phase::Detected(ChainStatus::TargetChain(session)), Some(provider))
                }
            };

            inner.installed = provider.is_some();
            if provider.is_some() && !inner.subscribed {
                inner.subscribed = true;
                subscribe = provider.clone();
            }
            inner.provider = provider;
            inner.phase = phase;
            self.snapshot_of(&inner)
        };

        if let Some(provider) = subscribe {
            debug!("Subscribing to provider events");
            provider.subscribe(self.events_tx.clone());
        }
        info!(
            generation,
            phase = ?snapshot.phase,
            chain_id = ?snapshot.chain_id,
            address = ?snapshot.address,
            "Detection complete"
        );
        self.publish(MachineEvent::StateChanged(snapshot));
        if let Some((kind, message)) = notice {
            self.notify(kind, message);
        }
    }

    /// Replace the session from an account list. With `expected` set, the
    /// update is dropped if a detection or another account update has
    /// happened since the ticket was taken.
    fn apply_accounts(&self, expected: Option<Ticket>, accounts: &[String]) -> bool {
        let snapshot = {
            let mut inner = self.inner.write();
            if let Some(expected) = expected {
                let current = inner.ticket();
                if expected != current {
                    debug!(?expected, ?current, "Discarding stale account result");
                    return false;
                }
            }
            if !matches!(inner.phase, Phase::Detected(ChainStatus::TargetChain(_))) {
                debug!(phase = ?inner.phase.label(), count = accounts.len(), "Ignoring accounts off the target chain");
                return false;
            }

            let session = match first_account(accounts) {
                Ok(Some(address)) => Session::Connected {
                    signer: SignerHandle::issue(address, self.network.chain_id, inner.generation),
                },
                Ok(None) => Session::Disconnected,
                Err(err) => {
                    warn!(error = %err, "Ignoring malformed account from provider");
                    return false;
                }
            };
            inner.accounts_epoch += 1;
            inner.phase = Phase::Detected(ChainStatus::TargetChain(session));
            self.snapshot_of(&inner)
        };

        info!(address = ?snapshot.address, "Active account updated");
        self.publish(MachineEvent::StateChanged(snapshot));
        true
    }

    fn snapshot_of(&self, inner: &Inner<D::Provider>) -> ConnectionState {
        ConnectionState::derive(&inner.phase, self.network.chain_id, inner.installed)
    }

    fn notify(&self, kind: NoticeKind, message: impl Into<String>) -> Notice {
        let notice = Notice::new(kind, message);
        self.publish(MachineEvent::Notice(notice.clone()));
        notice
    }

    fn publish(&self, event: MachineEvent) {
        if self.outbound.try_send(event).is_err() {
            debug!("No listener for machine events");
        }
    }
}

fn first_account(accounts: &[String]) -> Result<Option<Address>> {
    accounts.first().map(|raw| parse_account(raw)).transpose()
}

fn unavailable(err: AppError) -> AppError {
    match err {
        AppError::ProviderUnavailable(_) => err,
        other => AppError::ProviderUnavailable(other.to_string()),
    }
}
