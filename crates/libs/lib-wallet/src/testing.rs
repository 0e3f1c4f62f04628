//! Scripted provider and detector for state machine tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use lib_core::{AppError, NetworkConfig, Result};

use crate::provider::{EventSink, ProviderDetector, ProviderEvent, WalletProvider};

pub const TARGET: u64 = 250;

// EIP-55 test vectors
pub const ALICE: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
pub const ALICE_CHECKSUM: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const BOB: &str = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359";
pub const BOB_CHECKSUM: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
pub const CAROL_CHECKSUM: &str = "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB";

#[derive(Default)]
struct Script {
    chain_id: Cell<u64>,
    authorized: RefCell<Vec<String>>,
    grantable: RefCell<Vec<String>>,
    chain_failures: RefCell<VecDeque<AppError>>,
    account_failures: RefCell<VecDeque<AppError>>,
    request_failure: RefCell<Option<AppError>>,
    add_failure: RefCell<Option<AppError>>,
    chain_gates: RefCell<VecDeque<oneshot::Receiver<()>>>,
    request_gate: RefCell<Option<oneshot::Receiver<()>>>,
    sink: RefCell<Option<EventSink>>,
    chain_id_calls: Cell<usize>,
    request_calls: Cell<usize>,
    add_calls: Cell<usize>,
    subscribe_calls: Cell<usize>,
}

/// Provider whose answers are set by the test. Clones share one script.
#[derive(Clone, Default)]
pub struct ScriptedProvider(Rc<Script>);

impl ScriptedProvider {
    pub fn new(chain_id: u64, authorized: &[&str]) -> Self {
        let provider = Self::default();
        provider.set_chain(chain_id);
        provider.set_authorized(authorized);
        provider
    }

    pub fn set_chain(&self, chain_id: u64) {
        self.0.chain_id.set(chain_id);
    }

    pub fn set_authorized(&self, accounts: &[&str]) {
        *self.0.authorized.borrow_mut() = accounts.iter().map(|a| a.to_string()).collect();
    }

    /// Accounts the next `request_accounts` approves.
    pub fn grant(&self, accounts: &[&str]) {
        *self.0.grantable.borrow_mut() = accounts.iter().map(|a| a.to_string()).collect();
    }

    pub fn fail_chain_id(&self, err: AppError) {
        self.0.chain_failures.borrow_mut().push_back(err);
    }

    pub fn fail_accounts(&self, err: AppError) {
        self.0.account_failures.borrow_mut().push_back(err);
    }

    pub fn fail_request(&self, err: AppError) {
        *self.0.request_failure.borrow_mut() = Some(err);
    }

    pub fn fail_add_network(&self, err: AppError) {
        *self.0.add_failure.borrow_mut() = Some(err);
    }

    /// Hold the next `chain_id` answer until the sender fires. The value is
    /// read when the call is made, not when it is released.
    pub fn gate_chain_id(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.0.chain_gates.borrow_mut().push_back(rx);
        tx
    }

    /// Hold the next `request_accounts` prompt open until the sender fires.
    pub fn gate_request(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.0.request_gate.borrow_mut() = Some(rx);
        tx
    }

    /// Push an event through the subscribed sink.
    pub fn emit(&self, event: ProviderEvent) {
        let sink = self.0.sink.borrow().clone().expect("provider not subscribed");
        sink.try_send(event).expect("event sink closed");
    }

    pub fn chain_id_calls(&self) -> usize {
        self.0.chain_id_calls.get()
    }

    pub fn request_calls(&self) -> usize {
        self.0.request_calls.get()
    }

    pub fn add_calls(&self) -> usize {
        self.0.add_calls.get()
    }

    pub fn subscribe_calls(&self) -> usize {
        self.0.subscribe_calls.get()
    }
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

#[async_trait(?Send)]
impl WalletProvider for ScriptedProvider {
    async fn chain_id(&self) -> Result<u64> {
        bump(&self.0.chain_id_calls);
        let result = match self.0.chain_failures.borrow_mut().pop_front() {
            Some(err) => Err(err),
            None => Ok(self.0.chain_id.get()),
        };
        let gate = self.0.chain_gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn accounts(&self) -> Result<Vec<String>> {
        match self.0.account_failures.borrow_mut().pop_front() {
            Some(err) => Err(err),
            None => Ok(self.0.authorized.borrow().clone()),
        }
    }

    async fn request_accounts(&self) -> Result<Vec<String>> {
        bump(&self.0.request_calls);
        let gate = self.0.request_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(err) = self.0.request_failure.borrow_mut().take() {
            return Err(err);
        }
        let granted = self.0.grantable.borrow().clone();
        *self.0.authorized.borrow_mut() = granted.clone();
        Ok(granted)
    }

    async fn add_network(&self, network: &NetworkConfig) -> Result<()> {
        bump(&self.0.add_calls);
        if let Some(err) = self.0.add_failure.borrow_mut().take() {
            return Err(err);
        }
        self.0.chain_id.set(network.chain_id);
        Ok(())
    }

    fn subscribe(&self, sink: EventSink) {
        bump(&self.0.subscribe_calls);
        *self.0.sink.borrow_mut() = Some(sink);
    }
}

#[derive(Default)]
struct DetectorState {
    provider: RefCell<Option<ScriptedProvider>>,
    detect_calls: Cell<usize>,
}

/// Detector handing out clones of one scripted provider, if installed.
#[derive(Clone, Default)]
pub struct ScriptedDetector(Rc<DetectorState>);

impl ScriptedDetector {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn with(provider: &ScriptedProvider) -> Self {
        let detector = Self::default();
        detector.install(provider);
        detector
    }

    pub fn install(&self, provider: &ScriptedProvider) {
        *self.0.provider.borrow_mut() = Some(provider.clone());
    }

    pub fn detect_calls(&self) -> usize {
        self.0.detect_calls.get()
    }
}

#[async_trait(?Send)]
impl ProviderDetector for ScriptedDetector {
    type Provider = ScriptedProvider;

    async fn detect(&self) -> Option<ScriptedProvider> {
        bump(&self.0.detect_calls);
        self.0.provider.borrow().clone()
    }
}
