//! Wallet state management
//!
//! The connection state machine runs for the lifetime of the page. Its
//! events are mirrored into signals so components never touch it directly.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use lib_core::config::core_config;
use lib_wallet::{ActionOutcome, ConnectionState, ConnectionStateMachine, MachineEvent, Notice};

use crate::services::wallet::InjectedDetector;

type Machine = ConnectionStateMachine<InjectedDetector>;

/// Global wallet context
#[derive(Clone, Copy)]
pub struct WalletContext {
    pub connection: RwSignal<ConnectionState>,
    pub notice: RwSignal<Option<Notice>>,
    machine: StoredValue<Rc<Machine>, LocalStorage>,
}

impl WalletContext {
    pub fn is_ready(&self) -> bool {
        self.connection.with(|state| state.ready)
    }

    pub fn address(&self) -> Option<String> {
        self.connection.with(|state| state.address.clone())
    }

    /// Prompt for account access.
    pub fn connect(&self) {
        let machine = self.machine.get_value();
        spawn_local(async move {
            match machine.connect().await {
                ActionOutcome::Declined => log::info!("Wallet connection declined"),
                outcome => log::debug!("connect() -> {:?}", outcome),
            }
        });
    }

    /// Add the target network to the wallet and switch to it.
    pub fn add_and_switch_network(&self) {
        let machine = self.machine.get_value();
        spawn_local(async move {
            let outcome = machine.add_and_switch_network().await;
            log::debug!("add_and_switch_network() -> {:?}", outcome);
        });
    }

    pub fn dismiss_notice(&self) {
        self.notice.set(None);
    }
}

pub fn provide_wallet_context() -> WalletContext {
    let (machine, events) = ConnectionStateMachine::new(InjectedDetector, core_config().network);
    let machine = Rc::new(machine);

    let context = WalletContext {
        connection: RwSignal::new(machine.state()),
        notice: RwSignal::new(None),
        machine: StoredValue::new_local(machine.clone()),
    };
    provide_context(context);

    spawn_local(async move {
        while let Ok(event) = events.recv().await {
            match event {
                MachineEvent::StateChanged(state) => context.connection.set(state),
                MachineEvent::Notice(notice) => {
                    log::info!("{:?}: {}", notice.kind, notice.message);
                    context.notice.set(Some(notice));
                }
            }
        }
    });
    spawn_local(async move { machine.run().await });

    context
}

pub fn use_wallet_context() -> WalletContext {
    expect_context::<WalletContext>()
}
