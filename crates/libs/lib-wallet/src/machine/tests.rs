use async_channel::Receiver;
use futures::join;
use lib_core::address::normalize;
use lib_core::FANTOM_OPERA;

use super::*;
use crate::state::PhaseLabel;
use crate::testing::*;

type Machine = ConnectionStateMachine<ScriptedDetector>;

fn machine(detector: &ScriptedDetector) -> (Machine, Receiver<MachineEvent>) {
    ConnectionStateMachine::new(detector.clone(), FANTOM_OPERA)
}

fn drain(events: &Receiver<MachineEvent>) -> Vec<MachineEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

fn notice_kinds(events: &[MachineEvent]) -> Vec<NoticeKind> {
    events
        .iter()
        .filter_map(|event| match event {
            MachineEvent::Notice(notice) => Some(notice.kind),
            MachineEvent::StateChanged(_) => None,
        })
        .collect()
}

fn snapshots(events: &[MachineEvent]) -> Vec<ConnectionState> {
    events
        .iter()
        .filter_map(|event| match event {
            MachineEvent::StateChanged(state) => Some(state.clone()),
            MachineEvent::Notice(_) => None,
        })
        .collect()
}

async fn connected(accounts: &[&str]) -> (ScriptedProvider, Machine, Receiver<MachineEvent>) {
    let provider = ScriptedProvider::new(TARGET, accounts);
    let (machine, events) = machine(&ScriptedDetector::with(&provider));
    machine.start().await;
    (provider, machine, events)
}

// ============================================================================
// Detection
// ============================================================================

#[tokio::test]
async fn test_absent_provider_is_not_installed() {
    let (machine, events) = machine(&ScriptedDetector::absent());
    assert_eq!(machine.state(), ConnectionState::default());

    assert!(machine.start().await);

    let state = machine.state();
    assert_eq!(state.phase, PhaseLabel::NotInstalled);
    assert!(!state.installed && !state.ready && !state.wrong_chain);
    assert_eq!(machine.phase(), Phase::NotInstalled { diagnostic: None });
    assert_eq!(notice_kinds(&drain(&events)), vec![NoticeKind::InstallWallet]);
}

#[tokio::test]
async fn test_target_chain_with_authorized_account() {
    let (_provider, machine, _events) = connected(&[ALICE, BOB]).await;

    let state = machine.state();
    assert!(state.ready);
    assert!(!state.wrong_chain);
    assert!(state.installed);
    assert_eq!(state.chain_id, Some(TARGET));
    assert_eq!(state.address.as_deref(), Some(ALICE_CHECKSUM));

    let signer = machine.signer().expect("connected session has a signer");
    assert_eq!(signer.chain_id, TARGET);
    assert_eq!(signer.generation, machine.generation());
    assert!(machine.is_signer_current(&signer));
}

#[tokio::test]
async fn test_target_chain_without_accounts() {
    let (_provider, machine, _events) = connected(&[]).await;

    let state = machine.state();
    assert!(state.ready);
    assert_eq!(state.phase, PhaseLabel::Disconnected);
    assert_eq!(state.address, None);
    assert!(machine.signer().is_none());
}

#[tokio::test]
async fn test_malformed_initial_account_is_disconnected() {
    let (_provider, machine, _events) = connected(&["0xnot-an-account"]).await;

    assert!(machine.state().ready);
    assert_eq!(machine.state().address, None);
}

#[tokio::test]
async fn test_wrong_chain_then_switch() {
    let provider = ScriptedProvider::new(1, &[ALICE]);
    let (machine, events) = machine(&ScriptedDetector::with(&provider));
    machine.start().await;

    let state = machine.state();
    assert!(!state.ready);
    assert!(state.wrong_chain);
    assert_eq!(state.address, None);
    assert_eq!(state.chain_id, Some(1));
    assert!(notice_kinds(&drain(&events)).contains(&NoticeKind::WrongChain));

    assert_eq!(machine.add_and_switch_network().await, ActionOutcome::Applied);
    assert_eq!(provider.add_calls(), 1);

    let state = machine.state();
    assert!(state.ready);
    assert!(!state.wrong_chain);
    assert_eq!(state.chain_id, Some(TARGET));
    assert_eq!(state.address.as_deref(), Some(ALICE_CHECKSUM));
}

#[tokio::test]
async fn test_start_runs_once() {
    let provider = ScriptedProvider::new(TARGET, &[]);
    let detector = ScriptedDetector::with(&provider);
    let (machine, _events) = machine(&detector);

    assert!(machine.start().await);
    assert!(!machine.start().await);
    assert_eq!(detector.detect_calls(), 1);
    assert_eq!(machine.generation(), 1);
}

// ============================================================================
// Retry policy
// ============================================================================

#[tokio::test]
async fn test_transient_failure_is_retried_once() {
    let provider = ScriptedProvider::new(TARGET, &[ALICE]);
    provider.fail_chain_id(AppError::Rpc("timeout".into()));
    let (machine, _events) = machine(&ScriptedDetector::with(&provider));

    machine.start().await;

    assert_eq!(provider.chain_id_calls(), 2);
    assert!(machine.state().ready);
}

#[tokio::test]
async fn test_persistent_failure_is_provider_unavailable() {
    let provider = ScriptedProvider::new(TARGET, &[ALICE]);
    provider.fail_chain_id(AppError::Rpc("timeout".into()));
    provider.fail_chain_id(AppError::Rpc("timeout".into()));
    let (machine, events) = machine(&ScriptedDetector::with(&provider));

    machine.start().await;

    assert_eq!(provider.chain_id_calls(), 2);
    assert!(matches!(
        machine.phase(),
        Phase::NotInstalled {
            diagnostic: Some(AppError::ProviderUnavailable(_))
        }
    ));
    assert!(!machine.state().installed);
    assert_eq!(
        notice_kinds(&drain(&events)),
        vec![NoticeKind::ProviderUnavailable]
    );
}

#[tokio::test]
async fn test_account_listing_failure_is_retried() {
    let provider = ScriptedProvider::new(TARGET, &[BOB]);
    provider.fail_accounts(AppError::ProviderUnavailable("disconnected".into()));
    let (machine, _events) = machine(&ScriptedDetector::with(&provider));

    machine.start().await;

    assert_eq!(machine.state().address.as_deref(), Some(BOB_CHECKSUM));
}

// ============================================================================
// connect()
// ============================================================================

#[tokio::test]
async fn test_connect_success() {
    let (provider, machine, _events) = connected(&[]).await;
    provider.grant(&[BOB]);

    assert_eq!(machine.connect().await, ActionOutcome::Applied);

    assert_eq!(provider.request_calls(), 1);
    let state = machine.state();
    assert_eq!(state.phase, PhaseLabel::Connected);
    assert_eq!(state.address.as_deref(), Some(BOB_CHECKSUM));
    assert!(machine.signer().is_some());
}

#[tokio::test]
async fn test_connect_rejection_keeps_address() {
    let (provider, machine, events) = connected(&[]).await;
    drain(&events);
    provider.fail_request(AppError::UserRejected("User denied account access".into()));

    assert_eq!(machine.connect().await, ActionOutcome::Declined);

    assert_eq!(machine.state().address, None);
    assert_eq!(machine.state().phase, PhaseLabel::Disconnected);
    assert!(drain(&events).is_empty());
}

#[tokio::test]
async fn test_connect_while_connected_is_skipped() {
    let (provider, machine, _events) = connected(&[ALICE]).await;
    provider.grant(&[BOB]);

    assert_eq!(machine.connect().await, ActionOutcome::Skipped);

    assert_eq!(provider.request_calls(), 0);
    assert_eq!(machine.state().address.as_deref(), Some(ALICE_CHECKSUM));
}

#[tokio::test]
async fn test_connect_on_wrong_chain_is_skipped() {
    let provider = ScriptedProvider::new(1, &[]);
    let (machine, _events) = machine(&ScriptedDetector::with(&provider));
    machine.start().await;

    assert_eq!(machine.connect().await, ActionOutcome::Skipped);
    assert_eq!(provider.request_calls(), 0);
}

#[tokio::test]
async fn test_connect_provider_failure_publishes_notice() {
    let (provider, machine, _events) = connected(&[]).await;
    provider.fail_request(AppError::Rpc("internal".into()));

    let outcome = machine.connect().await;

    assert!(matches!(
        outcome,
        ActionOutcome::Failed(Notice {
            kind: NoticeKind::ProviderUnavailable,
            ..
        })
    ));
    assert_eq!(machine.state().address, None);
}

// ============================================================================
// Provider events
// ============================================================================

#[tokio::test]
async fn test_accounts_changed_tracks_first_entry() {
    let (_provider, machine, _events) = connected(&[ALICE]).await;

    let sequences: [&[&str]; 4] = [
        &[BOB, ALICE],
        &[CAROL_CHECKSUM],
        &[ALICE_CHECKSUM, BOB],
        &[BOB],
    ];
    let mut previous = machine.signer().expect("signer");
    for accounts in sequences {
        let list: Vec<String> = accounts.iter().map(|a| a.to_string()).collect();
        machine
            .handle_event(ProviderEvent::AccountsChanged(list))
            .await;

        let expected = normalize(accounts[0]).unwrap();
        assert_eq!(machine.state().address, Some(expected));

        let signer = machine.signer().expect("signer");
        assert_ne!(signer.id, previous.id);
        assert!(!machine.is_signer_current(&previous));
        assert!(machine.is_signer_current(&signer));
        previous = signer;
    }
}

#[tokio::test]
async fn test_accounts_revoked_disconnects() {
    let (_provider, machine, _events) = connected(&[ALICE]).await;
    let signer = machine.signer().expect("signer");

    machine
        .handle_event(ProviderEvent::AccountsChanged(Vec::new()))
        .await;

    let state = machine.state();
    assert!(state.ready);
    assert_eq!(state.address, None);
    assert_eq!(state.phase, PhaseLabel::Disconnected);
    assert!(!machine.is_signer_current(&signer));
}

#[tokio::test]
async fn test_malformed_account_change_is_ignored() {
    let (_provider, machine, _events) = connected(&[ALICE]).await;

    machine
        .handle_event(ProviderEvent::AccountsChanged(vec!["garbage".to_string()]))
        .await;

    assert_eq!(machine.state().address.as_deref(), Some(ALICE_CHECKSUM));
}

#[tokio::test]
async fn test_accounts_ignored_on_wrong_chain() {
    let provider = ScriptedProvider::new(1, &[]);
    let (machine, _events) = machine(&ScriptedDetector::with(&provider));
    machine.start().await;

    machine
        .handle_event(ProviderEvent::AccountsChanged(vec![ALICE.to_string()]))
        .await;

    let state = machine.state();
    assert!(state.wrong_chain);
    assert_eq!(state.address, None);
}

#[tokio::test]
async fn test_network_change_resets_session() {
    let (provider, machine, _events) = connected(&[ALICE]).await;
    let signer = machine.signer().expect("signer");
    let generation = machine.generation();

    provider.set_chain(1);
    let gate = provider.gate_chain_id();

    join!(
        machine.handle_event(ProviderEvent::NetworkChanged {
            new_chain_id: 1,
            old_chain_id: Some(TARGET),
        }),
        async {
            let state = machine.state();
            assert_eq!(state.phase, PhaseLabel::Detecting);
            assert!(!state.ready);
            assert_eq!(state.address, None);
            assert!(!machine.is_signer_current(&signer));
            gate.send(()).unwrap();
        }
    );

    assert_eq!(machine.generation(), generation + 1);
    let state = machine.state();
    assert!(state.wrong_chain);
    assert!(!state.ready);
    assert_eq!(state.address, None);
}

#[tokio::test]
async fn test_network_change_back_to_target_reconnects() {
    let provider = ScriptedProvider::new(1, &[ALICE]);
    let (machine, _events) = machine(&ScriptedDetector::with(&provider));
    machine.start().await;

    provider.set_chain(TARGET);
    machine
        .handle_event(ProviderEvent::NetworkChanged {
            new_chain_id: TARGET,
            old_chain_id: Some(1),
        })
        .await;

    let state = machine.state();
    assert!(state.ready);
    assert_eq!(state.address.as_deref(), Some(ALICE_CHECKSUM));
}

#[tokio::test]
async fn test_initial_network_notification_is_ignored() {
    let provider = ScriptedProvider::new(TARGET, &[ALICE]);
    let detector = ScriptedDetector::with(&provider);
    let (machine, _events) = machine(&detector);
    machine.start().await;
    let before = machine.state();

    machine
        .handle_event(ProviderEvent::NetworkChanged {
            new_chain_id: TARGET,
            old_chain_id: None,
        })
        .await;

    assert_eq!(detector.detect_calls(), 1);
    assert_eq!(machine.state(), before);
}

#[tokio::test]
async fn test_initial_notification_for_other_chain_resets_session() {
    let (provider, machine, _events) = connected(&[ALICE]).await;
    assert!(machine.state().ready);

    // Chain moved after the probe but before the subscription was registered.
    provider.set_chain(1);
    machine
        .handle_event(ProviderEvent::NetworkChanged {
            new_chain_id: 1,
            old_chain_id: None,
        })
        .await;

    let state = machine.state();
    assert!(!state.ready);
    assert!(state.wrong_chain);
    assert_eq!(state.chain_id, Some(1));
    assert_eq!(state.address, None);
    assert_eq!(machine.signer(), None);
}

#[tokio::test]
async fn test_subscribes_once_across_resets() {
    let (provider, machine, _events) = connected(&[ALICE]).await;

    machine
        .handle_event(ProviderEvent::NetworkChanged {
            new_chain_id: TARGET,
            old_chain_id: Some(1),
        })
        .await;
    machine.detect().await;

    assert_eq!(provider.subscribe_calls(), 1);
}

#[tokio::test]
async fn test_run_handles_events_in_order() {
    let provider = ScriptedProvider::new(TARGET, &[]);
    let (machine, events) = machine(&ScriptedDetector::with(&provider));
    let sink = machine.event_sink();
    sink.try_send(ProviderEvent::AccountsChanged(vec![ALICE.to_string()]))
        .unwrap();
    sink.try_send(ProviderEvent::AccountsChanged(vec![BOB.to_string()]))
        .unwrap();
    machine.shutdown();

    machine.run().await;

    let addresses: Vec<Option<String>> = snapshots(&drain(&events))
        .into_iter()
        .filter(|state| state.ready)
        .map(|state| state.address)
        .collect();
    assert_eq!(
        addresses,
        vec![
            None,
            Some(ALICE_CHECKSUM.to_string()),
            Some(BOB_CHECKSUM.to_string())
        ]
    );
}

#[tokio::test]
async fn test_provider_events_reach_machine() {
    let (provider, machine, _events) = connected(&[ALICE]).await;

    provider.emit(ProviderEvent::AccountsChanged(vec![BOB.to_string()]));
    machine.shutdown();
    machine.run().await;

    assert_eq!(machine.state().address.as_deref(), Some(BOB_CHECKSUM));
}

// ============================================================================
// Generations
// ============================================================================

/// Two overlapping detections: the first sees chain 1, the second sees the
/// target chain with an account. The first is released before or after the
/// second depending on `release_first_early`.
async fn race_detections(release_first_early: bool) {
    let provider = ScriptedProvider::new(1, &[]);
    let (machine, events) = machine(&ScriptedDetector::with(&provider));
    let first_gate = provider.gate_chain_id();
    let second_gate = provider.gate_chain_id();

    join!(
        machine.detect(),
        async {
            provider.set_chain(TARGET);
            provider.set_authorized(&[ALICE]);
            machine.detect().await;
        },
        async {
            if release_first_early {
                first_gate.send(()).unwrap();
                tokio::task::yield_now().await;
                second_gate.send(()).unwrap();
            } else {
                second_gate.send(()).unwrap();
                tokio::task::yield_now().await;
                first_gate.send(()).unwrap();
            }
        }
    );

    assert_eq!(machine.generation(), 2);
    let state = machine.state();
    assert!(state.ready);
    assert!(!state.wrong_chain);
    assert_eq!(state.address.as_deref(), Some(ALICE_CHECKSUM));
    assert_eq!(machine.signer().map(|s| s.generation), Some(2));

    // the first generation's wrong-chain result was never applied
    let published = drain(&events);
    assert!(snapshots(&published).iter().all(|state| !state.wrong_chain));
    assert!(!notice_kinds(&published).contains(&NoticeKind::WrongChain));
}

#[tokio::test]
async fn test_stale_detection_released_last_is_discarded() {
    race_detections(false).await;
}

#[tokio::test]
async fn test_stale_detection_released_first_is_discarded() {
    race_detections(true).await;
}

#[tokio::test]
async fn test_connect_result_after_reset_is_discarded() {
    let (provider, machine, _events) = connected(&[]).await;
    provider.grant(&[BOB]);
    let gate = provider.gate_request();

    join!(
        async {
            assert_eq!(machine.connect().await, ActionOutcome::Skipped);
        },
        async {
            machine.detect().await;
            gate.send(()).unwrap();
        }
    );

    assert_eq!(provider.request_calls(), 1);
    assert_eq!(machine.state().address, None);
}

#[tokio::test]
async fn test_connect_result_after_accounts_event_is_discarded() {
    let (provider, machine, _events) = connected(&[]).await;
    provider.grant(&[ALICE]);
    let gate = provider.gate_request();

    join!(
        async {
            assert_eq!(machine.connect().await, ActionOutcome::Skipped);
        },
        async {
            machine
                .handle_event(ProviderEvent::AccountsChanged(vec![BOB.to_string()]))
                .await;
            gate.send(()).unwrap();
        }
    );

    assert_eq!(provider.request_calls(), 1);
    assert_eq!(machine.state().address.as_deref(), Some(BOB_CHECKSUM));
    assert_eq!(machine.signer().map(|s| s.address_checksummed()), Some(BOB_CHECKSUM.to_string()));
}

// ============================================================================
// add_and_switch_network()
// ============================================================================

#[tokio::test]
async fn test_switch_declined_stays_on_wrong_chain() {
    let provider = ScriptedProvider::new(1, &[]);
    let (machine, events) = machine(&ScriptedDetector::with(&provider));
    machine.start().await;
    drain(&events);
    provider.fail_add_network(AppError::UserRejected("User rejected the request".into()));

    assert_eq!(machine.add_and_switch_network().await, ActionOutcome::Declined);

    assert!(machine.state().wrong_chain);
    assert_eq!(notice_kinds(&drain(&events)), vec![NoticeKind::Declined]);
}

#[tokio::test]
async fn test_switch_failure_surfaces_notice() {
    let provider = ScriptedProvider::new(1, &[]);
    let (machine, _events) = machine(&ScriptedDetector::with(&provider));
    machine.start().await;
    provider.fail_add_network(AppError::Rpc("internal".into()));

    let outcome = machine.add_and_switch_network().await;

    match outcome {
        ActionOutcome::Failed(notice) => {
            assert_eq!(notice.kind, NoticeKind::NetworkSwitchFailed);
            assert!(notice.message.contains("Fantom Opera"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(machine.state().wrong_chain);
}

#[tokio::test]
async fn test_switch_without_wallet_asks_for_install() {
    let (machine, _events) = machine(&ScriptedDetector::absent());
    machine.start().await;

    let outcome = machine.add_and_switch_network().await;

    assert!(matches!(
        outcome,
        ActionOutcome::Failed(Notice {
            kind: NoticeKind::InstallWallet,
            ..
        })
    ));
    assert_eq!(machine.state().phase, PhaseLabel::NotInstalled);
}

#[tokio::test]
async fn test_switch_after_install_detects_wallet() {
    let detector = ScriptedDetector::absent();
    let (machine, _events) = machine(&detector);
    machine.start().await;

    let provider = ScriptedProvider::new(1, &[ALICE]);
    detector.install(&provider);

    assert_eq!(machine.add_and_switch_network().await, ActionOutcome::Applied);
    assert!(machine.state().ready);
    assert_eq!(machine.state().address.as_deref(), Some(ALICE_CHECKSUM));
}

#[tokio::test]
async fn test_switch_on_target_chain_is_skipped() {
    let (provider, machine, _events) = connected(&[ALICE]).await;

    assert_eq!(machine.add_and_switch_network().await, ActionOutcome::Skipped);
    assert_eq!(provider.add_calls(), 0);
}
