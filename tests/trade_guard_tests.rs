use std::time::Duration;

use tokio::sync::mpsc;

use nado_terminal::event::AppEvent;
use nado_terminal::gateway::{self, validate_size, TradeGuard, TradePhase};

#[test]
fn second_submission_in_flight_window_is_rejected() {
    let mut guard = TradeGuard::default();

    assert!(guard.try_begin().is_ok());
    // Second tap before settlement: rejected locally, no request sent.
    assert!(guard.try_begin().is_err());

    guard.settle();
    // Third tap during the cool-down window: still rejected.
    assert!(guard.try_begin().is_err());

    guard.release();
    assert!(guard.try_begin().is_ok());
}

#[test]
fn settlement_does_not_return_guard_to_idle() {
    let mut guard = TradeGuard::default();
    guard.try_begin().unwrap();
    guard.settle();
    assert_eq!(guard.phase(), TradePhase::CoolingDown);
    assert!(!guard.is_idle());
}

#[test]
fn failed_settlement_follows_same_cooldown_path() {
    // The guard does not distinguish success from failure; either way the
    // release happens only via the cool-down transition.
    let mut guard = TradeGuard::default();
    guard.try_begin().unwrap();
    guard.settle();
    guard.release();
    assert!(guard.is_idle());
}

#[test]
fn stray_cooldown_event_while_idle_is_harmless() {
    let mut guard = TradeGuard::default();
    guard.release();
    assert!(guard.is_idle());
    assert!(guard.try_begin().is_ok());
}

#[test]
fn size_validation_happens_before_any_network_activity() {
    // Anything that parses to a non-finite or non-positive number is
    // rejected outright.
    for bad in ["0", "0.0", "-3", "nan", "inf", "1e999", "", "ten"] {
        assert!(validate_size(bad).is_err(), "expected rejection for {:?}", bad);
    }
    for good in ["0.001", "1", "2.5", "1e3"] {
        assert!(validate_size(good).is_ok(), "expected accept for {:?}", good);
    }
}

#[test]
fn cooldown_release_arrives_as_an_event() {
    tokio_test::block_on(async {
        let (tx, mut rx) = mpsc::channel(4);
        gateway::spawn_cooldown(tx, Duration::from_millis(5));
        let event = rx.recv().await.expect("cooldown event");
        assert!(matches!(event, AppEvent::TradeCooldownOver));
    });
}
