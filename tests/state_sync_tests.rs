use std::collections::HashMap;
use std::time::Duration;

use nado_terminal::event::{AppEvent, NoticeKind, RefreshScope};
use nado_terminal::model::account::{Balance, Identity, Network, Wallet};
use nado_terminal::model::position::{Position, PositionSide};
use nado_terminal::model::quote::PriceQuote;
use nado_terminal::state::AppState;

fn state() -> AppState {
    AppState::new(
        vec!["BTC".to_string(), "ETH".to_string()],
        Duration::from_millis(3000),
    )
}

fn quote(mid: f64) -> PriceQuote {
    PriceQuote {
        bid: mid - 0.5,
        ask: mid + 0.5,
        mid,
    }
}

fn position(name: &str, side: PositionSide) -> Position {
    Position {
        product_id: 1,
        product_name: name.to_string(),
        side,
        amount: 1.0,
        entry_price: 100.0,
    }
}

#[test]
fn price_snapshots_are_replaced_wholesale() {
    let mut s = state();

    let mut first = HashMap::new();
    first.insert("BTC".to_string(), quote(60000.0));
    first.insert("ETH".to_string(), quote(3000.0));
    s.apply(AppEvent::PricesFetched(first));
    assert_eq!(s.prices.len(), 2);

    // A later snapshot missing ETH drops it; snapshots never merge.
    let mut second = HashMap::new();
    second.insert("BTC".to_string(), quote(61000.0));
    s.apply(AppEvent::PricesFetched(second));
    assert_eq!(s.prices.len(), 1);
    assert!((s.prices["BTC"].mid - 61000.0).abs() < f64::EPSILON);
}

#[test]
fn out_of_order_responses_are_last_write_wins() {
    let mut s = state();

    let mut older = HashMap::new();
    older.insert("BTC".to_string(), quote(60000.0));
    let mut newer = HashMap::new();
    newer.insert("BTC".to_string(), quote(60500.0));

    // The "newer" request resolved first; the stale response still lands
    // and wins because it arrived last.
    s.apply(AppEvent::PricesFetched(newer));
    s.apply(AppEvent::PricesFetched(older));
    assert!((s.prices["BTC"].mid - 60000.0).abs() < f64::EPSILON);
}

#[test]
fn authoritative_empty_position_list_clears_rows() {
    let mut s = state();
    s.apply(AppEvent::PositionsFetched(vec![
        position("BTC-PERP", PositionSide::Long),
        position("ETH-PERP", PositionSide::Short),
    ]));
    assert_eq!(s.positions.len(), 2);

    s.apply(AppEvent::PositionsFetched(Vec::new()));
    assert!(s.positions.is_empty());
}

#[test]
fn failed_fetch_leaves_previous_snapshot_untouched() {
    let mut s = state();
    let mut prices = HashMap::new();
    prices.insert("BTC".to_string(), quote(60000.0));
    s.apply(AppEvent::PricesFetched(prices));
    s.apply(AppEvent::PositionsFetched(vec![position(
        "BTC-PERP",
        PositionSide::Long,
    )]));

    s.apply(AppEvent::FetchFailed {
        what: "prices",
        scope: RefreshScope::Background,
        reason: "connection reset".to_string(),
    });

    assert_eq!(s.prices.len(), 1);
    assert_eq!(s.positions.len(), 1);
    assert!(s.notice().is_none());
}

#[test]
fn foreground_failure_notifies_but_keeps_partial_state() {
    let mut s = state();
    s.apply(AppEvent::BalanceFetched(Balance {
        exists: true,
        usdt_balance: 500.0,
    }));
    s.apply(AppEvent::FetchFailed {
        what: "positions",
        scope: RefreshScope::Foreground,
        reason: "timeout".to_string(),
    });

    let notice = s.notice().expect("foreground failure raises a notice");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(s.balance.is_some());
}

#[test]
fn network_switch_window_resolves_after_dependent_refreshes() {
    let mut s = state();
    s.set_identity(Identity {
        user_ref: "u1".to_string(),
        network: Network::Testnet,
        is_new: false,
    });
    s.replace_wallet(Wallet {
        active_address: "0xtest".to_string(),
        network: Network::Testnet,
    });

    // Confirmed switch updates the badge immediately: identity says
    // mainnet while the wallet snapshot still says testnet.
    s.apply(AppEvent::NetworkSwitched {
        network: Network::Mainnet,
        success: true,
        message: "Switched to mainnet".to_string(),
    });
    assert_eq!(s.identity.as_ref().unwrap().network, Network::Mainnet);
    assert_eq!(s.wallet.as_ref().unwrap().network, Network::Testnet);

    // The wallet refresh scoped to the new network closes the window.
    s.apply(AppEvent::WalletFetched(Wallet {
        active_address: "0xmain".to_string(),
        network: Network::Mainnet,
    }));
    assert_eq!(s.wallet.as_ref().unwrap().network, Network::Mainnet);
    assert_eq!(s.identity.as_ref().unwrap().network, Network::Mainnet);
}

#[test]
fn failed_close_removes_nothing_locally() {
    let mut s = state();
    s.apply(AppEvent::PositionsFetched(vec![position(
        "BTC-PERP",
        PositionSide::Long,
    )]));
    s.close_busy = true;

    s.apply(AppEvent::CloseSettled {
        success: false,
        message: "insufficient margin".to_string(),
        closed_all: false,
    });

    // Stale-but-correct beats phantom removal.
    assert_eq!(s.positions.len(), 1);
    assert!(!s.close_busy);
    assert_eq!(s.notice().unwrap().kind, NoticeKind::Error);
}

#[test]
fn balance_and_wallet_replace_wholesale() {
    let mut s = state();
    s.apply(AppEvent::BalanceFetched(Balance {
        exists: false,
        usdt_balance: 0.0,
    }));
    s.apply(AppEvent::BalanceFetched(Balance {
        exists: true,
        usdt_balance: 1234.5,
    }));
    let balance = s.balance.unwrap();
    assert!(balance.exists);
    assert!((balance.usdt_balance - 1234.5).abs() < f64::EPSILON);
}
