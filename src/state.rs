use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::event::{AppEvent, NoticeKind, RefreshScope};
use crate::gateway::TradeGuard;
use crate::model::account::{Balance, Identity, Wallet};
use crate::model::position::{Position, PositionSide};
use crate::model::quote::PriceQuote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Trade,
    Positions,
    Wallet,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Trade, Tab::Positions, Tab::Wallet];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Trade => "Trade",
            Tab::Positions => "Positions",
            Tab::Wallet => "Wallet",
        }
    }

    pub fn next(&self) -> Tab {
        match self {
            Tab::Dashboard => Tab::Trade,
            Tab::Trade => Tab::Positions,
            Tab::Positions => Tab::Wallet,
            Tab::Wallet => Tab::Dashboard,
        }
    }
}

/// Trade-ticket selection. Mutated synchronously by user input, never by
/// background sync.
#[derive(Debug, Clone)]
pub struct Selection {
    pub product: String,
    pub direction: PositionSide,
    pub leverage: u32,
    pub size_input: String,
    pub editing_size: bool,
}

pub const MAX_LEVERAGE: u32 = 20;

/// Order-size step per instrument, also the default ticket size.
pub fn size_step(product: &str) -> f64 {
    match product {
        "BTC" | "ETH" => 0.001,
        _ => 0.1,
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    expires_at: Instant,
}

/// Single mutable snapshot of everything the client knows. Owned by the
/// event loop; fetch tasks and mutation tasks report back as `AppEvent`s,
/// so every mutation lands here on one logical thread. Field groups are
/// replaced wholesale, never merged.
pub struct AppState {
    pub identity: Option<Identity>,
    pub catalog: Vec<String>,
    pub prices: HashMap<String, PriceQuote>,
    pub positions: Vec<Position>,
    pub balance: Option<Balance>,
    pub wallet: Option<Wallet>,
    pub selection: Selection,
    pub active_tab: Tab,
    pub selected_position: usize,
    pub trade_guard: TradeGuard,
    pub close_busy: bool,
    pub network_busy: bool,
    /// One-time recovery phrase overlay for freshly provisioned accounts.
    /// Dismissal discards the phrase; it is never persisted.
    pub recovery_phrase: Option<String>,
    notice: Option<Notice>,
    notice_ttl: Duration,
}

impl AppState {
    pub fn new(catalog: Vec<String>, notice_ttl: Duration) -> Self {
        let product = catalog.first().cloned().unwrap_or_else(|| "BTC".to_string());
        let size_input = format_step(size_step(&product));
        Self {
            identity: None,
            catalog,
            prices: HashMap::new(),
            positions: Vec::new(),
            balance: None,
            wallet: None,
            selection: Selection {
                product,
                direction: PositionSide::Long,
                leverage: 1,
                size_input,
                editing_size: false,
            },
            active_tab: Tab::Dashboard,
            selected_position: 0,
            trade_guard: TradeGuard::default(),
            close_busy: false,
            network_busy: false,
            recovery_phrase: None,
            notice: None,
            notice_ttl,
        }
    }

    pub fn replace_prices(&mut self, prices: HashMap<String, PriceQuote>) {
        self.prices = prices;
    }

    pub fn replace_positions(&mut self, positions: Vec<Position>) {
        self.positions = positions;
        let max = self.positions.len().saturating_sub(1);
        self.selected_position = self.selected_position.min(max);
    }

    pub fn replace_balance(&mut self, balance: Balance) {
        self.balance = Some(balance);
    }

    pub fn replace_wallet(&mut self, wallet: Wallet) {
        self.wallet = Some(wallet);
    }

    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|n| n.expires_at > Instant::now())
    }

    pub fn push_notice(&mut self, text: impl Into<String>, kind: NoticeKind) {
        self.notice = Some(Notice {
            text: text.into(),
            kind,
            expires_at: Instant::now() + self.notice_ttl,
        });
    }

    pub fn select_product(&mut self, product: &str) {
        if self.selection.product != product {
            self.selection.product = product.to_string();
            self.selection.size_input = format_step(size_step(product));
        }
    }

    pub fn cycle_product(&mut self, step: isize) {
        if self.catalog.is_empty() {
            return;
        }
        let len = self.catalog.len() as isize;
        let current = self
            .catalog
            .iter()
            .position(|p| p == &self.selection.product)
            .unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(len) as usize;
        let product = self.catalog[next].clone();
        self.select_product(&product);
    }

    pub fn adjust_leverage(&mut self, delta: i32) {
        let lev = self.selection.leverage as i64 + i64::from(delta);
        self.selection.leverage = lev.clamp(1, i64::from(MAX_LEVERAGE)) as u32;
    }

    pub fn adjust_size(&mut self, steps: i32) {
        let step = size_step(&self.selection.product);
        let current: f64 = self.selection.size_input.parse().unwrap_or(0.0);
        let mut next = current + step * f64::from(steps);
        if next < 0.0 {
            next = 0.0;
        }
        next = (next * 1_000_000.0).round() / 1_000_000.0;
        self.selection.size_input = format_step(next);
    }

    pub fn select_position(&mut self, delta: i32) {
        if self.positions.is_empty() {
            self.selected_position = 0;
            return;
        }
        let max = self.positions.len() as i64 - 1;
        let next = self.selected_position as i64 + i64::from(delta);
        self.selected_position = next.clamp(0, max) as usize;
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::PricesFetched(prices) => {
                self.replace_prices(prices);
            }
            AppEvent::PositionsFetched(positions) => {
                self.replace_positions(positions);
            }
            AppEvent::BalanceFetched(balance) => {
                self.replace_balance(balance);
            }
            AppEvent::WalletFetched(wallet) => {
                self.replace_wallet(wallet);
            }
            AppEvent::FetchFailed { what, scope, reason } => {
                // Background polling failures keep the previous snapshot
                // and stay silent.
                if scope == RefreshScope::Foreground {
                    self.push_notice(
                        format!("Error loading {}: {}", what, reason),
                        NoticeKind::Error,
                    );
                }
            }
            AppEvent::TradeSettled { success, message } => {
                self.trade_guard.settle();
                let kind = if success {
                    NoticeKind::Success
                } else {
                    NoticeKind::Error
                };
                // The entered size is preserved either way.
                self.push_notice(message, kind);
            }
            AppEvent::CloseSettled {
                success, message, ..
            } => {
                self.close_busy = false;
                let kind = if success {
                    NoticeKind::Success
                } else {
                    NoticeKind::Error
                };
                // A failed close never removes rows locally; the list only
                // changes on the next successful fetch.
                self.push_notice(message, kind);
            }
            AppEvent::NetworkSwitched {
                network,
                success,
                message,
            } => {
                self.network_busy = false;
                if success {
                    if let Some(identity) = self.identity.as_mut() {
                        identity.network = network;
                    }
                    self.push_notice(message, NoticeKind::Success);
                } else {
                    self.push_notice(message, NoticeKind::Error);
                }
            }
            AppEvent::TradeCooldownOver => {
                self.trade_guard.release();
            }
            AppEvent::Notice { text, kind } => {
                self.push_notice(text, kind);
            }
        }
    }
}

fn format_step(value: f64) -> String {
    let s = format!("{:.6}", value);
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::account::Network;

    fn state() -> AppState {
        AppState::new(
            vec!["BTC".to_string(), "ETH".to_string(), "SOL".to_string()],
            Duration::from_millis(3000),
        )
    }

    fn position(name: &str) -> Position {
        Position {
            product_id: 1,
            product_name: name.to_string(),
            side: PositionSide::Long,
            amount: 1.0,
            entry_price: 100.0,
        }
    }

    #[test]
    fn empty_position_fetch_clears_stale_rows() {
        let mut s = state();
        s.apply(AppEvent::PositionsFetched(vec![
            position("BTC-PERP"),
            position("ETH-PERP"),
        ]));
        assert_eq!(s.positions.len(), 2);

        s.apply(AppEvent::PositionsFetched(Vec::new()));
        assert!(s.positions.is_empty());
    }

    #[test]
    fn replacing_positions_clamps_selection() {
        let mut s = state();
        s.apply(AppEvent::PositionsFetched(vec![
            position("A"),
            position("B"),
            position("C"),
        ]));
        s.select_position(2);
        assert_eq!(s.selected_position, 2);

        s.apply(AppEvent::PositionsFetched(vec![position("A")]));
        assert_eq!(s.selected_position, 0);
    }

    #[test]
    fn background_fetch_failure_is_silent() {
        let mut s = state();
        s.apply(AppEvent::FetchFailed {
            what: "prices",
            scope: RefreshScope::Background,
            reason: "timeout".to_string(),
        });
        assert!(s.notice().is_none());
    }

    #[test]
    fn foreground_fetch_failure_raises_notice() {
        let mut s = state();
        s.apply(AppEvent::FetchFailed {
            what: "positions",
            scope: RefreshScope::Foreground,
            reason: "timeout".to_string(),
        });
        let notice = s.notice().expect("notice");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.contains("positions"));
    }

    #[test]
    fn network_switch_updates_identity_badge_only_on_success() {
        let mut s = state();
        s.set_identity(Identity {
            user_ref: "u1".to_string(),
            network: Network::Testnet,
            is_new: false,
        });

        s.apply(AppEvent::NetworkSwitched {
            network: Network::Mainnet,
            success: false,
            message: "rejected".to_string(),
        });
        assert_eq!(s.identity.as_ref().unwrap().network, Network::Testnet);

        s.apply(AppEvent::NetworkSwitched {
            network: Network::Mainnet,
            success: true,
            message: "ok".to_string(),
        });
        assert_eq!(s.identity.as_ref().unwrap().network, Network::Mainnet);
    }

    #[test]
    fn trade_settlement_keeps_guard_until_cooldown_event() {
        let mut s = state();
        s.trade_guard.try_begin().unwrap();

        s.apply(AppEvent::TradeSettled {
            success: false,
            message: "insufficient margin".to_string(),
        });
        assert!(!s.trade_guard.is_idle());
        // Failed submission preserves the entered size.
        assert!(!s.selection.size_input.is_empty());

        s.apply(AppEvent::TradeCooldownOver);
        assert!(s.trade_guard.is_idle());
    }

    #[test]
    fn product_cycle_wraps_and_resets_size_step() {
        let mut s = state();
        assert_eq!(s.selection.product, "BTC");
        assert_eq!(s.selection.size_input, "0.001");
        s.cycle_product(-1);
        assert_eq!(s.selection.product, "SOL");
        assert_eq!(s.selection.size_input, "0.1");
        s.cycle_product(1);
        assert_eq!(s.selection.product, "BTC");
    }

    #[test]
    fn leverage_clamps_to_bounds() {
        let mut s = state();
        s.adjust_leverage(-5);
        assert_eq!(s.selection.leverage, 1);
        s.adjust_leverage(100);
        assert_eq!(s.selection.leverage, MAX_LEVERAGE);
    }

    #[test]
    fn size_adjustment_never_goes_negative() {
        let mut s = state();
        s.adjust_size(-10);
        assert_eq!(s.selection.size_input, "0");
        s.adjust_size(3);
        assert_eq!(s.selection.size_input, "0.003");
    }
}
