use std::collections::HashMap;

use crate::model::account::{Balance, Network, Wallet};
use crate::model::position::Position;
use crate::model::quote::PriceQuote;

/// Whether a refresh was triggered by a background timer or by a foreground
/// action (tab activation, explicit reload). Background failures are
/// swallowed; foreground failures surface a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshScope {
    Background,
    Foreground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Events applied to the state store by the event loop. Fetched snapshots
/// are whole field-group replacements; responses may arrive in any order
/// relative to each other (last-write-wins).
#[derive(Debug, Clone)]
pub enum AppEvent {
    PricesFetched(HashMap<String, PriceQuote>),
    PositionsFetched(Vec<Position>),
    BalanceFetched(Balance),
    WalletFetched(Wallet),
    FetchFailed {
        what: &'static str,
        scope: RefreshScope,
        reason: String,
    },
    TradeSettled {
        success: bool,
        message: String,
    },
    CloseSettled {
        success: bool,
        message: String,
        closed_all: bool,
    },
    NetworkSwitched {
        network: Network,
        success: bool,
        message: String,
    },
    /// Fired one cool-down after trade settlement; returns the trade guard
    /// to idle.
    TradeCooldownOver,
    Notice {
        text: String,
        kind: NoticeKind,
    },
}
