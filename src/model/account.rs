use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Testnet => write!(f, "testnet"),
            Network::Mainnet => write!(f, "mainnet"),
        }
    }
}

/// Resolved on first load. Immutable afterwards except `network`, which is
/// updated only by a confirmed network-switch mutation.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_ref: String,
    pub network: Network,
    pub is_new: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance {
    pub exists: bool,
    pub usdt_balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wallet {
    pub active_address: String,
    pub network: Network,
}
