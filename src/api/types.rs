use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::account::{Balance, Identity, Network, Wallet};
use crate::model::position::{Position, PositionSide};
use crate::model::quote::PriceQuote;

#[derive(Debug, Clone, Deserialize)]
pub struct ProductEntry {
    pub name: String,
    pub id: u64,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityResponse {
    pub user_ref: String,
    pub network: Network,
    pub is_new: bool,
    /// Present only on first provisioning; shown once, never stored.
    #[serde(default)]
    pub mnemonic: Option<String>,
}

impl IdentityResponse {
    pub fn into_identity(self) -> (Identity, Option<String>) {
        let identity = Identity {
            user_ref: self.user_ref,
            network: self.network,
            is_new: self.is_new,
        };
        (identity, self.mnemonic)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    pub exists: bool,
    #[serde(default)]
    pub usdt_balance: f64,
}

impl From<BalanceResponse> for Balance {
    fn from(resp: BalanceResponse) -> Self {
        Balance {
            exists: resp.exists,
            usdt_balance: resp.usdt_balance,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QuoteEntry {
    pub bid: f64,
    pub ask: f64,
    pub mid: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricesResponse {
    pub prices: HashMap<String, QuoteEntry>,
}

impl PricesResponse {
    pub fn into_quotes(self) -> HashMap<String, PriceQuote> {
        self.prices
            .into_iter()
            .map(|(name, q)| {
                (
                    name,
                    PriceQuote {
                        bid: q.bid,
                        ask: q.ask,
                        mid: q.mid,
                    },
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionEntry {
    pub product_id: u64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub side: PositionSide,
    pub amount: f64,
    /// Entry price; the service names this field `price`.
    pub price: f64,
}

impl From<PositionEntry> for Position {
    fn from(entry: PositionEntry) -> Self {
        let product_name = entry
            .product_name
            .unwrap_or_else(|| format!("ID:{}", entry.product_id));
        Position {
            product_id: entry.product_id,
            product_name,
            side: entry.side,
            amount: entry.amount,
            entry_price: entry.price,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionsResponse {
    pub positions: Vec<PositionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletResponse {
    pub active_address: String,
    pub network: Network,
}

impl From<WalletResponse> for Wallet {
    fn from(resp: WalletResponse) -> Self {
        Wallet {
            active_address: resp.active_address,
            network: resp.network,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeRequest {
    pub product: String,
    pub size: f64,
    pub action: String,
    pub leverage: u32,
    pub order_type: String,
}

impl TradeRequest {
    pub fn market(product: &str, size: f64, side: PositionSide, leverage: u32) -> Self {
        Self {
            product: product.to_string(),
            size,
            action: side.to_string(),
            leverage,
            order_type: "market".to_string(),
        }
    }
}

/// Close request shapes are mutually exclusive by construction: a request
/// carries either one product or the close-all flag, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CloseRequest {
    One { product: String },
    All { close_all: bool },
}

impl CloseRequest {
    pub fn one(product: &str) -> Self {
        CloseRequest::One {
            product: product.to_string(),
        }
    }

    pub fn all() -> Self {
        CloseRequest::All { close_all: true }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkRequest {
    pub network: Network,
}

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MutationOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}
