use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AppError;
use crate::model::account::{Balance, Network, Wallet};
use crate::model::position::Position;
use crate::model::quote::PriceQuote;

use super::types::{
    ApiErrorResponse, BalanceResponse, CloseRequest, IdentityResponse, MutationOutcome,
    NetworkRequest, PositionsResponse, PricesResponse, ProductListResponse, TradeRequest,
    WalletResponse,
};

const IDENTITY_PROOF_HEADER: &str = "X-Identity-Proof";

/// HTTP client for the Nado trading service. Every request carries the
/// opaque identity-proof token supplied by the host environment; the
/// service treats a missing or invalid token as an authentication failure,
/// which surfaces here as a plain request failure.
pub struct NadoRestClient {
    http: reqwest::Client,
    base_url: String,
    identity_token: String,
}

impl NadoRestClient {
    pub fn new(base_url: &str, identity_token: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            identity_token: identity_token.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .header(IDENTITY_PROOF_HEADER, &self.identity_token)
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;
        Self::decode(resp).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .post(&url)
            .header(IDENTITY_PROOF_HEADER, &self.identity_token)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?;
        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_default();
            return Err(AppError::Api {
                status: status.as_u16(),
                reason,
            }
            .into());
        }
        let body = resp.text().await.map_err(AppError::Http)?;
        Ok(serde_json::from_str(&body).map_err(AppError::Json)?)
    }

    /// Instrument catalog, ordered as the service lists it.
    pub async fn get_products(&self) -> Result<Vec<String>> {
        let resp: ProductListResponse = self.get_json("/api/products").await?;
        Ok(resp.products.into_iter().map(|p| p.name).collect())
    }

    pub async fn get_identity(&self) -> Result<IdentityResponse> {
        self.get_json("/api/user").await
    }

    pub async fn get_balance(&self) -> Result<Balance> {
        let resp: BalanceResponse = self.get_json("/api/balance").await?;
        Ok(resp.into())
    }

    pub async fn get_prices(&self) -> Result<HashMap<String, PriceQuote>> {
        let resp: PricesResponse = self.get_json("/api/prices").await?;
        Ok(resp.into_quotes())
    }

    pub async fn get_positions(&self) -> Result<Vec<Position>> {
        let resp: PositionsResponse = self.get_json("/api/positions").await?;
        Ok(resp.positions.into_iter().map(Position::from).collect())
    }

    pub async fn get_wallet(&self) -> Result<Wallet> {
        let resp: WalletResponse = self.get_json("/api/wallet").await?;
        Ok(resp.into())
    }

    pub async fn place_market_order(&self, req: &TradeRequest) -> Result<MutationOutcome> {
        tracing::info!(
            product = %req.product,
            size = req.size,
            action = %req.action,
            leverage = req.leverage,
            "Placing market order"
        );
        let outcome: MutationOutcome = self.post_json("/api/trade", req).await?;
        tracing::info!(success = outcome.success, "Order response received");
        Ok(outcome)
    }

    pub async fn close_position(&self, req: &CloseRequest) -> Result<MutationOutcome> {
        match req {
            CloseRequest::One { product } => {
                tracing::info!(product = %product, "Closing position");
            }
            CloseRequest::All { .. } => {
                tracing::info!("Closing all positions");
            }
        }
        self.post_json("/api/close", req).await
    }

    pub async fn switch_network(&self, network: Network) -> Result<MutationOutcome> {
        tracing::info!(network = %network, "Switching network");
        self.post_json("/api/network", &NetworkRequest { network }).await
    }
}
