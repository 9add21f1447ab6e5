//! Sync scheduler: keeps prices and positions fresh without unbounded
//! request growth. Two named repeating tasks plus on-demand refresh plans
//! tied to tab activation and post-mutation invalidation. Fetch results are
//! applied to the store by the event loop; responses arriving after a tab
//! switch are still applied (last-write-wins) and simply not drawn.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::NadoRestClient;
use crate::event::{AppEvent, RefreshScope};
use crate::state::Tab;

/// Fallback instrument catalog. Load-bearing: every other component
/// depends on a non-empty instrument list, so a failed catalog fetch at
/// startup must still yield a usable selection.
pub const DEFAULT_PRODUCTS: [&str; 8] = ["BTC", "ETH", "SOL", "XRP", "BNB", "LINK", "DOGE", "AVAX"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshTask {
    Prices,
    Positions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Prices,
    Positions,
    Balance,
    Wallet,
}

impl FetchKind {
    fn label(&self) -> &'static str {
        match self {
            FetchKind::Prices => "prices",
            FetchKind::Positions => "positions",
            FetchKind::Balance => "balance",
            FetchKind::Wallet => "wallet",
        }
    }
}

/// Run one fetch and report the snapshot back to the event loop. Background
/// failures are swallowed (previous snapshot stays); foreground failures
/// surface as a transient notice.
pub fn spawn_fetch(
    api: Arc<NadoRestClient>,
    tx: mpsc::Sender<AppEvent>,
    kind: FetchKind,
    scope: RefreshScope,
) {
    tokio::spawn(async move {
        let result: Result<AppEvent> = match kind {
            FetchKind::Prices => api.get_prices().await.map(AppEvent::PricesFetched),
            FetchKind::Positions => api.get_positions().await.map(AppEvent::PositionsFetched),
            FetchKind::Balance => api.get_balance().await.map(AppEvent::BalanceFetched),
            FetchKind::Wallet => api.get_wallet().await.map(AppEvent::WalletFetched),
        };
        match result {
            Ok(event) => {
                let _ = tx.send(event).await;
            }
            Err(e) => {
                tracing::debug!(what = kind.label(), error = %e, "Refresh failed");
                if scope == RefreshScope::Foreground {
                    let _ = tx
                        .send(AppEvent::FetchFailed {
                            what: kind.label(),
                            scope,
                            reason: e
                                .downcast_ref::<crate::error::AppError>()
                                .map(crate::error::AppError::user_reason)
                                .unwrap_or_else(|| "Request failed".to_string()),
                        })
                        .await;
                }
            }
        }
    });
}

/// Data a tab needs before its first render. Dashboard wants the full
/// summary; the other tabs only their own group.
pub fn fetch_plan(tab: Tab) -> &'static [FetchKind] {
    match tab {
        Tab::Dashboard => &[FetchKind::Balance, FetchKind::Prices, FetchKind::Positions],
        Tab::Trade => &[FetchKind::Prices],
        Tab::Positions => &[FetchKind::Positions],
        Tab::Wallet => &[FetchKind::Wallet],
    }
}

/// Foreground refresh of everything a tab depends on; the fetches are
/// independent, not sequential.
pub fn spawn_tab_refresh(api: &Arc<NadoRestClient>, tx: &mpsc::Sender<AppEvent>, tab: Tab) {
    for kind in fetch_plan(tab) {
        spawn_fetch(api.clone(), tx.clone(), *kind, RefreshScope::Foreground);
    }
}

/// Owns the named repeating refresh tasks. Each task is independently
/// cancellable and restartable; what triggers a refresh is decoupled from
/// what the refresh does.
pub struct Scheduler {
    api: Arc<NadoRestClient>,
    tx: mpsc::Sender<AppEvent>,
    tasks: HashMap<RefreshTask, JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(api: Arc<NadoRestClient>, tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            api,
            tx,
            tasks: HashMap::new(),
        }
    }

    /// (Re)start a named task with the given period. The first fetch fires
    /// one period from now; tab activation covers the immediate need.
    pub fn start(&mut self, task: RefreshTask, period: Duration) {
        self.cancel(task);
        let kind = match task {
            RefreshTask::Prices => FetchKind::Prices,
            RefreshTask::Positions => FetchKind::Positions,
        };
        let api = self.api.clone();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                spawn_fetch(api.clone(), tx.clone(), kind, RefreshScope::Background);
            }
        });
        self.tasks.insert(task, handle);
        tracing::debug!(?task, period_secs = period.as_secs(), "Refresh task started");
    }

    pub fn cancel(&mut self, task: RefreshTask) {
        if let Some(handle) = self.tasks.remove(&task) {
            handle.abort();
            tracing::debug!(?task, "Refresh task cancelled");
        }
    }

    pub fn stop_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop_all();
    }
}

/// Instrument catalog with the hardcoded fallback applied. Any failure or
/// an empty listing falls back to the default set.
pub fn catalog_or_default(fetched: Result<Vec<String>>) -> Vec<String> {
    match fetched {
        Ok(products) if !products.is_empty() => products,
        Ok(_) => {
            tracing::warn!("Catalog fetch returned no products, using default list");
            DEFAULT_PRODUCTS.iter().map(|s| s.to_string()).collect()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Catalog fetch failed, using default list");
            DEFAULT_PRODUCTS.iter().map(|s| s.to_string()).collect()
        }
    }
}
