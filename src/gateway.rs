//! Mutation gateway: serializes user-initiated account mutations against the
//! service. Trade submission runs through an explicit state machine so the
//! in-flight rejection and post-settlement cool-down are transitions, not
//! timing assumptions. Close and network switch are single-shot, guarded
//! only by the UI busy indicator.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::types::{CloseRequest, TradeRequest};
use crate::api::NadoRestClient;
use crate::error::AppError;
use crate::event::AppEvent;
use crate::model::account::Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradePhase {
    #[default]
    Idle,
    Submitting,
    CoolingDown,
}

/// Guard for the trade-submission mutation class. At most one submission is
/// outstanding at a time; the guard is taken before the network call begins
/// and released only after settlement plus a cool-down, closing the race
/// where a duplicate tap lands during the settlement render frame.
#[derive(Debug, Default)]
pub struct TradeGuard {
    phase: TradePhase,
}

impl TradeGuard {
    pub fn phase(&self) -> TradePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == TradePhase::Idle
    }

    /// Take the guard for a new submission. Rejects locally, with no
    /// network call, while a previous submission is in flight or cooling
    /// down.
    pub fn try_begin(&mut self) -> Result<(), AppError> {
        match self.phase {
            TradePhase::Idle => {
                self.phase = TradePhase::Submitting;
                Ok(())
            }
            TradePhase::Submitting | TradePhase::CoolingDown => Err(AppError::Validation(
                "Order already in flight".to_string(),
            )),
        }
    }

    /// The request settled (success or failure). The guard stays taken
    /// until the cool-down elapses.
    pub fn settle(&mut self) {
        if self.phase == TradePhase::Submitting {
            self.phase = TradePhase::CoolingDown;
        }
    }

    /// Cool-down elapsed; the guard is free again.
    pub fn release(&mut self) {
        if self.phase == TradePhase::CoolingDown {
            self.phase = TradePhase::Idle;
        }
    }
}

/// Validate the entered order size before any network call. Only finite,
/// strictly positive sizes pass.
pub fn validate_size(input: &str) -> Result<f64, AppError> {
    let size: f64 = input
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Enter a valid size".to_string()))?;
    if !size.is_finite() || size <= 0.0 {
        return Err(AppError::Validation("Enter a valid size".to_string()));
    }
    Ok(size)
}

/// Issue the order request and report the settlement back to the event
/// loop. The caller has already taken the trade guard.
pub fn spawn_trade(api: Arc<NadoRestClient>, tx: mpsc::Sender<AppEvent>, request: TradeRequest) {
    tokio::spawn(async move {
        let event = match api.place_market_order(&request).await {
            Ok(outcome) if outcome.success => AppEvent::TradeSettled {
                success: true,
                message: "Trade executed successfully".to_string(),
            },
            Ok(outcome) => AppEvent::TradeSettled {
                success: false,
                message: outcome
                    .error
                    .or(outcome.message)
                    .unwrap_or_else(|| "Trade rejected".to_string()),
            },
            Err(e) => AppEvent::TradeSettled {
                success: false,
                message: reason_of(&e),
            },
        };
        let _ = tx.send(event).await;
    });
}

/// Schedule the guard release one cool-down after settlement.
pub fn spawn_cooldown(tx: mpsc::Sender<AppEvent>, cooldown: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(cooldown).await;
        let _ = tx.send(AppEvent::TradeCooldownOver).await;
    });
}

/// Close one instrument's position or all positions. The request shape is
/// mutually exclusive by construction (see `CloseRequest`).
pub fn spawn_close(api: Arc<NadoRestClient>, tx: mpsc::Sender<AppEvent>, request: CloseRequest) {
    let closed_all = matches!(request, CloseRequest::All { .. });
    tokio::spawn(async move {
        let event = match api.close_position(&request).await {
            Ok(outcome) if outcome.success => AppEvent::CloseSettled {
                success: true,
                message: if closed_all {
                    "All positions closed".to_string()
                } else {
                    "Position closed".to_string()
                },
                closed_all,
            },
            Ok(outcome) => AppEvent::CloseSettled {
                success: false,
                message: outcome
                    .error
                    .or(outcome.message)
                    .unwrap_or_else(|| "Close rejected".to_string()),
                closed_all,
            },
            Err(e) => AppEvent::CloseSettled {
                success: false,
                message: reason_of(&e),
                closed_all,
            },
        };
        let _ = tx.send(event).await;
    });
}

pub fn spawn_network_switch(
    api: Arc<NadoRestClient>,
    tx: mpsc::Sender<AppEvent>,
    network: Network,
) {
    tokio::spawn(async move {
        let event = match api.switch_network(network).await {
            Ok(outcome) if outcome.success => AppEvent::NetworkSwitched {
                network,
                success: true,
                message: format!("Switched to {}", network),
            },
            Ok(outcome) => AppEvent::NetworkSwitched {
                network,
                success: false,
                message: outcome
                    .error
                    .or(outcome.message)
                    .unwrap_or_else(|| "Network switch rejected".to_string()),
            },
            Err(e) => AppEvent::NetworkSwitched {
                network,
                success: false,
                message: reason_of(&e),
            },
        };
        let _ = tx.send(event).await;
    });
}

fn reason_of(e: &anyhow::Error) -> String {
    e.downcast_ref::<AppError>()
        .map(AppError::user_reason)
        .unwrap_or_else(|| "Request failed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_allows_one_submission_at_a_time() {
        let mut guard = TradeGuard::default();
        assert!(guard.try_begin().is_ok());
        assert!(guard.try_begin().is_err());
    }

    #[test]
    fn guard_stays_taken_through_cooldown() {
        let mut guard = TradeGuard::default();
        guard.try_begin().unwrap();
        guard.settle();
        assert_eq!(guard.phase(), TradePhase::CoolingDown);
        // Re-tap during the cool-down window is still rejected.
        assert!(guard.try_begin().is_err());
        guard.release();
        assert!(guard.is_idle());
        assert!(guard.try_begin().is_ok());
    }

    #[test]
    fn release_before_settle_is_a_no_op() {
        let mut guard = TradeGuard::default();
        guard.try_begin().unwrap();
        guard.release();
        assert_eq!(guard.phase(), TradePhase::Submitting);
    }

    #[test]
    fn size_validation_rejects_non_positive_and_garbage() {
        assert!(validate_size("0").is_err());
        assert!(validate_size("-1.5").is_err());
        assert!(validate_size("abc").is_err());
        assert!(validate_size("").is_err());
        assert!(validate_size("inf").is_err());
        assert!(validate_size("NaN").is_err());
    }

    #[test]
    fn size_validation_accepts_finite_positive() {
        assert!((validate_size("0.001").unwrap() - 0.001).abs() < f64::EPSILON);
        assert!((validate_size(" 2.5 ").unwrap() - 2.5).abs() < f64::EPSILON);
    }
}
