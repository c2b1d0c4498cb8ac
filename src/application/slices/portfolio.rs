use super::Slice;
use crate::application::store::{Action, AsyncEvent, AsyncOperation, AsyncStatus};
use crate::domain::trading::portfolio::{PortfolioSnapshot, Position};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioState {
    pub snapshot: PortfolioSnapshot,
    pub last_synced: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub status: AsyncStatus,
}

impl PortfolioState {
    pub fn position_count(&self) -> usize {
        self.snapshot.positions.len()
    }

    pub fn total_equity(&self) -> Decimal {
        self.snapshot.total_equity()
    }
}

/// Broker snapshot stamped with the time it was received.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSync {
    pub snapshot: PortfolioSnapshot,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PortfolioAction {
    SetCash(Decimal),
    UpsertPosition(Position),
    RemovePosition(String),
    ClearError,
    RefreshPortfolio(AsyncEvent<PortfolioSync>),
}

impl PortfolioAction {
    pub fn kind(&self) -> &'static str {
        match self {
            PortfolioAction::SetCash(_) => "portfolio/set_cash",
            PortfolioAction::UpsertPosition(_) => "portfolio/upsert_position",
            PortfolioAction::RemovePosition(_) => "portfolio/remove_position",
            PortfolioAction::ClearError => "portfolio/clear_error",
            PortfolioAction::RefreshPortfolio(_) => RefreshPortfolio::NAME,
        }
    }
}

impl Slice for PortfolioState {
    const NAME: &'static str = "portfolio";
    type Action = PortfolioAction;

    fn reduce(&mut self, action: &PortfolioAction) {
        match action {
            PortfolioAction::SetCash(cash) => self.snapshot.cash = *cash,
            PortfolioAction::UpsertPosition(position) => {
                if position.quantity.is_zero() {
                    self.snapshot.positions.remove(&position.symbol);
                } else {
                    self.snapshot
                        .positions
                        .insert(position.symbol.clone(), position.clone());
                }
            }
            PortfolioAction::RemovePosition(symbol) => {
                self.snapshot.positions.remove(symbol);
            }
            PortfolioAction::ClearError => self.status.clear_error(),
            PortfolioAction::RefreshPortfolio(event) => {
                if let Some(sync) = self.status.apply(&event.phase) {
                    self.snapshot = sync.snapshot.clone();
                    self.last_synced = Some(sync.fetched_at);
                }
            }
        }
    }
}

pub struct RefreshPortfolio;

impl AsyncOperation for RefreshPortfolio {
    type Payload = PortfolioSync;
    const NAME: &'static str = "portfolio/refresh";
    const FALLBACK_REASON: &'static str = "Failed to refresh portfolio";

    fn into_action(event: AsyncEvent<PortfolioSync>) -> Action {
        Action::Portfolio(PortfolioAction::RefreshPortfolio(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::store::{AsyncPhase, RequestId};
    use rust_decimal_macros::dec;

    fn refresh(phase: AsyncPhase<PortfolioSync>) -> PortfolioAction {
        PortfolioAction::RefreshPortfolio(AsyncEvent {
            request_id: RequestId(1),
            phase,
        })
    }

    #[test]
    fn test_upsert_and_remove_positions() {
        let mut state = PortfolioState::default();
        state.reduce(&PortfolioAction::SetCash(dec!(5000)));
        state.reduce(&PortfolioAction::UpsertPosition(Position::new(
            "AAPL",
            dec!(10),
            dec!(150),
        )));
        state.reduce(&PortfolioAction::UpsertPosition(Position::new(
            "AAPL",
            dec!(12),
            dec!(155),
        )));

        assert_eq!(state.position_count(), 1);
        assert_eq!(state.snapshot.positions["AAPL"].quantity, dec!(12));
        assert_eq!(state.total_equity(), dec!(5000) + dec!(12) * dec!(155));

        state.reduce(&PortfolioAction::RemovePosition("AAPL".to_string()));
        assert_eq!(state.position_count(), 0);
    }

    #[test]
    fn test_zero_quantity_upsert_closes_position() {
        let mut state = PortfolioState::default();
        state.reduce(&PortfolioAction::UpsertPosition(Position::new(
            "TSLA",
            dec!(3),
            dec!(200),
        )));
        state.reduce(&PortfolioAction::UpsertPosition(Position::new(
            "TSLA",
            Decimal::ZERO,
            dec!(200),
        )));
        assert_eq!(state.position_count(), 0);
    }

    #[test]
    fn test_refresh_replaces_snapshot() {
        let mut state = PortfolioState::default();
        state.reduce(&PortfolioAction::UpsertPosition(Position::new(
            "OLD",
            dec!(1),
            dec!(1),
        )));

        let mut snapshot = PortfolioSnapshot {
            cash: dec!(2500),
            ..Default::default()
        };
        snapshot
            .positions
            .insert("NVDA".to_string(), Position::new("NVDA", dec!(4), dec!(500)));
        let fetched_at = Utc::now();

        state.reduce(&refresh(AsyncPhase::Pending));
        state.reduce(&refresh(AsyncPhase::Fulfilled(PortfolioSync {
            snapshot,
            fetched_at,
        })));

        assert!(!state.status.is_loading);
        assert_eq!(state.snapshot.cash, dec!(2500));
        assert!(state.snapshot.positions.contains_key("NVDA"));
        assert!(!state.snapshot.positions.contains_key("OLD"));
        assert_eq!(state.last_synced, Some(fetched_at));
    }

    #[test]
    fn test_refresh_rejected_keeps_snapshot() {
        let mut state = PortfolioState::default();
        state.reduce(&PortfolioAction::SetCash(dec!(100)));
        state.reduce(&refresh(AsyncPhase::Pending));
        state.reduce(&refresh(AsyncPhase::Rejected("HTTP 401: unauthorized".to_string())));

        assert_eq!(state.snapshot.cash, dec!(100));
        assert!(state.last_synced.is_none());
        assert_eq!(state.status.error.as_deref(), Some("HTTP 401: unauthorized"));
    }
}
