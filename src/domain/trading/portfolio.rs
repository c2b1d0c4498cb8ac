use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: Decimal,
    pub average_price: Decimal,
    /// Last known mark price; `None` until the broker reports one.
    pub current_price: Option<Decimal>,
}

impl Position {
    pub fn new(symbol: impl Into<String>, quantity: Decimal, average_price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            average_price,
            current_price: None,
        }
    }

    pub fn cost_basis(&self) -> Decimal {
        self.quantity * self.average_price
    }

    /// Market value, falling back to cost basis when no mark price is known.
    pub fn market_value(&self) -> Decimal {
        match self.current_price {
            Some(price) => self.quantity * price,
            None => self.cost_basis(),
        }
    }

    pub fn unrealized_pnl(&self) -> Decimal {
        self.market_value() - self.cost_basis()
    }
}

/// Account state as reported by the broker gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub cash: Decimal,
    pub positions: HashMap<String, Position>,
}

impl PortfolioSnapshot {
    pub fn market_value(&self) -> Decimal {
        self.positions.values().map(Position::market_value).sum()
    }

    pub fn total_equity(&self) -> Decimal {
        self.cash + self.market_value()
    }

    pub fn unrealized_pnl(&self) -> Decimal {
        self.positions.values().map(Position::unrealized_pnl).sum()
    }
}
