use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, Shares};

pub type TradeId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Cash is exchanged for shares
    Buy,
    /// Shares are exchanged for cash
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An executed order. Trades are immutable and only exist for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub side: Side,
    pub symbol: String,
    /// Number of shares (always positive)
    pub quantity: Shares,
    /// Price per share in cents at execution
    pub price_cents: Cents,
    /// quantity * price_cents
    pub amount_cents: Cents,
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    pub fn new(side: Side, symbol: impl Into<String>, quantity: Shares, price_cents: Cents) -> Self {
        assert!(quantity > 0, "Trade quantity must be positive");
        Self {
            id: Uuid::new_v4(),
            side,
            symbol: symbol.into(),
            quantity,
            price_cents,
            amount_cents: quantity * price_cents,
            executed_at: Utc::now(),
        }
    }

    /// Signed effect on cash: negative for buys, positive for sells.
    pub fn cash_delta(&self) -> Cents {
        match self.side {
            Side::Buy => -self.amount_cents,
            Side::Sell => self.amount_cents,
        }
    }
}
