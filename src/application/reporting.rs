use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Shares};

/// Funds, invested value and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub cash: Cents,
    pub holdings_value: Cents,
    pub total_value: Cents,
}

/// One owned symbol with its market value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub name: String,
    pub quantity: Shares,
    pub price: Cents,
    pub value: Cents,
    /// Fraction of total value, between 0 and 1
    pub weight: f64,
}

impl Position {
    pub fn percentage(&self) -> f64 {
        self.weight * 100.0
    }
}

/// A catalog entry on the trading board, with what the session owns of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockListing {
    pub symbol: String,
    pub name: String,
    pub price: Cents,
    pub change_bps: i64,
    pub description: Option<String>,
    pub owned: Shares,
}

impl StockListing {
    pub fn is_gaining(&self) -> bool {
        self.change_bps >= 0
    }
}

/// Point-in-time view of the whole portfolio, used for rendering and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub as_of: DateTime<Utc>,
    pub cash: Cents,
    pub holdings_value: Cents,
    pub total_value: Cents,
    pub positions: Vec<Position>,
}

impl PortfolioReport {
    pub fn new(summary: PortfolioSummary, positions: Vec<Position>) -> Self {
        Self {
            as_of: Utc::now(),
            cash: summary.cash,
            holdings_value: summary.holdings_value,
            total_value: summary.total_value,
            positions,
        }
    }

    /// Fraction of total value held as cash.
    pub fn cash_weight(&self) -> f64 {
        if self.total_value == 0 {
            0.0
        } else {
            self.cash as f64 / self.total_value as f64
        }
    }
}
