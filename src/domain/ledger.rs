use std::collections::HashMap;

use super::{Catalog, Cents};

/// Whole number of shares. Holdings are never negative.
pub type Shares = i64;

/// Cash and share holdings for one session.
///
/// Every mutation validates before it writes: a rejected order leaves the
/// state exactly as it was. Entries that drop to zero are removed, so an
/// absent symbol and a zero quantity mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerState {
    cash: Cents,
    holdings: HashMap<String, Shares>,
}

impl LedgerState {
    /// Start a session with the given funds and nothing owned.
    pub fn new(cash: Cents) -> Self {
        assert!(cash >= 0, "Starting cash must not be negative");
        Self {
            cash,
            holdings: HashMap::new(),
        }
    }

    pub fn cash(&self) -> Cents {
        self.cash
    }

    /// Quantity owned, 0 if none.
    pub fn shares(&self, symbol: &str) -> Shares {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    /// Owned (symbol, quantity) pairs, in no particular order.
    pub fn holdings(&self) -> impl Iterator<Item = (&str, Shares)> {
        self.holdings.iter().map(|(s, &q)| (s.as_str(), q))
    }

    /// Debit `quantity * price_cents` from cash and credit the shares.
    /// Returns the amount debited.
    pub fn buy(
        &mut self,
        symbol: &str,
        quantity: Shares,
        price_cents: Cents,
    ) -> Result<Cents, LedgerError> {
        debug_assert!(quantity > 0 && price_cents > 0);

        let cost = match quantity.checked_mul(price_cents) {
            Some(cost) if cost <= self.cash => cost,
            _ => {
                return Err(LedgerError::InsufficientFunds {
                    required: quantity.saturating_mul(price_cents),
                    available: self.cash,
                });
            }
        };

        self.cash -= cost;
        *self.holdings.entry(symbol.to_string()).or_insert(0) += quantity;
        Ok(cost)
    }

    /// Credit `quantity * price_cents` to cash and debit the shares.
    /// Returns the amount credited.
    pub fn sell(
        &mut self,
        symbol: &str,
        quantity: Shares,
        price_cents: Cents,
    ) -> Result<Cents, LedgerError> {
        debug_assert!(quantity > 0 && price_cents > 0);

        let owned = self.shares(symbol);
        if quantity > owned {
            return Err(LedgerError::InsufficientShares {
                symbol: symbol.to_string(),
                owned,
                requested: quantity,
            });
        }

        // Owned shares were bought at this same price, so the product fits.
        let proceeds = quantity * price_cents;
        self.cash += proceeds;
        if quantity == owned {
            self.holdings.remove(symbol);
        } else if let Some(entry) = self.holdings.get_mut(symbol) {
            *entry -= quantity;
        }
        Ok(proceeds)
    }
}

/// Market value of all owned shares at catalog prices.
/// Symbols missing from the catalog contribute nothing.
pub fn holdings_value(state: &LedgerState, catalog: &Catalog) -> Cents {
    state
        .holdings()
        .map(|(symbol, quantity)| catalog.price_of(symbol).unwrap_or(0) * quantity)
        .sum()
}

/// Cash plus the market value of all holdings.
pub fn total_value(state: &LedgerState, catalog: &Catalog) -> Cents {
    state.cash() + holdings_value(state, catalog)
}

/// Share of total value held in `symbol`, as a ratio between 0 and 1.
/// Defined as 0 when the total value is 0.
pub fn portfolio_weight(state: &LedgerState, catalog: &Catalog, symbol: &str) -> f64 {
    let total = total_value(state, catalog);
    if total == 0 {
        return 0.0;
    }
    let value = catalog.price_of(symbol).unwrap_or(0) * state.shares(symbol);
    value as f64 / total as f64
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    InsufficientFunds {
        required: Cents,
        available: Cents,
    },
    InsufficientShares {
        symbol: String,
        owned: Shares,
        requested: Shares,
    },
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::InsufficientFunds {
                required,
                available,
            } => write!(
                f,
                "Order costs {} cents but only {} cents are available",
                required, available
            ),
            LedgerError::InsufficientShares {
                symbol,
                owned,
                requested,
            } => write!(
                f,
                "Cannot sell {} shares of {}: only {} owned",
                requested, symbol, owned
            ),
        }
    }
}

impl std::error::Error for LedgerError {}
