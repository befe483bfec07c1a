use log::{debug, info, warn};

use crate::domain::{
    Catalog, Cents, DEFAULT_INITIAL_CASH, LedgerState, Shares, Side, StockReference, Trade,
    format_cents, holdings_value, portfolio_weight, total_value,
};

use super::{AppError, PortfolioReport, PortfolioSummary, Position, StockListing};

/// Startup input for a trading session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub initial_cash: Cents,
    pub catalog: Catalog,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_cash: DEFAULT_INITIAL_CASH,
            catalog: Catalog::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_initial_cash(mut self, initial_cash: Cents) -> Self {
        self.initial_cash = initial_cash;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }
}

/// Application service owning the session's ledger.
/// This is the only way presentation code reads or changes cash and holdings.
pub struct ExchangeService {
    catalog: Catalog,
    ledger: LedgerState,
    trades: Vec<Trade>,
}

/// Confirmation of an executed order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeReceipt {
    pub trade: Trade,
    pub cash: Cents,
    pub shares: Shares,
}

impl ExchangeService {
    /// Open a session with the given starting funds and reference table.
    pub fn new(config: SessionConfig) -> Result<Self, AppError> {
        if config.initial_cash < 0 {
            return Err(AppError::InvalidAmount(
                "Starting cash must not be negative".to_string(),
            ));
        }

        info!(
            "Opened session with {} cash and {} listed stocks",
            format_cents(config.initial_cash),
            config.catalog.len()
        );

        Ok(Self {
            catalog: config.catalog,
            ledger: LedgerState::new(config.initial_cash),
            trades: Vec::new(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &LedgerState {
        &self.ledger
    }

    fn stock(&self, symbol: &str) -> Result<&StockReference, AppError> {
        self.catalog
            .get(symbol)
            .ok_or_else(|| AppError::UnknownSymbol(symbol.to_string()))
    }

    fn ensure_listed(&self, symbol: &str) -> Result<(), AppError> {
        if !self.catalog.contains(symbol) {
            return Err(AppError::UnknownSymbol(symbol.to_string()));
        }
        Ok(())
    }

    // ========================
    // Trading operations
    // ========================

    /// Current price of a symbol.
    pub fn quote(&self, symbol: &str) -> Result<Cents, AppError> {
        Ok(self.stock(symbol)?.price_cents)
    }

    /// Buy shares at the quoted price.
    /// A non-positive quantity is ignored and returns `Ok(None)`.
    pub fn buy(&mut self, symbol: &str, quantity: Shares) -> Result<Option<TradeReceipt>, AppError> {
        self.execute(Side::Buy, symbol, quantity)
    }

    /// Sell owned shares at the quoted price.
    /// A non-positive quantity is ignored and returns `Ok(None)`.
    pub fn sell(
        &mut self,
        symbol: &str,
        quantity: Shares,
    ) -> Result<Option<TradeReceipt>, AppError> {
        self.execute(Side::Sell, symbol, quantity)
    }

    fn execute(
        &mut self,
        side: Side,
        symbol: &str,
        quantity: Shares,
    ) -> Result<Option<TradeReceipt>, AppError> {
        let price = self.quote(symbol)?;

        if quantity <= 0 {
            debug!("Ignored {} of {} {}", side, quantity, symbol);
            return Ok(None);
        }

        let result = match side {
            Side::Buy => self.ledger.buy(symbol, quantity, price),
            Side::Sell => self.ledger.sell(symbol, quantity, price),
        };
        if let Err(e) = result {
            warn!("Rejected {} {} {}: {}", side, quantity, symbol, e);
            return Err(e.into());
        }

        let trade = Trade::new(side, symbol, quantity, price);
        info!(
            "Executed {} {} {} @ {} ({} cash left)",
            side,
            quantity,
            symbol,
            format_cents(price),
            format_cents(self.ledger.cash())
        );
        self.trades.push(trade.clone());

        Ok(Some(TradeReceipt {
            trade,
            cash: self.ledger.cash(),
            shares: self.ledger.shares(symbol),
        }))
    }

    // ========================
    // Valuation queries
    // ========================

    /// Uninvested funds.
    pub fn cash(&self) -> Cents {
        self.ledger.cash()
    }

    /// Quantity of a listed symbol currently owned.
    pub fn shares(&self, symbol: &str) -> Result<Shares, AppError> {
        self.ensure_listed(symbol)?;
        Ok(self.ledger.shares(symbol))
    }

    /// Market value of everything owned.
    pub fn holdings_value(&self) -> Cents {
        holdings_value(&self.ledger, &self.catalog)
    }

    /// Cash plus holdings value.
    pub fn total_value(&self) -> Cents {
        total_value(&self.ledger, &self.catalog)
    }

    /// Fraction of total value held in `symbol`, 0 when the total is 0.
    pub fn portfolio_weight(&self, symbol: &str) -> Result<f64, AppError> {
        self.ensure_listed(symbol)?;
        Ok(portfolio_weight(&self.ledger, &self.catalog, symbol))
    }

    /// Largest quantity of `symbol` that current funds can pay for.
    pub fn max_affordable(&self, symbol: &str) -> Result<Shares, AppError> {
        let price = self.quote(symbol)?;
        Ok(self.ledger.cash() / price)
    }

    pub fn summary(&self) -> PortfolioSummary {
        let holdings_value = self.holdings_value();
        PortfolioSummary {
            cash: self.ledger.cash(),
            holdings_value,
            total_value: self.ledger.cash() + holdings_value,
        }
    }

    /// Every listed stock in catalog order, with the quantity owned.
    pub fn stocks(&self) -> Vec<StockListing> {
        self.catalog
            .iter()
            .map(|stock| StockListing {
                symbol: stock.symbol.clone(),
                name: stock.name.clone(),
                price: stock.price_cents,
                change_bps: stock.change_bps,
                description: stock.description.clone(),
                owned: self.ledger.shares(&stock.symbol),
            })
            .collect()
    }

    /// Owned symbols only, in catalog order.
    pub fn positions(&self) -> Vec<Position> {
        let total = self.total_value();

        self.catalog
            .iter()
            .filter_map(|stock| {
                let quantity = self.ledger.shares(&stock.symbol);
                if quantity <= 0 {
                    return None;
                }
                let value = quantity * stock.price_cents;
                let weight = if total == 0 {
                    0.0
                } else {
                    value as f64 / total as f64
                };
                Some(Position {
                    symbol: stock.symbol.clone(),
                    name: stock.name.clone(),
                    quantity,
                    price: stock.price_cents,
                    value,
                    weight,
                })
            })
            .collect()
    }

    pub fn report(&self) -> PortfolioReport {
        PortfolioReport::new(self.summary(), self.positions())
    }

    /// Executed trades, oldest first.
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }
}
