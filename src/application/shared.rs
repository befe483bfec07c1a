use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{Cents, Shares, Trade};

use super::{AppError, ExchangeService, PortfolioReport, PortfolioSummary, TradeReceipt};

/// Cloneable handle to one session for hosts that dispatch events concurrently.
///
/// Every call holds the lock for its whole read-validate-write step. Tokio's
/// mutex grants the lock in request order, so queued orders are applied one
/// at a time in arrival order.
#[derive(Clone)]
pub struct SharedExchange {
    inner: Arc<Mutex<ExchangeService>>,
}

impl SharedExchange {
    pub fn new(service: ExchangeService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    pub async fn quote(&self, symbol: &str) -> Result<Cents, AppError> {
        self.inner.lock().await.quote(symbol)
    }

    pub async fn buy(
        &self,
        symbol: &str,
        quantity: Shares,
    ) -> Result<Option<TradeReceipt>, AppError> {
        self.inner.lock().await.buy(symbol, quantity)
    }

    pub async fn sell(
        &self,
        symbol: &str,
        quantity: Shares,
    ) -> Result<Option<TradeReceipt>, AppError> {
        self.inner.lock().await.sell(symbol, quantity)
    }

    pub async fn holdings_value(&self) -> Cents {
        self.inner.lock().await.holdings_value()
    }

    pub async fn total_value(&self) -> Cents {
        self.inner.lock().await.total_value()
    }

    pub async fn portfolio_weight(&self, symbol: &str) -> Result<f64, AppError> {
        self.inner.lock().await.portfolio_weight(symbol)
    }

    pub async fn shares(&self, symbol: &str) -> Result<Shares, AppError> {
        self.inner.lock().await.shares(symbol)
    }

    pub async fn summary(&self) -> PortfolioSummary {
        self.inner.lock().await.summary()
    }

    pub async fn report(&self) -> PortfolioReport {
        self.inner.lock().await.report()
    }

    pub async fn trades(&self) -> Vec<Trade> {
        self.inner.lock().await.trades().to_vec()
    }

    /// Run several reads against one consistent state.
    pub async fn inspect<R>(&self, f: impl FnOnce(&ExchangeService) -> R) -> R {
        let service = self.inner.lock().await;
        f(&service)
    }
}
