// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use clubstock::application::{ExchangeService, SessionConfig};
use clubstock::domain::{Catalog, Cents, LedgerState, Shares, StockReference};

/// Helper to create a session over the built-in club catalog with $10,000.00
pub fn test_service() -> ExchangeService {
    ExchangeService::new(SessionConfig::default()).unwrap()
}

/// Helper to create a session with custom funds over the built-in catalog
pub fn test_service_with_cash(cash: Cents) -> ExchangeService {
    ExchangeService::new(SessionConfig::default().with_initial_cash(cash)).unwrap()
}

/// Session trading only LDC at 145.32, as in the worked scenarios
pub fn ldc_only_service() -> ExchangeService {
    let catalog = Catalog::new(vec![StockReference::new(
        "LDC",
        "Literary and Debating Club",
        14532,
    )])
    .unwrap();
    ExchangeService::new(SessionConfig::default().with_catalog(catalog)).unwrap()
}

/// Copy of the ledger, for before/after comparisons
pub fn snapshot(service: &ExchangeService) -> LedgerState {
    service.ledger().clone()
}

/// Holdings as a sorted list, for readable assertions
pub fn holdings(service: &ExchangeService) -> Vec<(String, Shares)> {
    let mut list: Vec<(String, Shares)> = service
        .ledger()
        .holdings()
        .map(|(s, q)| (s.to_string(), q))
        .collect();
    list.sort();
    list
}

/// Assert the ledger invariants: non-negative cash and holdings
pub fn assert_invariants(service: &ExchangeService) {
    assert!(service.cash() >= 0, "cash went negative: {}", service.cash());
    for (symbol, quantity) in service.ledger().holdings() {
        assert!(quantity >= 0, "{} holding went negative: {}", symbol, quantity);
    }
}
