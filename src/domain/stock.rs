use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Cents;

/// A club stock as listed on the exchange board.
/// Prices never move during a session; `change_bps` is display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReference {
    pub symbol: String,
    pub name: String,
    /// Price per share in cents (always positive)
    pub price_cents: Cents,
    /// Daily change shown next to the price, in basis points (123 = +1.23%)
    pub change_bps: i64,
    pub description: Option<String>,
}

impl StockReference {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, price_cents: Cents) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price_cents,
            change_bps: 0,
            description: None,
        }
    }

    pub fn with_change_bps(mut self, change_bps: i64) -> Self {
        self.change_bps = change_bps;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The fixed reference table of tradable stocks.
/// Symbols are unique and the table never changes once built.
#[derive(Debug, Clone)]
pub struct Catalog {
    stocks: Vec<StockReference>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting empty or duplicate symbols and non-positive prices.
    pub fn new(stocks: Vec<StockReference>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(stocks.len());

        for (position, stock) in stocks.iter().enumerate() {
            if stock.symbol.trim().is_empty() {
                return Err(CatalogError::EmptySymbol { position });
            }
            if stock.price_cents <= 0 {
                return Err(CatalogError::InvalidPrice {
                    symbol: stock.symbol.clone(),
                    price_cents: stock.price_cents,
                });
            }
            if index.insert(stock.symbol.clone(), position).is_some() {
                return Err(CatalogError::DuplicateSymbol(stock.symbol.clone()));
            }
        }

        Ok(Self { stocks, index })
    }

    pub fn get(&self, symbol: &str) -> Option<&StockReference> {
        self.index.get(symbol).map(|&i| &self.stocks[i])
    }

    pub fn price_of(&self, symbol: &str) -> Option<Cents> {
        self.get(symbol).map(|s| s.price_cents)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// Stocks in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &StockReference> {
        self.stocks.iter()
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }
}

impl Default for Catalog {
    /// The five campus clubs listed on the exchange.
    fn default() -> Self {
        let stocks = vec![
            StockReference::new("LDC", "Literary and Debating Club", 14532)
                .with_change_bps(123)
                .with_description(
                    "The premier club for public speaking and literary activities on campus.",
                ),
            StockReference::new("180DC", "180 Degrees Consulting", 8745)
                .with_change_bps(-56)
                .with_description(
                    "Student-run consulting group providing pro-bono services to nonprofits.",
                ),
            StockReference::new("BC", "Business Club", 21089)
                .with_change_bps(321)
                .with_description("Networking and skill-building for future business leaders."),
            StockReference::new("MC", "Music Club", 6578)
                .with_change_bps(89)
                .with_description("For musicians and music lovers to collaborate and perform."),
            StockReference::new("RC", "Robotics Club", 12050)
                .with_change_bps(234)
                .with_description(
                    "Building innovative robotics projects and competing nationally.",
                ),
        ];

        Self::new(stocks).expect("built-in club catalog must be valid")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    EmptySymbol { position: usize },
    DuplicateSymbol(String),
    InvalidPrice { symbol: String, price_cents: Cents },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::EmptySymbol { position } => {
                write!(f, "Stock #{} has an empty symbol", position + 1)
            }
            CatalogError::DuplicateSymbol(symbol) => {
                write!(f, "Symbol {} is listed more than once", symbol)
            }
            CatalogError::InvalidPrice {
                symbol,
                price_cents,
            } => write!(
                f,
                "Stock {} must have a positive price (got {} cents)",
                symbol, price_cents
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_lists_five_clubs_in_order() {
        let catalog = Catalog::default();
        let symbols: Vec<&str> = catalog.iter().map(|s| s.symbol.as_str()).collect();

        assert_eq!(symbols, vec!["LDC", "180DC", "BC", "MC", "RC"]);
        assert_eq!(catalog.price_of("LDC"), Some(14532));
        assert_eq!(catalog.price_of("RC"), Some(12050));
    }

    #[test]
    fn test_default_catalog_passes_validation() {
        let catalog = Catalog::default();
        let stocks: Vec<StockReference> = catalog.iter().cloned().collect();
        let rebuilt = Catalog::new(stocks).unwrap();

        for stock in catalog.iter() {
            assert_eq!(rebuilt.get(&stock.symbol), Some(stock));
        }
        assert!(catalog.get("180DC").is_some());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let catalog = Catalog::default();
        assert!(catalog.contains("BC"));
        assert!(!catalog.contains("bc"));
        assert!(catalog.get("XYZ").is_none());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let result = Catalog::new(vec![
            StockReference::new("MC", "Music Club", 6578),
            StockReference::new("MC", "Maths Club", 5000),
        ]);
        assert_eq!(result.unwrap_err(), CatalogError::DuplicateSymbol("MC".into()));
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let result = Catalog::new(vec![StockReference::new("RC", "Robotics Club", 0)]);
        assert!(matches!(result, Err(CatalogError::InvalidPrice { .. })));
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let result = Catalog::new(vec![StockReference::new("  ", "Nameless", 100)]);
        assert_eq!(result.unwrap_err(), CatalogError::EmptySymbol { position: 0 });
    }
}
