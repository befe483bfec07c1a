use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::domain::{Catalog, StockReference, parse_cents};

/// One stock as written in a catalog file. Prices are decimal strings ("145.32").
#[derive(Debug, Clone, Deserialize)]
struct CatalogRow {
    symbol: String,
    name: String,
    price: String,
    #[serde(default)]
    change: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl CatalogRow {
    fn into_stock(self) -> Result<StockReference> {
        let price_cents = parse_cents(&self.price)
            .with_context(|| format!("Invalid price '{}' for {}", self.price, self.symbol))?;

        let mut stock = StockReference::new(self.symbol.trim(), self.name.trim(), price_cents);

        if let Some(change) = self.change.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            // Gains may be written with an explicit sign ("+1.23")
            let unsigned = change
                .strip_prefix('+')
                .filter(|c| !c.starts_with('-'))
                .unwrap_or(change);
            let change_bps = parse_cents(unsigned).with_context(|| {
                format!("Invalid change '{}' for {}", change, stock.symbol)
            })?;
            stock = stock.with_change_bps(change_bps);
        }
        if let Some(desc) = self.description.filter(|d| !d.trim().is_empty()) {
            stock = stock.with_description(desc);
        }

        Ok(stock)
    }
}

/// JSON amounts may be decimal strings ("145.32") or plain numbers (145.32).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum JsonAmount {
    Text(String),
    Number(serde_json::Number),
}

impl From<JsonAmount> for String {
    fn from(amount: JsonAmount) -> Self {
        match amount {
            JsonAmount::Text(text) => text,
            JsonAmount::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct JsonCatalogRow {
    symbol: String,
    name: String,
    price: JsonAmount,
    #[serde(default)]
    change: Option<JsonAmount>,
    #[serde(default)]
    description: Option<String>,
}

impl From<JsonCatalogRow> for CatalogRow {
    fn from(row: JsonCatalogRow) -> Self {
        Self {
            symbol: row.symbol,
            name: row.name,
            price: row.price.into(),
            change: row.change.map(String::from),
            description: row.description,
        }
    }
}

/// Load a catalog from CSV with header `symbol,name,price,change,description`.
pub fn read_catalog_csv<R: Read>(reader: R) -> Result<Catalog> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut stocks = Vec::new();

    for (line_num, result) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let line = line_num + 2; // +2 for header and 0-indexing
        let row = result.with_context(|| format!("Line {}: malformed catalog row", line))?;
        let stock = row
            .into_stock()
            .with_context(|| format!("Line {}: invalid stock", line))?;
        stocks.push(stock);
    }

    Ok(Catalog::new(stocks)?)
}

/// Load a catalog from a JSON array of stock objects.
pub fn read_catalog_json<R: Read>(reader: R) -> Result<Catalog> {
    let rows: Vec<JsonCatalogRow> =
        serde_json::from_reader(reader).context("Malformed catalog JSON")?;

    let stocks = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            CatalogRow::from(row)
                .into_stock()
                .with_context(|| format!("Entry {}: invalid stock", i + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Catalog::new(stocks)?)
}

/// Load a catalog file, choosing the format from its extension.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open catalog file: {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let catalog = match extension.as_deref() {
        Some("csv") => read_catalog_csv(file),
        Some("json") => read_catalog_json(file),
        _ => bail!(
            "Unsupported catalog format '{}'. Use a .csv or .json file",
            path.display()
        ),
    }
    .with_context(|| format!("Failed to load catalog from {}", path.display()))?;

    if catalog.is_empty() {
        bail!("Catalog {} lists no stocks", path.display());
    }

    log::debug!(
        "Loaded {} stocks from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv() {
        let data = "\
symbol,name,price,change,description
LDC,Literary and Debating Club,145.32,1.23,Public speaking
180DC,180 Degrees Consulting,87.45,-0.56,
";
        let catalog = read_catalog_csv(data.as_bytes()).unwrap();

        assert_eq!(catalog.len(), 2);
        let ldc = catalog.get("LDC").unwrap();
        assert_eq!(ldc.price_cents, 14532);
        assert_eq!(ldc.change_bps, 123);
        assert_eq!(ldc.description.as_deref(), Some("Public speaking"));

        let dc = catalog.get("180DC").unwrap();
        assert_eq!(dc.change_bps, -56);
        assert_eq!(dc.description, None);
    }

    #[test]
    fn test_read_csv_accepts_signed_gains() {
        let data = "\
symbol,name,price,change,description
LDC,Literary and Debating Club,145.32,+1.23,x
BC,Business Club,210.89,+3.21,
";
        let catalog = read_catalog_csv(data.as_bytes()).unwrap();

        assert_eq!(catalog.get("LDC").unwrap().change_bps, 123);
        assert_eq!(catalog.get("BC").unwrap().change_bps, 321);
    }

    #[test]
    fn test_read_csv_rejects_double_sign() {
        let data = "symbol,name,price,change,description\nMC,Music Club,65.78,+-0.89,\n";
        let err = read_catalog_csv(data.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid change '+-0.89'"));
    }

    #[test]
    fn test_read_csv_rejects_bad_price() {
        let data = "symbol,name,price,change,description\nMC,Music Club,cheap,,\n";
        let err = read_catalog_csv(data.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("Line 2"));
    }

    #[test]
    fn test_read_csv_rejects_duplicates() {
        let data = "\
symbol,name,price,change,description
BC,Business Club,210.89,,
BC,Book Club,12.00,,
";
        let err = read_catalog_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("BC"));
    }

    #[test]
    fn test_read_json() {
        let data = r#"[
            {"symbol": "RC", "name": "Robotics Club", "price": "120.50", "change": "2.34"},
            {"symbol": "MC", "name": "Music Club", "price": "65.78"}
        ]"#;
        let catalog = read_catalog_json(data.as_bytes()).unwrap();

        let symbols: Vec<&str> = catalog.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["RC", "MC"]);
        assert_eq!(catalog.price_of("RC"), Some(12050));
        assert_eq!(catalog.get("MC").unwrap().change_bps, 0);
    }

    #[test]
    fn test_read_json_numeric_amounts() {
        let data = r#"[
            {"symbol": "LDC", "name": "Literary and Debating Club", "price": 145.32, "change": 1.23},
            {"symbol": "180DC", "name": "180 Degrees Consulting", "price": 87.45, "change": -0.56},
            {"symbol": "MC", "name": "Music Club", "price": 65}
        ]"#;
        let catalog = read_catalog_json(data.as_bytes()).unwrap();

        assert_eq!(catalog.price_of("LDC"), Some(14532));
        assert_eq!(catalog.get("LDC").unwrap().change_bps, 123);
        assert_eq!(catalog.get("180DC").unwrap().change_bps, -56);
        assert_eq!(catalog.price_of("MC"), Some(6500));
    }

    #[test]
    fn test_read_json_rejects_zero_price() {
        let data = r#"[{"symbol": "RC", "name": "Robotics Club", "price": "0"}]"#;
        assert!(read_catalog_json(data.as_bytes()).is_err());
    }
}
