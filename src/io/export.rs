use anyhow::Result;
use std::io::Write;

use crate::application::PortfolioReport;
use crate::domain::{Trade, format_cents};

/// Write the portfolio report as pretty-printed JSON.
pub fn write_report_json<W: Write>(report: &PortfolioReport, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    Ok(())
}

/// Write one CSV row per position. Returns the number of rows written.
pub fn write_positions_csv<W: Write>(report: &PortfolioReport, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["symbol", "name", "quantity", "price", "value", "weight"])?;

    for position in &report.positions {
        csv_writer.write_record(&[
            position.symbol.clone(),
            position.name.clone(),
            position.quantity.to_string(),
            format_cents(position.price),
            format_cents(position.value),
            format!("{:.4}", position.weight),
        ])?;
    }

    csv_writer.flush()?;
    Ok(report.positions.len())
}

/// Write the trade journal as CSV. Returns the number of trades written.
pub fn write_trades_csv<W: Write>(trades: &[Trade], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        "id",
        "executed_at",
        "side",
        "symbol",
        "quantity",
        "price",
        "amount",
    ])?;

    for trade in trades {
        csv_writer.write_record(&[
            trade.id.to_string(),
            trade.executed_at.to_rfc3339(),
            trade.side.to_string(),
            trade.symbol.clone(),
            trade.quantity.to_string(),
            format_cents(trade.price_cents),
            format_cents(trade.amount_cents),
        ])?;
    }

    csv_writer.flush()?;
    Ok(trades.len())
}

/// Write the trade journal as a JSON array.
pub fn write_trades_json<W: Write>(trades: &[Trade], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, trades)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{PortfolioSummary, Position};
    use crate::domain::Side;

    fn sample_report() -> PortfolioReport {
        PortfolioReport::new(
            PortfolioSummary {
                cash: 854680,
                holdings_value: 145320,
                total_value: 1_000_000,
            },
            vec![Position {
                symbol: "LDC".into(),
                name: "Literary and Debating Club".into(),
                quantity: 10,
                price: 14532,
                value: 145320,
                weight: 0.14532,
            }],
        )
    }

    #[test]
    fn test_positions_csv() {
        let mut out = Vec::new();
        let count = write_positions_csv(&sample_report(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            text,
            "symbol,name,quantity,price,value,weight\n\
             LDC,Literary and Debating Club,10,145.32,1453.20,0.1453\n"
        );
    }

    #[test]
    fn test_report_json_uses_cents() {
        let mut out = Vec::new();
        write_report_json(&sample_report(), &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["cash"], 854680);
        assert_eq!(value["positions"][0]["symbol"], "LDC");
    }

    #[test]
    fn test_trades_csv() {
        let trades = vec![
            Trade::new(Side::Buy, "MC", 3, 6578),
            Trade::new(Side::Sell, "MC", 1, 6578),
        ];
        let mut out = Vec::new();
        let count = write_trades_csv(&trades, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(count, 2);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(",buy,MC,3,65.78,197.34"));
        assert!(lines[2].ends_with(",sell,MC,1,65.78,65.78"));
    }

    #[test]
    fn test_trades_json_roundtrips() {
        let trades = vec![Trade::new(Side::Buy, "RC", 2, 12050)];
        let mut out = Vec::new();
        write_trades_json(&trades, &mut out).unwrap();

        let parsed: Vec<Trade> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, trades);
    }
}
