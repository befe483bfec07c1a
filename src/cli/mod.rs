use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::application::{
    ExchangeService, PortfolioReport, SessionConfig, SharedExchange, StockListing, TradeReceipt,
};
use crate::domain::{Shares, Side, Trade, format_cents, format_dollars, parse_cents};
use crate::io::{
    load_catalog, write_positions_csv, write_report_json, write_trades_csv, write_trades_json,
};

/// Club Stock Exchange - trade shares of campus clubs
#[derive(Parser)]
#[command(name = "clubstock")]
#[command(about = "Buy and sell shares of campus clubs with a simulated cash balance")]
#[command(version)]
pub struct Cli {
    /// Starting funds (e.g., "10000" or "2500.50")
    #[arg(long, default_value = "10000.00", global = true)]
    pub cash: String,

    /// Stock catalog file (.csv or .json); the built-in clubs are used if omitted
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the stocks available for trading
    Stocks,

    /// Trade interactively (the default)
    Session,

    /// Execute orders from a file (stdin if omitted), then show the portfolio
    Run {
        /// File with one order per line, e.g. "buy LDC 10"
        input: Option<PathBuf>,

        /// Continue past rejected orders instead of stopping
        #[arg(long)]
        keep_going: bool,

        /// Output format for the final portfolio
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// A single line typed into a session or listed in an order file.
#[derive(Parser)]
#[command(no_binary_name = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// List stocks with the shares you own
    Stocks,

    /// Show the price of a stock
    Quote { symbol: String },

    /// Buy shares at the quoted price
    Buy {
        symbol: String,
        #[arg(allow_negative_numbers = true)]
        quantity: Shares,
    },

    /// Sell owned shares at the quoted price
    Sell {
        symbol: String,
        #[arg(allow_negative_numbers = true)]
        quantity: Shares,
    },

    /// Show funds, holdings and total value
    Portfolio {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show executed trades
    Trades {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

impl SessionLine {
    /// Parse a raw input line. Returns `Ok(None)` for blank lines and `#` comments.
    pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, clap::Error> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let parsed = Self::try_parse_from(line.split_whitespace())?;
        Ok(Some(parsed.command))
    }
}

enum Flow {
    Continue,
    Quit,
}

impl Cli {
    fn session_config(&self) -> Result<SessionConfig> {
        let initial_cash = parse_cents(&self.cash)
            .with_context(|| format!("Invalid starting cash '{}'. Use '10000.00'", self.cash))?;

        let mut config = SessionConfig::default().with_initial_cash(initial_cash);
        if let Some(path) = &self.catalog {
            config = config.with_catalog(load_catalog(path)?);
        }
        Ok(config)
    }

    pub async fn run(self) -> Result<()> {
        let service = ExchangeService::new(self.session_config()?)?;
        let exchange = SharedExchange::new(service);

        match self.command.unwrap_or(Commands::Session) {
            Commands::Stocks => {
                let listings = exchange.inspect(|s| s.stocks()).await;
                print_stocks(&listings);
            }

            Commands::Session => {
                run_session(&exchange).await?;
            }

            Commands::Run {
                input,
                keep_going,
                format,
            } => {
                let reader: Box<dyn AsyncRead + Unpin> = match &input {
                    Some(path) => {
                        let file = tokio::fs::File::open(path).await.with_context(|| {
                            format!("Failed to open order file: {}", path.display())
                        })?;
                        Box::new(file)
                    }
                    None => Box::new(tokio::io::stdin()),
                };
                run_orders(&exchange, reader, keep_going).await?;
                print_portfolio(&exchange.report().await, format)?;
            }
        }

        Ok(())
    }
}

async fn run_session(exchange: &SharedExchange) -> Result<()> {
    let cash = exchange.summary().await.cash;
    println!("Club Stock Exchange");
    println!("Available funds: {}", format_dollars(cash));
    println!("Type 'help' for commands, 'quit' to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let command = match SessionLine::parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                // Covers `help` as well as usage errors
                println!("{}", e.render());
                continue;
            }
        };

        match execute_command(exchange, command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => println!("Error: {:#}", e),
        }
    }

    let summary = exchange.summary().await;
    println!(
        "Session closed. Total value: {}",
        format_dollars(summary.total_value)
    );
    Ok(())
}

/// Execute order lines in sequence. Returns the number of executed commands.
pub async fn run_orders<R: AsyncRead + Unpin>(
    exchange: &SharedExchange,
    reader: R,
    keep_going: bool,
) -> Result<usize> {
    let mut lines = BufReader::new(reader).lines();
    let mut line_num = 0;
    let mut executed = 0;

    while let Some(line) = lines.next_line().await? {
        line_num += 1;

        let command = match SessionLine::parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                anyhow::bail!("Line {}: cannot parse '{}': {}", line_num, line.trim(), e.kind());
            }
        };

        match execute_command(exchange, command).await {
            Ok(Flow::Continue) => executed += 1,
            Ok(Flow::Quit) => break,
            Err(e) if keep_going => eprintln!("Line {}: {:#}", line_num, e),
            Err(e) => return Err(e.context(format!("Line {}", line_num))),
        }
    }

    Ok(executed)
}

async fn execute_command(exchange: &SharedExchange, command: SessionCommand) -> Result<Flow> {
    match command {
        SessionCommand::Stocks => {
            let listings = exchange.inspect(|s| s.stocks()).await;
            print_stocks(&listings);
        }

        SessionCommand::Quote { symbol } => {
            let price = exchange.quote(&symbol).await?;
            println!("{} {}", symbol, format_dollars(price));
        }

        SessionCommand::Buy { symbol, quantity } => {
            let receipt = exchange.buy(&symbol, quantity).await?;
            print_receipt(receipt.as_ref(), &symbol);
        }

        SessionCommand::Sell { symbol, quantity } => {
            let receipt = exchange.sell(&symbol, quantity).await?;
            print_receipt(receipt.as_ref(), &symbol);
        }

        SessionCommand::Portfolio { format } => {
            print_portfolio(&exchange.report().await, format)?;
        }

        SessionCommand::Trades { format } => {
            print_trades(&exchange.trades().await, format)?;
        }

        SessionCommand::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

fn print_receipt(receipt: Option<&TradeReceipt>, symbol: &str) {
    match receipt {
        Some(receipt) => {
            let verb = match receipt.trade.side {
                Side::Buy => "Bought",
                Side::Sell => "Sold",
            };
            println!(
                "{} {} {} @ {} for {}",
                verb,
                receipt.trade.quantity,
                receipt.trade.symbol,
                format_dollars(receipt.trade.price_cents),
                format_dollars(receipt.trade.amount_cents)
            );
            println!(
                "  You own {} shares. Available funds: {}",
                receipt.shares,
                format_dollars(receipt.cash)
            );
        }
        None => println!("Nothing to do: quantity for {} must be positive", symbol),
    }
}

fn print_stocks(listings: &[StockListing]) {
    println!(
        "{:<8} {:<30} {:>10} {:>8} {:>8}",
        "SYMBOL", "NAME", "PRICE", "CHANGE", "OWNED"
    );
    println!("{}", "-".repeat(68));

    for stock in listings {
        let arrow = if stock.is_gaining() { "+" } else { "-" };
        println!(
            "{:<8} {:<30} {:>10} {:>7}% {:>8}",
            stock.symbol,
            truncate(&stock.name, 30),
            format_dollars(stock.price),
            format!("{}{}", arrow, format_cents(stock.change_bps.abs())),
            stock.owned
        );
    }
}

fn print_portfolio(report: &PortfolioReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            write_report_json(report, std::io::stdout().lock())?;
        }
        OutputFormat::Csv => {
            write_positions_csv(report, std::io::stdout().lock())?;
        }
        OutputFormat::Table => {
            println!("Available Funds: {:>15}", format_dollars(report.cash));
            println!(
                "Portfolio Value: {:>15}",
                format_dollars(report.holdings_value)
            );
            println!("Total Value:     {:>15}", format_dollars(report.total_value));
            println!();

            if report.positions.is_empty() {
                println!("You don't own any club stocks yet.");
                return Ok(());
            }

            println!(
                "{:<8} {:<30} {:>8} {:>10} {:>12} {:>7}",
                "SYMBOL", "NAME", "SHARES", "PRICE", "VALUE", "WEIGHT"
            );
            println!("{}", "-".repeat(80));
            for position in &report.positions {
                println!(
                    "{:<8} {:<30} {:>8} {:>10} {:>12} {:>6.1}%",
                    position.symbol,
                    truncate(&position.name, 30),
                    position.quantity,
                    format_dollars(position.price),
                    format_dollars(position.value),
                    position.percentage()
                );
            }
        }
    }
    Ok(())
}

fn print_trades(trades: &[Trade], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_trades_json(trades, std::io::stdout().lock())?,
        OutputFormat::Csv => {
            write_trades_csv(trades, std::io::stdout().lock())?;
        }
        OutputFormat::Table => {
            if trades.is_empty() {
                println!("No trades yet.");
                return Ok(());
            }

            println!(
                "{:<20} {:<5} {:<8} {:>8} {:>10} {:>12}",
                "TIME", "SIDE", "SYMBOL", "SHARES", "PRICE", "AMOUNT"
            );
            println!("{}", "-".repeat(68));
            for trade in trades {
                println!(
                    "{:<20} {:<5} {:<8} {:>8} {:>10} {:>12}",
                    trade.executed_at.format("%Y-%m-%d %H:%M:%S"),
                    trade.side,
                    trade.symbol,
                    trade.quantity,
                    format_dollars(trade.price_cents),
                    format_dollars(trade.amount_cents)
                );
            }
        }
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
