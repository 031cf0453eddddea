//! Trades command - how each row of a ticker was classified

use crate::basis::{self, format_usd, Classification, Side, TransactionRow};
use crate::cmd::read_rows;
use clap::Args;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct TradesCommand {
    /// Brokerage activity CSV ("-" for stdin)
    #[arg(short, long)]
    file: PathBuf,

    /// Ticker to show (e.g., IBIT)
    #[arg(short, long)]
    ticker: String,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

impl TradesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rows = read_rows(&self.file)?;
        let trade_rows = build_trade_rows(&rows, &self.ticker);

        if self.csv {
            self.write_csv(&trade_rows)
        } else {
            self.print_table(&rows, &trade_rows);
            Ok(())
        }
    }

    fn print_table(&self, rows: &[TransactionRow], trade_rows: &[TradeRow]) {
        if trade_rows.is_empty() {
            println!("No rows found for {}", self.ticker.trim());
            return;
        }

        let table = Table::new(trade_rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(5..=6)).with(Alignment::right()))
            .with(Modify::new(Columns::one(8)).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        let acc = basis::accumulate(rows, &self.ticker);
        println!();
        println!(
            "Shares: {} | Stock cost: {} | Net premium: {}",
            acc.shares_acquired,
            format_usd(acc.stock_cost_total),
            format_usd(acc.option_premium_net)
        );
    }

    fn write_csv(&self, trade_rows: &[TradeRow]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for row in trade_rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Row for the trades table output
#[derive(Debug, Clone, PartialEq, Tabled, serde::Serialize)]
pub struct TradeRow {
    #[tabled(rename = "#")]
    #[serde(rename = "row_num")]
    pub row_num: usize,

    #[tabled(rename = "Time")]
    pub time: String,

    #[tabled(rename = "Order #")]
    pub order: String,

    #[tabled(rename = "Status")]
    pub status: String,

    #[tabled(rename = "Description")]
    pub description: String,

    #[tabled(rename = "Quantity")]
    pub quantity: String,

    #[tabled(rename = "Price")]
    pub price: String,

    #[tabled(rename = "Counted As")]
    pub counted_as: String,

    #[tabled(rename = "Cash")]
    pub cash: String,
}

/// One output row per input row of the ticker, numbered by position in the file.
fn build_trade_rows(rows: &[TransactionRow], ticker: &str) -> Vec<TradeRow> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.symbol() == ticker.trim())
        .map(|(i, row)| {
            let (counted_as, cash) = match basis::classify_row(row, ticker) {
                Classification::OptionPremium { side, cash } => {
                    let label = match side {
                        Side::Credit => "Option credit",
                        Side::Debit => "Option debit",
                    };
                    (label.to_string(), format_usd(cash))
                }
                Classification::StockPurchase { shares, cost } => {
                    (format!("Buy {} shares", shares), format_usd(cost))
                }
                Classification::Skipped(reason) => (format!("Skipped: {}", reason), "-".to_string()),
            };
            TradeRow {
                row_num: i + 1,
                time: row.time.clone().unwrap_or_default(),
                order: row.order_number.clone().unwrap_or_default(),
                status: row.status.trim().to_string(),
                description: row.description.trim().to_string(),
                quantity: row.quantity.trim().to_string(),
                price: row.price.trim().to_string(),
                counted_as,
                cash,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(symbol: &str, status: &str, description: &str, quantity: &str, price: &str) -> TransactionRow {
        TransactionRow {
            symbol: symbol.to_string(),
            status: status.to_string(),
            description: description.to_string(),
            quantity: quantity.to_string(),
            price: price.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn rows_keep_file_position_and_classification() {
        let rows = vec![
            row("MARA", "Filled", "Bought 100 BTO", "100", "$20.00"),
            row("IBIT", "Filled", "Bought 100 BTO", "100", "$50.00"),
            row("IBIT", "Filled", "Sold 1 Call", "-1", "1.50 cr"),
            row("IBIT", "Cancelled", "Sold 1 Put", "-1", "2.00 cr"),
            row("IBIT", "Filled", "Sold 1 Put", "-1", "2.00"),
        ];

        let trade_rows = build_trade_rows(&rows, "IBIT");
        assert_eq!(trade_rows.len(), 4);

        assert_eq!(trade_rows[0].row_num, 2);
        assert_eq!(trade_rows[0].counted_as, "Buy 100 shares");
        assert_eq!(trade_rows[0].cash, "$5000.00");

        assert_eq!(trade_rows[1].counted_as, "Option credit");
        assert_eq!(trade_rows[1].cash, "$150.00");

        assert_eq!(trade_rows[2].counted_as, "Skipped: not filled");
        assert_eq!(trade_rows[2].cash, "-");

        assert_eq!(trade_rows[3].counted_as, "Skipped: option without cr/db marker");
    }

    #[test]
    fn unknown_ticker_has_no_rows() {
        let rows = vec![row("IBIT", "Filled", "Bought 100 BTO", "100", "$50.00")];
        assert!(build_trade_rows(&rows, "SOFI").is_empty());
    }
}
