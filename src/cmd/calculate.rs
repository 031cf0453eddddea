//! Calculate command - adjusted cost basis and unrealized P/L for one ticker

use crate::basis::{self, CostBasisResult};
use crate::cmd::{read_rows, reveal};
use clap::Args;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct CalculateCommand {
    /// Brokerage activity CSV ("-" for stdin)
    #[arg(short, long)]
    file: PathBuf,

    /// Ticker to calculate (e.g., IBIT, MARA, SOFI)
    #[arg(short, long)]
    ticker: String,

    /// Current share price (e.g., 55.27)
    #[arg(short, long)]
    price: String,

    /// Output as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Reveal the report one character at a time, pausing this many
    /// milliseconds between characters
    #[arg(long, value_name = "MS", conflicts_with = "json")]
    reveal_ms: Option<u64>,
}

impl CalculateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rows = read_rows(&self.file)?;
        let result = basis::calculate(&rows, &self.ticker, &self.price)?;
        log::info!(
            "{}: {} shares, adjusted basis {} per share",
            result.ticker,
            result.shares_held,
            result.adjusted_cost_basis_per_share
        );

        if self.json {
            self.print_json(&result)
        } else {
            self.print_report(&result)
        }
    }

    fn print_report(&self, result: &CostBasisResult) -> anyhow::Result<()> {
        let report = result.report();
        match self.reveal_ms {
            Some(ms) => {
                let mut stdout = io::stdout().lock();
                reveal::type_out(&mut stdout, &report, Duration::from_millis(ms))?;
            }
            None => println!("{}", report),
        }
        Ok(())
    }

    fn print_json(&self, result: &CostBasisResult) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(result)?);
        Ok(())
    }
}
