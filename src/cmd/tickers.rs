//! Tickers command - distinct symbols present in an export

use crate::basis;
use crate::cmd::read_rows;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct TickersCommand {
    /// Brokerage activity CSV. Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output as a JSON array
    #[arg(long)]
    json: bool,
}

impl TickersCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rows = read_rows(&self.file)?;
        let tickers = basis::tickers(&rows);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&tickers)?);
        } else if tickers.is_empty() {
            println!("No tickers found");
        } else {
            for ticker in &tickers {
                println!("{}", ticker);
            }
        }
        Ok(())
    }
}
