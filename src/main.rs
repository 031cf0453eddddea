mod basis;
mod cmd;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "wheelbasis",
    version,
    about = "Adjusted cost basis for the options Wheel from a brokerage activity CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate adjusted cost basis and unrealized P/L for a ticker
    Calculate(cmd::calculate::CalculateCommand),
    /// List the tickers present in an export
    Tickers(cmd::tickers::TickersCommand),
    /// Show how each row of a ticker was classified
    Trades(cmd::trades::TradesCommand),
    /// Print expected input columns or the result schema
    Schema(cmd::schema::SchemaCommand),
    /// Open the broker login page to download an activity export
    Login(cmd::login::LoginCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Calculate(c) => c.exec(),
        Command::Tickers(c) => c.exec(),
        Command::Trades(c) => c.exec(),
        Command::Schema(c) => c.exec(),
        Command::Login(c) => c.exec(),
    }
}
