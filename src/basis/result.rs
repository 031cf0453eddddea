use super::classify::{accumulate, Accumulator};
use super::row::TransactionRow;
use rust_decimal::{Decimal, RoundingStrategy};
use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CostBasisError {
    #[error("no 100-share stock purchases were detected for {ticker}")]
    NoPurchaseLots { ticker: String },
    #[error("invalid current price: {0:?}")]
    InvalidPrice(String),
    #[error("no ticker selected")]
    EmptyTicker,
    #[error("values for {ticker} are too large to calculate")]
    Overflow { ticker: String },
}

/// Adjusted cost basis and unrealized P/L for one ticker.
///
/// Values are kept at full precision; rounding to cents happens only when
/// rendering the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CostBasisResult {
    pub ticker: String,
    pub shares_held: u64,
    #[schemars(with = "f64")]
    pub current_price: Decimal,
    #[schemars(with = "f64")]
    pub total_stock_cost: Decimal,
    /// Positive when more premium was received than paid
    #[schemars(with = "f64")]
    pub net_option_premium: Decimal,
    /// Stock cost less net option premium
    #[schemars(with = "f64")]
    pub adjusted_total_cost_basis: Decimal,
    #[schemars(with = "f64")]
    pub adjusted_cost_basis_per_share: Decimal,
    #[schemars(with = "f64")]
    pub unrealized_pl_per_share: Decimal,
    #[schemars(with = "f64")]
    pub total_unrealized_pl: Decimal,
}

impl CostBasisResult {
    /// Plain-text report, one labelled line per metric.
    pub fn report(&self) -> String {
        [
            format!("Results for {}", self.ticker),
            String::new(),
            format!("Shares Held: {}", self.shares_held),
            format!("Total Stock Cost: {}", format_usd(self.total_stock_cost)),
            format!("Net Option Premium: {}", format_usd(self.net_option_premium)),
            format!(
                "Adjusted Total Cost Basis: {}",
                format_usd(self.adjusted_total_cost_basis)
            ),
            format!(
                "Adjusted Cost Basis Per Share: {}",
                format_usd(self.adjusted_cost_basis_per_share)
            ),
            format!(
                "Unrealized P/L Per Share: {}",
                format_usd(self.unrealized_pl_per_share)
            ),
            format!("Total Unrealized P/L: {}", format_usd(self.total_unrealized_pl)),
        ]
        .join("\n")
    }
}

impl fmt::Display for CostBasisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

/// Derive the adjusted basis from accumulated totals.
pub fn compute_result(
    acc: &Accumulator,
    current_price: Decimal,
) -> Result<CostBasisResult, CostBasisError> {
    if current_price < Decimal::ZERO {
        return Err(CostBasisError::InvalidPrice(current_price.to_string()));
    }
    if acc.is_empty() {
        return Err(CostBasisError::NoPurchaseLots {
            ticker: acc.ticker.clone(),
        });
    }

    let overflow = || CostBasisError::Overflow {
        ticker: acc.ticker.clone(),
    };
    let shares = Decimal::from(acc.shares_acquired);
    let adjusted_total = acc
        .stock_cost_total
        .checked_sub(acc.option_premium_net)
        .ok_or_else(overflow)?;
    let adjusted_per_share = adjusted_total.checked_div(shares).ok_or_else(overflow)?;
    let unrealized_per_share = current_price
        .checked_sub(adjusted_per_share)
        .ok_or_else(overflow)?;
    let total_unrealized = unrealized_per_share
        .checked_mul(shares)
        .ok_or_else(overflow)?;

    Ok(CostBasisResult {
        ticker: acc.ticker.clone(),
        shares_held: acc.shares_acquired,
        current_price,
        total_stock_cost: acc.stock_cost_total,
        net_option_premium: acc.option_premium_net,
        adjusted_total_cost_basis: adjusted_total,
        adjusted_cost_basis_per_share: adjusted_per_share,
        unrealized_pl_per_share: unrealized_per_share,
        total_unrealized_pl: total_unrealized,
    })
}

/// Parse a user-entered price such as `55.27` or `$55.27`.
pub fn parse_current_price(text: &str) -> Result<Decimal, CostBasisError> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    match Decimal::from_str(digits) {
        Ok(price) if price >= Decimal::ZERO => Ok(price),
        _ => Err(CostBasisError::InvalidPrice(text.to_string())),
    }
}

/// Entry point taking the ticker and price exactly as entered.
pub fn calculate(
    rows: &[TransactionRow],
    ticker: &str,
    current_price: &str,
) -> Result<CostBasisResult, CostBasisError> {
    if ticker.trim().is_empty() {
        return Err(CostBasisError::EmptyTicker);
    }
    let current_price = parse_current_price(current_price)?;
    compute_result(&accumulate(rows, ticker), current_price)
}

pub fn format_usd(amount: Decimal) -> String {
    let cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${:.2}", cents)
}
