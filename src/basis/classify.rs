//! Row classification and running totals for one ticker.
//!
//! Classification rules, applied in order:
//! 1. Rows for another symbol, or not filled, are skipped.
//! 2. Rows without a positive price are skipped.
//! 3. Descriptions mentioning "call" or "put" are option legs. They must carry
//!    a "cr" or "db" marker on the price, otherwise the side is ambiguous and
//!    the row is skipped rather than guessed.
//! 4. Rows with a quantity of exactly +100 are stock purchase lots.
//! 5. Anything else (sales, odd lots, assignments) does not move the basis.

use super::row::TransactionRow;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

/// Shares per option contract.
pub const CONTRACT_MULTIPLIER: Decimal = dec!(100);

/// Shares in a qualifying purchase lot.
pub const LOT_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Credit,
    Debit,
}

impl Side {
    /// Side from the price annotation. Credit wins if both markers appear.
    fn from_price(price: &str) -> Option<Side> {
        let price = price.to_lowercase();
        if price.contains("cr") {
            Some(Side::Credit)
        } else if price.contains("db") {
            Some(Side::Debit)
        } else {
            None
        }
    }

    fn sign(self) -> Decimal {
        match self {
            Side::Credit => Decimal::ONE,
            Side::Debit => Decimal::NEGATIVE_ONE,
        }
    }
}

/// Why a row did not contribute to the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason")]
pub enum SkipReason {
    OtherSymbol,
    NotFilled,
    MalformedPrice,
    /// Option leg with neither a credit nor a debit marker.
    AmbiguousOptionSide,
    /// Stock row that is not a +100 share purchase.
    NotPurchaseLot,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::OtherSymbol => "other symbol",
            SkipReason::NotFilled => "not filled",
            SkipReason::MalformedPrice => "malformed price",
            SkipReason::AmbiguousOptionSide => "option without cr/db marker",
            SkipReason::NotPurchaseLot => "not a 100 share purchase",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    /// Signed premium: positive when received.
    OptionPremium { side: Side, cash: Decimal },
    StockPurchase { shares: u64, cost: Decimal },
    Skipped(SkipReason),
}

/// Totals for a single ticker, the input to [`super::result::compute_result`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accumulator {
    pub ticker: String,
    pub option_premium_net: Decimal,
    pub stock_cost_total: Decimal,
    pub shares_acquired: u64,
}

impl Accumulator {
    pub fn new(ticker: &str) -> Self {
        Accumulator {
            ticker: ticker.trim().to_string(),
            option_premium_net: Decimal::ZERO,
            stock_cost_total: Decimal::ZERO,
            shares_acquired: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shares_acquired == 0
    }

    /// Sales are never subtracted; only premium and purchase lots are added.
    ///
    /// Returns `false`, leaving the totals untouched, when the contribution
    /// would overflow them.
    fn apply(&mut self, classification: &Classification) -> bool {
        match classification {
            Classification::OptionPremium { cash, .. } => {
                match self.option_premium_net.checked_add(*cash) {
                    Some(net) => self.option_premium_net = net,
                    None => return false,
                }
            }
            Classification::StockPurchase { shares, cost } => {
                let (Some(total), Some(acquired)) = (
                    self.stock_cost_total.checked_add(*cost),
                    self.shares_acquired.checked_add(*shares),
                ) else {
                    return false;
                };
                self.stock_cost_total = total;
                self.shares_acquired = acquired;
            }
            Classification::Skipped(_) => {}
        }
        true
    }
}

pub fn classify_row(row: &TransactionRow, ticker: &str) -> Classification {
    if row.symbol() != ticker.trim() {
        return Classification::Skipped(SkipReason::OtherSymbol);
    }
    if !row.is_filled() {
        return Classification::Skipped(SkipReason::NotFilled);
    }
    let Some(magnitude) = row.price_magnitude() else {
        log::debug!("Skipping {} row with malformed price {:?}", ticker, row.price);
        return Classification::Skipped(SkipReason::MalformedPrice);
    };

    let description = row.description.to_lowercase();
    if description.contains("call") || description.contains("put") {
        return match Side::from_price(&row.price) {
            Some(side) => match magnitude.checked_mul(CONTRACT_MULTIPLIER) {
                Some(premium) => Classification::OptionPremium {
                    side,
                    cash: premium * side.sign(),
                },
                None => out_of_range(ticker, row),
            },
            None => {
                log::warn!(
                    "Skipping {} option row without credit/debit marker: {:?} @ {:?}",
                    ticker,
                    row.description,
                    row.price
                );
                Classification::Skipped(SkipReason::AmbiguousOptionSide)
            }
        };
    }

    match row.signed_quantity() {
        Some(quantity) if quantity == Decimal::from(LOT_SIZE) => {
            match magnitude.checked_mul(Decimal::from(LOT_SIZE)) {
                Some(cost) => Classification::StockPurchase {
                    shares: LOT_SIZE,
                    cost,
                },
                None => out_of_range(ticker, row),
            }
        }
        _ => Classification::Skipped(SkipReason::NotPurchaseLot),
    }
}

fn out_of_range(ticker: &str, row: &TransactionRow) -> Classification {
    log::warn!("Skipping {} row with out of range price {:?}", ticker, row.price);
    Classification::Skipped(SkipReason::MalformedPrice)
}

/// Classify every row against `ticker` and sum the contributions.
pub fn accumulate(rows: &[TransactionRow], ticker: &str) -> Accumulator {
    let mut acc = Accumulator::new(ticker);
    for row in rows {
        if !acc.apply(&classify_row(row, ticker)) {
            log::warn!(
                "Skipping {} row {:?} @ {:?}: totals would overflow",
                acc.ticker,
                row.description,
                row.price
            );
        }
    }
    log::debug!(
        "{}: premium {} stock cost {} shares {}",
        acc.ticker,
        acc.option_premium_net,
        acc.stock_cost_total,
        acc.shares_acquired
    );
    acc
}
