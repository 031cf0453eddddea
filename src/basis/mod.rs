pub mod classify;
pub mod result;
pub mod row;

// Flat public surface for domain types and functions.
pub use classify::{accumulate, classify_row, Classification, Side};
pub use result::{calculate, format_usd, CostBasisResult};
pub use row::{read_csv, tickers, TransactionRow};
